//! Run Pipeline
//!
//! The end-to-end path behind "run this code block": extract the block
//! under the cursor, gate it through the blacklist, resolve the
//! language to an execution plan, optionally confirm with the user,
//! then write the script and spawn it. All collaborators are explicit
//! on the context; nothing here reaches for global state.

use crate::config::{wsl, Settings};
use crate::error::Result;
use crate::extract::{self, LineSource};
use crate::models::{CodeBlock, ExecutionPlan};
use crate::resolver::{Platform, Resolver};
use crate::runner::{self, ProcessHandle};
use crate::safety::{self, ConfirmationPrompt};
use crate::session::{TerminalSession, TerminalSurface};

/// A block that made it through the gates and is now running
#[derive(Debug)]
pub struct RunOutcome {
    pub block: CodeBlock,
    pub plan: ExecutionPlan,
    pub handle: ProcessHandle,
}

impl RunOutcome {
    /// Bind the running process to a display surface
    pub fn into_session<S: TerminalSurface>(self, surface: S) -> TerminalSession<S> {
        TerminalSession::new(self.plan.command, self.handle, surface)
    }
}

/// Everything one run needs: settings, the platform's resolver, and
/// the host's confirmation dialogs
pub struct RunContext<P: ConfirmationPrompt> {
    settings: Settings,
    resolver: Resolver,
    prompt: P,
}

impl<P: ConfirmationPrompt> RunContext<P> {
    /// Build a context for the current platform. WSL mount
    /// auto-discovery runs here, once, before the resolver is built.
    pub fn new(settings: Settings, prompt: P) -> Self {
        Self::with_platform(settings, prompt, Platform::current())
    }

    /// Build a context for an explicit platform
    pub fn with_platform(mut settings: Settings, prompt: P, platform: Platform) -> Self {
        if platform == Platform::Windows {
            wsl::apply_auto_discovery(&mut settings);
        }
        let resolver = Resolver::new(platform, settings.wsl_mount_path.clone());
        Self {
            settings,
            resolver,
            prompt,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    /// Run the fenced code block enclosing the document's cursor.
    ///
    /// `Ok(None)` means nothing was started and nothing was written:
    /// the block was empty, or the user declined a confirmation. Both
    /// gates are awaited before the script file touches disk. Errors
    /// are real failures (no block, unsupported tag, I/O).
    pub async fn run_code_block(&self, source: &dyn LineSource) -> Result<Option<RunOutcome>> {
        let block = extract::extract(source, &self.resolver)?;

        if block.is_empty() {
            info!(language = %block.language, "code block is empty, nothing to run");
            return Ok(None);
        }

        let matches = safety::check(
            &block.body,
            &self.settings.blacklist,
            self.settings.blacklist_enabled,
        );
        if !matches.is_empty() {
            warn!(matches = %matches.join(), "block matched blacklist entries");
            if !self.prompt.confirm_blacklist(&matches).await.is_approved() {
                info!("user declined blacklisted block");
                return Ok(None);
            }
        }

        let plan = self.resolver.resolve_unique(&block.language)?;

        if self.settings.prompt_before_run
            && !self.prompt.confirm_run(&block, &plan).await.is_approved()
        {
            info!("user declined run confirmation");
            return Ok(None);
        }

        let handle = runner::run(&plan, &block.body).await?;
        Ok(Some(RunOutcome {
            block,
            plan,
            handle,
        }))
    }
}
