//! BlockRun - run fenced code blocks from markdown documents
//!
//! This library provides the core functionality for BlockRun: it finds
//! the fenced code block under a document cursor, resolves its language
//! tag to an interpreter command, gates it through a configurable
//! blacklist, runs it as a child process, and streams the output into
//! an interactive terminal session.
//!
//! ## Module Organization
//!
//! - [`extract`] - Fenced code block extraction around a cursor
//! - [`resolver`] - Language tag to execution plan mapping
//! - [`safety`] - Blacklist gate and confirmation prompts
//! - [`runner`] - Script file writing and child process spawning
//! - [`session`] - Terminal session binding a process to a surface
//! - [`pipeline`] - The end-to-end run path tying the above together
//! - [`config`] - Settings, persistence, WSL mount discovery
//! - [`models`] - Data structures (CodeBlock, ExecutionPlan, ScriptProcess)
//! - [`mod@error`] - Error types and Result alias
//!
//! ## Quick Start
//!
//! ```no_run
//! use blockrun::{init, safety::AutoApprove};
//!
//! # async fn demo(doc: impl blockrun::extract::LineSource) -> blockrun::Result<()> {
//! let ctx = init(AutoApprove)?;
//! if let Some(outcome) = ctx.run_code_block(&doc).await? {
//!     println!("running: {}", outcome.plan.command);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! The host (an editor, a TUI, a test harness) supplies three seams:
//! a [`extract::LineSource`] for the document, a
//! [`safety::ConfirmationPrompt`] for dialogs, and a
//! [`session::TerminalSurface`] for display. Everything in between is
//! host-agnostic. Child process I/O is bridged to async consumers over
//! `tokio::mpsc` channels.

#[macro_use]
extern crate tracing;

pub mod config;
pub mod error;

// Core modules
pub mod extract;
pub mod pipeline;
pub mod resolver;
pub mod runner;
pub mod safety;
pub mod session;

// Model modules
pub mod models;

// Re-exports for core functionality
pub use config::Settings;
pub use error::{Error, Result};
pub use pipeline::{RunContext, RunOutcome};

// Convenience re-exports for common types
pub use config::loader::SettingsLoader;
pub use models::{CodeBlock, ExecutionPlan, RunState, ScriptProcess};
pub use resolver::{Platform, Resolver};
pub use runner::{ProcessEvent, ProcessHandle};
pub use session::{InputMode, StatusLine, TerminalSession, TerminalSurface};

// Version information
/// The current version of BlockRun from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The library name from Cargo.toml
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Initialize BlockRun with settings from the default locations.
///
/// Loads settings with a fallback to defaults when no file exists or
/// the file is unreadable, then builds a [`RunContext`] for the
/// current platform with the given confirmation prompt.
pub fn init<P: safety::ConfirmationPrompt>(prompt: P) -> Result<RunContext<P>> {
    info!("initializing {} v{}", NAME, VERSION);

    let settings = match SettingsLoader::load() {
        Ok(settings) => settings,
        Err(e) => {
            warn!(error = %e, "failed to load settings, using defaults");
            Settings::default()
        }
    };

    Ok(RunContext::new(settings, prompt))
}

/// Install a `tracing` subscriber honoring `RUST_LOG`, defaulting to
/// `info`. Call once from the host binary; calling again is a no-op.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
