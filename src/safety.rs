//! Safety Gate
//!
//! Scans a block body for blacklisted substrings before execution.
//! Matching is whole-word and case-sensitive; every match is collected
//! so the confirmation dialog can name them all. This is an advisory
//! gate, not a sandbox: trivially bypassable by obfuscation, and the
//! executed code runs with the user's full privileges either way.

use async_trait::async_trait;
use regex::Regex;

use crate::models::{CodeBlock, ExecutionPlan};

/// Blacklist entries found as whole words in a block body
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlacklistMatch {
    matches: Vec<String>,
}

impl BlacklistMatch {
    /// No entries matched
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// The matched entries, in blacklist order
    pub fn entries(&self) -> &[String] {
        &self.matches
    }

    /// Comma-joined entries for dialog text
    pub fn join(&self) -> String {
        self.matches.join(", ")
    }
}

/// Scan `body` for blacklist entries. When `enabled` is false the
/// result is always empty.
///
/// A word boundary here is whitespace or a string edge, not the regex
/// `\b` class: `\b` would flag hyphenated compounds like `format-rm`
/// and would never match path entries like `/etc/passwd`.
pub fn check(body: &str, blacklist: &[String], enabled: bool) -> BlacklistMatch {
    if !enabled {
        return BlacklistMatch::default();
    }

    let matches = blacklist
        .iter()
        .filter(|entry| !entry.is_empty())
        .filter(|entry| {
            let pattern = format!(r"(?:^|\s){}(?:\s|$)", regex::escape(entry));
            match Regex::new(&pattern) {
                Ok(re) => re.is_match(body),
                Err(e) => {
                    warn!(entry = entry.as_str(), error = %e, "skipping unmatchable blacklist entry");
                    false
                }
            }
        })
        .cloned()
        .collect();

    BlacklistMatch { matches }
}

/// User's answer to a confirmation prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Approval {
    /// Proceed with execution
    Approved,
    /// Abort the run; not an error, no side effects
    Declined,
}

impl Approval {
    pub fn is_approved(self) -> bool {
        matches!(self, Approval::Approved)
    }
}

/// Seam to the host's modal/dialog layer. The pipeline awaits the
/// user's answer before any file I/O happens.
#[async_trait]
pub trait ConfirmationPrompt: Send + Sync {
    /// The block matched blacklist entries; ask whether to run anyway
    async fn confirm_blacklist(&self, matches: &BlacklistMatch) -> Approval;

    /// Prompt-before-run is enabled; show the command and code and ask
    async fn confirm_run(&self, block: &CodeBlock, plan: &ExecutionPlan) -> Approval;
}

/// Prompt that approves everything; for hosts with the gate dialogs
/// disabled, and for tests
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoApprove;

#[async_trait]
impl ConfirmationPrompt for AutoApprove {
    async fn confirm_blacklist(&self, _matches: &BlacklistMatch) -> Approval {
        Approval::Approved
    }

    async fn confirm_run(&self, _block: &CodeBlock, _plan: &ExecutionPlan) -> Approval {
        Approval::Approved
    }
}
