//! Shared fixtures for integration and property tests

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

use blockrun::extract::{Cursor, LineSource};
use blockrun::safety::{Approval, BlacklistMatch, ConfirmationPrompt};
use blockrun::session::{StatusLine, TerminalSurface};
use blockrun::{CodeBlock, ExecutionPlan};

/// In-memory document backing the [`LineSource`] seam
pub struct StaticDocument {
    lines: Vec<String>,
    cursor: Cursor,
}

impl StaticDocument {
    pub fn new(text: &str, cursor: Cursor) -> Self {
        Self {
            lines: text.split('\n').map(String::from).collect(),
            cursor,
        }
    }

    pub fn with_cursor(mut self, cursor: Cursor) -> Self {
        self.cursor = cursor;
        self
    }
}

impl LineSource for StaticDocument {
    fn cursor(&self) -> Cursor {
        self.cursor
    }

    fn line(&self, index: usize) -> Option<String> {
        self.lines.get(index).cloned()
    }

    fn line_count(&self) -> usize {
        self.lines.len()
    }
}

/// A markdown note with prose and two runnable blocks
pub fn sample_markdown() -> &'static str {
    "# Deployment notes\n\
     \n\
     First check the service:\n\
     \n\
     ```bash\n\
     echo checking\n\
     ```\n\
     \n\
     Then restart it:\n\
     \n\
     ```python\n\
     print(\"restarting\")\n\
     ```\n\
     \n\
     Done."
}

/// Surface that records everything the session renders
#[derive(Default)]
pub struct RecordingSurface {
    pub output: Vec<u8>,
    pub status: Vec<StatusLine>,
    pub scrolls: usize,
    pub closed: bool,
}

impl TerminalSurface for RecordingSurface {
    fn append(&mut self, data: &[u8]) {
        self.output.extend_from_slice(data);
    }

    fn scroll_to_bottom(&mut self) {
        self.scrolls += 1;
    }

    fn set_status(&mut self, status: &StatusLine) {
        self.status.push(status.clone());
    }

    fn close(&mut self) {
        self.closed = true;
    }
}

/// Prompt that declines everything and counts how often it was asked
#[derive(Default)]
pub struct DeclineAll {
    pub asked: AtomicUsize,
}

impl DeclineAll {
    pub fn times_asked(&self) -> usize {
        self.asked.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ConfirmationPrompt for DeclineAll {
    async fn confirm_blacklist(&self, _matches: &BlacklistMatch) -> Approval {
        self.asked.fetch_add(1, Ordering::SeqCst);
        Approval::Declined
    }

    async fn confirm_run(&self, _block: &CodeBlock, _plan: &ExecutionPlan) -> Approval {
        self.asked.fetch_add(1, Ordering::SeqCst);
        Approval::Declined
    }
}
