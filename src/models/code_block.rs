//! Code Block Model
//!
//! Represents a fenced code block extracted from a document: the language
//! tag from the opening fence and the body between the fences. Extracted
//! fresh per invocation and discarded after use; never persisted.

use serde::{Deserialize, Serialize};

/// A fenced code block extracted at the cursor position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeBlock {
    /// Language tag from the opening fence (e.g. "bash", "python")
    pub language: String,

    /// Block body: interior lines joined with the resolved terminator,
    /// right-trimmed. Leading newlines are preserved so line numbers in
    /// interpreter error output still align with the document.
    pub body: String,
}

impl CodeBlock {
    /// Create a new code block
    pub fn new(language: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            body: body.into(),
        }
    }

    /// An empty block (adjacent fences) is valid but has nothing to run
    pub fn is_empty(&self) -> bool {
        self.body.trim().is_empty()
    }

    /// Number of lines in the body
    pub fn line_count(&self) -> usize {
        if self.body.is_empty() {
            0
        } else {
            self.body.lines().count()
        }
    }
}

impl std::fmt::Display for CodeBlock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "```{}\n{}\n```", self.language, self.body)
    }
}
