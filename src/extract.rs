//! Code Block Extraction
//!
//! Locates the fenced code block enclosing the cursor and returns its
//! language tag and body. The host document is consumed through the
//! narrow [`LineSource`] trait, so any editor or buffer that can hand
//! out lines by index can drive extraction.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Error, Result};
use crate::models::CodeBlock;
use crate::resolver::Resolver;

/// Fence delimiter marking the start and end of a code block
pub const FENCE: &str = "```";

/// Cursor position within a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    /// Zero-based line index
    pub line: usize,
    /// Zero-based column within the line
    pub ch: usize,
}

impl Cursor {
    pub fn new(line: usize, ch: usize) -> Self {
        Self { line, ch }
    }
}

/// Narrow interface onto the host document
pub trait LineSource {
    /// Current cursor position
    fn cursor(&self) -> Cursor;

    /// Line text at the given index, without its terminator
    fn line(&self, index: usize) -> Option<String>;

    /// Total number of lines in the document
    fn line_count(&self) -> usize;
}

static OPENING_FENCE_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"```(\w+)").unwrap_or_else(|e| panic!("invalid fence tag regex: {}", e))
});

/// Extract the fenced code block enclosing the cursor.
///
/// Scans upward from the cursor for the opening fence and downward for
/// the closing fence; both must exist and the opening fence must carry
/// a language tag, otherwise [`Error::BlockNotFound`]. Interior lines
/// are joined with the terminator the resolver selects for the tag,
/// then right-trimmed. Leading blank lines are kept so interpreter
/// error line numbers still match the document.
pub fn extract(source: &dyn LineSource, resolver: &Resolver) -> Result<CodeBlock> {
    let cursor = source.cursor();
    let line_count = source.line_count();
    if line_count == 0 {
        return Err(Error::BlockNotFound);
    }

    let mut start_line = cursor.line.min(line_count - 1);

    // Cursor sitting on a closing fence is ambiguous; step up one line
    // so the scan finds the block above rather than the one below.
    if cursor.ch <= FENCE.len() && line_ends_with_fence(source, start_line) && start_line > 0 {
        start_line -= 1;
    }

    // Scan upward for the opening fence
    while start_line > 0 && !line_starts_with_fence(source, start_line) {
        start_line -= 1;
    }
    if !line_starts_with_fence(source, start_line) {
        return Err(Error::BlockNotFound);
    }

    // Scan downward for the closing fence
    let mut end_line = start_line + 1;
    while end_line < line_count && !line_ends_with_fence(source, end_line) {
        end_line += 1;
    }
    if end_line >= line_count {
        // Unterminated fence: no block
        return Err(Error::BlockNotFound);
    }

    let opening = source.line(start_line).unwrap_or_default();
    let language = match OPENING_FENCE_TAG
        .captures(&opening)
        .and_then(|caps| caps.get(1))
    {
        Some(tag) => tag.as_str().to_string(),
        None => return Err(Error::BlockNotFound),
    };

    let terminator = resolver.line_terminator(&language);
    let mut body = String::new();
    for index in start_line + 1..end_line {
        body.push_str(&source.line(index).unwrap_or_default());
        body.push_str(terminator);
    }
    let body = body.trim_end().to_string();

    debug!(
        language,
        lines = end_line - start_line - 1,
        "extracted code block"
    );
    Ok(CodeBlock::new(language, body))
}

fn line_starts_with_fence(source: &dyn LineSource, index: usize) -> bool {
    source
        .line(index)
        .is_some_and(|line| line.starts_with(FENCE))
}

fn line_ends_with_fence(source: &dyn LineSource, index: usize) -> bool {
    source.line(index).is_some_and(|line| line.ends_with(FENCE))
}
