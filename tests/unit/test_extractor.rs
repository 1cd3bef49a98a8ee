//! Unit tests for code block extraction
//!
//! Exercises the public extraction API against realistic markdown
//! documents through the LineSource seam.

use blockrun::error::Error;
use blockrun::extract::{extract, Cursor};
use blockrun::resolver::{Platform, Resolver};

#[path = "../test_utils/mod.rs"]
#[allow(dead_code)]
mod test_utils;

use test_utils::{sample_markdown, StaticDocument};

fn posix() -> Resolver {
    Resolver::new(Platform::Posix, "/mnt")
}

#[test]
fn test_extracts_first_block_in_document() {
    let doc = StaticDocument::new(sample_markdown(), Cursor::new(5, 2));
    let block = extract(&doc, &posix()).unwrap();
    assert_eq!(block.language, "bash");
    assert_eq!(block.body, "echo checking");
}

#[test]
fn test_extracts_second_block_in_document() {
    let doc = StaticDocument::new(sample_markdown(), Cursor::new(11, 0));
    let block = extract(&doc, &posix()).unwrap();
    assert_eq!(block.language, "python");
    assert_eq!(block.body, "print(\"restarting\")");
}

#[test]
fn test_cursor_in_prose_between_blocks() {
    // Line 8 ("Then restart it:") sits between the blocks; scanning up
    // reaches the closing fence of the first block, which does not open
    // a block.
    let doc = StaticDocument::new(sample_markdown(), Cursor::new(8, 0));
    assert!(extract(&doc, &posix()).is_err());
}

#[test]
fn test_cursor_on_opening_fence_line() {
    let doc = StaticDocument::new(sample_markdown(), Cursor::new(4, 0));
    let block = extract(&doc, &posix()).unwrap();
    assert_eq!(block.language, "bash");
}

#[test]
fn test_cursor_past_document_end_is_clamped() {
    let doc = StaticDocument::new("```sh\necho hi\n```", Cursor::new(999, 0));
    let block = extract(&doc, &posix()).unwrap();
    assert_eq!(block.body, "echo hi");
}

#[test]
fn test_multi_line_block_preserves_interior() {
    let doc = StaticDocument::new(
        "```python\nfor i in range(3):\n    print(i)\n```",
        Cursor::new(2, 0),
    );
    let block = extract(&doc, &posix()).unwrap();
    assert_eq!(block.body, "for i in range(3):\n    print(i)");
    assert_eq!(block.line_count(), 2);
}

#[test]
fn test_unterminated_block_at_document_end() {
    let doc = StaticDocument::new("prose\n```bash\necho hi", Cursor::new(2, 0));
    assert!(matches!(
        extract(&doc, &posix()),
        Err(Error::BlockNotFound)
    ));
}

#[test]
fn test_fence_without_language_tag() {
    let doc = StaticDocument::new("```\nwhoami\n```", Cursor::new(1, 0));
    assert!(matches!(
        extract(&doc, &posix()),
        Err(Error::BlockNotFound)
    ));
}

#[test]
fn test_cursor_moves_change_the_selected_block() {
    let text = "```sh\necho a\n```\nmiddle\n```sh\necho b\n```";
    let doc = StaticDocument::new(text, Cursor::new(1, 0));
    assert_eq!(extract(&doc, &posix()).unwrap().body, "echo a");

    let doc = doc.with_cursor(Cursor::new(5, 0));
    assert_eq!(extract(&doc, &posix()).unwrap().body, "echo b");
}
