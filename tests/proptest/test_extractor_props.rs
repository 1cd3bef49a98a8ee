//! Property-based tests for code block extraction

use proptest::prelude::*;

use blockrun::extract::{extract, Cursor, FENCE};
use blockrun::resolver::{Platform, Resolver};

#[path = "../test_utils/mod.rs"]
#[allow(dead_code)]
mod test_utils;

use test_utils::StaticDocument;

fn posix() -> Resolver {
    Resolver::new(Platform::Posix, "/mnt")
}

proptest! {
    #[test]
    fn test_extract_never_panics(
        text in "[ -~\\n]{0,400}",
        line in 0usize..50,
        ch in 0usize..80,
    ) {
        let doc = StaticDocument::new(&text, Cursor::new(line, ch));
        let _ = extract(&doc, &posix());
        // Arbitrary documents and cursors must not panic
    }

    #[test]
    fn test_body_never_contains_a_fence(
        lines in prop::collection::vec("[a-z ]{0,30}", 0..10),
        cursor_line in 0usize..14,
    ) {
        let text = format!("```sh\n{}\n```", lines.join("\n"));
        let doc = StaticDocument::new(&text, Cursor::new(cursor_line, 0));
        if let Ok(block) = extract(&doc, &posix()) {
            prop_assert!(!block.body.contains(FENCE));
        }
    }

    #[test]
    fn test_body_is_right_trimmed(
        lines in prop::collection::vec("[a-z ]{0,30}", 1..8),
    ) {
        let text = format!("```bash\n{}\n```", lines.join("\n"));
        let doc = StaticDocument::new(&text, Cursor::new(1, 0));
        if let Ok(block) = extract(&doc, &posix()) {
            prop_assert_eq!(block.body.trim_end(), block.body.as_str());
        }
    }

    #[test]
    fn test_well_formed_block_always_extracts(
        body_line in "[a-z][a-z ]{0,30}",
    ) {
        let text = format!("prose\n```python\n{}\n```\nprose", body_line);
        let doc = StaticDocument::new(&text, Cursor::new(2, 0));
        let block = extract(&doc, &posix()).unwrap();
        prop_assert_eq!(block.language.as_str(), "python");
        prop_assert_eq!(block.body.as_str(), body_line.trim_end());
    }

    #[test]
    fn test_language_tag_is_word_characters(
        text in "[ -~\\n]{0,300}",
        line in 0usize..40,
    ) {
        let doc = StaticDocument::new(&text, Cursor::new(line, 0));
        if let Ok(block) = extract(&doc, &posix()) {
            prop_assert!(!block.language.is_empty());
            prop_assert!(block.language.chars().all(|c| c.is_alphanumeric() || c == '_'));
        }
    }
}
