//! Text chunking for TTS processing.
//!
//! Sentence boundaries come from a fixed punctuation rule: a sentence ends
//! after `.`, `!` or `?` when whitespace follows. This is a heuristic and
//! splits after abbreviations such as "Mr." too.

use regex::Regex;
use std::sync::OnceLock;

use crate::error::{DocError, Result};

/// Default maximum chunk length in characters.
pub const DEFAULT_MAX_LENGTH: usize = 5000;

static WHITESPACE_RUN: OnceLock<Regex> = OnceLock::new();

fn whitespace_run() -> &'static Regex {
    WHITESPACE_RUN.get_or_init(|| Regex::new(r"\s+").expect("whitespace pattern should compile"))
}

/// Collapse every whitespace run to a single space and trim both ends.
pub fn normalize_whitespace(text: &str) -> String {
    whitespace_run().replace_all(text, " ").trim().to_string()
}

/// Split normalized text into sentences.
///
/// A split point follows any of `. ! ?` that is followed by whitespace. The
/// whitespace is dropped; the punctuation stays with its sentence.
pub fn split_into_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut prev: Option<char> = None;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if c.is_whitespace() && matches!(prev, Some('.' | '!' | '?')) {
            sentences.push(&text[start..i]);

            // Consume the rest of the whitespace run.
            let mut end = i + c.len_utf8();
            while let Some(&(j, next)) = chars.peek() {
                if !next.is_whitespace() {
                    break;
                }
                end = j + next.len_utf8();
                chars.next();
            }
            start = end;
            prev = None;
            continue;
        }
        prev = Some(c);
    }

    if start < text.len() {
        sentences.push(&text[start..]);
    }

    sentences
}

/// Split text into TTS-friendly chunks of at most `max_length` characters.
///
/// Sentences are never split: one that is longer than `max_length` on its own
/// becomes a chunk by itself. Lengths are counted in characters, not bytes.
///
/// # Errors
/// Returns [`DocError::InvalidArgument`] when `max_length` is zero.
pub fn chunk_text(text: &str, max_length: usize) -> Result<Vec<String>> {
    if max_length == 0 {
        return Err(DocError::InvalidArgument(
            "max_length must be a positive integer".to_string(),
        ));
    }

    let text = normalize_whitespace(text);
    if text.is_empty() {
        return Ok(Vec::new());
    }

    let mut chunks = Vec::new();
    let mut current_chunk = String::new();
    // Length of `current_chunk` in chars, trailing space included.
    let mut current_len = 0;

    for sentence in split_into_sentences(&text) {
        let sentence_len = sentence.chars().count();

        if current_len + sentence_len > max_length && !current_chunk.is_empty() {
            chunks.push(current_chunk.trim().to_string());
            current_chunk.clear();
            current_len = 0;
        }

        current_chunk.push_str(sentence);
        current_chunk.push(' ');
        current_len += sentence_len + 1;
    }

    // Don't forget the last chunk
    let trimmed = current_chunk.trim();
    if !trimmed.is_empty() {
        chunks.push(trimmed.to_string());
    }

    Ok(chunks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_chunk_each_sentence_exceeds_budget() {
        let text = "Hello world. This is a test. Another sentence here.";
        let chunks = chunk_text(text, 20).unwrap();
        assert_eq!(
            chunks,
            vec!["Hello world.", "This is a test.", "Another sentence here."]
        );
    }

    #[test]
    fn test_chunk_all_fit() {
        let chunks = chunk_text("A. B. C.", 100).unwrap();
        assert_eq!(chunks, vec!["A. B. C."]);
    }

    #[test]
    fn test_chunk_groups_sentences() {
        let text = "One. Two. Three. Four.";
        // "One. Two. " is 10 chars; adding "Three." would make 16.
        let chunks = chunk_text(text, 12).unwrap();
        assert_eq!(chunks, vec!["One. Two.", "Three. Four."]);
    }

    #[test]
    fn test_chunk_budget_counts_trailing_space() {
        // "Ab. " is 4 chars, so "Cd." (3) only fits when max_length >= 7.
        assert_eq!(chunk_text("Ab. Cd.", 6).unwrap(), vec!["Ab.", "Cd."]);
        assert_eq!(chunk_text("Ab. Cd.", 7).unwrap(), vec!["Ab. Cd."]);
    }

    #[test]
    fn test_chunk_oversized_sentence_kept_whole() {
        let text = "Short. This sentence is definitely longer than ten characters. End.";
        let chunks = chunk_text(text, 10).unwrap();
        assert_eq!(
            chunks,
            vec![
                "Short.",
                "This sentence is definitely longer than ten characters.",
                "End."
            ]
        );
    }

    #[test]
    fn test_chunk_empty_text() {
        assert!(chunk_text("", 280).unwrap().is_empty());
    }

    #[test]
    fn test_chunk_whitespace_only() {
        assert!(chunk_text("   \n\n \t  ", 280).unwrap().is_empty());
    }

    #[test]
    fn test_chunk_zero_max_length() {
        match chunk_text("Hello.", 0) {
            Err(DocError::InvalidArgument(_)) => {}
            other => panic!("expected InvalidArgument, got {:?}", other),
        }
    }

    #[test]
    fn test_chunk_counts_chars_not_bytes() {
        // Each sentence is 6 chars but 12 bytes.
        let chunks = chunk_text("ééééé. ààààà.", 13).unwrap();
        assert_eq!(chunks, vec!["ééééé. ààààà."]);
    }

    #[test]
    fn test_chunk_normalizes_newlines_and_tabs() {
        let text = "Page 1.\nFirst line\tcontinues.\n\nSecond paragraph!";
        let chunks = chunk_text(text, 5000).unwrap();
        assert_eq!(
            chunks,
            vec!["Page 1. First line continues. Second paragraph!"]
        );
    }

    #[test]
    fn test_abbreviations_split() {
        let sentences = split_into_sentences("Mr. Smith arrived. Hi");
        assert_eq!(sentences, vec!["Mr.", "Smith arrived.", "Hi"]);
    }

    #[test]
    fn test_split_requires_whitespace_after_punctuation() {
        let sentences = split_into_sentences("Version 1.5 is out!Really? Yes.");
        assert_eq!(sentences, vec!["Version 1.5 is out!Really?", "Yes."]);
    }

    #[test]
    fn test_split_consumes_whitespace_run() {
        let sentences = split_into_sentences("Wait!  \n Go?\tNow.");
        assert_eq!(sentences, vec!["Wait!", "Go?", "Now."]);
    }

    #[test]
    fn test_split_trailing_whitespace() {
        assert_eq!(split_into_sentences("Done. "), vec!["Done."]);
        assert!(split_into_sentences("").is_empty());
    }

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("  a \n\n b\t\tc  "), "a b c");
        assert_eq!(normalize_whitespace("a\u{00a0}\u{2003}b"), "a b");
    }

    fn text_strategy() -> impl Strategy<Value = String> {
        proptest::string::string_regex("[a-zA-Zé0-9 .!?,\n\t]{0,300}").unwrap()
    }

    proptest! {
        #[test]
        fn prop_chunks_rejoin_to_normalized_text(text in text_strategy(), max in 1usize..120) {
            let chunks = chunk_text(&text, max).unwrap();
            prop_assert_eq!(chunks.join(" "), normalize_whitespace(&text));
        }

        #[test]
        fn prop_chunk_length_bounded(text in text_strategy(), max in 1usize..120) {
            let normalized = normalize_whitespace(&text);
            let longest = split_into_sentences(&normalized)
                .iter()
                .map(|s| s.chars().count())
                .max()
                .unwrap_or(0);
            for chunk in chunk_text(&text, max).unwrap() {
                prop_assert!(chunk.chars().count() <= max.max(longest));
                prop_assert!(!chunk.is_empty());
            }
        }

        #[test]
        fn prop_rechunking_is_stable(text in text_strategy(), max in 1usize..120) {
            let chunks = chunk_text(&text, max).unwrap();
            let rechunked = chunk_text(&chunks.join(" "), max).unwrap();
            prop_assert_eq!(rechunked, chunks);
        }
    }
}
