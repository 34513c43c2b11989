//! Word boundaries: what counts as a word, and where the last one starts.
//!
//! Transliteration is driven by word boundaries: when the writer types a
//! space or punctuation mark, the word immediately left of the cursor (the
//! **source word**) is sent off for lookup.
//!
//! A word is a run of word characters: letters, digits, underscore, and
//! anything in the Tamil block. Scanning walks **grapheme clusters**, not
//! chars, so a consonant and its vowel sign (`"ணா"`) are classified together
//! even though the sign alone is not alphanumeric.

use unicode_segmentation::UnicodeSegmentation;

use crate::buffer::TextBuffer;
use crate::position::Span;
use crate::script;

// ---------------------------------------------------------------------------
// Character classification
// ---------------------------------------------------------------------------

/// Character class for boundary detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    /// Letters, digits, underscore, Tamil-block chars.
    Word,
    /// Non-blank, non-word characters (`.`, `,`, `!`, quotes, brackets).
    Punctuation,
    /// Whitespace within a line (space, tab).
    Blank,
    /// Line ending (`\n`, `\r`).
    Newline,
}

/// Classify a character.
#[must_use]
pub fn classify(ch: char) -> CharClass {
    if ch == '\n' || ch == '\r' {
        CharClass::Newline
    } else if ch.is_whitespace() {
        CharClass::Blank
    } else if ch.is_alphanumeric() || ch == '_' || script::is_tamil(ch) {
        CharClass::Word
    } else {
        CharClass::Punctuation
    }
}

/// True when typing `ch` ends the word before it.
#[must_use]
pub fn is_boundary(ch: char) -> bool {
    classify(ch) != CharClass::Word
}

// ---------------------------------------------------------------------------
// Source word
// ---------------------------------------------------------------------------

/// The word immediately left of `offset`.
///
/// Walks back grapheme by grapheme until a boundary. Returns the span and
/// text of the word, or `None` if the char before `offset` is already a
/// boundary (or `offset` is at a line start).
#[must_use]
pub fn source_word(buf: &TextBuffer, offset: usize) -> Option<(Span, String)> {
    let offset = offset.min(buf.len_chars());
    let prefix = buf.line_prefix(offset);

    let mut start_byte = prefix.len();
    let mut chars = 0;
    for (idx, grapheme) in prefix.grapheme_indices(true).rev() {
        let first = grapheme.chars().next().unwrap_or(' ');
        if classify(first) != CharClass::Word {
            break;
        }
        start_byte = idx;
        chars += grapheme.chars().count();
    }

    if chars == 0 {
        return None;
    }
    let word = prefix[start_byte..].to_string();
    Some((Span::new(offset - chars, offset), word))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // -- classify -----------------------------------------------------------

    #[test]
    fn classify_letters_and_digits() {
        assert_eq!(classify('a'), CharClass::Word);
        assert_eq!(classify('Z'), CharClass::Word);
        assert_eq!(classify('7'), CharClass::Word);
        assert_eq!(classify('_'), CharClass::Word);
    }

    #[test]
    fn classify_tamil_including_signs() {
        assert_eq!(classify('வ'), CharClass::Word);
        assert_eq!(classify('ா'), CharClass::Word);
        assert_eq!(classify('்'), CharClass::Word);
    }

    #[test]
    fn classify_boundaries() {
        assert_eq!(classify(' '), CharClass::Blank);
        assert_eq!(classify('\t'), CharClass::Blank);
        assert_eq!(classify('\n'), CharClass::Newline);
        assert_eq!(classify('.'), CharClass::Punctuation);
        assert_eq!(classify('"'), CharClass::Punctuation);
    }

    #[test]
    fn is_boundary_matches_classes() {
        assert!(is_boundary(' '));
        assert!(is_boundary(','));
        assert!(is_boundary('\n'));
        assert!(!is_boundary('k'));
        assert!(!is_boundary('க'));
    }

    // -- source_word --------------------------------------------------------

    #[test]
    fn source_word_whole_line() {
        let buf = TextBuffer::from_text("vana");
        assert_eq!(
            source_word(&buf, 4),
            Some((Span::new(0, 4), "vana".to_string()))
        );
    }

    #[test]
    fn source_word_after_space() {
        let buf = TextBuffer::from_text("naan vanakkam");
        assert_eq!(
            source_word(&buf, 13),
            Some((Span::new(5, 13), "vanakkam".to_string()))
        );
    }

    #[test]
    fn source_word_stops_at_punctuation() {
        let buf = TextBuffer::from_text("(amma");
        assert_eq!(
            source_word(&buf, 5),
            Some((Span::new(1, 5), "amma".to_string()))
        );
    }

    #[test]
    fn source_word_mid_line() {
        let buf = TextBuffer::from_text("one two three");
        assert_eq!(
            source_word(&buf, 7),
            Some((Span::new(4, 7), "two".to_string()))
        );
    }

    #[test]
    fn source_word_on_second_line() {
        let buf = TextBuffer::from_text("INT. HOUSE\nappa");
        assert_eq!(
            source_word(&buf, 15),
            Some((Span::new(11, 15), "appa".to_string()))
        );
    }

    #[test]
    fn source_word_tamil_counts_chars() {
        let buf = TextBuffer::from_text("x வணா");
        assert_eq!(
            source_word(&buf, 5),
            Some((Span::new(2, 5), "வணா".to_string()))
        );
    }

    #[test]
    fn source_word_none_after_boundary() {
        let buf = TextBuffer::from_text("vana ");
        assert_eq!(source_word(&buf, 5), None);
    }

    #[test]
    fn source_word_none_at_start() {
        let buf = TextBuffer::from_text("vana");
        assert_eq!(source_word(&buf, 0), None);
        assert_eq!(source_word(&TextBuffer::new(), 0), None);
    }
}
