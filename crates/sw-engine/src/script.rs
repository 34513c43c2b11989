//! Script detection for incoming text.
//!
//! Voice transcription may come back already in Tamil script (when the
//! recognizer ran with a Tamil locale) or as romanized phonetic text that
//! still needs transliteration. The split is simple: any Tamil letter means
//! the text is script-native.

/// The Tamil Unicode block.
const TAMIL_BLOCK: std::ops::RangeInclusive<char> = '\u{0B80}'..='\u{0BFF}';

/// How a piece of incoming text should be inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptKind {
    /// Already in Tamil script: insert as-is.
    Native,
    /// Romanized: route through transliteration first.
    Phonetic,
}

/// True if `ch` is in the Tamil block.
#[inline]
#[must_use]
pub fn is_tamil(ch: char) -> bool {
    TAMIL_BLOCK.contains(&ch)
}

/// Classify `text` for insertion.
#[must_use]
pub fn classify_text(text: &str) -> ScriptKind {
    if text.chars().any(is_tamil) {
        ScriptKind::Native
    } else {
        ScriptKind::Phonetic
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tamil_text_is_native() {
        assert_eq!(classify_text("வணக்கம்"), ScriptKind::Native);
    }

    #[test]
    fn mixed_text_is_native() {
        assert_eq!(classify_text("scene 3 வணக்கம்"), ScriptKind::Native);
    }

    #[test]
    fn latin_text_is_phonetic() {
        assert_eq!(classify_text("vanakkam"), ScriptKind::Phonetic);
        assert_eq!(classify_text(""), ScriptKind::Phonetic);
    }

    #[test]
    fn block_edges() {
        assert!(is_tamil('\u{0B80}'));
        assert!(is_tamil('\u{0BFF}'));
        assert!(!is_tamil('\u{0C00}'));
        assert!(!is_tamil('a'));
    }
}
