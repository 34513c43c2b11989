//! Text buffer: the authoritative document string plus its selection.
//!
//! A `TextBuffer` wraps a [`ropey::Rope`] together with the host-visible
//! [`Selection`]. It is a value: cloning is O(1) (ropes share structure), and
//! the one mutating primitive, [`replace_range`](TextBuffer::replace_range),
//! returns a new buffer instead of editing in place. The coordinator decides
//! whether to commit the result.
//!
//! # Design choices
//!
//! - **Offsets are char offsets**, never bytes. Offset 2 of `"வணா"` is the
//!   vowel sign `'ா'`, not a byte in the middle of its UTF-8 encoding.
//!
//! - **Offsets are clamped, never rejected.** An offset computed before a
//!   concurrent mutation may point past the end of the current content. It
//!   is pulled back into `[0, len]` and the clamp is logged at `debug`. A
//!   stale coordinate must never cost the writer a keystroke.
//!
//! - **No history here.** Snapshots live in [`History`](crate::history::History).

use std::fmt;

use ropey::Rope;
use unicode_segmentation::UnicodeSegmentation;

use crate::position::{Selection, Span};

// ---------------------------------------------------------------------------
// Replaced
// ---------------------------------------------------------------------------

/// The outcome of [`TextBuffer::replace_range`].
#[derive(Debug, Clone)]
pub struct Replaced {
    /// The new buffer. Its selection is a caret at `span.end`.
    pub buffer: TextBuffer,
    /// Where the replacement text now sits.
    pub span: Span,
    /// True if the requested range had to be clamped to the content.
    pub clamped: bool,
}

// ---------------------------------------------------------------------------
// TextBuffer
// ---------------------------------------------------------------------------

/// Document content plus selection.
///
/// Invariant: `0 <= selection.start <= selection.end <= len_chars()`.
#[derive(Clone, Default)]
pub struct TextBuffer {
    rope: Rope,
    selection: Selection,
}

impl TextBuffer {
    // -- Construction -------------------------------------------------------

    /// Create an empty buffer with the cursor at 0.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a buffer from a string with the cursor at end-of-content.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        let rope = Rope::from_str(text);
        let end = rope.len_chars();
        Self {
            rope,
            selection: Selection::caret(end),
        }
    }

    // -- Text access --------------------------------------------------------

    /// Total character count (Unicode scalar values, not bytes).
    #[inline]
    #[must_use]
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    /// True when the buffer contains no text.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// Collect all text into a `String`.
    #[must_use]
    pub fn contents(&self) -> String {
        self.rope.to_string()
    }

    /// True when the content equals `text`, without allocating.
    #[must_use]
    pub fn content_eq(&self, text: &str) -> bool {
        self.rope == text
    }

    /// The text covered by `span`, clamped to the content.
    #[must_use]
    pub fn slice_to_string(&self, span: Span) -> String {
        let span = span.clamp(self.len_chars());
        self.rope.slice(span.start..span.end).to_string()
    }

    /// Text from the start of the line containing `offset` up to `offset`.
    ///
    /// Used for backward scans (source word, grapheme before the cursor)
    /// that need a contiguous `&str`.
    #[must_use]
    pub fn line_prefix(&self, offset: usize) -> String {
        let offset = offset.min(self.len_chars());
        let line = self.rope.char_to_line(offset);
        let line_start = self.rope.line_to_char(line);
        self.rope.slice(line_start..offset).to_string()
    }

    /// The span of the grapheme cluster that ends at `offset`, or `None` at
    /// the start of the document.
    ///
    /// A Tamil consonant with its vowel sign (`"ணா"`) is one cluster, so a
    /// backspace removes both. A line break before `offset` is its own
    /// cluster (`"\r\n"` included).
    #[must_use]
    pub fn grapheme_before(&self, offset: usize) -> Option<Span> {
        let offset = offset.min(self.len_chars());
        if offset == 0 {
            return None;
        }
        let prefix = self.line_prefix(offset);
        let len = match prefix.graphemes(true).next_back() {
            Some(g) => g.chars().count(),
            // Cursor sits at a line start: the cluster is the line break.
            None => {
                let prev = self.rope.char(offset - 1);
                if prev == '\n' && offset >= 2 && self.rope.char(offset - 2) == '\r' {
                    2
                } else {
                    1
                }
            }
        };
        Some(Span::new(offset - len, offset))
    }

    // -- Selection ----------------------------------------------------------

    /// The current selection.
    #[inline]
    #[must_use]
    pub const fn selection(&self) -> Selection {
        self.selection
    }

    /// The cursor: the end of the selection.
    #[inline]
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.selection.end
    }

    /// Move the selection, clamped to the content.
    pub fn set_selection(&mut self, selection: Selection) {
        let len = self.len_chars();
        let clamped = selection.clamp(len);
        if clamped != selection {
            tracing::debug!(?selection, len, "selection clamped");
        }
        self.selection = clamped;
    }

    // -- Editing ------------------------------------------------------------

    /// Replace `[start, end)` with `replacement` and return the new buffer.
    ///
    /// `start` and `end` are swapped if reversed and clamped to
    /// `[0, len_chars()]`. The returned buffer's selection is a caret just
    /// after the inserted text. `self` is untouched.
    #[must_use]
    pub fn replace_range(&self, start: usize, end: usize, replacement: &str) -> Replaced {
        let len = self.len_chars();
        let requested = Span::ordered(start, end);
        let span = requested.clamp(len);
        let clamped = span != requested;

        let mut rope = self.rope.clone();
        rope.remove(span.start..span.end);
        rope.insert(span.start, replacement);

        let inserted = Span::new(span.start, span.start + replacement.chars().count());
        Replaced {
            buffer: Self {
                rope,
                selection: Selection::caret(inserted.end),
            },
            span: inserted,
            clamped,
        }
    }
}

impl fmt::Debug for TextBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextBuffer")
            .field("chars", &self.len_chars())
            .field("selection", &self.selection)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
