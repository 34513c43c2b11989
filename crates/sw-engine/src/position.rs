//! Offset spans over the document.
//!
//! All offsets are **char offsets** into the whole document (Unicode scalar
//! values, not bytes and not grapheme clusters). This matches how `ropey`
//! indexes text, so a span can be handed straight to the rope. Tamil vowel
//! signs are separate chars: `"வணா"` is three chars long.
//!
//! Display layers that want 1-indexed line:col coordinates convert on their
//! own side: that never belongs here.

use std::fmt;

// ---------------------------------------------------------------------------
// Span
// ---------------------------------------------------------------------------

/// A half-open span `[start, end)` of char offsets.
///
/// `start` is inclusive, `end` is exclusive. An empty span has
/// `start == end` and represents a caret. Spans are always normalized so
/// that `start <= end`: use [`Span::new`] which enforces this, or
/// [`Span::ordered`] on untrusted input.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

/// The host-visible selection. An empty selection is a plain cursor.
pub type Selection = Span;

/// The buffer region occupied by an applied, still-revisable suggestion.
pub type SuggestionRange = Span;

impl Span {
    /// Create a span. Panics in debug if `start > end`.
    #[inline]
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "Span::new requires start <= end");
        Self { start, end }
    }

    /// An empty span sitting at `offset`.
    #[inline]
    #[must_use]
    pub const fn caret(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    /// Create a span from two arbitrary offsets, swapping if needed so that
    /// `start <= end`. Useful for a selection dragged backwards.
    #[inline]
    #[must_use]
    pub const fn ordered(a: usize, b: usize) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    /// True when `start == end`.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.start == self.end
    }

    /// Number of chars covered.
    #[inline]
    #[must_use]
    pub const fn len(self) -> usize {
        self.end - self.start
    }

    /// True when `other` lies entirely within this span (endpoints included,
    /// so a caret at either edge counts as inside).
    #[inline]
    #[must_use]
    pub const fn contains_span(self, other: Self) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Pull both endpoints into `[0, len]`, keeping `start <= end`.
    #[inline]
    #[must_use]
    pub fn clamp(self, len: usize) -> Self {
        let start = self.start.min(len);
        let end = self.end.min(len).max(start);
        Self { start, end }
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Span({}..{})", self.start, self.end)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
