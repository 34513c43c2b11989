//! Suggestion session: transliteration lookups tied to buffer ranges.
//!
//! The session tracks three things:
//!
//! - The **pending lookup**: the one request whose result may still be
//!   applied, identified by a [`RequestToken`]. Minting a new token
//!   supersedes the old one; a result carrying any other token is stale and
//!   gets dropped on arrival. Nothing is aborted: the superseded call runs
//!   to completion and its answer is ignored.
//! - The **active range**: where the most recently applied suggestion sits
//!   in the buffer, so an alternate can replace exactly that span later.
//! - The **candidate list** of the last resolved lookup. The first entry is
//!   what is in the buffer; the rest are alternates. Choosing an alternate
//!   moves it to the front.
//!
//! The session never touches the buffer. The [`Editor`](crate::editor::Editor)
//! reads and updates it around each mutation.

use std::fmt;

use crate::position::{Span, SuggestionRange};
use crate::word;

// ---------------------------------------------------------------------------
// Tokens
// ---------------------------------------------------------------------------

/// Identifies one lookup attempt.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    /// The raw id, for logging.
    #[must_use]
    pub const fn id(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A lookup the host must run and report back with
/// [`Editor::apply_suggestion`](crate::editor::Editor::apply_suggestion).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupRequest {
    pub token: RequestToken,
    pub word: String,
}

// ---------------------------------------------------------------------------
// Pending lookup
// ---------------------------------------------------------------------------

/// What a lookup will do to the buffer once it resolves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PendingKind {
    /// A typed word. The word and its boundary are already in the buffer at
    /// `range.start`; the result replaces both.
    Word { boundary: char },
    /// Dictated phonetic text. The literal transcription is already in the
    /// buffer at `range`; the result replaces it.
    Voice,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PendingLookup {
    pub token: RequestToken,
    pub word: String,
    pub range: Span,
    pub kind: PendingKind,
}

impl PendingLookup {
    /// The text that must still be in the buffer for the result to apply,
    /// and the span it should occupy.
    pub fn expected(&self) -> (Span, String) {
        match self.kind {
            PendingKind::Word { boundary } => {
                let mut text = self.word.clone();
                text.push(boundary);
                (Span::new(self.range.start, self.range.end + 1), text)
            }
            PendingKind::Voice => (self.range, self.word.clone()),
        }
    }

    /// What replaces the expected span when the lookup produced `text`.
    pub fn replacement(&self, text: &str) -> String {
        match self.kind {
            PendingKind::Word { boundary } => {
                let mut out = text.to_string();
                out.push(boundary);
                out
            }
            PendingKind::Voice => text.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// SuggestionSet
// ---------------------------------------------------------------------------

/// A resolved lookup: ranked candidates and where the first one was placed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionSet {
    pub candidates: Vec<String>,
    pub source_range: SuggestionRange,
    pub token: RequestToken,
}

/// Clean up a raw candidate list: drop empties, drop duplicates keeping the
/// first occurrence, and keep at most `max` entries (`0` = unlimited).
#[must_use]
pub fn normalize_candidates(raw: Vec<String>, max: usize) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(raw.len());
    for candidate in raw {
        let candidate = candidate.trim();
        if candidate.is_empty() || out.iter().any(|c| c == candidate) {
            continue;
        }
        out.push(candidate.to_string());
        if max != 0 && out.len() >= max {
            break;
        }
    }
    out
}

// ---------------------------------------------------------------------------
// SuggestionSession
// ---------------------------------------------------------------------------

/// Token clock, pending lookup, active range, and candidates.
#[derive(Debug, Default)]
pub struct SuggestionSession {
    last_token: u64,
    pending: Option<PendingLookup>,
    resolved: Option<SuggestionSet>,
    active: Option<SuggestionRange>,
}

impl SuggestionSession {
    /// Create an idle session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget everything except the token clock. Tokens are never reused,
    /// so results from before the reset stay stale.
    pub fn reset(&mut self) {
        self.pending = None;
        self.resolved = None;
        self.active = None;
    }

    // -- Tokens -------------------------------------------------------------

    /// Mint a token for a new lookup, superseding any pending one.
    pub(crate) fn begin(&mut self, word: String, range: Span, kind: PendingKind) -> LookupRequest {
        self.last_token = self.last_token.wrapping_add(1);
        let token = RequestToken(self.last_token);
        if let Some(old) = self.pending.take() {
            tracing::debug!(superseded = ?old.token, by = ?token, "lookup superseded");
        }
        tracing::debug!(?token, word = %word, "lookup issued");
        self.pending = Some(PendingLookup {
            token,
            word: word.clone(),
            range,
            kind,
        });
        LookupRequest { token, word }
    }

    /// True if `token` belongs to the pending lookup.
    #[must_use]
    pub fn is_current(&self, token: RequestToken) -> bool {
        self.pending.as_ref().is_some_and(|p| p.token == token)
    }

    /// True while a lookup is outstanding.
    #[must_use]
    pub const fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Remove and return the pending lookup if `token` is current.
    pub(crate) fn take_if_current(&mut self, token: RequestToken) -> Option<PendingLookup> {
        if self.is_current(token) {
            self.pending.take()
        } else {
            None
        }
    }

    /// Keep the pending range in step with an edit that replaced `edited`
    /// with `inserted`.
    ///
    /// Edits entirely before the range shift it. An edit that abuts the
    /// start of the word merges into it unless `inserted` ends in a boundary
    /// char, so the lookup goes stale; dictated text is guarded the same way
    /// at its end. Edits overlapping the range are left for the apply-time
    /// text check to catch.
    pub(crate) fn shift_pending(&mut self, edited: Span, inserted: &str) {
        let Some(pending) = self.pending.as_mut() else {
            return;
        };
        if edited.is_empty() && inserted.is_empty() {
            return;
        }
        let range = pending.range;

        let joins_start = edited.end == range.start
            && !inserted.chars().next_back().is_some_and(word::is_boundary);
        let joins_end = matches!(pending.kind, PendingKind::Voice)
            && edited.start == range.end
            && !inserted.chars().next().is_some_and(word::is_boundary);
        if joins_start || joins_end {
            tracing::debug!(token = ?pending.token, ?edited, "edit merged into source word");
            self.pending = None;
            return;
        }

        if edited.end <= range.start {
            let start = range.start - edited.len() + inserted.chars().count();
            pending.range = Span::new(start, start + range.len());
        }
    }

    /// Make any outstanding lookup stale.
    pub fn invalidate_pending(&mut self) {
        if let Some(old) = self.pending.take() {
            tracing::debug!(token = ?old.token, "lookup invalidated");
        }
    }

    // -- Active range -------------------------------------------------------

    /// Where the last applied suggestion sits, if still revisable.
    #[must_use]
    pub const fn active_range(&self) -> Option<SuggestionRange> {
        self.active
    }

    /// Drop the active range. Candidates stay available for fallback
    /// insertion at the cursor. Returns true if there was a range.
    pub fn clear_range(&mut self) -> bool {
        self.active.take().is_some()
    }

    pub(crate) const fn set_range(&mut self, range: SuggestionRange) {
        self.active = Some(range);
    }

    // -- Candidates ---------------------------------------------------------

    /// Record a resolved lookup whose first candidate now occupies `range`.
    pub(crate) fn resolve(&mut self, set: SuggestionSet) {
        self.active = Some(set.source_range);
        self.resolved = Some(set);
    }

    /// Drop the candidate list and the active range.
    pub(crate) fn clear_resolved(&mut self) {
        self.resolved = None;
        self.active = None;
    }

    /// The last resolved set, if any.
    #[must_use]
    pub const fn resolved(&self) -> Option<&SuggestionSet> {
        self.resolved.as_ref()
    }

    /// All candidates of the last resolved lookup, applied one first.
    #[must_use]
    pub fn candidates(&self) -> &[String] {
        self.resolved.as_ref().map_or(&[], |s| s.candidates.as_slice())
    }

    /// The candidates not currently in the buffer.
    #[must_use]
    pub fn alternates(&self) -> &[String] {
        self.candidates().get(1..).unwrap_or(&[])
    }

    /// Move `chosen` to the front of the candidate list and re-anchor the
    /// set at `range`. Returns false if `chosen` is not a candidate.
    pub(crate) fn promote(&mut self, chosen: &str, range: SuggestionRange) -> bool {
        let Some(set) = self.resolved.as_mut() else {
            return false;
        };
        let Some(idx) = set.candidates.iter().position(|c| c == chosen) else {
            return false;
        };
        let value = set.candidates.remove(idx);
        set.candidates.insert(0, value);
        set.source_range = range;
        self.active = Some(range);
        true
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
