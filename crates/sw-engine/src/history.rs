//! Undo/redo history: a linear log of whole-document snapshots.
//!
//! Every committed edit records the full buffer content. Undo and redo move
//! a cursor through the log:
//!
//! ```text
//! entries:  ["", "v", "va", "van", "vana", "வண "]
//!                                    ^ cursor after one undo
//! ```
//!
//! - Pushing identical content is a no-op, so repeated saves or edits that
//!   net out to nothing don't clutter the log.
//! - Pushing after an undo discards the forward entries. There is no tree
//!   of alternatives: a new edit after undo drops the redo branch.
//! - The log always holds at least one entry (the loaded document), so
//!   `cursor < entries.len()` holds at all times.

use crate::error::EditError;

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

/// Undo/redo history for one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct History {
    entries: Vec<String>,
    cursor: usize,
}

impl History {
    /// Create a history whose only entry is `initial`.
    #[must_use]
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            entries: vec![initial.into()],
            cursor: 0,
        }
    }

    /// Drop everything and start over from `initial`. Called whenever a
    /// different document is loaded.
    pub fn reset(&mut self, initial: impl Into<String>) {
        self.entries.clear();
        self.entries.push(initial.into());
        self.cursor = 0;
    }

    /// Record a snapshot.
    ///
    /// Returns `false` (and changes nothing) if `snapshot` equals the current
    /// entry. Otherwise truncates the redo branch and appends.
    pub fn push(&mut self, snapshot: &str) -> bool {
        if self.current() == snapshot {
            return false;
        }
        self.entries.truncate(self.cursor + 1);
        self.entries.push(snapshot.to_string());
        self.cursor += 1;
        true
    }

    /// Step back one entry and return it.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::NoHistory`] when already at the oldest entry.
    pub fn undo(&mut self) -> Result<&str, EditError> {
        if self.cursor == 0 {
            tracing::trace!("undo at oldest entry");
            return Err(EditError::NoHistory);
        }
        self.cursor -= 1;
        Ok(&self.entries[self.cursor])
    }

    /// Step forward one entry and return it.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::NoHistory`] when already at the newest entry.
    pub fn redo(&mut self) -> Result<&str, EditError> {
        if self.cursor + 1 >= self.entries.len() {
            tracing::trace!("redo at newest entry");
            return Err(EditError::NoHistory);
        }
        self.cursor += 1;
        Ok(&self.entries[self.cursor])
    }

    /// The entry the cursor points at.
    #[must_use]
    pub fn current(&self) -> &str {
        &self.entries[self.cursor]
    }

    /// True if [`undo`](Self::undo) would succeed.
    #[must_use]
    pub const fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    /// True if [`redo`](Self::redo) would succeed.
    #[must_use]
    pub const fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    /// Total number of entries, including the initial one.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false: the log never drops below one entry.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Index of the current entry.
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(String::new())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
