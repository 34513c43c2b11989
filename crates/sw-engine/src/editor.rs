//! The mutation coordinator: every change to the document goes through here.
//!
//! [`Editor`] owns the [`TextBuffer`], the [`History`], and the
//! [`SuggestionSession`], and exposes the operations that may change them:
//!
//! | Operation                | Pushes history            |
//! |--------------------------|---------------------------|
//! | [`type_char`]            | yes (deferred on lookup)  |
//! | [`apply_suggestion`]     | yes, unless stale         |
//! | [`select_alternate`]     | yes                       |
//! | [`insert_voice_result`]  | yes (deferred on lookup)  |
//! | [`insert_generated_text`]| yes                       |
//! | [`delete_backward`]      | yes                       |
//! | [`undo`] / [`redo`]      | no, they move through it |
//!
//! The editor is synchronous. An operation that needs a transliteration
//! returns a [`LookupRequest`]; the host runs it however it likes and hands
//! the outcome back to [`apply_suggestion`]. Typing is never held up while a
//! lookup is out, and only the newest request's result is ever applied.
//!
//! # The word-boundary protocol
//!
//! ```text
//! "vana|"   type ' '  →  "vana |"   lookup #1 issued for "vana"
//! "vana k|" ...          (writer keeps typing)
//! #1 → ["வண", "வணா"]  →  "வண k|"   active range = "வண", alternate "வணா"
//! ```
//!
//! The boundary goes in immediately so the writer's next keystrokes land in
//! the right place. Its history snapshot is deferred until the lookup
//! settles, so one undo takes the whole word-plus-suggestion step back.
//!
//! [`type_char`]: Editor::type_char
//! [`apply_suggestion`]: Editor::apply_suggestion
//! [`select_alternate`]: Editor::select_alternate
//! [`insert_voice_result`]: Editor::insert_voice_result
//! [`insert_generated_text`]: Editor::insert_generated_text
//! [`delete_backward`]: Editor::delete_backward
//! [`undo`]: Editor::undo
//! [`redo`]: Editor::redo

use std::fmt;

use crate::adapter::{Generation, Transcription};
use crate::buffer::TextBuffer;
use crate::error::{AdapterError, EditError};
use crate::history::History;
use crate::options::EditorOptions;
use crate::position::{Selection, Span, SuggestionRange};
use crate::script::{self, ScriptKind};
use crate::suggestion::{
    LookupRequest, PendingKind, RequestToken, SuggestionSession, SuggestionSet,
    normalize_candidates,
};
use crate::word;

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Notifications for the host UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorEvent {
    /// The revisable suggestion range appeared, moved, or went away.
    SuggestionChanged(Option<SuggestionRange>),
    /// A lookup failed and the literal text was kept. Advisory only; carries
    /// the rendered [`EditError::LookupFailed`].
    LookupFailed(String),
}

/// Receives [`EditorEvent`]s.
pub type Listener = Box<dyn FnMut(&EditorEvent) + Send>;

/// What became of a lookup result handed to [`Editor::apply_suggestion`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The top candidate replaced the source text and now occupies this range.
    Applied(SuggestionRange),
    /// No usable candidates (or the lookup failed): the literal text stays.
    Literal,
    /// The result was superseded or its text was edited away. Nothing changed.
    Stale,
}

// ---------------------------------------------------------------------------
// Editor
// ---------------------------------------------------------------------------

/// The single writer for one document.
pub struct Editor {
    buffer: TextBuffer,
    history: History,
    session: SuggestionSession,
    options: EditorOptions,
    listener: Option<Listener>,
}

impl Editor {
    // -- Construction -------------------------------------------------------

    /// An empty document with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(EditorOptions::default())
    }

    /// An empty document.
    #[must_use]
    pub fn with_options(options: EditorOptions) -> Self {
        Self {
            buffer: TextBuffer::new(),
            history: History::default(),
            session: SuggestionSession::new(),
            options,
            listener: None,
        }
    }

    /// Register the event listener, replacing any previous one.
    pub fn on_event(&mut self, listener: impl FnMut(&EditorEvent) + Send + 'static) {
        self.listener = Some(Box::new(listener));
    }

    /// Replace the whole document. History restarts from `text`, and every
    /// outstanding lookup becomes stale.
    pub fn load(&mut self, text: &str) {
        let before = self.session.active_range();
        self.buffer = TextBuffer::from_text(text);
        self.history.reset(text);
        self.session.reset();
        tracing::debug!(chars = self.buffer.len_chars(), "document loaded");
        self.notify_range(before);
    }

    // -- Host queries -------------------------------------------------------

    /// The document text.
    #[must_use]
    pub fn current_content(&self) -> String {
        self.buffer.contents()
    }

    /// The selection (an empty span is the cursor).
    #[must_use]
    pub const fn current_selection(&self) -> Selection {
        self.buffer.selection()
    }

    /// The undo log.
    #[must_use]
    pub const fn history(&self) -> &History {
        &self.history
    }

    /// The revisable suggestion range, if any.
    #[must_use]
    pub const fn active_range(&self) -> Option<SuggestionRange> {
        self.session.active_range()
    }

    /// All candidates of the last applied lookup, the applied one first.
    #[must_use]
    pub fn candidates(&self) -> &[String] {
        self.session.candidates()
    }

    /// The candidates not currently in the buffer.
    #[must_use]
    pub fn alternates(&self) -> &[String] {
        self.session.alternates()
    }

    /// True if `token` would still be applied.
    #[must_use]
    pub fn is_current(&self, token: RequestToken) -> bool {
        self.session.is_current(token)
    }

    /// True while a lookup is outstanding.
    #[must_use]
    pub const fn has_pending_lookup(&self) -> bool {
        self.session.has_pending()
    }

    /// Engine options.
    #[must_use]
    pub const fn options(&self) -> &EditorOptions {
        &self.options
    }

    /// Engine options, mutable.
    pub const fn options_mut(&mut self) -> &mut EditorOptions {
        &mut self.options
    }

    // -- Typing -------------------------------------------------------------

    /// Type one character over the selection.
    ///
    /// A word-boundary character typed right after a word starts a lookup:
    /// the boundary is inserted, the history snapshot waits for the result,
    /// and the returned request must be run by the host. Words already in
    /// Tamil script are not looked up.
    pub fn type_char(&mut self, ch: char) -> Option<LookupRequest> {
        let before = self.session.active_range();
        let sel = self.buffer.selection();

        if self.options.transliterate && word::is_boundary(ch) && sel.is_empty() {
            if let Some((span, word)) = word::source_word(&self.buffer, sel.start) {
                if script::classify_text(&word) == ScriptKind::Phonetic {
                    let mut boundary = [0u8; 4];
                    self.edit(sel, ch.encode_utf8(&mut boundary), false);
                    self.session.clear_range();
                    self.notify_range(before);
                    return Some(self.session.begin(word, span, PendingKind::Word { boundary: ch }));
                }
            }
        }

        let mut text = [0u8; 4];
        let inserted = self.edit(sel, ch.encode_utf8(&mut text), true);
        self.retarget_range(sel, inserted.len());
        self.notify_range(before);
        None
    }

    /// Type a run of characters, one keystroke at a time. Returns every
    /// lookup the run started; only the last can still apply.
    pub fn type_str(&mut self, text: &str) -> Vec<LookupRequest> {
        text.chars().filter_map(|ch| self.type_char(ch)).collect()
    }

    /// Backspace: delete the selection, or the grapheme cluster before the
    /// cursor. Returns false at the start of an empty selection.
    pub fn delete_backward(&mut self) -> bool {
        let before = self.session.active_range();
        let sel = self.buffer.selection();
        let target = if sel.is_empty() {
            match self.buffer.grapheme_before(sel.start) {
                Some(span) => span,
                None => return false,
            }
        } else {
            sel
        };
        self.edit(target, "", true);
        self.retarget_range(target, 0);
        self.notify_range(before);
        true
    }

    /// Move the selection. The active suggestion range survives only if the
    /// new selection lies inside it.
    pub fn set_selection(&mut self, selection: Selection) {
        let before = self.session.active_range();
        self.buffer.set_selection(selection);
        let sel = self.buffer.selection();
        if before.is_some_and(|range| !range.contains_span(sel)) {
            self.session.clear_range();
        }
        self.notify_range(before);
    }

    // -- Suggestions --------------------------------------------------------

    /// Hand back the outcome of a lookup.
    ///
    /// Applied only if `token` is the current one and the source text is
    /// still where it was left. Failures and empty lists keep the literal
    /// text; failures also raise an advisory [`EditorEvent::LookupFailed`].
    pub fn apply_suggestion(
        &mut self,
        token: RequestToken,
        outcome: Result<Vec<String>, AdapterError>,
    ) -> Resolution {
        let Some(pending) = self.session.take_if_current(token) else {
            tracing::debug!(?token, "stale lookup result discarded");
            return Resolution::Stale;
        };

        let (span, expected) = pending.expected();
        if span.end > self.buffer.len_chars() || self.buffer.slice_to_string(span) != expected {
            tracing::debug!(?token, ?span, "source text changed under lookup; discarded");
            return Resolution::Stale;
        }

        let before = self.session.active_range();
        let candidates = match outcome {
            Ok(raw) => normalize_candidates(raw, self.options.max_candidates),
            Err(err) => {
                let err = EditError::LookupFailed(err);
                tracing::warn!(?token, word = %pending.word, error = %err, "keeping literal");
                self.emit(&EditorEvent::LookupFailed(err.to_string()));
                Vec::new()
            }
        };

        let Some(top) = candidates.first() else {
            self.record();
            self.session.clear_resolved();
            self.notify_range(before);
            return Resolution::Literal;
        };

        let sel = self.buffer.selection();
        let replacement = pending.replacement(top);
        let inserted = self.edit(span, &replacement, false);
        self.buffer.set_selection(Span::new(
            shift_offset(sel.start, span, inserted),
            shift_offset(sel.end, span, inserted),
        ));
        self.record();

        let range = Span::new(inserted.start, inserted.start + top.chars().count());
        self.session.resolve(SuggestionSet {
            candidates,
            source_range: range,
            token,
        });
        self.notify_range(before);
        Resolution::Applied(range)
    }

    /// Replace the active suggestion with `candidate`, which must be one of
    /// the current [`candidates`](Self::candidates).
    ///
    /// Without an active range (the writer has edited elsewhere since), the
    /// candidate is inserted at the selection instead. Either way it becomes
    /// the new active range and moves to the front of the list. Returns
    /// false if `candidate` is unknown.
    pub fn select_alternate(&mut self, candidate: &str) -> bool {
        if !self.session.candidates().iter().any(|c| c == candidate) {
            return false;
        }
        let before = self.session.active_range();
        let sel = self.buffer.selection();

        let inserted = if let Some(range) = before {
            let inserted = self.edit(range, candidate, false);
            self.buffer.set_selection(Span::new(
                shift_offset(sel.start, range, inserted),
                shift_offset(sel.end, range, inserted),
            ));
            inserted
        } else {
            self.edit(sel, candidate, false)
        };
        self.record();

        self.session.promote(candidate, inserted);
        self.notify_range(before);
        true
    }

    // -- Voice and generated text -------------------------------------------

    /// Insert a transcription over the selection.
    ///
    /// Script-native text goes in directly. Phonetic text goes in literally
    /// and a lookup is started to replace it, exactly like a typed word.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::Transcription`] without touching the buffer when
    /// the transcription reports failure.
    pub fn insert_voice_result(
        &mut self,
        transcription: Transcription,
    ) -> Result<Option<LookupRequest>, EditError> {
        if !transcription.success || transcription.error.is_some() {
            let reason = transcription
                .error
                .unwrap_or_else(|| "recognizer reported failure".to_string());
            return Err(EditError::Transcription(reason));
        }
        let text = transcription.text.trim();
        if text.is_empty() {
            return Ok(None);
        }

        let before = self.session.active_range();
        let sel = self.buffer.selection();
        let phonetic =
            self.options.transliterate && script::classify_text(text) == ScriptKind::Phonetic;
        let inserted = self.edit(sel, text, !phonetic);
        self.session.clear_range();
        self.notify_range(before);

        if phonetic {
            Ok(Some(self.session.begin(
                text.to_string(),
                inserted,
                PendingKind::Voice,
            )))
        } else {
            Ok(None)
        }
    }

    /// Insert AI-generated text over the selection.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::Generation`] without touching the buffer when the
    /// generator reports an error or produced nothing.
    pub fn insert_generated_text(&mut self, generation: Generation) -> Result<(), EditError> {
        if let Some(err) = generation.error {
            return Err(EditError::Generation(err));
        }
        if generation.text.trim().is_empty() {
            return Err(EditError::Generation("empty response".to_string()));
        }

        let before = self.session.active_range();
        let sel = self.buffer.selection();
        self.edit(sel, &generation.text, true);
        self.session.clear_range();
        self.notify_range(before);
        Ok(())
    }

    /// The text to read aloud: the selection, or the whole document when the
    /// selection is empty.
    #[must_use]
    pub fn speakable_text(&self) -> String {
        let sel = self.buffer.selection();
        if sel.is_empty() {
            self.buffer.contents()
        } else {
            self.buffer.slice_to_string(sel)
        }
    }

    // -- Undo / redo --------------------------------------------------------

    /// Restore the previous snapshot. The cursor goes to end-of-content.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::NoHistory`] at the oldest snapshot.
    pub fn undo(&mut self) -> Result<(), EditError> {
        self.flush_deferred();
        let snapshot = self.history.undo()?.to_string();
        self.restore(&snapshot);
        Ok(())
    }

    /// Re-apply the next snapshot. The cursor goes to end-of-content.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::NoHistory`] at the newest snapshot.
    pub fn redo(&mut self) -> Result<(), EditError> {
        self.flush_deferred();
        let snapshot = self.history.redo()?.to_string();
        self.restore(&snapshot);
        Ok(())
    }

    // -- Internals ----------------------------------------------------------

    /// Replace `span` with `text`, keep the pending lookup's range in step,
    /// and optionally record a snapshot. Returns where `text` landed.
    fn edit(&mut self, span: Span, text: &str, record: bool) -> Span {
        let replaced = self.buffer.replace_range(span.start, span.end, text);
        if replaced.clamped {
            tracing::debug!(requested = ?span, len = self.buffer.len_chars(), "edit target clamped");
        }
        let span = span.clamp(self.buffer.len_chars());
        self.session.shift_pending(span, text);
        self.buffer = replaced.buffer;
        if record {
            self.record();
        }
        replaced.span
    }

    fn record(&mut self) {
        let snapshot = self.buffer.contents();
        self.history.push(&snapshot);
    }

    /// A boundary or dictation whose lookup is still out leaves the buffer
    /// ahead of the log. Catch the log up before moving through it.
    fn flush_deferred(&mut self) {
        if !self.buffer.content_eq(self.history.current()) {
            self.record();
        }
    }

    fn restore(&mut self, snapshot: &str) {
        let before = self.session.active_range();
        self.buffer = TextBuffer::from_text(snapshot);
        self.session.invalidate_pending();
        self.session.clear_resolved();
        self.notify_range(before);
    }

    /// After a plain edit of `edited` (now `new_len` chars): an edit inside
    /// the active range resizes it, typing right before it shifts it, and
    /// anything else drops it. Typing at the end edge extends the range so a
    /// trailing vowel sign stays with its word.
    fn retarget_range(&mut self, edited: Span, new_len: usize) {
        let Some(range) = self.session.active_range() else {
            return;
        };
        if edited.is_empty() && edited.start == range.start {
            self.session
                .set_range(Span::new(range.start + new_len, range.end + new_len));
            return;
        }
        if range.contains_span(edited) {
            let end = range.end - edited.len() + new_len;
            if end > range.start {
                self.session.set_range(Span::new(range.start, end));
                return;
            }
        }
        self.session.clear_range();
    }

    fn notify_range(&mut self, before: Option<SuggestionRange>) {
        let after = self.session.active_range();
        if after != before {
            self.emit(&EditorEvent::SuggestionChanged(after));
        }
    }

    fn emit(&mut self, event: &EditorEvent) {
        if let Some(listener) = self.listener.as_mut() {
            listener(event);
        }
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Editor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Editor")
            .field("buffer", &self.buffer)
            .field("history_len", &self.history.len())
            .field("session", &self.session)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Where `offset` ends up after `old` was replaced by text now at `new`.
///
/// Offsets after the replaced span move by the length change; offsets inside
/// it land at the end of the new text; offsets before it stay put.
const fn shift_offset(offset: usize, old: Span, new: Span) -> usize {
    if offset >= old.end {
        offset - old.end + new.end
    } else if offset > old.start {
        new.end
    } else {
        offset
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::{Arc, Mutex};

    fn candidates(list: &[&str]) -> Result<Vec<String>, AdapterError> {
        Ok(list.iter().map(ToString::to_string).collect())
    }

    fn loaded(text: &str) -> Editor {
        let mut ed = Editor::new();
        ed.load(text);
        ed
    }

    fn recorded_events(ed: &mut Editor) -> Arc<Mutex<Vec<EditorEvent>>> {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        ed.on_event(move |e| sink.lock().unwrap().push(e.clone()));
        events
    }

    // -- shift_offset -------------------------------------------------------

    #[test]
    fn shift_offset_cases() {
        let old = Span::new(2, 6);
        let new = Span::new(2, 4);
        assert_eq!(shift_offset(1, old, new), 1);
        assert_eq!(shift_offset(2, old, new), 2);
        assert_eq!(shift_offset(4, old, new), 4);
        assert_eq!(shift_offset(6, old, new), 4);
        assert_eq!(shift_offset(9, old, new), 7);
    }

    // -- Typing -------------------------------------------------------------

    #[test]
    fn typing_letters_records_each_keystroke() {
        let mut ed = Editor::new();
        assert!(ed.type_str("vana").is_empty());
        assert_eq!(ed.current_content(), "vana");
        assert_eq!(ed.current_selection(), Span::caret(4));
        assert_eq!(ed.history().len(), 5);
    }

    #[test]
    fn boundary_after_word_requests_lookup() {
        let mut ed = loaded("vana");
        let req = ed.type_char(' ').unwrap();
        assert_eq!(req.word, "vana");
        assert_eq!(ed.current_content(), "vana ");
        assert!(ed.is_current(req.token));
        // Snapshot waits for the lookup.
        assert_eq!(ed.history().current(), "vana");
    }

    #[test]
    fn boundary_without_word_inserts_directly() {
        let mut ed = loaded("vana ");
        assert_eq!(ed.type_char(' '), None);
        assert_eq!(ed.current_content(), "vana  ");
        assert_eq!(ed.history().current(), "vana  ");
    }

    #[test]
    fn boundary_after_tamil_word_skips_lookup() {
        let mut ed = loaded("வண");
        assert_eq!(ed.type_char(' '), None);
        assert_eq!(ed.current_content(), "வண ");
    }

    #[test]
    fn translit_off_skips_lookup() {
        let mut ed = loaded("vana");
        ed.options_mut().transliterate = false;
        assert_eq!(ed.type_char(' '), None);
        assert_eq!(ed.current_content(), "vana ");
    }

    #[test]
    fn typing_replaces_selection() {
        let mut ed = loaded("hello world");
        ed.set_selection(Span::new(6, 11));
        ed.type_char('X');
        assert_eq!(ed.current_content(), "hello X");
        assert_eq!(ed.current_selection(), Span::caret(7));
    }

    #[test]
    fn delete_backward_removes_grapheme() {
        let mut ed = loaded("வணா");
        assert!(ed.delete_backward());
        assert_eq!(ed.current_content(), "வ");
        assert!(ed.delete_backward());
        assert!(!ed.delete_backward());
        assert_eq!(ed.current_content(), "");
    }

    #[test]
    fn delete_backward_removes_selection() {
        let mut ed = loaded("abcdef");
        ed.set_selection(Span::new(1, 4));
        assert!(ed.delete_backward());
        assert_eq!(ed.current_content(), "aef");
        assert_eq!(ed.current_selection(), Span::caret(1));
    }

    // -- apply_suggestion ---------------------------------------------------

    #[test]
    fn applied_suggestion_replaces_word_and_keeps_boundary() {
        let mut ed = loaded("vana");
        let req = ed.type_char(' ').unwrap();
        let res = ed.apply_suggestion(req.token, candidates(&["வண", "வணா"]));

        assert_eq!(res, Resolution::Applied(Span::new(0, 2)));
        assert_eq!(ed.current_content(), "வண ");
        assert_eq!(ed.current_selection(), Span::caret(3));
        assert_eq!(ed.alternates(), ["வணா"]);
        assert_eq!(ed.history().current(), "வண ");
    }

    #[test]
    fn failed_lookup_keeps_literal_and_reports() {
        let mut ed = loaded("vana");
        let events = recorded_events(&mut ed);
        let req = ed.type_char(' ').unwrap();
        let res = ed.apply_suggestion(req.token, Err(AdapterError::TimedOut));

        assert_eq!(res, Resolution::Literal);
        assert_eq!(ed.current_content(), "vana ");
        assert_eq!(ed.active_range(), None);
        assert_eq!(ed.history().current(), "vana ");
        assert_eq!(
            events.lock().unwrap().as_slice(),
            [EditorEvent::LookupFailed("lookup failed: adapter timed out".into())]
        );
    }

    #[test]
    fn empty_or_blank_candidates_keep_literal() {
        let mut ed = loaded("vana");
        let req = ed.type_char(' ').unwrap();
        assert_eq!(
            ed.apply_suggestion(req.token, candidates(&["", " "])),
            Resolution::Literal
        );
        assert_eq!(ed.current_content(), "vana ");
    }

    #[test]
    fn result_applies_once() {
        let mut ed = loaded("vana");
        let req = ed.type_char(' ').unwrap();
        ed.apply_suggestion(req.token, candidates(&["வண"]));
        assert_eq!(
            ed.apply_suggestion(req.token, candidates(&["X"])),
            Resolution::Stale
        );
        assert_eq!(ed.current_content(), "வண ");
    }

    #[test]
    fn typing_during_lookup_is_preserved() {
        let mut ed = loaded("vana");
        let req = ed.type_char(' ').unwrap();
        ed.type_char('k');
        ed.type_char('a');

        let res = ed.apply_suggestion(req.token, candidates(&["வண"]));
        assert_eq!(res, Resolution::Applied(Span::new(0, 2)));
        assert_eq!(ed.current_content(), "வண ka");
        assert_eq!(ed.current_selection(), Span::caret(5));
    }

    #[test]
    fn second_boundary_supersedes_first_lookup() {
        let mut ed = loaded("naan");
        let first = ed.type_char(' ').unwrap();
        ed.type_str("vana");
        let second = ed.type_char(' ').unwrap();

        assert_eq!(
            ed.apply_suggestion(second.token, candidates(&["வண"])),
            Resolution::Applied(Span::new(5, 7))
        );
        assert_eq!(
            ed.apply_suggestion(first.token, candidates(&["நான்"])),
            Resolution::Stale
        );
        assert_eq!(ed.current_content(), "naan வண ");
    }

    #[test]
    fn edit_inside_source_word_makes_result_stale() {
        let mut ed = loaded("vana");
        let req = ed.type_char(' ').unwrap();
        ed.set_selection(Span::caret(2));
        ed.type_char('X');

        assert_eq!(
            ed.apply_suggestion(req.token, candidates(&["வண"])),
            Resolution::Stale
        );
        assert_eq!(ed.current_content(), "vaXna ");
    }

    #[test]
    fn edit_before_source_word_shifts_target() {
        let mut ed = loaded("x vana");
        let req = ed.type_char(' ').unwrap();
        ed.set_selection(Span::caret(0));
        ed.type_str("ab");

        assert_eq!(
            ed.apply_suggestion(req.token, candidates(&["வண"])),
            Resolution::Applied(Span::new(4, 6))
        );
        assert_eq!(ed.current_content(), "abx வண ");
        assert_eq!(ed.current_selection(), Span::caret(2));
    }

    #[test]
    fn deleting_separator_before_source_word_makes_lookup_stale() {
        let mut ed = loaded("a vana");
        let req = ed.type_char(' ').unwrap();
        ed.set_selection(Span::caret(2));
        assert!(ed.delete_backward());
        assert_eq!(ed.current_content(), "avana ");

        assert_eq!(
            ed.apply_suggestion(req.token, candidates(&["வண"])),
            Resolution::Stale
        );
        assert_eq!(ed.current_content(), "avana ");
    }

    #[test]
    fn letter_typed_against_source_word_makes_lookup_stale() {
        let mut ed = loaded("a vana");
        let req = ed.type_char(' ').unwrap();
        ed.set_selection(Span::caret(2));
        ed.type_char('x');

        assert_eq!(
            ed.apply_suggestion(req.token, candidates(&["வண"])),
            Resolution::Stale
        );
        assert_eq!(ed.current_content(), "a xvana ");
    }

    #[test]
    fn text_ending_in_separator_before_source_word_keeps_lookup() {
        let mut ed = loaded("x vana");
        let req = ed.type_char(' ').unwrap();
        ed.set_selection(Span::caret(2));
        ed.insert_generated_text(Generation {
            text: "INT. ".into(),
            error: None,
        })
        .unwrap();

        assert_eq!(
            ed.apply_suggestion(req.token, candidates(&["வண"])),
            Resolution::Applied(Span::new(7, 9))
        );
        assert_eq!(ed.current_content(), "x INT. வண ");
    }

    #[test]
    fn reload_makes_pending_stale() {
        let mut ed = loaded("vana");
        let req = ed.type_char(' ').unwrap();
        ed.load("vana ");
        assert_eq!(
            ed.apply_suggestion(req.token, candidates(&["வண"])),
            Resolution::Stale
        );
        assert_eq!(ed.current_content(), "vana ");
    }

    #[test]
    fn candidates_are_capped() {
        let mut ed = loaded("vana");
        ed.options_mut().max_candidates = 2;
        let req = ed.type_char(' ').unwrap();
        ed.apply_suggestion(req.token, candidates(&["a", "b", "c", "a"]));
        assert_eq!(ed.candidates(), ["a", "b"]);
    }

    // -- select_alternate ---------------------------------------------------

    #[test]
    fn select_alternate_replaces_active_range() {
        let mut ed = loaded("vana");
        let req = ed.type_char(' ').unwrap();
        ed.apply_suggestion(req.token, candidates(&["வண", "வணா"]));

        assert!(ed.select_alternate("வணா"));
        assert_eq!(ed.current_content(), "வணா ");
        assert_eq!(ed.active_range(), Some(Span::new(0, 3)));
        assert_eq!(ed.candidates(), ["வணா", "வண"]);
        assert_eq!(ed.current_selection(), Span::caret(4));
    }

    #[test]
    fn select_alternate_after_unrelated_edit_inserts_at_cursor() {
        let mut ed = loaded("vana");
        let req = ed.type_char(' ').unwrap();
        ed.apply_suggestion(req.token, candidates(&["வண", "வணா"]));
        ed.type_char('x');
        assert_eq!(ed.active_range(), None);

        assert!(ed.select_alternate("வணா"));
        assert_eq!(ed.current_content(), "வண xவணா");
        assert_eq!(ed.active_range(), Some(Span::new(4, 7)));
    }

    #[test]
    fn select_unknown_alternate_is_rejected() {
        let mut ed = loaded("vana");
        assert!(!ed.select_alternate("வணா"));
        assert_eq!(ed.current_content(), "vana");
    }

    #[test]
    fn editing_inside_range_keeps_it() {
        let mut ed = loaded("vana");
        let req = ed.type_char(' ').unwrap();
        ed.apply_suggestion(req.token, candidates(&["வண", "வணா"]));
        ed.set_selection(Span::caret(2));
        ed.type_char('ா');
        assert_eq!(ed.active_range(), Some(Span::new(0, 3)));

        assert!(ed.select_alternate("வண"));
        assert_eq!(ed.current_content(), "வண ");
    }

    #[test]
    fn typing_before_range_shifts_it() {
        let mut ed = loaded("vana");
        let req = ed.type_char(' ').unwrap();
        ed.apply_suggestion(req.token, candidates(&["வண", "வணா"]));
        ed.set_selection(Span::caret(0));
        ed.type_char('x');
        assert_eq!(ed.current_content(), "xவண ");
        assert_eq!(ed.active_range(), Some(Span::new(1, 3)));

        assert!(ed.select_alternate("வணா"));
        assert_eq!(ed.current_content(), "xவணா ");
        assert_eq!(ed.active_range(), Some(Span::new(1, 4)));
    }

    #[test]
    fn moving_cursor_out_of_range_clears_it() {
        let mut ed = loaded("vana");
        let events = recorded_events(&mut ed);
        let req = ed.type_char(' ').unwrap();
        ed.apply_suggestion(req.token, candidates(&["வண", "வணா"]));
        ed.set_selection(Span::caret(1));
        ed.set_selection(Span::caret(3));

        assert_eq!(
            events.lock().unwrap().as_slice(),
            [
                EditorEvent::SuggestionChanged(Some(Span::new(0, 2))),
                EditorEvent::SuggestionChanged(None),
            ]
        );
    }

    // -- Voice --------------------------------------------------------------

    #[test]
    fn native_voice_text_inserted_directly() {
        let mut ed = loaded("");
        let req = ed.insert_voice_result(Transcription::ok("வணக்கம்")).unwrap();
        assert_eq!(req, None);
        assert_eq!(ed.current_content(), "வணக்கம்");
        assert_eq!(ed.history().current(), "வணக்கம்");
    }

    #[test]
    fn phonetic_voice_text_goes_through_lookup() {
        let mut ed = loaded("INT. ");
        let req = ed
            .insert_voice_result(Transcription::ok("vanakkam"))
            .unwrap()
            .unwrap();
        assert_eq!(req.word, "vanakkam");
        assert_eq!(ed.current_content(), "INT. vanakkam");

        let res = ed.apply_suggestion(req.token, candidates(&["வணக்கம்"]));
        assert_eq!(res, Resolution::Applied(Span::new(5, 12)));
        assert_eq!(ed.current_content(), "INT. வணக்கம்");
        assert_eq!(ed.current_selection(), Span::caret(12));
    }

    #[test]
    fn phonetic_voice_text_kept_when_superseded() {
        let mut ed = loaded("");
        let voice = ed
            .insert_voice_result(Transcription::ok("amma"))
            .unwrap()
            .unwrap();
        let typed = ed.type_char(' ').unwrap();
        assert_eq!(
            ed.apply_suggestion(voice.token, candidates(&["அம்மா"])),
            Resolution::Stale
        );
        assert_eq!(ed.current_content(), "amma ");
        assert!(ed.is_current(typed.token));
    }

    #[test]
    fn failed_transcription_does_not_mutate() {
        let mut ed = loaded("draft");
        let failed = Transcription {
            text: String::new(),
            success: false,
            error: Some("microphone unavailable".into()),
        };
        let err = ed.insert_voice_result(failed).unwrap_err();
        assert!(matches!(err, EditError::Transcription(ref m) if m == "microphone unavailable"));
        assert_eq!(ed.current_content(), "draft");
        assert_eq!(ed.history().len(), 1);
    }

    #[test]
    fn empty_transcription_is_noop() {
        let mut ed = loaded("draft");
        assert_eq!(ed.insert_voice_result(Transcription::ok("  ")).unwrap(), None);
        assert_eq!(ed.current_content(), "draft");
    }

    // -- Generated text -----------------------------------------------------

    #[test]
    fn generated_text_inserted_at_selection() {
        let mut ed = loaded("EXT. BEACH\n");
        ed.insert_generated_text(Generation {
            text: "Waves crash.".into(),
            error: None,
        })
        .unwrap();
        assert_eq!(ed.current_content(), "EXT. BEACH\nWaves crash.");
        assert_eq!(ed.history().len(), 2);
    }

    #[test]
    fn generation_error_does_not_mutate() {
        let mut ed = loaded("draft");
        let err = ed
            .insert_generated_text(Generation {
                text: String::new(),
                error: Some("no API key".into()),
            })
            .unwrap_err();
        assert!(matches!(err, EditError::Generation(_)));
        let err = ed.insert_generated_text(Generation::default()).unwrap_err();
        assert!(matches!(err, EditError::Generation(_)));
        assert_eq!(ed.current_content(), "draft");
    }

    #[test]
    fn speakable_text_prefers_selection() {
        let mut ed = loaded("one two");
        assert_eq!(ed.speakable_text(), "one two");
        ed.set_selection(Span::new(4, 7));
        assert_eq!(ed.speakable_text(), "two");
    }

    // -- Undo / redo --------------------------------------------------------

    #[test]
    fn undo_redo_restore_with_cursor_at_end() {
        let mut ed = Editor::new();
        ed.type_str("ab");
        ed.set_selection(Span::caret(0));
        ed.type_char('X');
        assert_eq!(ed.current_content(), "Xab");

        ed.undo().unwrap();
        assert_eq!(ed.current_content(), "ab");
        assert_eq!(ed.current_selection(), Span::caret(2));

        ed.redo().unwrap();
        assert_eq!(ed.current_content(), "Xab");
        assert_eq!(ed.current_selection(), Span::caret(3));
    }

    #[test]
    fn undo_at_start_reports_no_history() {
        let mut ed = loaded("draft");
        assert!(matches!(ed.undo(), Err(EditError::NoHistory)));
        assert!(matches!(ed.redo(), Err(EditError::NoHistory)));
        assert_eq!(ed.current_content(), "draft");
    }

    #[test]
    fn undo_while_lookup_pending_reverts_boundary() {
        let mut ed = loaded("vana");
        let req = ed.type_char(' ').unwrap();
        ed.undo().unwrap();
        assert_eq!(ed.current_content(), "vana");
        assert!(!ed.has_pending_lookup());
        assert_eq!(
            ed.apply_suggestion(req.token, candidates(&["வண"])),
            Resolution::Stale
        );
    }

    #[test]
    fn boundary_after_undo_drops_redo() {
        let mut ed = Editor::new();
        ed.type_str("ab");
        ed.undo().unwrap();
        ed.type_char(' ');
        ed.type_char('c');
        assert!(matches!(ed.redo(), Err(EditError::NoHistory)));
        assert_eq!(ed.current_content(), "a c");
    }

    #[test]
    fn undo_clears_suggestions() {
        let mut ed = loaded("vana");
        let events = recorded_events(&mut ed);
        let req = ed.type_char(' ').unwrap();
        ed.apply_suggestion(req.token, candidates(&["வண", "வணா"]));
        ed.undo().unwrap();

        assert_eq!(ed.active_range(), None);
        assert!(ed.alternates().is_empty());
        assert_eq!(
            events.lock().unwrap().last(),
            Some(&EditorEvent::SuggestionChanged(None))
        );
    }
}
