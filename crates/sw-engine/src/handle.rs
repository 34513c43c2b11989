//! Async driver: runs lookups as tasks against a shared [`Editor`].
//!
//! [`EditorHandle`] keeps the editor behind one mutex, the single
//! serialization point for every operation. The lock is only ever held for
//! a synchronous editor call, never across an `.await`:
//!
//! ```text
//! type_char(' ')  ─lock─▶ Editor::type_char ─▶ LookupRequest ─unlock─┐
//!                                                                   ▼
//!                                   tokio::spawn(lookup(word).await)
//!                                                                   │
//!            lock ◀── Editor::apply_suggestion(token, outcome) ◀────┘
//! ```
//!
//! Keystrokes keep flowing while lookups are out. When one finishes, its
//! result goes through [`Editor::apply_suggestion`], which drops it unless
//! its token is still current.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::task::JoinHandle;

use crate::adapter::{SpeechRecognizer, SpeechSynthesizer, TextGenerator, Transliterator};
use crate::editor::{Editor, Resolution};
use crate::error::EditError;
use crate::position::Selection;
use crate::suggestion::LookupRequest;

/// A cloneable handle to one editor and its collaborators.
#[derive(Clone)]
pub struct EditorHandle {
    editor: Arc<Mutex<Editor>>,
    transliterator: Arc<dyn Transliterator>,
    recognizer: Option<Arc<dyn SpeechRecognizer>>,
    synthesizer: Option<Arc<dyn SpeechSynthesizer>>,
    generator: Option<Arc<dyn TextGenerator>>,
}

impl EditorHandle {
    /// Wrap `editor`, using `transliterator` for lookups.
    #[must_use]
    pub fn new(editor: Editor, transliterator: Arc<dyn Transliterator>) -> Self {
        Self {
            editor: Arc::new(Mutex::new(editor)),
            transliterator,
            recognizer: None,
            synthesizer: None,
            generator: None,
        }
    }

    #[must_use]
    pub fn with_recognizer(mut self, recognizer: Arc<dyn SpeechRecognizer>) -> Self {
        self.recognizer = Some(recognizer);
        self
    }

    #[must_use]
    pub fn with_synthesizer(mut self, synthesizer: Arc<dyn SpeechSynthesizer>) -> Self {
        self.synthesizer = Some(synthesizer);
        self
    }

    #[must_use]
    pub fn with_generator(mut self, generator: Arc<dyn TextGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Run `f` with exclusive access to the editor.
    pub fn with_editor<R>(&self, f: impl FnOnce(&mut Editor) -> R) -> R {
        f(&mut self.editor.lock())
    }

    // -- Host queries -------------------------------------------------------

    #[must_use]
    pub fn current_content(&self) -> String {
        self.editor.lock().current_content()
    }

    #[must_use]
    pub fn current_selection(&self) -> Selection {
        self.editor.lock().current_selection()
    }

    // -- Operations ---------------------------------------------------------

    /// Type one character. If it starts a lookup, the lookup is spawned and
    /// its task handle returned; the caller may ignore it.
    pub fn type_char(&self, ch: char) -> Option<JoinHandle<Resolution>> {
        let request = self.editor.lock().type_char(ch)?;
        Some(self.spawn_lookup(request))
    }

    /// Type a run of characters. Returns the handles of every lookup started.
    pub fn type_str(&self, text: &str) -> Vec<JoinHandle<Resolution>> {
        text.chars().filter_map(|ch| self.type_char(ch)).collect()
    }

    /// See [`Editor::delete_backward`].
    pub fn delete_backward(&self) -> bool {
        self.editor.lock().delete_backward()
    }

    /// See [`Editor::set_selection`].
    pub fn set_selection(&self, selection: Selection) {
        self.editor.lock().set_selection(selection);
    }

    /// See [`Editor::select_alternate`].
    pub fn select_alternate(&self, candidate: &str) -> bool {
        self.editor.lock().select_alternate(candidate)
    }

    /// See [`Editor::undo`].
    ///
    /// # Errors
    ///
    /// [`EditError::NoHistory`] at the oldest snapshot.
    pub fn undo(&self) -> Result<(), EditError> {
        self.editor.lock().undo()
    }

    /// See [`Editor::redo`].
    ///
    /// # Errors
    ///
    /// [`EditError::NoHistory`] at the newest snapshot.
    pub fn redo(&self) -> Result<(), EditError> {
        self.editor.lock().redo()
    }

    /// Record speech with the configured recognizer and insert the result.
    ///
    /// # Errors
    ///
    /// [`EditError::Transcription`] if no recognizer is configured or the
    /// recognizer fails. The buffer is untouched in that case.
    pub async fn dictate(&self) -> Result<Option<JoinHandle<Resolution>>, EditError> {
        let recognizer = self
            .recognizer
            .as_ref()
            .ok_or_else(|| EditError::Transcription("no speech recognizer configured".into()))?;
        let (seconds, language) = {
            let ed = self.editor.lock();
            (ed.options().record_seconds, ed.options().voice_language.clone())
        };

        let transcription = recognizer
            .transcribe(seconds, &language)
            .await
            .map_err(|err| EditError::Transcription(err.to_string()))?;

        let request = {
            let mut ed = self.editor.lock();
            ed.insert_voice_result(transcription)?
        };
        Ok(request.map(|request| self.spawn_lookup(request)))
    }

    /// Generate text from `prompt` with the whole document as context and
    /// insert it at the selection.
    ///
    /// # Errors
    ///
    /// [`EditError::Generation`] if no generator is configured or generation
    /// fails. The buffer is untouched in that case.
    pub async fn generate(&self, prompt: &str) -> Result<(), EditError> {
        let generator = self
            .generator
            .as_ref()
            .ok_or_else(|| EditError::Generation("no text generator configured".into()))?;
        let context = self.current_content();

        let generation = generator
            .generate(prompt, &context)
            .await
            .map_err(|err| EditError::Generation(err.to_string()))?;

        let mut ed = self.editor.lock();
        ed.insert_generated_text(generation)
    }

    /// Read the selection (or the whole document) aloud.
    ///
    /// # Errors
    ///
    /// [`EditError::Synthesis`] if no synthesizer is configured or synthesis
    /// fails.
    pub async fn speak(&self) -> Result<(), EditError> {
        let synthesizer = self
            .synthesizer
            .as_ref()
            .ok_or_else(|| EditError::Synthesis("no speech synthesizer configured".into()))?;
        let (text, language) = {
            let ed = self.editor.lock();
            (ed.speakable_text(), ed.options().speech_language.clone())
        };
        if text.trim().is_empty() {
            return Ok(());
        }

        let synthesis = synthesizer
            .synthesize(&text, &language)
            .await
            .map_err(|err| EditError::Synthesis(err.to_string()))?;
        if synthesis.success && synthesis.error.is_none() {
            Ok(())
        } else {
            Err(EditError::Synthesis(
                synthesis
                    .error
                    .unwrap_or_else(|| "synthesizer reported failure".into()),
            ))
        }
    }

    fn spawn_lookup(&self, request: LookupRequest) -> JoinHandle<Resolution> {
        let editor = Arc::clone(&self.editor);
        let transliterator = Arc::clone(&self.transliterator);
        tokio::spawn(async move {
            let outcome = transliterator.lookup(&request.word).await;
            let resolution = editor.lock().apply_suggestion(request.token, outcome);
            tracing::trace!(token = request.token.id(), ?resolution, "lookup settled");
            resolution
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
