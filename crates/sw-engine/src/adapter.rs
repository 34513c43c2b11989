//! Collaborator contracts: the services the engine calls but does not own.
//!
//! Each trait is one external capability. The engine never assumes a
//! transport: the host may back these with a subprocess, an HTTP client, or
//! an in-process model. Timeouts are the adapter's business; the engine
//! treats "failed" and "timed out" the same way.

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::AdapterError;

// ---------------------------------------------------------------------------
// Response shapes
// ---------------------------------------------------------------------------

/// Result of one dictation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Transcription {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

impl Transcription {
    /// A successful transcription of `text`.
    #[must_use]
    pub fn ok(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            success: true,
            error: None,
        }
    }
}

/// Result of one speech synthesis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Synthesis {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

/// Result of one text generation. Generators that report their output as
/// `response` are accepted too.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Generation {
    #[serde(default, alias = "response")]
    pub text: String,
    #[serde(default)]
    pub error: Option<String>,
}

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

/// Phonetic transliteration: a romanized word in, ranked script candidates
/// out. The list may be empty.
#[async_trait]
pub trait Transliterator: Send + Sync {
    async fn lookup(&self, word: &str) -> Result<Vec<String>, AdapterError>;
}

/// Speech to text: record for `duration_secs` and transcribe.
#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    async fn transcribe(
        &self,
        duration_secs: u32,
        language: &str,
    ) -> Result<Transcription, AdapterError>;
}

/// Text to speech.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, text: &str, language: &str) -> Result<Synthesis, AdapterError>;
}

/// AI text generation given a prompt and surrounding document context.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str, context: &str) -> Result<Generation, AdapterError>;
}
