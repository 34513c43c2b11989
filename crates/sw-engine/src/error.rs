//! Error types for the editing engine.
//!
//! Nothing in the engine is fatal. Transliteration failures are absorbed by
//! the literal fallback and only surface as an advisory event; voice and AI
//! failures are returned to the host without touching the buffer; the history
//! boundary is reported so the host can no-op.

use thiserror::Error;

/// Errors returned by collaborator adapters.
///
/// For transliteration the coordinator treats every variant the same way:
/// insert the literal word and move on.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// The adapter ran and reported failure.
    #[error("adapter failed: {0}")]
    Failed(String),

    /// The adapter's response could not be understood.
    #[error("malformed adapter response: {0}")]
    Malformed(String),

    /// The adapter gave up waiting.
    #[error("adapter timed out")]
    TimedOut,

    /// Spawning or talking to the adapter failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Errors returned by editor operations.
#[derive(Debug, Error)]
pub enum EditError {
    /// Undo at the oldest entry, or redo at the newest.
    #[error("no further history")]
    NoHistory,

    /// A lookup failed. Recovered locally; carried only in advisory events.
    #[error("lookup failed: {0}")]
    LookupFailed(#[from] AdapterError),

    /// Speech transcription failed. The buffer is untouched.
    #[error("transcription failed: {0}")]
    Transcription(String),

    /// Speech synthesis failed.
    #[error("speech synthesis failed: {0}")]
    Synthesis(String),

    /// Text generation failed or returned nothing. The buffer is untouched.
    #[error("text generation failed: {0}")]
    Generation(String),
}

/// Errors from parsing or applying `:set` directives.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OptionError {
    /// The option name is not recognized.
    #[error("unknown option: {0}")]
    Unknown(String),

    /// The value could not be parsed for this option.
    #[error("invalid value for {option}: {value}")]
    InvalidValue {
        /// The option that was being assigned.
        option: String,
        /// The rejected value.
        value: String,
    },

    /// A boolean directive was used on a value option, or vice versa.
    #[error("{0} is not a boolean option")]
    NotBoolean(String),
}
