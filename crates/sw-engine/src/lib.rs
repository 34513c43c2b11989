//! # sw-engine: Editing core for scriptwriter
//!
//! A bilingual script editor engine: the writer types romanized Tamil, and
//! each finished word is swapped for its native-script form once a
//! transliteration lookup answers. Lookups run concurrently with typing; a
//! result that no longer matches the document is dropped.
//!
//! - **[`position`]**: `Span` (half-open char range), `Selection`, `SuggestionRange`
//! - **[`buffer`]**: `TextBuffer`, an immutable-style rope snapshot plus selection
//! - **[`history`]**: linear undo/redo stack of whole-document snapshots
//! - **[`word`]** / **[`script`]**: word boundaries and Tamil script detection
//! - **[`suggestion`]**: request tokens, pending lookups, resolved candidates
//! - **[`editor`]**: `Editor`, the single mutation coordinator
//! - **[`handle`]**: `EditorHandle`, the async driver that spawns lookups
//! - **[`adapter`]**: traits for transliteration, speech, and generation services
//! - **[`options`]**: `:set`-style editor options
//! - **[`error`]**: error types

pub mod adapter;
pub mod buffer;
pub mod editor;
pub mod error;
pub mod handle;
pub mod history;
pub mod options;
pub mod position;
pub mod script;
pub mod suggestion;
pub mod word;

pub use editor::{Editor, EditorEvent, Resolution};
pub use error::{AdapterError, EditError, OptionError};
pub use handle::EditorHandle;
pub use position::{Selection, Span, SuggestionRange};
