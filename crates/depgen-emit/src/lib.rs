//! Emitters for resolved dependency tables.
//!
//! An `Emitter` turns a `ResolvedTable` into the bytes of a generated file:
//! a Go map literal for the sync tool, or JSON/TOML for other consumers.
//! Emitters never touch the filesystem; writing is left to the caller.

pub mod emitter;
pub mod go;
pub mod json;
pub mod toml_table;

pub use emitter::{emit, select_emitter, Emitter};
pub use go::GoEmitter;
pub use json::JsonEmitter;
pub use toml_table::TomlEmitter;

use thiserror::Error;

/// Serializer failures. The Go emitter is infallible; the serde-backed
/// emitters surface their serializer's error type unchanged.
#[derive(Debug, Error)]
pub enum EmitError {
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("TOML serialization failed: {0}")]
    Toml(#[from] toml::ser::Error),
}
