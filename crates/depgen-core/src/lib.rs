//! Generation pipeline for depgen.
//!
//! Ties the schema and emit crates into the one-shot `Engine`: load a
//! manifest, resolve it into a canonical table, emit it, and either write the
//! result atomically or compare it with an existing generated file.

pub mod check;
pub mod engine;
pub mod output;

pub use check::{compare_output, CheckReport, CheckStatus};
pub use engine::{Engine, GenerateOptions, Generation};
pub use output::write_atomic;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("manifest error: {0}")]
    Manifest(#[from] depgen_schema::ManifestError),
    #[error("resolve error: {0}")]
    Resolve(#[from] depgen_schema::ResolveError),
    #[error("emit error: {0}")]
    Emit(#[from] depgen_emit::EmitError),
    #[error("output error: {0}")]
    Io(#[from] std::io::Error),
}
