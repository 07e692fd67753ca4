//! Manifest loading, dependency tables, and resolution for depgen.
//!
//! This crate defines the schema layer: TOML manifest parsing (`ManifestV1`),
//! the insertion-ordered `ManifestTable` built from it, and the resolver that
//! validates a table and produces the canonical, id-sorted `ResolvedTable`
//! consumed by the emitters.

pub mod manifest;
pub mod resolve;
pub mod table;
pub mod types;

pub use manifest::{
    load_table_file, load_table_str, parse_manifest_file, parse_manifest_str, DepDecl, EmitConfig,
    ManifestError, ManifestV1, OutputFormat,
};
pub use resolve::{resolve, ResolveError, ResolvedTable};
pub use table::{DependencyEntry, ManifestTable, PinKind};
pub use types::{CheckoutPath, DepId, Pin};
