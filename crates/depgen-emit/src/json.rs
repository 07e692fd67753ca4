use crate::emitter::Emitter;
use crate::EmitError;
use depgen_schema::{DependencyEntry, ResolvedTable};
use std::collections::BTreeMap;

/// Pretty-printed JSON object keyed by dependency id.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonEmitter;

impl Emitter for JsonEmitter {
    fn name(&self) -> &str {
        "json"
    }

    fn emit(&self, table: &ResolvedTable) -> Result<Vec<u8>, EmitError> {
        let keyed: BTreeMap<&str, &DependencyEntry> =
            table.iter().map(|e| (e.id.as_str(), e)).collect();
        let mut out = serde_json::to_vec_pretty(&keyed)?;
        out.push(b'\n');
        Ok(out)
    }
}
