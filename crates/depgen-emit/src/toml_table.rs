use crate::emitter::Emitter;
use crate::EmitError;
use depgen_schema::{DependencyEntry, EmitConfig, ResolvedTable};
use serde::Serialize;

/// Emits the resolved table as a manifest, so the output loads back as input.
#[derive(Debug, Clone)]
pub struct TomlEmitter {
    generator: String,
}

#[derive(Serialize)]
struct TomlManifest<'a> {
    manifest_version: u32,
    deps: &'a [DependencyEntry],
}

impl TomlEmitter {
    pub fn new(config: &EmitConfig) -> Self {
        Self {
            generator: config.generator.clone(),
        }
    }
}

impl Emitter for TomlEmitter {
    fn name(&self) -> &str {
        "toml"
    }

    fn emit(&self, table: &ResolvedTable) -> Result<Vec<u8>, EmitError> {
        let body = toml::to_string_pretty(&TomlManifest {
            manifest_version: 1,
            deps: table.entries(),
        })?;
        let mut out = format!(
            "# Code generated by \"{}\"; DO NOT EDIT\n\n",
            self.generator
        );
        out.push_str(&body);
        if !out.ends_with('\n') {
            out.push('\n');
        }
        Ok(out.into_bytes())
    }
}
