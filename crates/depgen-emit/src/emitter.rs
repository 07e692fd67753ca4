use crate::EmitError;
use depgen_schema::{EmitConfig, OutputFormat, ResolvedTable};

pub trait Emitter {
    fn name(&self) -> &str;

    fn emit(&self, table: &ResolvedTable) -> Result<Vec<u8>, EmitError>;
}

pub fn select_emitter(config: &EmitConfig) -> Box<dyn Emitter> {
    match config.format {
        OutputFormat::Go => Box::new(crate::go::GoEmitter::new(config)),
        OutputFormat::Json => Box::new(crate::json::JsonEmitter),
        OutputFormat::Toml => Box::new(crate::toml_table::TomlEmitter::new(config)),
    }
}

/// Serialize `table` in the format named by `config`.
pub fn emit(table: &ResolvedTable, config: &EmitConfig) -> Result<Vec<u8>, EmitError> {
    select_emitter(config).emit(table)
}
