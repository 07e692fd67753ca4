use crate::check::{compare_output, CheckReport};
use crate::output::write_atomic;
use crate::CoreError;
use depgen_emit::emit;
use depgen_schema::{
    parse_manifest_file, parse_manifest_str, resolve, EmitConfig, ManifestV1, OutputFormat,
    ResolvedTable,
};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, info, warn};

/// Command-line overrides applied on top of the manifest's `[emit]` section.
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    pub format: Option<OutputFormat>,
    pub package: Option<String>,
}

impl GenerateOptions {
    fn apply(&self, config: &mut EmitConfig) {
        if let Some(format) = self.format {
            config.format = format;
        }
        if let Some(package) = &self.package {
            package.clone_into(&mut config.package);
        }
    }
}

/// Result of a successful load, resolve, and emit run.
#[derive(Debug, Clone)]
pub struct Generation {
    pub config: EmitConfig,
    pub table: ResolvedTable,
    pub bytes: Vec<u8>,
}

/// One-shot generation pipeline: load, resolve, emit.
///
/// Every stage runs to completion before anything is written, so a failing
/// run never produces or touches output.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    options: GenerateOptions,
}

impl Engine {
    pub fn new(options: GenerateOptions) -> Self {
        Self { options }
    }

    pub fn generate(&self, manifest_path: &Path) -> Result<Generation, CoreError> {
        info!("loading manifest {}", manifest_path.display());
        let manifest = parse_manifest_file(manifest_path)?;
        self.run(&manifest)
    }

    pub fn generate_str(&self, input: &str) -> Result<Generation, CoreError> {
        let manifest = parse_manifest_str(input)?;
        self.run(&manifest)
    }

    /// Generate and atomically replace `output`.
    pub fn write(&self, manifest_path: &Path, output: &Path) -> Result<Generation, CoreError> {
        let generation = self.generate(manifest_path)?;
        write_atomic(output, &generation.bytes)?;
        info!(
            "wrote {} dependencies to {}",
            generation.table.len(),
            output.display()
        );
        Ok(generation)
    }

    /// Generate and compare with the existing contents of `output`.
    pub fn check(&self, manifest_path: &Path, output: &Path) -> Result<CheckReport, CoreError> {
        let generation = self.generate(manifest_path)?;
        let existing = match fs::read(output) {
            Ok(bytes) => Some(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => return Err(e.into()),
        };

        let report = compare_output(output, &generation.bytes, existing.as_deref());
        if report.has_drift {
            warn!(
                "{} is out of date ({:?})",
                output.display(),
                report.status
            );
        } else {
            debug!("{} is up to date", output.display());
        }
        Ok(report)
    }

    fn run(&self, manifest: &ManifestV1) -> Result<Generation, CoreError> {
        let table = manifest.to_table()?;
        debug!("loaded {} dependency entries", table.len());

        let resolved = resolve(&table)?;

        let mut config = manifest.emit.clone();
        self.options.apply(&mut config);
        config.validate()?;
        let bytes = emit(&resolved, &config)?;
        debug!("emitted {} bytes as {}", bytes.len(), config.format);

        Ok(Generation {
            config,
            table: resolved,
            bytes,
        })
    }
}
