use super::{json_pretty, EXIT_SUCCESS};
use depgen_core::{Engine, GenerateOptions};
use std::io::Write;
use std::path::Path;
use tracing::debug;

pub fn run(
    manifest: &Path,
    output: Option<&Path>,
    options: GenerateOptions,
    json: bool,
) -> Result<u8, String> {
    let engine = Engine::new(options);

    let Some(output) = output else {
        let generation = engine.generate(manifest).map_err(|e| e.to_string())?;
        debug!("writing {} bytes to stdout", generation.bytes.len());
        let mut stdout = std::io::stdout().lock();
        stdout
            .write_all(&generation.bytes)
            .and_then(|()| stdout.flush())
            .map_err(|e| format!("failed to write stdout: {e}"))?;
        return Ok(EXIT_SUCCESS);
    };

    let generation = engine
        .write(manifest, output)
        .map_err(|e| e.to_string())?;
    if json {
        let payload = serde_json::json!({
            "status": "written",
            "output": output,
            "format": generation.config.format.as_str(),
            "dependencies": generation.table.len(),
        });
        println!("{}", json_pretty(&payload)?);
    } else {
        println!(
            "wrote {} dependencies to {}",
            generation.table.len(),
            output.display()
        );
    }
    Ok(EXIT_SUCCESS)
}
