use super::{colorize_kind, json_pretty, EXIT_SUCCESS};
use console::{pad_str, Alignment};
use depgen_core::Engine;
use std::path::Path;

pub fn run(manifest: &Path, json: bool) -> Result<u8, String> {
    let generation = Engine::default()
        .generate(manifest)
        .map_err(|e| e.to_string())?;

    if json {
        let entries: Vec<_> = generation
            .table
            .iter()
            .map(|e| {
                serde_json::json!({
                    "id": e.id,
                    "version": e.version,
                    "path": e.path,
                    "kind": e.pin_kind(),
                })
            })
            .collect();
        println!("{}", json_pretty(&entries)?);
        return Ok(EXIT_SUCCESS);
    }

    if generation.table.is_empty() {
        println!("no dependencies declared in {}", manifest.display());
        return Ok(EXIT_SUCCESS);
    }

    let id_width = generation
        .table
        .iter()
        .map(|e| e.id.len())
        .max()
        .unwrap_or(0);
    for entry in &generation.table {
        println!(
            "{:<id_width$}  {}  {}  -> {}",
            entry.id.as_str(),
            pad_str(&colorize_kind(entry.pin_kind()), 12, Alignment::Left, None),
            entry.version,
            entry.path
        );
    }
    Ok(EXIT_SUCCESS)
}
