use super::{json_pretty, EXIT_DRIFT, EXIT_SUCCESS};
use depgen_core::{CheckStatus, Engine, GenerateOptions};
use std::path::Path;

pub fn run(
    manifest: &Path,
    output: &Path,
    options: GenerateOptions,
    json: bool,
) -> Result<u8, String> {
    let report = Engine::new(options)
        .check(manifest, output)
        .map_err(|e| e.to_string())?;

    if json {
        println!("{}", json_pretty(&report)?);
    } else {
        match report.status {
            CheckStatus::UpToDate => println!("{} is up to date", output.display()),
            CheckStatus::Missing => println!(
                "{} does not exist (run 'depgen generate -o {}')",
                output.display(),
                output.display()
            ),
            CheckStatus::Stale => {
                print!("{} is out of date", output.display());
                if let Some(line) = report.first_difference {
                    print!(" (first difference at line {line})");
                }
                println!();
            }
        }
    }

    if report.has_drift {
        Ok(EXIT_DRIFT)
    } else {
        Ok(EXIT_SUCCESS)
    }
}
