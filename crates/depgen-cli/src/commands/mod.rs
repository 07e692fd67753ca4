pub mod check;
pub mod completions;
pub mod generate;
pub mod list;
pub mod man_pages;

use depgen_schema::PinKind;

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_MANIFEST_ERROR: u8 = 2;
pub const EXIT_DRIFT: u8 = 3;

pub fn json_pretty(value: &impl serde::Serialize) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("JSON serialization failed: {e}"))
}

pub fn colorize_kind(kind: PinKind) -> String {
    use console::Style;
    let label = kind.as_str();
    match kind {
        PinKind::Commit => Style::new().green().apply_to(label).to_string(),
        PinKind::Version => Style::new().cyan().apply_to(label).to_string(),
        PinKind::GitRevision => Style::new().blue().apply_to(label).to_string(),
        PinKind::Other => Style::new().yellow().apply_to(label).to_string(),
    }
}
