use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::{debug, warn};

/// Replace `dest` with `content` via a synced temp file in the same directory.
///
/// Readers see either the old file or the complete new one.
pub fn write_atomic(dest: &Path, content: &[u8]) -> std::io::Result<()> {
    let dir = match dest.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.as_file().sync_all()?;
    tmp.persist(dest).map_err(|e| e.error)?;
    // The file is already in place; a failed directory sync only weakens
    // durability of the rename.
    if let Err(e) = sync_dir(dir) {
        warn!("failed to sync directory {}: {e}", dir.display());
    }
    debug!("wrote {} bytes to {}", content.len(), dest.display());
    Ok(())
}

fn sync_dir(dir: &Path) -> std::io::Result<()> {
    fs::File::open(dir)?.sync_all()
}
