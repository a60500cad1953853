//! Input and output files

use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::Builder;

/// Read the whole input file
pub fn read_input(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .with_context(|| format!("Failed to read input file: {}", path.display()))
}

/// Write `content` to `path`, replacing it atomically
///
/// The content goes to a temporary file next to the destination which is
/// then renamed over it, so a failed run never leaves a half-written file.
/// An existing destination keeps its permissions; a new one gets the mode a
/// plain file creation would give it (0666 less the umask).
pub fn write_output(path: &Path, content: &str) -> Result<()> {
    let parent_dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));

    let mut builder = Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o666));
    }

    let mut temp_file = builder
        .tempfile_in(parent_dir)
        .with_context(|| format!("Failed to create temp file in {}", parent_dir.display()))?;

    if let Ok(metadata) = fs::metadata(path) {
        temp_file
            .as_file()
            .set_permissions(metadata.permissions())
            .with_context(|| format!("Failed to copy permissions of {}", path.display()))?;
    }

    temp_file
        .write_all(content.as_bytes())
        .with_context(|| format!("Failed to write output for {}", path.display()))?;

    temp_file
        .persist(path)
        .with_context(|| format!("Failed to write output file: {}", path.display()))?;

    Ok(())
}
