//! Purpose: Materialize one resolved instruction on disk.
//! Exports: `write_to_file`, `write_to_file_in`, `resolve_path`.
//! Role: Thin wrapper over `std::fs` used by the driver.
//! Invariants: Missing parent directories are created; existing files are truncated.
//! Invariants: Every OS failure surfaces as `ErrorKind::Io` prefixed "Error writing to file:".
//! Invariants: The success line names the path as given, not the resolved one.
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Error, Result};

/// Resolves `file_path` against `base`; absolute paths pass through.
pub fn resolve_path(base: &Path, file_path: &str) -> PathBuf {
    base.join(file_path)
}

/// Writes relative to the current working directory.
pub fn write_to_file(file_path: &str, content: &[u8]) -> Result<()> {
    let cwd = std::env::current_dir().map_err(|err| Error::write_failure(Path::new("."), err))?;
    write_to_file_in(&cwd, file_path, content)
}

pub fn write_to_file_in(base: &Path, file_path: &str, content: &[u8]) -> Result<()> {
    let absolute = resolve_path(base, file_path);

    if let Some(parent) = absolute.parent() {
        std::fs::create_dir_all(parent).map_err(|err| Error::write_failure(parent, err))?;
    }
    std::fs::write(&absolute, content).map_err(|err| Error::write_failure(&absolute, err))?;

    debug!(path = %absolute.display(), bytes = content.len(), "wrote file");
    println!("Successfully wrote content to {file_path}");
    Ok(())
}
