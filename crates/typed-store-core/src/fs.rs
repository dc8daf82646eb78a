//! Filesystem utilities for atomic writes.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Atomically rename a file, with fallback for platforms where rename fails if target exists.
///
/// On some platforms (notably Windows), `fs::rename` fails if the destination already exists.
/// This function handles that case by removing the destination first and retrying.
///
/// If the rename ultimately fails, the temp file is cleaned up.
pub fn rename_with_fallback(temp_path: &Path, destination: &Path) -> io::Result<()> {
    if let Err(initial_err) = fs::rename(temp_path, destination) {
        let _ = fs::remove_file(destination);
        fs::rename(temp_path, destination).map_err(|retry_err| {
            let _ = fs::remove_file(temp_path);
            io::Error::new(
                retry_err.kind(),
                format!(
                    "Atomic rename failed (initial: {}, retry: {})",
                    initial_err, retry_err
                ),
            )
        })?;
    }
    Ok(())
}

/// Replace the contents of `destination` by writing a sibling temp file and
/// renaming it into place. Parent directories are created as needed.
pub fn write_atomic(destination: &Path, contents: &[u8]) -> io::Result<()> {
    if let Some(parent) = destination.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let temp_path = temp_sibling(destination);
    {
        let mut file = fs::File::create(&temp_path)?;
        file.write_all(contents)?;
        file.sync_all()?;
    }
    rename_with_fallback(&temp_path, destination)
}

fn temp_sibling(destination: &Path) -> PathBuf {
    let mut name = destination
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(format!(".tmp-{}", std::process::id()));
    destination.with_file_name(name)
}
