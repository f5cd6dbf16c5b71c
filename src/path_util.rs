use crate::constants::{ARCHIVE_EXTENSION, DEFAULT_ARCHIVE_PREFIX, TIMESTAMP_FORMAT};
use crate::error::{Error, Result};
use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};
use std::{fs, io};

/// Checks that `path` exists and is a directory.
///
/// # Errors
/// Returns [`Error::InvalidRoot`] naming the path if it is missing,
/// inaccessible or not a directory.
pub fn check_dir(path: &Path) -> Result<()> {
    let metadata = fs::metadata(path).map_err(|source| Error::InvalidRoot {
        path: path.to_path_buf(),
        source,
    })?;
    if !metadata.is_dir() {
        return Err(Error::InvalidRoot {
            path: path.to_path_buf(),
            source: io::Error::new(io::ErrorKind::NotADirectory, "not a directory"),
        });
    }
    Ok(())
}

/// Generates a timestamped archive name, e.g. `directory_backup_20250101_120000.zip`.
pub fn default_archive_name(now: NaiveDateTime) -> String {
    format!(
        "{DEFAULT_ARCHIVE_PREFIX}{}{ARCHIVE_EXTENSION}",
        now.format(TIMESTAMP_FORMAT)
    )
}

/// Appends the archive extension to `name` unless it already ends with it.
pub fn with_archive_extension(name: &str) -> String {
    if name.ends_with(ARCHIVE_EXTENSION) {
        name.to_string()
    } else {
        format!("{name}{ARCHIVE_EXTENSION}")
    }
}

/// Resolves where the archive is written.
///
/// Without a user supplied name a timestamped name is generated. Relative
/// paths are resolved against `cwd`, the caller's working directory, not the
/// directory being archived.
///
/// # Arguments
/// * `cwd` - The working directory of the caller.
/// * `output` - Optional user supplied output path.
/// * `now` - Local time used for the generated name.
pub fn resolve_output(cwd: &Path, output: Option<&str>, now: NaiveDateTime) -> PathBuf {
    let name = match output {
        Some(name) => with_archive_extension(name),
        None => default_archive_name(now),
    };
    cwd.join(name)
}
