use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::archive::RunState;

/// Unified result type for the fallible operations of dirzip.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that end a run.
///
/// Problems with a single entry are not errors; they are collected as
/// [`EntryWarning`](crate::archive::EntryWarning)s in the report instead.
#[derive(Debug, Error)]
pub enum Error {
    /// The directory to archive does not exist or is not a directory.
    #[error("The directory '{}' is invalid: {source}", path.display())]
    InvalidRoot { path: PathBuf, source: io::Error },

    /// The archive file could not be created at its destination.
    #[error("Cannot create archive '{}': {source}", path.display())]
    Create { path: PathBuf, source: io::Error },

    /// The central directory could not be written.
    #[error("Cannot finalize archive '{}': {source}", path.display())]
    Finalize {
        path: PathBuf,
        source: zip::result::ZipError,
    },

    /// The writer has already finished a run.
    #[error("The archive writer cannot run from state {0:?}")]
    InvalidState(RunState),

    /// The settings file exists but could not be read.
    #[error("Error reading config file '{}': {source}", path.display())]
    ReadConfig { path: PathBuf, source: io::Error },

    /// The settings file is not valid TOML or holds an invalid value.
    #[error("Error parsing config file '{}': {source}", path.display())]
    ParseConfig {
        path: PathBuf,
        source: toml::de::Error,
    },
}
