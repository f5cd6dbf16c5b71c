//! dirzip: pack a directory into a single zip archive.
//!
//! The crate is split into the exclusion rules ([`filter`]), the directory
//! walk ([`walker`]) and the zip writer ([`archive`]), plus the configuration
//! and command-line layers used by the `dz` binary.

pub mod application;
pub mod archive;
pub mod commands;
mod constants;
pub mod error;
pub mod filter;
pub mod path_util;
pub mod sysexits;
pub mod walker;

pub use archive::{ArchiveOptions, ArchiveReport, ArchiveWriter, RunState, create_archive};
pub use error::{Error, Result};
