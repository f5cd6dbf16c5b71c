/// Package name.
pub(crate) const PKG_NAME: &str = env!("CARGO_PKG_NAME");
/// Default configuration file name.
pub(crate) const CONFIG_NAME: &str = "config.toml";
/// Extension enforced on every archive name.
pub(crate) const ARCHIVE_EXTENSION: &str = ".zip";
/// Prefix of generated archive names.
pub(crate) const DEFAULT_ARCHIVE_PREFIX: &str = "directory_backup_";
/// Timestamp layout of generated archive names.
pub(crate) const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
/// Leading character of hidden entries.
pub(crate) const HIDDEN_MARKER: char = '.';
/// Name suffixes of temporary files that never end up in an archive.
pub(crate) const TEMPORARY_SUFFIXES: [&str; 5] = [".tmp", ".temp", ".swp", ".bak", "~"];
