//! Zip archive creation.
//!
//! [`ArchiveWriter`] drives a single run through its states:
//!
//! ```text
//! Idle -> Opening -> Walking -> Finalizing -> Succeeded
//!            |                       |
//!            +-------> Failed <------+
//! ```
//!
//! Only failing to create or finalize the archive ends in `Failed`. Entries
//! that cannot be read are skipped with a warning while the run stays in
//! `Walking`.

use std::fs::{self, File};
use std::io::{self, Seek, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Datelike, Local, Timelike};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::application::Level;
use crate::error::{Error, Result};
use crate::filter::{Decision, EntryKind, ExclusionRules};
use crate::path_util;
use crate::walker::{Entry, Walker};

/// Lifecycle of an [`ArchiveWriter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Opening,
    Walking,
    Finalizing,
    Succeeded,
    Failed,
}

impl RunState {
    pub fn is_terminal(self) -> bool {
        matches!(self, RunState::Succeeded | RunState::Failed)
    }
}

/// Everything a run needs to know.
#[derive(Debug, Clone)]
pub struct ArchiveOptions {
    /// Directory whose contents are archived.
    pub root: PathBuf,
    /// Path of the archive file. Its file name is excluded from the archive.
    pub output: PathBuf,
    pub include_hidden: bool,
    pub level: Level,
    /// Suffixes excluded in addition to the built-in temporary suffixes.
    pub extra_suffixes: Vec<String>,
}

impl ArchiveOptions {
    pub fn new(root: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            output: output.into(),
            include_hidden: false,
            level: Level::Default,
            extra_suffixes: vec![],
        }
    }

    pub fn include_hidden(mut self, include_hidden: bool) -> Self {
        self.include_hidden = include_hidden;
        self
    }

    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    pub fn extra_suffixes(mut self, suffixes: Vec<String>) -> Self {
        self.extra_suffixes = suffixes;
        self
    }

    /// Builds the exclusion rules for this run.
    pub fn rules(&self) -> ExclusionRules {
        let archive_name = self
            .output
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        ExclusionRules::new(archive_name, self.include_hidden)
            .with_extra_suffixes(self.extra_suffixes.iter().cloned())
    }
}

/// An entry that was skipped because it could not be archived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryWarning {
    pub path: PathBuf,
    pub message: String,
}

/// Summary of a successful run.
#[derive(Debug, Clone, Default)]
pub struct ArchiveReport {
    /// Path of the written archive.
    pub output: PathBuf,
    pub files_added: usize,
    pub folders_added: usize,
    /// Entries left out by the exclusion rules. Pruned subtrees count once.
    pub entries_excluded: usize,
    /// Size of the finished archive in bytes.
    pub archive_size: u64,
    pub warnings: Vec<EntryWarning>,
}

impl ArchiveReport {
    fn warn(&mut self, path: &Path, message: impl Into<String>) {
        let message = message.into();
        log::warn!("Could not add {}: {message}", path.display());
        self.warnings.push(EntryWarning {
            path: path.to_path_buf(),
            message,
        });
    }
}

/// Writes the contents of a directory into a single zip archive.
pub struct ArchiveWriter {
    options: ArchiveOptions,
    state: RunState,
}

impl ArchiveWriter {
    pub fn new(options: ArchiveOptions) -> Self {
        Self {
            options,
            state: RunState::Idle,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Performs the run.
    ///
    /// # Errors
    /// Returns an error if the root is not a directory, the archive cannot be
    /// created or finalized, or the writer already ran. Unreadable entries do
    /// not fail the run; they are listed in [`ArchiveReport::warnings`].
    pub fn run(&mut self) -> Result<ArchiveReport> {
        if self.state != RunState::Idle {
            return Err(Error::InvalidState(self.state));
        }

        self.transition(RunState::Opening);
        let file = match self.open() {
            Ok(file) => file,
            Err(e) => {
                self.transition(RunState::Failed);
                return Err(e);
            }
        };

        self.transition(RunState::Walking);
        let mut zip = ZipWriter::new(file);
        let mut report = ArchiveReport {
            output: self.options.output.clone(),
            ..Default::default()
        };
        self.write_entries(&mut zip, &mut report);

        let file = self.finalize(zip)?;
        report.archive_size = match file.metadata() {
            Ok(metadata) => metadata.len(),
            Err(e) => {
                log::warn!("Could not read archive size: {e}");
                0
            }
        };
        Ok(report)
    }

    /// Writes the central directory. On failure the incomplete archive is
    /// removed and the writer ends in `Failed`.
    fn finalize<W: Write + Seek>(&mut self, zip: ZipWriter<W>) -> Result<W> {
        self.transition(RunState::Finalizing);
        match zip.finish() {
            Ok(sink) => {
                self.transition(RunState::Succeeded);
                Ok(sink)
            }
            Err(source) => {
                self.transition(RunState::Failed);
                if let Err(e) = fs::remove_file(&self.options.output) {
                    log::debug!("Could not remove incomplete archive: {e}");
                }
                Err(Error::Finalize {
                    path: self.options.output.clone(),
                    source,
                })
            }
        }
    }

    fn transition(&mut self, next: RunState) {
        log::debug!("Archive writer: {:?} -> {next:?}", self.state);
        self.state = next;
    }

    fn open(&self) -> Result<File> {
        path_util::check_dir(&self.options.root)?;
        File::create(&self.options.output).map_err(|source| Error::Create {
            path: self.options.output.clone(),
            source,
        })
    }

    fn write_entries<W: Write + Seek>(
        &self,
        zip: &mut ZipWriter<W>,
        report: &mut ArchiveReport,
    ) {
        let rules = self.options.rules();
        let method_options = file_options(self.options.level);

        for entry in Walker::new(&self.options.root).pruned(&rules).entries() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e.path().unwrap_or(self.options.root.as_path()).to_path_buf();
                    report.warn(&path, e.to_string());
                    continue;
                }
            };

            let decision = rules.decide(&entry.name(), entry.kind);
            if let Decision::Excluded(reason) = decision {
                log::debug!("Excluding {}: {reason:?}", entry.archive_name);
                report.entries_excluded += 1;
                continue;
            }

            let options = with_metadata(method_options, &entry.path);
            match entry.kind {
                EntryKind::Directory => {
                    let name = format!("{}/", entry.archive_name);
                    match zip.add_directory(name, options) {
                        Ok(()) => report.folders_added += 1,
                        Err(e) => report.warn(&entry.path, e.to_string()),
                    }
                }
                EntryKind::File => match add_file(zip, &entry, options) {
                    Ok(()) => {
                        log::info!("Added: {}", entry.archive_name);
                        report.files_added += 1;
                    }
                    Err(e) => report.warn(&entry.path, e.to_string()),
                },
            }
        }
    }
}

/// Creates the archive described by `options` in one go.
///
/// # Errors
/// See [`ArchiveWriter::run`].
pub fn create_archive(options: ArchiveOptions) -> Result<ArchiveReport> {
    ArchiveWriter::new(options).run()
}

/// Streams a file into the archive. The file is opened before its entry is
/// started, and a half-written entry is dropped again, so a failure leaves
/// no trace in the archive.
fn add_file<W: Write + Seek>(
    zip: &mut ZipWriter<W>,
    entry: &Entry,
    options: SimpleFileOptions,
) -> io::Result<()> {
    let mut src = File::open(&entry.path)?;
    zip.start_file(entry.archive_name.clone(), options)
        .map_err(io::Error::other)?;
    if let Err(e) = io::copy(&mut src, zip) {
        if let Err(abort) = zip.abort_file() {
            log::debug!("Could not drop partial entry {}: {abort}", entry.archive_name);
        }
        return Err(e);
    }
    Ok(())
}

fn file_options(level: Level) -> SimpleFileOptions {
    SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(Some(level.deflate_level()))
}

/// Entries this large need zip64 extensions.
fn needs_large_file(len: u64) -> bool {
    len >= u64::from(u32::MAX)
}

/// Copies the modification time and, on Unix, the permission bits of `path`
/// into the entry options, and enables zip64 for large files. Metadata that
/// cannot be read is left at the format defaults.
fn with_metadata(options: SimpleFileOptions, path: &Path) -> SimpleFileOptions {
    let Ok(metadata) = fs::metadata(path) else {
        return options;
    };
    let mut options = options.large_file(needs_large_file(metadata.len()));
    if let Some(time) = metadata.modified().ok().and_then(zip_time) {
        options = options.last_modified_time(time);
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        options = options.unix_permissions(metadata.permissions().mode());
    }
    options
}

/// Zip timestamps are local time between 1980 and 2107.
fn zip_time(time: SystemTime) -> Option<zip::DateTime> {
    let local: DateTime<Local> = time.into();
    zip::DateTime::from_date_and_time(
        u16::try_from(local.year()).ok()?,
        local.month() as u8,
        local.day() as u8,
        local.hour() as u8,
        local.minute() as u8,
        local.second() as u8,
    )
    .ok()
}
