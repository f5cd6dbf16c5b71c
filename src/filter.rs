//! Inclusion rules applied to every entry found while walking a directory.
//!
//! The rules only look at an entry's base name and kind, so they never touch
//! the filesystem. They are evaluated in a fixed order and the first rule that
//! matches decides:
//!
//! 1. the archive's own file name is excluded,
//! 2. hidden names (leading `.`) are excluded unless hidden entries are
//!    included,
//! 3. file names ending in a temporary suffix are excluded,
//! 4. everything else is included.
//!
//! Directories are only subject to the first two rules.

use crate::constants::{HIDDEN_MARKER, TEMPORARY_SUFFIXES};

/// Kind of a filesystem entry as far as archiving is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

/// Why an entry was left out of the archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exclusion {
    /// The entry is the archive being written.
    OwnArchive,
    /// The entry name starts with the hidden marker.
    Hidden,
    /// The entry name ends with a temporary-file suffix.
    Temporary,
}

/// Outcome of applying [`ExclusionRules`] to an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Included,
    Excluded(Exclusion),
}

impl Decision {
    pub fn is_included(self) -> bool {
        matches!(self, Decision::Included)
    }
}

/// The exclusion rule set of a single run.
#[derive(Debug, Clone)]
pub struct ExclusionRules {
    archive_name: String,
    include_hidden: bool,
    extra_suffixes: Vec<String>,
}

impl ExclusionRules {
    /// Creates the rule set for an archive called `archive_name`.
    pub fn new(archive_name: impl Into<String>, include_hidden: bool) -> Self {
        Self {
            archive_name: archive_name.into(),
            include_hidden,
            extra_suffixes: vec![],
        }
    }

    /// Adds suffixes that are treated like the built-in temporary suffixes.
    /// Empty suffixes are ignored since they would match every file.
    pub fn with_extra_suffixes<I, S>(mut self, suffixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_suffixes.extend(
            suffixes
                .into_iter()
                .map(Into::into)
                .filter(|s| !s.is_empty()),
        );
        self
    }

    pub fn archive_name(&self) -> &str {
        &self.archive_name
    }

    pub fn include_hidden(&self) -> bool {
        self.include_hidden
    }

    /// Decides whether an entry with the given base name and kind is archived.
    pub fn decide(&self, name: &str, kind: EntryKind) -> Decision {
        if name == self.archive_name {
            return Decision::Excluded(Exclusion::OwnArchive);
        }
        if !self.include_hidden && name.starts_with(HIDDEN_MARKER) {
            return Decision::Excluded(Exclusion::Hidden);
        }
        if kind == EntryKind::File && self.is_temporary(name) {
            return Decision::Excluded(Exclusion::Temporary);
        }
        Decision::Included
    }

    fn is_temporary(&self, name: &str) -> bool {
        TEMPORARY_SUFFIXES.iter().any(|suffix| name.ends_with(suffix))
            || self
                .extra_suffixes
                .iter()
                .any(|suffix| name.ends_with(suffix.as_str()))
    }
}
