//! Depth-first directory walk used to feed the archive writer.

use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::filter::{EntryKind, ExclusionRules};

/// A file or directory found below the walk root.
#[derive(Debug, Clone)]
pub struct Entry {
    /// Path on disk.
    pub path: PathBuf,
    /// Name of the entry inside the archive, `/`-separated.
    pub archive_name: String,
    pub kind: EntryKind,
}

impl Entry {
    fn from_dir_entry(root: &Path, entry: &walkdir::DirEntry) -> Self {
        let path = entry.path().to_path_buf();
        let archive_name = archive_name(root, &path);
        Self {
            kind: classify(entry),
            archive_name,
            path,
        }
    }

    /// Base name of the entry.
    pub fn name(&self) -> Cow<'_, str> {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy())
            .unwrap_or_default()
    }
}

/// Walks everything below a root directory in a stable order.
///
/// Entries are produced lazily, sorted by file name inside each directory.
/// The root itself is never produced. With [`Walker::pruned`], a directory the
/// rules exclude is still produced, but nothing beneath it is.
///
/// Calling [`Walker::entries`] again starts a fresh walk from the root.
pub struct Walker<'a> {
    root: &'a Path,
    rules: Option<&'a ExclusionRules>,
}

impl<'a> Walker<'a> {
    pub fn new(root: &'a Path) -> Self {
        Self { root, rules: None }
    }

    /// Does not descend into directories excluded by `rules`.
    pub fn pruned(mut self, rules: &'a ExclusionRules) -> Self {
        self.rules = Some(rules);
        self
    }

    pub fn entries(&self) -> Entries<'a> {
        Entries {
            it: WalkDir::new(self.root)
                .min_depth(1)
                .follow_links(false)
                .sort_by_file_name()
                .into_iter(),
            root: self.root,
            rules: self.rules,
        }
    }
}

/// Iterator returned by [`Walker::entries`].
pub struct Entries<'a> {
    it: walkdir::IntoIter,
    root: &'a Path,
    rules: Option<&'a ExclusionRules>,
}

impl Entries<'_> {
    fn prunes(&self, entry: &walkdir::DirEntry) -> bool {
        let Some(rules) = self.rules else {
            return false;
        };
        // Only real directories are descended into.
        if !entry.file_type().is_dir() {
            return false;
        }
        let name = entry.file_name().to_string_lossy();
        let decision = rules.decide(&name, EntryKind::Directory);
        if !decision.is_included() {
            log::debug!("Not descending into {:?}: {decision:?}", entry.path());
        }
        !decision.is_included()
    }
}

impl Iterator for Entries<'_> {
    type Item = walkdir::Result<Entry>;

    fn next(&mut self) -> Option<Self::Item> {
        let dir_entry = match self.it.next()? {
            Ok(dir_entry) => dir_entry,
            Err(e) => return Some(Err(e)),
        };
        if self.prunes(&dir_entry) {
            self.it.skip_current_dir();
        }
        Some(Ok(Entry::from_dir_entry(self.root, &dir_entry)))
    }
}

/// Counts every entry below `root` without applying any rule.
/// Unreadable entries are counted as well.
pub fn count_entries(root: &Path) -> usize {
    Walker::new(root).entries().count()
}

/// Symbolic links are classified by what they point to; dangling links
/// count as files so that reading them reports the problem.
fn classify(entry: &walkdir::DirEntry) -> EntryKind {
    let is_dir = if entry.path_is_symlink() {
        fs::metadata(entry.path()).is_ok_and(|m| m.is_dir())
    } else {
        entry.file_type().is_dir()
    };
    if is_dir {
        EntryKind::Directory
    } else {
        EntryKind::File
    }
}

fn archive_name(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn names(walker: &Walker) -> Vec<String> {
        walker
            .entries()
            .map(|e| e.unwrap().archive_name)
            .collect()
    }

    #[test]
    fn test_walk_is_sorted_and_depth_first() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("b.txt"), "b").unwrap();
        fs::write(dir.path().join("a.txt"), "a").unwrap();
        fs::create_dir(dir.path().join("c")).unwrap();
        fs::write(dir.path().join("c").join("inner.txt"), "i").unwrap();
        fs::write(dir.path().join("d.txt"), "d").unwrap();

        let walker = Walker::new(dir.path());
        assert_eq!(
            names(&walker),
            vec!["a.txt", "b.txt", "c", "c/inner.txt", "d.txt"]
        );
        // A second walk starts over.
        assert_eq!(names(&walker).len(), 5);
    }

    #[test]
    fn test_entry_kinds_and_names() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("docs").join("api")).unwrap();
        fs::write(dir.path().join("docs").join("api").join("index.md"), "").unwrap();

        let entries: Vec<Entry> = Walker::new(dir.path())
            .entries()
            .collect::<walkdir::Result<_>>()
            .unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].kind, EntryKind::Directory);
        assert_eq!(entries[0].archive_name, "docs");
        assert_eq!(entries[2].kind, EntryKind::File);
        assert_eq!(entries[2].archive_name, "docs/api/index.md");
        assert_eq!(entries[2].name(), "index.md");
    }

    #[test]
    fn test_pruned_walk_skips_excluded_directories() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();
        fs::write(dir.path().join(".git").join("config"), "").unwrap();
        fs::create_dir(dir.path().join("src")).unwrap();
        fs::write(dir.path().join("src").join("main.rs"), "").unwrap();
        fs::write(dir.path().join(".hidden"), "").unwrap();

        let rules = ExclusionRules::new("out.zip", false);
        let walker = Walker::new(dir.path()).pruned(&rules);
        // Excluded entries are still produced for the caller to filter.
        assert_eq!(names(&walker), vec![".git", ".hidden", "src", "src/main.rs"]);

        let all = Walker::new(dir.path());
        assert_eq!(names(&all).len(), 5);
        assert_eq!(count_entries(dir.path()), 5);
    }

    #[test]
    fn test_pruned_walk_keeps_included_directories() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join(".cache")).unwrap();
        fs::write(dir.path().join(".cache").join("entry"), "").unwrap();
        fs::create_dir(dir.path().join("logs")).unwrap();
        fs::write(dir.path().join("logs").join("today.log"), "").unwrap();

        let rules = ExclusionRules::new("out.zip", true);
        let walker = Walker::new(dir.path()).pruned(&rules);
        assert_eq!(
            names(&walker),
            vec![".cache", ".cache/entry", "logs", "logs/today.log"]
        );
    }

    #[test]
    fn test_empty_directory() {
        let dir = tempdir().unwrap();
        assert_eq!(count_entries(dir.path()), 0);
    }
}
