//! Flat-file storage for the three change sets.
//!
//! Each set is a newline-separated file under the engine's base directory.
//! Writes rewrite the whole file; there is no locking, so callers must
//! serialize access to a base directory.

use crate::change::{self, ChangeEntry};
use crate::error::StorageError;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Add,
    Remove,
    Unstaged,
}

impl ListKind {
    pub const ALL: [ListKind; 3] = [ListKind::Add, ListKind::Remove, ListKind::Unstaged];

    pub fn file_name(self) -> &'static str {
        match self {
            Self::Add => "packages.add",
            Self::Remove => "packages.remove",
            Self::Unstaged => "packages.unstaged",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChangeSetStore {
    base_dir: PathBuf,
}

impl ChangeSetStore {
    /// Open a store, creating the base directory and any missing list file.
    /// Existing files are left untouched.
    pub fn open(base_dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let base_dir = base_dir.into();
        fs::create_dir_all(&base_dir).map_err(|err| StorageError::from_io(&base_dir, err))?;

        let store = Self { base_dir };
        for kind in ListKind::ALL {
            let path = store.path(kind);
            if !path.exists() {
                tracing::debug!(path = %path.display(), "creating empty package list");
                fs::write(&path, "").map_err(|err| StorageError::from_io(&path, err))?;
            }
        }
        Ok(store)
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn path(&self, kind: ListKind) -> PathBuf {
        self.base_dir.join(kind.file_name())
    }

    /// Read the raw lines of a list. Blank lines are dropped, so a file with
    /// only whitespace is an empty list.
    pub fn read(&self, kind: ListKind) -> Result<Vec<String>, StorageError> {
        let path = self.path(kind);
        let content = fs::read_to_string(&path).map_err(|err| StorageError::from_io(&path, err))?;
        Ok(content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }

    /// Like [`read`](Self::read), but a missing file is an empty list.
    pub fn load(&self, kind: ListKind) -> Result<Vec<String>, StorageError> {
        match self.read(kind) {
            Err(err) if err.is_not_found() => Ok(Vec::new()),
            other => other,
        }
    }

    pub fn store(&self, kind: ListKind, lines: &[String]) -> Result<(), StorageError> {
        let path = self.path(kind);
        let mut content = String::new();
        let mut count = 0;
        for line in lines.iter().map(|l| l.trim()).filter(|l| !l.is_empty()) {
            content.push_str(line);
            content.push('\n');
            count += 1;
        }
        fs::write(&path, content).map_err(|err| StorageError::from_io(&path, err))?;
        tracing::debug!(file = kind.file_name(), count, "packages written");
        Ok(())
    }

    pub fn load_unstaged(&self) -> Result<Vec<ChangeEntry>, StorageError> {
        let lines = self.load(ListKind::Unstaged)?;
        let mut entries = Vec::with_capacity(lines.len());
        for line in lines {
            match line.parse::<ChangeEntry>() {
                Ok(entry) => entries.push(entry),
                Err(err) => {
                    tracing::warn!(%line, error = %err, "skipping malformed unstaged entry")
                }
            }
        }
        Ok(entries)
    }

    /// Fold and persist the unstaged log. Returns what was written.
    pub fn store_unstaged(
        &self,
        entries: impl IntoIterator<Item = ChangeEntry>,
    ) -> Result<Vec<ChangeEntry>, StorageError> {
        let folded = change::fold(entries);
        let lines: Vec<String> = folded.iter().map(ChangeEntry::to_string).collect();
        self.store(ListKind::Unstaged, &lines)?;
        Ok(folded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn open_creates_all_lists() {
        let dir = tempdir().unwrap();
        let base = dir.path().join("nested").join("pkgs");
        let store = ChangeSetStore::open(&base).unwrap();
        for kind in ListKind::ALL {
            assert!(store.path(kind).exists());
            assert!(store.load(kind).unwrap().is_empty());
        }
    }

    #[test]
    fn open_keeps_existing_content() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("packages.add"), "vim\ngit\n").unwrap();
        let store = ChangeSetStore::open(dir.path()).unwrap();
        let again = ChangeSetStore::open(dir.path()).unwrap();
        assert_eq!(store.load(ListKind::Add).unwrap(), vec!["vim", "git"]);
        assert_eq!(again.load(ListKind::Add).unwrap(), vec!["vim", "git"]);
    }

    #[test]
    fn whitespace_only_file_is_empty() {
        let dir = tempdir().unwrap();
        let store = ChangeSetStore::open(dir.path()).unwrap();
        fs::write(store.path(ListKind::Remove), "\n   \n\t\n").unwrap();
        assert!(store.load(ListKind::Remove).unwrap().is_empty());
    }

    #[test]
    fn missing_file_loads_empty_but_reads_not_found() {
        let dir = tempdir().unwrap();
        let store = ChangeSetStore::open(dir.path()).unwrap();
        fs::remove_file(store.path(ListKind::Add)).unwrap();
        assert!(store.load(ListKind::Add).unwrap().is_empty());
        assert!(store.read(ListKind::Add).unwrap_err().is_not_found());
    }

    #[test]
    fn store_skips_blank_entries() {
        let dir = tempdir().unwrap();
        let store = ChangeSetStore::open(dir.path()).unwrap();
        let lines = vec!["vim".to_string(), String::new(), "git".to_string()];
        store.store(ListKind::Add, &lines).unwrap();
        let raw = fs::read_to_string(store.path(ListKind::Add)).unwrap();
        assert_eq!(raw, "vim\ngit\n");
    }

    #[test]
    fn unstaged_log_is_folded_on_write() {
        let dir = tempdir().unwrap();
        let store = ChangeSetStore::open(dir.path()).unwrap();
        let written = store
            .store_unstaged(vec![
                ChangeEntry::add("vim"),
                ChangeEntry::remove("nano"),
                ChangeEntry::remove("vim"),
            ])
            .unwrap();
        assert_eq!(written, vec![ChangeEntry::remove("nano")]);

        let raw = fs::read_to_string(store.path(ListKind::Unstaged)).unwrap();
        assert_eq!(raw, "- nano\n");
        assert_eq!(store.load_unstaged().unwrap(), written);
    }

    #[test]
    fn malformed_unstaged_lines_are_skipped() {
        let dir = tempdir().unwrap();
        let store = ChangeSetStore::open(dir.path()).unwrap();
        fs::write(store.path(ListKind::Unstaged), "+ vim\ngarbage\n- nano\n").unwrap();
        assert_eq!(
            store.load_unstaged().unwrap(),
            vec![ChangeEntry::add("vim"), ChangeEntry::remove("nano")]
        );
    }
}
