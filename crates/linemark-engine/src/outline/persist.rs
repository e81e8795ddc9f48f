use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("Failed to write fold state to {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to remove fold state at {path}: {source}")]
    Remove {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Page-scoped persistence of folded heading lines.
///
/// Each page's fold set lives under the key `"<prefix><page_id>"` as a JSON
/// array of **1-indexed** line numbers. Line numbers, not byte offsets:
/// offsets are invalidated by edits, so the host re-resolves each stored
/// line through `FoldCache::section_starting_at` when the page loads and
/// re-applies whatever still names a foldable heading.
///
/// Writes happen on every fold/unfold; an empty set removes the key. A
/// stored value that fails to parse is treated as "no folds to restore" and
/// the corrupt entry is deleted so it cannot fail repeatedly.
#[derive(Debug, Clone)]
pub struct FoldStore {
    root: PathBuf,
    prefix: String,
}

impl FoldStore {
    /// Default key prefix for fold-state entries.
    pub const DEFAULT_PREFIX: &'static str = "folds-";

    pub fn new(root: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            prefix: prefix.into(),
        }
    }

    /// Persist the folded line set for a page. Empty set removes the key.
    pub fn save(&self, page_id: &str, folded_lines: &[usize]) -> Result<(), PersistError> {
        let path = self.key_path(page_id);

        if folded_lines.is_empty() {
            return remove_if_present(&path);
        }

        fs::create_dir_all(&self.root).map_err(|source| PersistError::Write {
            path: path.clone(),
            source,
        })?;
        let payload = serde_json::to_string(folded_lines).map_err(|source| PersistError::Write {
            path: path.clone(),
            source: source.into(),
        })?;
        fs::write(&path, payload).map_err(|source| PersistError::Write { path, source })
    }

    /// Load the folded line set for a page.
    ///
    /// Missing keys and corrupt values both come back empty; corrupt values
    /// are additionally deleted.
    pub fn load(&self, page_id: &str) -> Vec<usize> {
        let path = self.key_path(page_id);

        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "unreadable fold state");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<usize>>(&raw) {
            Ok(lines) => lines,
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "discarding corrupt fold state"
                );
                let _ = remove_if_present(&path);
                Vec::new()
            }
        }
    }

    fn key_path(&self, page_id: &str) -> PathBuf {
        // Page ids may contain path separators; flatten them so every key
        // stays a single file under the store root.
        let safe: String = page_id
            .chars()
            .map(|c| if c == '/' || c == '\\' { '_' } else { c })
            .collect();
        self.root.join(format!("{}{}.json", self.prefix, safe))
    }
}

fn remove_if_present(path: &Path) -> Result<(), PersistError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(PersistError::Remove {
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn store(dir: &TempDir) -> FoldStore {
        FoldStore::new(dir.path(), FoldStore::DEFAULT_PREFIX)
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        store.save("notes/today", &[1, 5, 12]).unwrap();
        assert_eq!(store.load("notes/today"), vec![1, 5, 12]);
    }

    #[test]
    fn missing_key_loads_empty() {
        let dir = TempDir::new().unwrap();
        assert_eq!(store(&dir).load("never-saved"), Vec::<usize>::new());
    }

    #[test]
    fn empty_set_removes_the_key() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        store.save("page", &[3]).unwrap();
        store.save("page", &[]).unwrap();

        assert_eq!(store.load("page"), Vec::<usize>::new());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn removing_a_never_saved_key_is_fine() {
        let dir = TempDir::new().unwrap();
        store(&dir).save("page", &[]).unwrap();
    }

    #[test]
    fn corrupt_state_is_discarded_and_deleted() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        store.save("page", &[2]).unwrap();
        let path = dir.path().join("folds-page.json");
        fs::write(&path, "{not json]").unwrap();

        assert_eq!(store.load("page"), Vec::<usize>::new());
        assert!(!path.exists());
    }

    #[test]
    fn page_ids_with_separators_stay_in_the_root() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        store.save("a/b/c", &[7]).unwrap();
        assert!(dir.path().join("folds-a_b_c.json").exists());
        assert_eq!(store.load("a/b/c"), vec![7]);
    }

    #[test]
    fn pages_do_not_collide() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        store.save("one", &[1]).unwrap();
        store.save("two", &[2]).unwrap();
        assert_eq!(store.load("one"), vec![1]);
        assert_eq!(store.load("two"), vec![2]);
    }
}
