use crate::app_dirs::AppDirs;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ScoreStoreError {
    #[error("failed to write score file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode score: {0}")]
    Json(#[from] serde_json::Error),
}

/// The persisted best endless run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoreRecord {
    pub best_completed_turns: u32,
    #[serde(default)]
    pub updated_at: Option<DateTime<Local>>,
}

impl ScoreRecord {
    /// Parse a score file. Accepts the full record or a bare integer; anything
    /// else counts as no record.
    pub fn parse(bytes: &[u8]) -> Option<Self> {
        if let Ok(record) = serde_json::from_slice::<ScoreRecord>(bytes) {
            return Some(record);
        }
        serde_json::from_slice::<u32>(bytes)
            .ok()
            .map(|best_completed_turns| ScoreRecord {
                best_completed_turns,
                updated_at: None,
            })
    }
}

pub trait ScoreStore {
    /// Best completed-turn count, 0 when nothing was stored
    fn load(&self) -> u32;
    fn save(&self, best: u32) -> Result<(), ScoreStoreError>;

    /// When the stored best was set, if the store keeps track of it
    fn recorded_at(&self) -> Option<DateTime<Local>> {
        None
    }
}

#[derive(Debug, Clone)]
pub struct FileScoreStore {
    path: PathBuf,
}

impl FileScoreStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            path: AppDirs::score_path().unwrap_or_else(|| PathBuf::from("justime_score.json")),
        }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Full record including when it was set
    pub fn load_record(&self) -> Option<ScoreRecord> {
        let bytes = fs::read(&self.path).ok()?;
        ScoreRecord::parse(&bytes)
    }
}

impl Default for FileScoreStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoreStore for FileScoreStore {
    fn load(&self) -> u32 {
        self.load_record()
            .map(|r| r.best_completed_turns)
            .unwrap_or(0)
    }

    fn recorded_at(&self) -> Option<DateTime<Local>> {
        self.load_record().and_then(|r| r.updated_at)
    }

    fn save(&self, best: u32) -> Result<(), ScoreStoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let record = ScoreRecord {
            best_completed_turns: best,
            updated_at: Some(Local::now()),
        };
        let data = serde_json::to_vec_pretty(&record)?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}

/// Score store living in memory. Remembers every save so callers can check
/// how often the best was raised.
#[derive(Debug, Default)]
pub struct MemoryScoreStore {
    best: Cell<u32>,
    saves: RefCell<Vec<u32>>,
    fail_saves: bool,
}

impl MemoryScoreStore {
    pub fn new(best: u32) -> Self {
        Self {
            best: Cell::new(best),
            ..Self::default()
        }
    }

    /// Store whose saves always fail, without changing the held value
    pub fn failing(best: u32) -> Self {
        Self {
            best: Cell::new(best),
            fail_saves: true,
            ..Self::default()
        }
    }

    pub fn saves(&self) -> Vec<u32> {
        self.saves.borrow().clone()
    }
}

impl ScoreStore for MemoryScoreStore {
    fn load(&self) -> u32 {
        self.best.get()
    }

    fn save(&self, best: u32) -> Result<(), ScoreStoreError> {
        self.saves.borrow_mut().push(best);
        if self.fail_saves {
            return Err(ScoreStoreError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only store",
            )));
        }
        self.best.set(best);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use tempfile::tempdir;

    #[test]
    fn missing_file_loads_as_zero() {
        let dir = tempdir().unwrap();
        let store = FileScoreStore::with_path(dir.path().join("score.json"));
        assert_eq!(store.load(), 0);
        assert!(store.load_record().is_none());
    }

    #[test]
    fn malformed_file_loads_as_zero() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("score.json");
        fs::write(&path, b"not a number").unwrap();
        let store = FileScoreStore::with_path(&path);
        assert_eq!(store.load(), 0);

        fs::write(&path, b"-3").unwrap();
        assert_eq!(store.load(), 0);
    }

    #[test]
    fn bare_integer_is_accepted() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("score.json");
        fs::write(&path, b"12").unwrap();
        let store = FileScoreStore::with_path(&path);
        assert_eq!(store.load(), 12);
        assert_eq!(store.load_record().unwrap().updated_at, None);
        assert_eq!(store.recorded_at(), None);
    }

    #[test]
    fn save_creates_directories_and_stamps_time() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("score.json");
        let store = FileScoreStore::with_path(&path);

        store.save(7).unwrap();

        assert_eq!(store.load(), 7);
        let record = store.load_record().unwrap();
        assert_eq!(record.best_completed_turns, 7);
        assert!(record.updated_at.is_some());
        assert_eq!(store.recorded_at(), record.updated_at);
    }

    #[test]
    fn save_into_a_file_path_reports_io_error() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, b"").unwrap();
        let store = FileScoreStore::with_path(blocker.join("score.json"));

        assert_matches!(store.save(3), Err(ScoreStoreError::Io(_)));
    }

    #[test]
    fn memory_store_records_saves() {
        let store = MemoryScoreStore::new(3);
        assert_eq!(store.load(), 3);
        store.save(5).unwrap();
        assert_eq!(store.load(), 5);
        assert_eq!(store.saves(), vec![5]);
        assert_eq!(store.recorded_at(), None);
    }

    #[test]
    fn failing_memory_store_keeps_value() {
        let store = MemoryScoreStore::failing(2);
        assert_matches!(store.save(9), Err(ScoreStoreError::Io(_)));
        assert_eq!(store.load(), 2);
        assert_eq!(store.saves(), vec![9]);
    }
}
