use std::{
    fs,
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};

use crate::{ArticleRecord, PersistError};

pub const DEFAULT_HISTORY_FILE: &str = "./data/history.json";

/// How long a captured record is remembered, counted from `seen_at`
pub const RETENTION_SECS: i64 = 48 * 60 * 60;

pub trait FileStorage {
    fn load(&self) -> Result<Vec<ArticleRecord>, PersistError>;
    fn save(&self, records: &[ArticleRecord]) -> Result<(), PersistError>;
}

/// History of already notified records, kept as one JSON array in a file
pub struct Storage {
    path: PathBuf,
}

impl Storage {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every stored record. A missing or blank file is an empty history.
    fn read(&self) -> Result<Vec<ArticleRecord>, PersistError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(PersistError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&contents).map_err(|source| PersistError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    /// Sibling file the new contents are written to before being renamed
    /// over the real one
    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn io_error(&self, source: std::io::Error) -> PersistError {
        PersistError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl FileStorage for Storage {
    /// Load the history, dropping records older than the retention window
    fn load(&self) -> Result<Vec<ArticleRecord>, PersistError> {
        let records = self.read()?;
        Ok(vacuum(records, chrono::Utc::now().timestamp()))
    }

    /// Replace the stored history with `records`
    fn save(&self, records: &[ArticleRecord]) -> Result<(), PersistError> {
        let data = serde_json::to_vec(records)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
            }
        }

        let temp_path = self.temp_path();
        let mut file = fs::File::create(&temp_path).map_err(|e| self.io_error(e))?;
        file.write_all(&data).map_err(|e| self.io_error(e))?;
        file.sync_all().map_err(|e| self.io_error(e))?;
        fs::rename(&temp_path, &self.path).map_err(|e| self.io_error(e))?;
        Ok(())
    }
}

/// Keep the records captured within the retention window before `now`.
#[must_use]
pub fn vacuum(records: Vec<ArticleRecord>, now: i64) -> Vec<ArticleRecord> {
    records
        .into_iter()
        .filter(|r| now - r.seen_at <= RETENTION_SECS)
        .collect()
}
