//! Flat-file task store.
//!
//! The whole task list is read in one go and rewritten in one go on every
//! mutation. There is no locking; one process owns the data directory at a
//! time.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::codec;
use crate::error::Result;
use crate::task::TaskRecord;

/// Handle on the persisted task file
#[derive(Debug, Clone)]
pub struct TaskStore {
    path: PathBuf,
}

impl TaskStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create an empty task file if none exists. Returns true when created.
    pub fn ensure_exists(&self) -> Result<bool> {
        if self.path.exists() {
            return Ok(false);
        }
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, "")?;
        tracing::debug!(path = %self.path.display(), "created empty task file");
        Ok(true)
    }

    /// Read every record in file order. A missing file is an empty list.
    pub fn load_all(&self) -> Result<Vec<TaskRecord>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "task file missing; no tasks yet");
                return Ok(Vec::new());
            }
            Err(err) => return Err(err.into()),
        };

        let mut records = Vec::new();
        for (index, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let record = codec::parse(line).map_err(|err| err.at_line(&self.path, index + 1))?;
            records.push(record);
        }

        tracing::debug!(path = %self.path.display(), count = records.len(), "loaded tasks");
        Ok(records)
    }

    /// Overwrite the file with `records`, one line each, in the given order.
    pub fn save_all(&self, records: &[TaskRecord]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut buffer = String::new();
        for record in records {
            buffer.push_str(&codec::serialize(record));
            buffer.push('\n');
        }
        fs::write(&self.path, buffer)?;

        tracing::debug!(path = %self.path.display(), count = records.len(), "saved tasks");
        Ok(())
    }
}
