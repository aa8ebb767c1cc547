//! JSON persistence for the entity database with file locking.
//!
//! Readers and writers coordinate through a sidecar `<file>.lock`:
//! `load` holds a shared lock, `update` holds an exclusive one across
//! load-modify-save so concurrent CLI invocations never lose a write.

use super::Database;
use crate::{Error, Result};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// File-backed handle to a [`Database`]
#[derive(Clone, Debug)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".lock");
        self.path.with_file_name(name)
    }

    fn open_lock(&self) -> Result<File> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(self.lock_path())?;
        Ok(file)
    }

    /// Load the database under a shared lock
    ///
    /// A missing file is an empty database. A file that does not parse is
    /// an error: entity data cannot be rebuilt from anywhere else.
    pub fn load(&self) -> Result<Database> {
        if !self.path.exists() {
            tracing::debug!("No database at {:?}, starting empty", self.path);
            return Ok(Database::default());
        }

        let lock = self.open_lock()?;
        lock.lock_shared()?;
        let result = self.read_unlocked();
        lock.unlock()?;
        result
    }

    /// Load, modify and save atomically under an exclusive lock
    ///
    /// When `f` fails nothing is written.
    pub fn update<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Database) -> Result<T>,
    {
        let lock = self.open_lock()?;
        lock.lock_exclusive()?;

        let result = self.read_unlocked().and_then(|mut db| {
            let value = f(&mut db)?;
            self.write_unlocked(&db)?;
            Ok(value)
        });

        lock.unlock()?;
        result
    }

    fn read_unlocked(&self) -> Result<Database> {
        if !self.path.exists() {
            return Ok(Database::default());
        }

        let file = File::open(&self.path)?;
        let mut contents = String::new();
        std::io::BufReader::new(&file).read_to_string(&mut contents)?;

        let db: Database = serde_json::from_str(&contents).map_err(|e| {
            Error::InvalidState(format!("Database file {:?} is corrupt: {}", self.path, e))
        })?;
        tracing::debug!(
            "Loaded database from {:?} ({} workouts)",
            self.path,
            db.workouts.len()
        );
        Ok(db)
    }

    /// Temp file in the same directory, fsync, rename over the original
    fn write_unlocked(&self, db: &Database) -> Result<()> {
        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(parent)?;

        let temp = NamedTempFile::new_in(parent)?;
        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            serde_json::to_writer(&mut writer, db)?;
            writer.flush()?;
        }
        temp.as_file().sync_all()?;
        temp.persist(&self.path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved database to {:?}", self.path);
        Ok(())
    }
}
