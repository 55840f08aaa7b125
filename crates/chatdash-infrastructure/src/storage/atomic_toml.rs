//! Crash-safe TOML files.
//!
//! Writes go to a sibling temp file that is fsynced and renamed over the
//! target, so readers only ever see a complete document. Read-modify-write
//! cycles hold an exclusive `fs2` lock on a sibling `.lock` file.

use std::fs::{self, File, OpenOptions};
use std::io::Write as IoWrite;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use chatdash_core::DashboardError;
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

/// Errors of [`AtomicTomlFile`] operations.
#[derive(Error, Debug)]
pub enum AtomicTomlError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parse error in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("TOML serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Failed to lock {path}: {message}")]
    Lock { path: PathBuf, message: String },

    #[error("Invalid path {0}")]
    InvalidPath(PathBuf),
}

impl From<AtomicTomlError> for DashboardError {
    fn from(e: AtomicTomlError) -> Self {
        match e {
            AtomicTomlError::Parse { path, source } => DashboardError::Serialization {
                format: "TOML".to_string(),
                message: format!("{}: {}", path.display(), source.message()),
            },
            AtomicTomlError::Serialize(e) => DashboardError::Serialization {
                format: "TOML".to_string(),
                message: e.to_string(),
            },
            other => DashboardError::io(other.to_string()),
        }
    }
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> AtomicTomlError + '_ {
    move |source| AtomicTomlError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// A TOML document on disk holding one `T`.
#[derive(Debug)]
pub struct AtomicTomlFile<T> {
    path: PathBuf,
    _phantom: PhantomData<fn() -> T>,
}

impl<T> AtomicTomlFile<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _phantom: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads and parses the file.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(T))`: the parsed document
    /// - `Ok(None)`: the file is missing or blank
    /// - `Err`: the file could not be read or parsed
    pub fn load(&self) -> Result<Option<T>, AtomicTomlError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path).map_err(io_error(&self.path))?;
        if content.trim().is_empty() {
            return Ok(None);
        }

        toml::from_str(&content)
            .map(Some)
            .map_err(|source| AtomicTomlError::Parse {
                path: self.path.clone(),
                source,
            })
    }

    /// Replaces the file with `data`.
    pub fn save(&self, data: &T) -> Result<(), AtomicTomlError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(io_error(parent))?;
            }
        }

        let document = toml::to_string_pretty(data)?;

        let tmp_path = self.temp_path()?;
        let mut tmp_file = File::create(&tmp_path).map_err(io_error(&tmp_path))?;
        tmp_file
            .write_all(document.as_bytes())
            .map_err(io_error(&tmp_path))?;
        tmp_file.sync_all().map_err(io_error(&tmp_path))?;
        drop(tmp_file);

        fs::rename(&tmp_path, &self.path).map_err(io_error(&self.path))?;
        Ok(())
    }

    /// Locked read-modify-write.
    ///
    /// `f` sees the current document (or `default_value` when there is none)
    /// and the result is written back only if `f` returns `Ok`.
    ///
    /// # Returns
    ///
    /// Whatever `f` returned.
    pub fn update<R, F>(&self, default_value: T, f: F) -> Result<R, AtomicTomlError>
    where
        F: FnOnce(&mut T) -> Result<R, AtomicTomlError>,
    {
        let _lock = FileLock::acquire(&self.path)?;

        let mut data = self.load()?.unwrap_or(default_value);
        let result = f(&mut data)?;
        self.save(&data)?;

        Ok(result)
    }

    fn temp_path(&self) -> Result<PathBuf, AtomicTomlError> {
        let file_name = self
            .path
            .file_name()
            .ok_or_else(|| AtomicTomlError::InvalidPath(self.path.clone()))?;
        let tmp_name = format!(".{}.tmp", file_name.to_string_lossy());
        Ok(self.path.with_file_name(tmp_name))
    }
}

/// Exclusive lock held for the duration of an update.
struct FileLock {
    _file: File,
    lock_path: PathBuf,
}

impl FileLock {
    fn acquire(path: &Path) -> Result<Self, AtomicTomlError> {
        let lock_path = path.with_extension("lock");
        if let Some(parent) = lock_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(io_error(parent))?;
            }
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(io_error(&lock_path))?;

        use fs2::FileExt;
        file.lock_exclusive().map_err(|e| AtomicTomlError::Lock {
            path: lock_path.clone(),
            message: e.to_string(),
        })?;

        Ok(Self {
            _file: file,
            lock_path,
        })
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        // The OS releases the lock with the handle; the file itself is best effort.
        let _ = fs::remove_file(&self.lock_path);
    }
}
