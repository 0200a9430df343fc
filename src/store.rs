//! Where finished batches go, and what time it is when they get there.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};
use tempfile::NamedTempFile;

/// Write capability for a finished batch.
pub trait RecordStore: Send + Sync {
    /// Write `contents` under `file_name` in one piece and return the final path.
    fn write(&self, file_name: &str, contents: &[u8]) -> io::Result<PathBuf>;
}

/// Wall-clock source used to name batch files.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

impl<F> Clock for F
where
    F: Fn() -> NaiveDateTime + Send + Sync,
{
    fn now(&self) -> NaiveDateTime {
        self()
    }
}

/// Local time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Directory-backed store.
///
/// Contents go to a temporary file in the target directory, are synced, then
/// renamed into place. An existing file is never replaced; the temporary file
/// is removed on every failure path.
#[derive(Debug, Clone)]
pub struct FsStore {
    dir: PathBuf,
}

impl FsStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl RecordStore for FsStore {
    fn write(&self, file_name: &str, contents: &[u8]) -> io::Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let target = self.dir.join(file_name);

        let mut file = NamedTempFile::new_in(&self.dir)?;
        file.write_all(contents)?;
        file.flush()?;
        file.as_file().sync_all()?;
        file.persist_noclobber(&target).map_err(|e| e.error)?;

        Ok(target)
    }
}
