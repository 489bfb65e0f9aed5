//! JSON file store for export runs.
//!
//! Every operation reads the whole file and writes it back through a
//! temporary file and a rename, so a crash mid-write leaves the previous
//! contents intact. Writers in one process are serialized by a mutex; the
//! file is not locked against other processes.

use crate::error::{ExportflowError, Result};
use crate::export::model::{ExportRun, NewExportRun};
use crate::export::store::{ExportRunStore, RunTable};
use chrono::Utc;
use parking_lot::Mutex;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File-backed [`ExportRunStore`]
#[derive(Debug)]
pub struct JsonFileExportRunStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileExportRunStore {
    /// Open the store at `path`, creating parent directories as needed.
    /// The file itself is created on first write.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| persistence_error(parent, e))?;
        }

        let store = Self {
            path,
            lock: Mutex::new(()),
        };
        // Fail early on a corrupt file rather than on the first activity
        store.load()?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<RunTable> {
        match fs::read(&self.path) {
            Ok(bytes) if bytes.is_empty() => Ok(RunTable::default()),
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                ExportflowError::TransientPersistence(format!(
                    "{} is not a valid run store: {e}",
                    self.path.display()
                ))
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(RunTable::default()),
            Err(e) => Err(persistence_error(&self.path, e)),
        }
    }

    /// Sibling file a save is written to before it replaces the store
    fn temp_path(&self) -> PathBuf {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        PathBuf::from(tmp)
    }

    fn save(&self, table: &RunTable) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(table)?;
        let tmp = self.temp_path();

        fs::write(&tmp, bytes).map_err(|e| persistence_error(&tmp, e))?;
        fs::rename(&tmp, &self.path).map_err(|e| persistence_error(&self.path, e))?;
        debug!(path = %self.path.display(), runs = table.runs().len(), "Saved run store");
        Ok(())
    }
}

fn persistence_error(path: &Path, err: std::io::Error) -> ExportflowError {
    ExportflowError::TransientPersistence(format!("{}: {err}", path.display()))
}

impl ExportRunStore for JsonFileExportRunStore {
    fn create(&self, run: NewExportRun) -> Result<ExportRun> {
        let _guard = self.lock.lock();
        let mut table = self.load()?;
        let before = table.runs().len();

        let created = table.create(run, Utc::now());
        if table.runs().len() != before {
            self.save(&table)?;
        }
        Ok(created)
    }

    fn update_status(&self, run_id: &str, status: &str) -> Result<()> {
        let _guard = self.lock.lock();
        let mut table = self.load()?;

        if table.update_status(run_id, status, Utc::now())? {
            self.save(&table)?;
        }
        Ok(())
    }

    fn get(&self, run_id: &str) -> Result<Option<ExportRun>> {
        let _guard = self.lock.lock();
        Ok(self.load()?.get(run_id))
    }

    fn list(&self) -> Result<Vec<ExportRun>> {
        let _guard = self.lock.lock();
        Ok(self.load()?.runs().to_vec())
    }
}
