use crate::error::LoadError;
use crate::loader::load_dataset;
use crate::table::Dataset;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

/// Holds the current dataset snapshot for the lifetime of the process.
///
/// Readers clone the `Arc` and work on that snapshot; `reload` parses a whole
/// new table before swapping it in, so a query never sees a half-loaded file.
#[derive(Debug)]
pub struct DatasetStore {
    source: PathBuf,
    current: RwLock<Arc<Dataset>>,
}

impl DatasetStore {
    /// Loads `path` and keeps it as the initial snapshot.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, LoadError> {
        let source = path.into();
        let dataset = load_dataset(&source)?;
        Ok(Self::with_dataset(source, dataset))
    }

    /// Wraps an already-built dataset. `source` is only used by `reload`.
    pub fn with_dataset(source: impl Into<PathBuf>, dataset: Dataset) -> Self {
        Self {
            source: source.into(),
            current: RwLock::new(Arc::new(dataset)),
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    /// The snapshot every query should work from.
    pub fn snapshot(&self) -> Arc<Dataset> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Re-reads the source file and publishes it as the new snapshot.
    ///
    /// On failure the previous snapshot stays in place.
    pub fn reload(&self) -> Result<Arc<Dataset>, LoadError> {
        let fresh = Arc::new(load_dataset(&self.source)?);
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *guard = fresh.clone();
        drop(guard);

        tracing::info!(path = %self.source.display(), rows = fresh.len(), "Dataset reloaded.");
        Ok(fresh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const ROW: &str = "1672531200000,1,2,0.5,1.5,10,1672531259999,15,3,5,7.5,0";

    #[test]
    fn reload_swaps_the_snapshot_but_not_old_handles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("klines.csv");
        fs::write(&path, format!("{ROW}\n")).unwrap();

        let store = DatasetStore::open(&path).unwrap();
        let before = store.snapshot();
        assert_eq!(before.len(), 1);

        fs::write(&path, format!("{ROW}\n{ROW}\n{ROW}\n")).unwrap();
        let after = store.reload().unwrap();

        assert_eq!(after.len(), 3);
        assert_eq!(store.snapshot().len(), 3);
        // A snapshot taken before the reload is untouched.
        assert_eq!(before.len(), 1);
    }

    #[test]
    fn failed_reload_keeps_the_previous_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("klines.csv");
        fs::write(&path, format!("{ROW}\n")).unwrap();

        let store = DatasetStore::open(&path).unwrap();
        fs::write(&path, "1,2,3\n").unwrap();

        assert!(matches!(store.reload(), Err(LoadError::ColumnCount { .. })));
        assert_eq!(store.snapshot().len(), 1);
    }
}
