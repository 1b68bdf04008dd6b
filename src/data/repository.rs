use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;

use super::loader::{LoaderOptions, load_file};
use super::model::Dataset;

// ---------------------------------------------------------------------------
// DatasetRepository – owns the base snapshot
// ---------------------------------------------------------------------------

/// Holds the base dataset loaded once per process. Filtering never touches
/// it; only [`DatasetRepository::reload`] replaces it.
#[derive(Debug, Clone)]
pub struct DatasetRepository {
    source: PathBuf,
    options: LoaderOptions,
    dataset: Arc<Dataset>,
}

impl DatasetRepository {
    /// Read `path` and cache the result.
    pub fn load(path: impl Into<PathBuf>, options: LoaderOptions) -> Result<Self> {
        let source = path.into();
        let dataset = Arc::new(load_file(&source, &options)?);
        Ok(Self {
            source,
            options,
            dataset,
        })
    }

    /// Wrap an already constructed dataset (no backing file to reload from
    /// until one is given).
    pub fn from_dataset(dataset: Dataset) -> Self {
        Self {
            source: PathBuf::new(),
            options: LoaderOptions::default(),
            dataset: Arc::new(dataset),
        }
    }

    /// Re-read the source file. On failure the previous snapshot is kept.
    pub fn reload(&mut self) -> Result<Arc<Dataset>> {
        anyhow::ensure!(
            !self.source.as_os_str().is_empty(),
            "repository has no source file to reload from"
        );
        let fresh = load_file(&self.source, &self.options)?;
        log::info!("Reloaded {} responses", fresh.len());
        self.dataset = Arc::new(fresh);
        Ok(Arc::clone(&self.dataset))
    }

    /// The cached base dataset.
    pub fn dataset(&self) -> Arc<Dataset> {
        Arc::clone(&self.dataset)
    }

    pub fn source(&self) -> &Path {
        &self.source
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::data::fixtures::SAMPLE;

    #[test]
    fn load_then_reload_picks_up_changes() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        file.flush().unwrap();

        let mut repo = DatasetRepository::load(file.path(), LoaderOptions::default()).unwrap();
        let first = repo.dataset();
        assert_eq!(first.len(), 5);

        let extra = "18-24;Higher;1;IT;salty;0-2;Dogs;By the sea;0;0;0;0;0;0;0\n";
        file.write_all(extra.as_bytes()).unwrap();
        file.flush().unwrap();

        let second = repo.reload().unwrap();
        assert_eq!(second.len(), 6);
        // Earlier snapshots are untouched.
        assert_eq!(first.len(), 5);
    }

    #[test]
    fn failed_reload_keeps_snapshot() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        file.flush().unwrap();
        let mut repo = DatasetRepository::load(file.path(), LoaderOptions::default()).unwrap();

        file.write_all(b"oops\n").unwrap();
        file.flush().unwrap();
        assert!(repo.reload().is_err());
        assert_eq!(repo.dataset().len(), 5);
    }

    #[test]
    fn missing_file_is_fatal() {
        let err = DatasetRepository::load("/definitely/not/here.csv", LoaderOptions::default())
            .unwrap_err();
        assert!(format!("{err:#}").contains("opening survey file"));
    }

    #[test]
    fn in_memory_repository_cannot_reload() {
        let ds = crate::data::fixtures::dataset_from_csv(SAMPLE);
        let mut repo = DatasetRepository::from_dataset(ds);
        assert!(repo.reload().is_err());
    }
}
