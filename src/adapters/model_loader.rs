use crate::core::regressors::ModelArtifact;
use crate::domain::ports::{ModelEntry, ModelLoader, Regressor};
use crate::utils::error::{PredictorError, Result};
use std::path::{Path, PathBuf};

/// Loads JSON model artifacts from disk. Relative paths resolve against
/// `base_dir`, normally the directory holding the configuration file.
#[derive(Debug, Clone)]
pub struct JsonModelLoader {
    base_dir: PathBuf,
}

impl JsonModelLoader {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn resolve(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }
}

impl ModelLoader for JsonModelLoader {
    fn load(&self, entry: &ModelEntry) -> Result<Box<dyn Regressor>> {
        let path = self.resolve(&entry.path);
        tracing::debug!("Reading model '{}' from {}", entry.name, path.display());

        let bytes = std::fs::read(&path).map_err(|e| {
            PredictorError::model_load(&entry.name, format!("{}: {}", path.display(), e))
        })?;

        ModelArtifact::from_json(&entry.name, &bytes)?.into_regressor(&entry.name)
    }
}
