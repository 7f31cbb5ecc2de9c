use crate::domain::ports::{ModelEntry, ModelLoader, Regressor};
use crate::utils::error::{PredictorError, Result};
use std::sync::Arc;

/// Named models, loaded once at start-up and read-only afterwards.
pub struct ModelRegistry {
    models: Vec<(String, Arc<dyn Regressor>)>,
}

impl ModelRegistry {
    pub fn builder() -> ModelRegistryBuilder {
        ModelRegistryBuilder::default()
    }

    /// Loads every entry through `loader`. The first failure aborts the load.
    pub fn load(entries: &[ModelEntry], loader: &dyn ModelLoader) -> Result<Self> {
        let mut builder = Self::builder();
        for entry in entries {
            let regressor = loader.load(entry)?;
            tracing::info!(
                "📦 Loaded model '{}' ({}, {} features) from {}",
                entry.name,
                regressor.kind(),
                regressor.feature_names().len(),
                entry.path
            );
            builder = builder.register(&entry.name, regressor)?;
        }
        builder.build()
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Regressor>> {
        self.models
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, model)| model)
    }

    pub fn lookup(&self, name: &str) -> Result<&Arc<dyn Regressor>> {
        self.get(name).ok_or_else(|| PredictorError::UnknownModel {
            name: name.to_string(),
            available: self.names().map(str::to_string).collect(),
        })
    }

    /// Model names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.models.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<dyn Regressor>)> + '_ {
        self.models.iter().map(|(n, m)| (n.as_str(), m))
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

impl std::fmt::Debug for ModelRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

#[derive(Default)]
pub struct ModelRegistryBuilder {
    models: Vec<(String, Arc<dyn Regressor>)>,
}

impl ModelRegistryBuilder {
    pub fn register(mut self, name: &str, model: Box<dyn Regressor>) -> Result<Self> {
        if name.trim().is_empty() {
            return Err(PredictorError::ConfigError {
                message: "model name cannot be empty".to_string(),
            });
        }
        if self.models.iter().any(|(n, _)| n == name) {
            return Err(PredictorError::ConfigError {
                message: format!("model '{}' is registered twice", name),
            });
        }
        self.models.push((name.to_string(), Arc::from(model)));
        Ok(self)
    }

    pub fn build(self) -> Result<ModelRegistry> {
        if self.models.is_empty() {
            return Err(PredictorError::MissingConfigError {
                field: "models".to_string(),
            });
        }
        Ok(ModelRegistry {
            models: self.models,
        })
    }
}
