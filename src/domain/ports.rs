use crate::utils::error::Result;
use serde::{Deserialize, Serialize};

/// A trained model reduced to the one capability the gateway needs.
pub trait Regressor: Send + Sync {
    /// Feature names, in the order `predict_one` expects its values.
    fn feature_names(&self) -> &[String];

    fn predict_one(&self, features: &[f64]) -> Result<f64>;

    /// Short family name for logs ("linear", "random_forest").
    fn kind(&self) -> &'static str;
}

/// One `[[models]]` entry of the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelEntry {
    pub name: String,
    pub path: String,
}

pub trait ModelLoader {
    fn load(&self, entry: &ModelEntry) -> Result<Box<dyn Regressor>>;
}

pub trait Storage {
    fn write_file(&self, path: &str, data: &[u8]) -> Result<String>;
}
