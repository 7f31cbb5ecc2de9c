pub mod export;
pub mod features;
pub mod gateway;
pub mod insights;
pub mod registry;
pub mod regressors;
pub mod schema;

pub use crate::domain::model::{PredictionResult, RawInput};
pub use crate::domain::ports::{ModelEntry, ModelLoader, Regressor, Storage};
pub use crate::utils::error::Result;
