pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{model_loader::JsonModelLoader, storage::LocalStorage};
pub use config::PredictorConfig;
pub use crate::core::{
    features::{derive, DerivationSettings, FeatureDeriver, SeasonEncoding},
    gateway::PredictorGateway,
    insights::{insights_for, DerivedSummary, Insight},
    registry::ModelRegistry,
    schema::{FeatureRecord, FEATURE_SCHEMA},
};
pub use domain::model::{
    CalendarDate, CoolingType, HeatingType, ManualOverride, PredictionResult, RawInput, Season,
};
pub use utils::error::{PredictorError, Result};
