use crate::core::registry::ModelRegistry;
use crate::core::schema::FeatureRecord;
use crate::domain::model::PredictionResult;
use crate::utils::error::{PredictorError, Result};
use std::sync::Arc;

/// Routes a feature record to one of the registered models.
#[derive(Debug, Clone)]
pub struct PredictorGateway {
    registry: Arc<ModelRegistry>,
}

impl PredictorGateway {
    pub fn new(registry: Arc<ModelRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    pub fn model_names(&self) -> Vec<String> {
        self.registry.names().map(str::to_string).collect()
    }

    /// Logs a warning for every model whose feature list differs from
    /// `schema`. Those models will reject records at prediction time.
    pub fn warn_on_schema_drift(&self, schema: &[&str]) {
        for (name, model) in self.registry.iter() {
            let expected = model.feature_names();
            if expected.len() != schema.len() || expected.iter().zip(schema).any(|(a, b)| a != b) {
                tracing::warn!(
                    "⚠️ Model '{}' expects {} features that do not match the derived schema",
                    name,
                    expected.len()
                );
            }
        }
    }

    pub fn predict(&self, model_name: &str, features: &FeatureRecord) -> Result<PredictionResult> {
        let model = self.registry.lookup(model_name)?;
        features.ensure_matches(model_name, model.feature_names())?;

        let value = model.predict_one(features.values())?;
        if !value.is_finite() {
            return Err(PredictorError::ModelError {
                model: model_name.to_string(),
                reason: format!("prediction is not finite ({})", value),
            });
        }

        tracing::debug!(model = model_name, kind = model.kind(), value, "prediction");
        Ok(PredictionResult {
            model: model_name.to_string(),
            value,
        })
    }

    /// Runs every registered model, in registration order.
    pub fn predict_all(&self, features: &FeatureRecord) -> Result<Vec<PredictionResult>> {
        self.registry
            .names()
            .map(|name| self.predict(name, features))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::features::derive;
    use crate::core::regressors::LinearModel;
    use crate::core::schema::FEATURE_SCHEMA;
    use crate::domain::model::RawInput;
    use crate::domain::ports::Regressor;

    fn schema_names() -> Vec<String> {
        FEATURE_SCHEMA.iter().map(|s| s.to_string()).collect()
    }

    /// intercept + 1.0 * num_occupants
    fn occupancy_model(intercept: f64) -> LinearModel {
        occupancy_model_over(schema_names(), intercept)
    }

    fn occupancy_model_over(feature_names: Vec<String>, intercept: f64) -> LinearModel {
        let mut coefficients = vec![0.0; feature_names.len()];
        coefficients[0] = 1.0;
        LinearModel::new(feature_names, coefficients, intercept).unwrap()
    }

    struct Diverging(Vec<String>);

    impl Regressor for Diverging {
        fn feature_names(&self) -> &[String] {
            &self.0
        }

        fn predict_one(&self, _features: &[f64]) -> Result<f64> {
            Ok(f64::INFINITY)
        }

        fn kind(&self) -> &'static str {
            "diverging"
        }
    }

    fn gateway() -> PredictorGateway {
        let registry = ModelRegistry::builder()
            .register("Linear Regression", Box::new(occupancy_model(100.0)))
            .unwrap()
            .register("Baseline", Box::new(occupancy_model(0.0)))
            .unwrap()
            .build()
            .unwrap();
        PredictorGateway::new(Arc::new(registry))
    }

    #[test]
    fn test_predict_with_named_model() {
        let features = derive(&RawInput::default()).unwrap();
        let result = gateway().predict("Linear Regression", &features).unwrap();
        assert_eq!(result.model, "Linear Regression");
        assert_eq!(result.value, 103.0);
    }

    #[test]
    fn test_predict_all_in_registration_order() {
        let features = derive(&RawInput::default()).unwrap();
        let results = gateway().predict_all(&features).unwrap();
        let values: Vec<(String, f64)> = results.into_iter().map(|r| (r.model, r.value)).collect();
        assert_eq!(
            values,
            vec![
                ("Linear Regression".to_string(), 103.0),
                ("Baseline".to_string(), 3.0)
            ]
        );
    }

    #[test]
    fn test_unknown_model_name() {
        let features = derive(&RawInput::default()).unwrap();
        let err = gateway().predict("UnknownModelName", &features).unwrap_err();
        assert!(matches!(err, PredictorError::UnknownModel { .. }));
    }

    #[test]
    fn test_reordered_model_schema_is_rejected() {
        let mut names = schema_names();
        names.swap(0, 1);
        let model = occupancy_model_over(names, 0.0);
        let registry = ModelRegistry::builder()
            .register("Shuffled", Box::new(model))
            .unwrap()
            .build()
            .unwrap();
        let gateway = PredictorGateway::new(Arc::new(registry));

        let features = derive(&RawInput::default()).unwrap();
        let err = gateway.predict("Shuffled", &features).unwrap_err();
        assert!(matches!(err, PredictorError::SchemaMismatch { .. }));
        assert!(err.to_string().contains("position 0"));
    }

    #[test]
    fn test_non_finite_prediction_is_an_error() {
        let features = derive(&RawInput::default()).unwrap();
        let registry = ModelRegistry::builder()
            .register("Broken", Box::new(Diverging(schema_names())))
            .unwrap()
            .build()
            .unwrap();
        let gateway = PredictorGateway::new(Arc::new(registry));
        let err = gateway.predict("Broken", &features).unwrap_err();
        assert!(matches!(err, PredictorError::ModelError { .. }));
    }

    #[test]
    fn test_gateway_is_shareable_across_threads() {
        let gateway = gateway();
        let features = derive(&RawInput::default()).unwrap();
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let gateway = gateway.clone();
                let features = features.clone();
                std::thread::spawn(move || gateway.predict("Baseline", &features).unwrap().value)
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), 3.0);
        }
    }
}
