//! Native regressors for the two model families the predictor ships with.
//!
//! Artifacts are plain serde documents tagged by `kind`:
//!
//! ```json
//! { "kind": "linear", "feature_names": [...], "coefficients": [...], "intercept": 12.5 }
//! { "kind": "random_forest", "feature_names": [...], "trees": [ { "children_left": [...], ... } ] }
//! ```
//!
//! Trees use the flat node-array layout of common tree learners: node `i` is a
//! leaf when `children_left[i] == -1`; otherwise `x[feature[i]] <= threshold[i]`
//! descends to `children_left[i]` and anything else to `children_right[i]`.

use crate::domain::ports::Regressor;
use crate::utils::error::{PredictorError, Result};
use serde::{Deserialize, Serialize};

const LEAF: i64 = -1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    feature_names: Vec<String>,
    coefficients: Vec<f64>,
    intercept: f64,
}

impl LinearModel {
    pub fn new(
        feature_names: Vec<String>,
        coefficients: Vec<f64>,
        intercept: f64,
    ) -> std::result::Result<Self, String> {
        let model = Self {
            feature_names,
            coefficients,
            intercept,
        };
        model.check()?;
        Ok(model)
    }

    pub fn check(&self) -> std::result::Result<(), String> {
        if self.coefficients.len() != self.feature_names.len() {
            return Err(format!(
                "{} coefficients for {} features",
                self.coefficients.len(),
                self.feature_names.len()
            ));
        }
        if !self.intercept.is_finite() || self.coefficients.iter().any(|c| !c.is_finite()) {
            return Err("coefficients and intercept must be finite".to_string());
        }
        Ok(())
    }
}

impl Regressor for LinearModel {
    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn predict_one(&self, features: &[f64]) -> Result<f64> {
        check_width(self.kind(), self.coefficients.len(), features)?;
        Ok(self.intercept
            + self
                .coefficients
                .iter()
                .zip(features)
                .map(|(c, x)| c * x)
                .sum::<f64>())
    }

    fn kind(&self) -> &'static str {
        "linear"
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionTree {
    children_left: Vec<i64>,
    children_right: Vec<i64>,
    feature: Vec<i64>,
    threshold: Vec<f64>,
    value: Vec<f64>,
}

impl RegressionTree {
    /// Builds a tree and checks it against `n_features` inputs.
    pub fn new(
        children_left: Vec<i64>,
        children_right: Vec<i64>,
        feature: Vec<i64>,
        threshold: Vec<f64>,
        value: Vec<f64>,
        n_features: usize,
    ) -> std::result::Result<Self, String> {
        let tree = Self {
            children_left,
            children_right,
            feature,
            threshold,
            value,
        };
        tree.check(n_features)?;
        Ok(tree)
    }

    /// Verifies the node arrays describe a well-formed tree over `n_features`
    /// inputs. Children must point strictly forward, which also rules out cycles.
    pub fn check(&self, n_features: usize) -> std::result::Result<(), String> {
        let n = self.children_left.len();
        if n == 0 {
            return Err("tree has no nodes".to_string());
        }
        if [
            self.children_right.len(),
            self.feature.len(),
            self.threshold.len(),
            self.value.len(),
        ]
        .iter()
        .any(|len| *len != n)
        {
            return Err("node arrays have different lengths".to_string());
        }

        for node in 0..n {
            let left = self.children_left[node];
            let right = self.children_right[node];
            if left == LEAF {
                if !self.value[node].is_finite() {
                    return Err(format!("leaf {} has a non-finite value", node));
                }
                continue;
            }
            for child in [left, right] {
                if child <= node as i64 || child >= n as i64 {
                    return Err(format!("node {} has invalid child {}", node, child));
                }
            }
            let feature = self.feature[node];
            if feature < 0 || feature >= n_features as i64 {
                return Err(format!("node {} splits on unknown feature {}", node, feature));
            }
            if self.threshold[node].is_nan() {
                return Err(format!("node {} has a NaN threshold", node));
            }
        }
        Ok(())
    }

    /// Walks from the root to a leaf. Returns `None` if the walk leaves the
    /// node arrays or visits more nodes than the tree has.
    pub fn predict(&self, features: &[f64]) -> Option<f64> {
        let mut node = 0usize;
        for _ in 0..self.children_left.len() {
            let left = *self.children_left.get(node)?;
            if left == LEAF {
                return self.value.get(node).copied();
            }
            let split = usize::try_from(*self.feature.get(node)?).ok()?;
            let x = *features.get(split)?;
            let next = if x <= *self.threshold.get(node)? {
                left
            } else {
                *self.children_right.get(node)?
            };
            node = usize::try_from(next).ok()?;
        }
        None
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForestModel {
    feature_names: Vec<String>,
    trees: Vec<RegressionTree>,
}

impl RandomForestModel {
    pub fn new(
        feature_names: Vec<String>,
        trees: Vec<RegressionTree>,
    ) -> std::result::Result<Self, String> {
        let model = Self {
            feature_names,
            trees,
        };
        model.check()?;
        Ok(model)
    }

    pub fn check(&self) -> std::result::Result<(), String> {
        if self.trees.is_empty() {
            return Err("forest has no trees".to_string());
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.check(self.feature_names.len())
                .map_err(|e| format!("tree {}: {}", i, e))?;
        }
        Ok(())
    }
}

impl Regressor for RandomForestModel {
    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn predict_one(&self, features: &[f64]) -> Result<f64> {
        check_width(self.kind(), self.feature_names.len(), features)?;
        if self.trees.is_empty() {
            return Err(PredictorError::ModelError {
                model: self.kind().to_string(),
                reason: "forest has no trees".to_string(),
            });
        }
        let mut total = 0.0;
        for (i, tree) in self.trees.iter().enumerate() {
            total += tree.predict(features).ok_or_else(|| PredictorError::ModelError {
                model: self.kind().to_string(),
                reason: format!("tree {} is malformed", i),
            })?;
        }
        Ok(total / self.trees.len() as f64)
    }

    fn kind(&self) -> &'static str {
        "random_forest"
    }
}

fn check_width(kind: &str, expected: usize, features: &[f64]) -> Result<()> {
    if features.len() != expected {
        return Err(PredictorError::schema_mismatch(
            kind,
            format!(
                "feature length mismatch: got {}, expected {}",
                features.len(),
                expected
            ),
        ));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    Linear(LinearModel),
    RandomForest(RandomForestModel),
}

impl ModelArtifact {
    pub fn from_json(model: &str, bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|e| PredictorError::model_load(model, e))
    }

    /// Checks the artifact and turns it into a boxed regressor.
    pub fn into_regressor(self, model: &str) -> Result<Box<dyn Regressor>> {
        match self {
            ModelArtifact::Linear(m) => {
                m.check().map_err(|e| PredictorError::model_load(model, e))?;
                Ok(Box::new(m))
            }
            ModelArtifact::RandomForest(m) => {
                m.check().map_err(|e| PredictorError::model_load(model, e))?;
                Ok(Box::new(m))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("f{}", i)).collect()
    }

    // x0 <= 1.5 ? 10 : (x1 <= 0.5 ? 20 : 30)
    fn stump() -> RegressionTree {
        RegressionTree::new(
            vec![1, -1, 3, -1, -1],
            vec![2, -1, 4, -1, -1],
            vec![0, -2, 1, -2, -2],
            vec![1.5, -2.0, 0.5, -2.0, -2.0],
            vec![0.0, 10.0, 0.0, 20.0, 30.0],
            2,
        )
        .unwrap()
    }

    fn leaf(value: f64) -> RegressionTree {
        RegressionTree::new(vec![-1], vec![-1], vec![-2], vec![-2.0], vec![value], 0).unwrap()
    }

    #[test]
    fn test_linear_prediction() {
        let model = LinearModel::new(names(3), vec![2.0, -1.0, 0.5], 10.0).unwrap();
        let y = model.predict_one(&[1.0, 4.0, 8.0]).unwrap();
        assert_eq!(y, 10.0 + 2.0 - 4.0 + 4.0);
    }

    #[test]
    fn test_linear_constructor_checks_shape() {
        let err = LinearModel::new(names(2), vec![1.0], 0.0).unwrap_err();
        assert!(err.contains("1 coefficients for 2 features"));
        assert!(LinearModel::new(names(1), vec![1.0], f64::NAN).is_err());
    }

    #[test]
    fn test_linear_rejects_wrong_width() {
        let model = LinearModel::new(names(2), vec![1.0, 1.0], 0.0).unwrap();
        let err = model.predict_one(&[1.0]).unwrap_err();
        assert!(matches!(err, PredictorError::SchemaMismatch { .. }));
    }

    #[test]
    fn test_tree_traversal() {
        let tree = stump();
        assert_eq!(tree.predict(&[1.0, 0.0]), Some(10.0));
        assert_eq!(tree.predict(&[1.5, 9.0]), Some(10.0));
        assert_eq!(tree.predict(&[2.0, 0.5]), Some(20.0));
        assert_eq!(tree.predict(&[2.0, 0.6]), Some(30.0));
    }

    #[test]
    fn test_forest_averages_trees() {
        let forest = RandomForestModel::new(names(2), vec![stump(), leaf(100.0)]).unwrap();
        assert_eq!(forest.predict_one(&[2.0, 1.0]).unwrap(), (30.0 + 100.0) / 2.0);
    }

    #[test]
    fn test_malformed_trees_are_rejected() {
        let mut backwards = stump();
        backwards.children_left[2] = 1;
        assert!(backwards.check(2).is_err());

        let mut out_of_range = stump();
        out_of_range.children_right[0] = 9;
        assert!(out_of_range.check(2).is_err());

        let mut bad_feature = stump();
        bad_feature.feature[2] = 5;
        assert!(bad_feature.check(2).is_err());

        let mut ragged = stump();
        ragged.value.pop();
        assert!(ragged.check(2).is_err());

        assert!(RandomForestModel::new(names(2), vec![]).is_err());
    }

    #[test]
    fn test_forest_constructor_rejects_unchecked_trees() {
        // Node 0 splits on feature 40 of a two-feature model.
        let wide = RegressionTree {
            children_left: vec![1, -1],
            children_right: vec![1, -1],
            feature: vec![40, -2],
            threshold: vec![0.5, -2.0],
            value: vec![0.0, 1.0],
        };
        let err = RandomForestModel::new(names(2), vec![wide]).unwrap_err();
        assert!(err.contains("tree 0"));
        assert!(err.contains("unknown feature 40"));

        assert!(RegressionTree::new(vec![0], vec![0], vec![0], vec![0.5], vec![1.0], 1).is_err());
    }

    #[test]
    fn test_malformed_tree_predicts_an_error_not_a_panic() {
        let wide = RegressionTree {
            children_left: vec![1, -1],
            children_right: vec![1, -1],
            feature: vec![40, -2],
            threshold: vec![0.5, -2.0],
            value: vec![0.0, 1.0],
        };
        assert_eq!(wide.predict(&[0.0, 0.0]), None);

        let self_loop = RegressionTree {
            children_left: vec![0],
            children_right: vec![0],
            feature: vec![0],
            threshold: vec![0.5],
            value: vec![1.0],
        };
        assert_eq!(self_loop.predict(&[0.0]), None);

        let dangling = RegressionTree {
            children_left: vec![7],
            children_right: vec![7],
            feature: vec![0],
            threshold: vec![0.5],
            value: vec![1.0],
        };
        assert_eq!(dangling.predict(&[0.0]), None);

        let forest = RandomForestModel {
            feature_names: names(2),
            trees: vec![stump(), wide],
        };
        let err = forest.predict_one(&[0.0, 0.0]).unwrap_err();
        assert!(matches!(err, PredictorError::ModelError { ref reason, .. } if reason == "tree 1 is malformed"));
    }

    #[test]
    fn test_artifact_json_tagging() {
        let json = br#"{"kind":"linear","feature_names":["a","b"],"coefficients":[1.0,2.0],"intercept":0.5}"#;
        let regressor = ModelArtifact::from_json("lin", json)
            .unwrap()
            .into_regressor("lin")
            .unwrap();
        assert_eq!(regressor.kind(), "linear");
        assert_eq!(regressor.predict_one(&[1.0, 1.0]).unwrap(), 3.5);

        let bad = br#"{"kind":"gradient_boosting","feature_names":[]}"#;
        let err = ModelArtifact::from_json("gb", bad).unwrap_err();
        assert!(matches!(err, PredictorError::ModelLoadError { .. }));

        let mismatched = br#"{"kind":"linear","feature_names":["a"],"coefficients":[1.0,2.0],"intercept":0.0}"#;
        let err = ModelArtifact::from_json("lin", mismatched)
            .unwrap()
            .into_regressor("lin")
            .err()
            .unwrap();
        assert!(err.to_string().contains("2 coefficients for 1 features"));
    }

    #[test]
    fn test_artifact_with_unchecked_tree_fails_to_load() {
        let json = br#"{"kind":"random_forest","feature_names":["a","b"],"trees":[
            {"children_left":[0],"children_right":[0],"feature":[0],"threshold":[0.5],"value":[1.0]}
        ]}"#;
        let err = ModelArtifact::from_json("rf", json)
            .unwrap()
            .into_regressor("rf")
            .err()
            .unwrap();
        assert!(matches!(err, PredictorError::ModelLoadError { .. }));
    }
}
