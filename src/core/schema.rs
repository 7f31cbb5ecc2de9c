use crate::utils::error::{PredictorError, Result};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashMap;

/// Column order the bundled models were trained on. Tabular models are
/// position-sensitive, so every record is assembled against this list.
pub const FEATURE_SCHEMA: [&str; 29] = [
    "num_occupants",
    "house_size_sqft",
    "monthly_income",
    "outside_temp_celsius",
    "year",
    "month",
    "day",
    "season",
    "heating_type_Electric",
    "heating_type_Gas",
    "heating_type_None",
    "cooling_type_AC",
    "cooling_type_Fan",
    "cooling_type_None",
    "manual_override_Y",
    "manual_override_N",
    "is_weekend",
    "temp_above_avg",
    "income_per_person",
    "square_feet_per_person",
    "high_income_flag",
    "low_temp_flag",
    "season_spring",
    "season_summer",
    "season_fall",
    "season_winter",
    "day_of_week_0",
    "day_of_week_6",
    "energy_star_home",
];

/// Named numeric features in schema order. Immutable once assembled.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRecord {
    schema: &'static [&'static str],
    values: Vec<f64>,
}

impl FeatureRecord {
    /// Lays `fields` out in `schema` order. Every schema name must appear
    /// exactly once and nothing else may appear.
    pub fn assemble(schema: &'static [&'static str], fields: Vec<(&'static str, f64)>) -> Result<Self> {
        let mut by_name: HashMap<&str, f64> = HashMap::with_capacity(fields.len());
        for (name, value) in fields {
            if by_name.insert(name, value).is_some() {
                return Err(PredictorError::schema_mismatch(
                    "feature assembly",
                    format!("field '{}' was produced more than once", name),
                ));
            }
        }

        let mut values = Vec::with_capacity(schema.len());
        for name in schema {
            match by_name.remove(name) {
                Some(value) => values.push(value),
                None => {
                    return Err(PredictorError::schema_mismatch(
                        "feature assembly",
                        format!("required field '{}' is missing", name),
                    ))
                }
            }
        }

        if !by_name.is_empty() {
            let mut unexpected: Vec<&str> = by_name.into_keys().collect();
            unexpected.sort_unstable();
            return Err(PredictorError::schema_mismatch(
                "feature assembly",
                format!("unexpected fields: {}", unexpected.join(", ")),
            ));
        }

        Ok(Self { schema, values })
    }

    pub fn names(&self) -> &[&'static str] {
        self.schema
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.schema
            .iter()
            .position(|n| *n == name)
            .map(|i| self.values[i])
    }

    /// Reads a 0/1 field. Absent fields read as false.
    pub fn flag(&self, name: &str) -> bool {
        self.get(name).is_some_and(|v| v != 0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        self.schema.iter().copied().zip(self.values.iter().copied())
    }

    /// Checks that `expected` names the same fields in the same order.
    pub fn ensure_matches(&self, context: &str, expected: &[String]) -> Result<()> {
        if expected.len() != self.schema.len() {
            return Err(PredictorError::schema_mismatch(
                context,
                format!(
                    "expected {} features, record has {}",
                    expected.len(),
                    self.schema.len()
                ),
            ));
        }

        for (position, (want, have)) in expected.iter().zip(self.schema.iter()).enumerate() {
            if want != have {
                return Err(PredictorError::schema_mismatch(
                    context,
                    format!(
                        "position {}: expected '{}', record has '{}'",
                        position, want, have
                    ),
                ));
            }
        }

        Ok(())
    }
}

impl Serialize for FeatureRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, &value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static SMALL: [&str; 3] = ["a", "b", "c"];

    #[test]
    fn test_assemble_orders_by_schema() {
        let record = FeatureRecord::assemble(&SMALL, vec![("c", 3.0), ("a", 1.0), ("b", 2.0)]).unwrap();
        assert_eq!(record.names(), &["a", "b", "c"]);
        assert_eq!(record.values(), &[1.0, 2.0, 3.0]);
        assert_eq!(record.get("b"), Some(2.0));
        assert_eq!(record.get("z"), None);
    }

    #[test]
    fn test_assemble_rejects_missing_field() {
        let err = FeatureRecord::assemble(&SMALL, vec![("a", 1.0), ("b", 2.0)]).unwrap_err();
        assert!(matches!(err, PredictorError::SchemaMismatch { .. }));
        assert!(err.to_string().contains("'c'"));
    }

    #[test]
    fn test_assemble_rejects_unexpected_and_duplicate_fields() {
        let err = FeatureRecord::assemble(
            &SMALL,
            vec![("a", 1.0), ("b", 2.0), ("c", 3.0), ("d", 4.0)],
        )
        .unwrap_err();
        assert!(err.to_string().contains("unexpected fields: d"));

        let err = FeatureRecord::assemble(&SMALL, vec![("a", 1.0), ("a", 1.0)]).unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn test_ensure_matches_checks_order() {
        let record = FeatureRecord::assemble(&SMALL, vec![("a", 1.0), ("b", 2.0), ("c", 3.0)]).unwrap();
        let same: Vec<String> = SMALL.iter().map(|s| s.to_string()).collect();
        assert!(record.ensure_matches("test", &same).is_ok());

        let swapped = vec!["a".to_string(), "c".to_string(), "b".to_string()];
        let err = record.ensure_matches("test", &swapped).unwrap_err();
        assert!(err.to_string().contains("position 1"));

        let shorter = vec!["a".to_string(), "b".to_string()];
        assert!(record.ensure_matches("test", &shorter).is_err());
    }

    #[test]
    fn test_serializes_as_ordered_map() {
        let record = FeatureRecord::assemble(&SMALL, vec![("c", 3.0), ("b", 2.0), ("a", 1.0)]).unwrap();
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"a":1.0,"b":2.0,"c":3.0}"#);
    }

    #[test]
    fn test_schema_has_no_duplicates() {
        let mut names = FEATURE_SCHEMA.to_vec();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), FEATURE_SCHEMA.len());
    }
}
