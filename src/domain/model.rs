use crate::utils::error::PredictorError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HeatingType {
    Electric,
    Gas,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CoolingType {
    #[serde(rename = "AC")]
    Ac,
    Fan,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ManualOverride {
    Y,
    N,
}

impl HeatingType {
    pub const ALL: [HeatingType; 3] = [HeatingType::Electric, HeatingType::Gas, HeatingType::None];

    pub fn label(self) -> &'static str {
        match self {
            HeatingType::Electric => "Electric",
            HeatingType::Gas => "Gas",
            HeatingType::None => "None",
        }
    }
}

impl CoolingType {
    pub const ALL: [CoolingType; 3] = [CoolingType::Ac, CoolingType::Fan, CoolingType::None];

    pub fn label(self) -> &'static str {
        match self {
            CoolingType::Ac => "AC",
            CoolingType::Fan => "Fan",
            CoolingType::None => "None",
        }
    }
}

impl ManualOverride {
    pub const ALL: [ManualOverride; 2] = [ManualOverride::Y, ManualOverride::N];

    pub fn label(self) -> &'static str {
        match self {
            ManualOverride::Y => "Y",
            ManualOverride::N => "N",
        }
    }

    pub fn is_enabled(self) -> bool {
        self == ManualOverride::Y
    }
}

/// Matches `input` case-insensitively against the labels of `variants`.
fn parse_label<T: Copy>(
    field: &str,
    input: &str,
    variants: &[T],
    label: fn(T) -> &'static str,
) -> Result<T, PredictorError> {
    let wanted = input.trim();
    variants
        .iter()
        .copied()
        .find(|v| label(*v).eq_ignore_ascii_case(wanted))
        .ok_or_else(|| {
            let allowed: Vec<&str> = variants.iter().map(|v| label(*v)).collect();
            PredictorError::invalid_input(field, input, format!("expected one of {}", allowed.join(", ")))
        })
}

impl FromStr for HeatingType {
    type Err = PredictorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_label("heating_type", s, &Self::ALL, Self::label)
    }
}

impl FromStr for CoolingType {
    type Err = PredictorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_label("cooling_type", s, &Self::ALL, Self::label)
    }
}

impl FromStr for ManualOverride {
    type Err = PredictorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_label("manual_override", s, &Self::ALL, Self::label)
    }
}

impl fmt::Display for HeatingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for CoolingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for ManualOverride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Unchecked calendar components as entered by the user. Whether they form a
/// real date is decided during derivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl CalendarDate {
    pub fn new(year: i32, month: u32, day: u32) -> Self {
        Self { year, month, day }
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawInput {
    pub num_occupants: u32,
    pub house_size_sqft: f64,
    pub monthly_income: f64,
    pub outside_temp_celsius: f64,
    pub date: CalendarDate,
    pub heating_type: HeatingType,
    pub cooling_type: CoolingType,
    pub manual_override: ManualOverride,
    pub energy_star_home: bool,
}

impl Default for RawInput {
    fn default() -> Self {
        Self {
            num_occupants: 3,
            house_size_sqft: 2000.0,
            monthly_income: 5000.0,
            outside_temp_celsius: 27.0,
            date: CalendarDate::new(2024, 7, 10),
            heating_type: HeatingType::Electric,
            cooling_type: CoolingType::Ac,
            manual_override: ManualOverride::Y,
            energy_star_home: false,
        }
    }
}

/// Month groups named after the `season_*` one-hot columns they set.
///
/// The names are column labels paired with the month partition of
/// [`Season::from_month`]; they carry no climate meaning (July is `Fall`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Season {
    Winter,
    Summer,
    Fall,
    Spring,
}

impl Season {
    /// Months 12-3 winter, 4-6 summer, 7-9 fall, 10-11 spring.
    pub fn from_month(month: u32) -> Option<Season> {
        match month {
            12 | 1 | 2 | 3 => Some(Season::Winter),
            4..=6 => Some(Season::Summer),
            7..=9 => Some(Season::Fall),
            10 | 11 => Some(Season::Spring),
            _ => None,
        }
    }

    /// Integer stored in the `season` feature.
    pub fn code(self) -> u8 {
        match self {
            Season::Winter => 1,
            Season::Summer => 2,
            Season::Fall => 3,
            Season::Spring => 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub model: String,
    pub value: f64,
}

impl fmt::Display for PredictionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} units", self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_labels_case_insensitively() {
        assert_eq!("electric".parse::<HeatingType>().unwrap(), HeatingType::Electric);
        assert_eq!(" GAS ".parse::<HeatingType>().unwrap(), HeatingType::Gas);
        assert_eq!("ac".parse::<CoolingType>().unwrap(), CoolingType::Ac);
        assert_eq!("none".parse::<CoolingType>().unwrap(), CoolingType::None);
        assert_eq!("n".parse::<ManualOverride>().unwrap(), ManualOverride::N);
    }

    #[test]
    fn test_unknown_label_is_invalid_input() {
        let err = "solar".parse::<HeatingType>().unwrap_err();
        assert!(err.is_validation_failure());
        assert!(err.to_string().contains("Electric, Gas, None"));
    }

    #[test]
    fn test_season_partition_covers_every_month() {
        let codes: Vec<u8> = (1..=12)
            .map(|m| Season::from_month(m).unwrap().code())
            .collect();
        assert_eq!(codes, vec![1, 1, 1, 2, 2, 2, 3, 3, 3, 4, 4, 1]);
        assert_eq!(Season::from_month(0), None);
        assert_eq!(Season::from_month(13), None);
    }

    #[test]
    fn test_prediction_display() {
        let result = PredictionResult {
            model: "Linear Regression".to_string(),
            value: 1234.5678,
        };
        assert_eq!(result.to_string(), "1234.57 units");
    }

    #[test]
    fn test_raw_input_serde_uses_form_labels() {
        let json = serde_json::to_value(RawInput::default()).unwrap();
        assert_eq!(json["cooling_type"], "AC");
        assert_eq!(json["heating_type"], "Electric");
        assert_eq!(json["date"]["month"], 7);
    }
}
