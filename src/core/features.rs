//! Raw household input → ordered feature record.
//!
//! Day-of-week follows the Monday = 0 … Sunday = 6 convention, so
//! `day_of_week_0` marks Mondays and `day_of_week_6` marks Sundays.

use crate::core::schema::{FeatureRecord, FEATURE_SCHEMA};
use crate::domain::model::{CoolingType, HeatingType, ManualOverride, RawInput, Season};
use crate::utils::error::{PredictorError, Result};
use crate::utils::validation::{
    validate_finite_reading, validate_min_count, validate_positive_amount, Validate,
};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Temperatures strictly above this set `temp_above_avg`, strictly below set `low_temp_flag`.
pub const TEMP_THRESHOLD_CELSIUS: f64 = 28.0;

/// Monthly incomes strictly above this set `high_income_flag`.
pub const HIGH_INCOME_THRESHOLD: f64 = 40_000.0;

/// Saturday and Sunday under the Monday = 0 convention.
pub const WEEKEND_DAYS: [u32; 2] = [5, 6];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeasonEncoding {
    /// The `season` code and the `season_*` columns come from the same season.
    #[default]
    Consistent,
    /// Only `season_winter` (months 12-3) and `season_summer` (months 4-6) are
    /// ever set, as in the data the first models were trained on.
    Legacy,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DerivationSettings {
    pub temp_threshold_celsius: f64,
    pub high_income_threshold: f64,
    pub weekend_days: Vec<u32>,
    pub season_encoding: SeasonEncoding,
}

impl Default for DerivationSettings {
    fn default() -> Self {
        Self {
            temp_threshold_celsius: TEMP_THRESHOLD_CELSIUS,
            high_income_threshold: HIGH_INCOME_THRESHOLD,
            weekend_days: WEEKEND_DAYS.to_vec(),
            season_encoding: SeasonEncoding::Consistent,
        }
    }
}

/// A category encoded as a group of 0/1 columns. `FIELDS` is indexed by `slot`.
trait OneHot: Copy {
    const FIELDS: &'static [&'static str];
    fn slot(self) -> usize;
}

impl OneHot for HeatingType {
    const FIELDS: &'static [&'static str] =
        &["heating_type_Electric", "heating_type_Gas", "heating_type_None"];

    fn slot(self) -> usize {
        match self {
            HeatingType::Electric => 0,
            HeatingType::Gas => 1,
            HeatingType::None => 2,
        }
    }
}

impl OneHot for CoolingType {
    const FIELDS: &'static [&'static str] =
        &["cooling_type_AC", "cooling_type_Fan", "cooling_type_None"];

    fn slot(self) -> usize {
        match self {
            CoolingType::Ac => 0,
            CoolingType::Fan => 1,
            CoolingType::None => 2,
        }
    }
}

impl OneHot for ManualOverride {
    const FIELDS: &'static [&'static str] = &["manual_override_Y", "manual_override_N"];

    fn slot(self) -> usize {
        match self {
            ManualOverride::Y => 0,
            ManualOverride::N => 1,
        }
    }
}

impl OneHot for Season {
    const FIELDS: &'static [&'static str] =
        &["season_spring", "season_summer", "season_fall", "season_winter"];

    fn slot(self) -> usize {
        match self {
            Season::Spring => 0,
            Season::Summer => 1,
            Season::Fall => 2,
            Season::Winter => 3,
        }
    }
}

fn encode<C: OneHot>(hot: Option<C>) -> impl Iterator<Item = (&'static str, f64)> {
    let hot = hot.map(C::slot);
    C::FIELDS
        .iter()
        .enumerate()
        .map(move |(i, field)| (*field, flag(hot == Some(i))))
}

fn flag(value: bool) -> f64 {
    if value {
        1.0
    } else {
        0.0
    }
}

fn per_person(field: &str, total: f64, occupants: u32) -> Result<f64> {
    if occupants == 0 {
        tracing::error!("division by zero computing {}; validation should have rejected it", field);
        return Err(PredictorError::DivisionError {
            field: field.to_string(),
        });
    }
    Ok(total / f64::from(occupants))
}

/// Resolves the calendar components to a proleptic Gregorian date.
pub fn resolve_date(raw: &RawInput) -> Result<NaiveDate> {
    let d = raw.date;
    NaiveDate::from_ymd_opt(d.year, d.month, d.day).ok_or(PredictorError::InvalidDate {
        year: d.year,
        month: d.month,
        day: d.day,
    })
}

impl Validate for RawInput {
    fn validate(&self) -> Result<()> {
        validate_min_count("num_occupants", self.num_occupants, 1)?;
        validate_positive_amount("house_size_sqft", self.house_size_sqft)?;
        validate_positive_amount("monthly_income", self.monthly_income)?;
        validate_finite_reading("outside_temp_celsius", self.outside_temp_celsius)?;
        resolve_date(self)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct FeatureDeriver {
    settings: DerivationSettings,
}

impl FeatureDeriver {
    pub fn new(settings: DerivationSettings) -> Self {
        if settings.season_encoding == SeasonEncoding::Legacy {
            tracing::warn!(
                "legacy season encoding enabled: season_fall and season_spring will always be 0"
            );
        }
        Self { settings }
    }

    pub fn settings(&self) -> &DerivationSettings {
        &self.settings
    }

    pub fn schema(&self) -> &'static [&'static str] {
        &FEATURE_SCHEMA
    }

    /// Validates `raw` and derives its feature record. Nothing is derived when
    /// validation fails.
    pub fn derive(&self, raw: &RawInput) -> Result<FeatureRecord> {
        raw.validate()?;

        let date = resolve_date(raw)?;
        let day_of_week = date.weekday().num_days_from_monday();
        let season = Season::from_month(date.month()).ok_or(PredictorError::InvalidDate {
            year: raw.date.year,
            month: raw.date.month,
            day: raw.date.day,
        })?;
        let season_hot = match self.settings.season_encoding {
            SeasonEncoding::Consistent => Some(season),
            SeasonEncoding::Legacy => match season {
                Season::Winter | Season::Summer => Some(season),
                Season::Fall | Season::Spring => None,
            },
        };

        let temp = raw.outside_temp_celsius;
        let threshold = self.settings.temp_threshold_celsius;

        let mut fields: Vec<(&'static str, f64)> = Vec::with_capacity(FEATURE_SCHEMA.len());
        fields.push(("num_occupants", f64::from(raw.num_occupants)));
        fields.push(("house_size_sqft", raw.house_size_sqft));
        fields.push(("monthly_income", raw.monthly_income));
        fields.push(("outside_temp_celsius", temp));
        fields.push(("year", f64::from(date.year())));
        fields.push(("month", f64::from(date.month())));
        fields.push(("day", f64::from(date.day())));
        fields.push(("season", f64::from(season.code())));
        fields.extend(encode(Some(raw.heating_type)));
        fields.extend(encode(Some(raw.cooling_type)));
        fields.extend(encode(Some(raw.manual_override)));
        fields.push((
            "is_weekend",
            flag(self.settings.weekend_days.contains(&day_of_week)),
        ));
        fields.push(("temp_above_avg", flag(temp > threshold)));
        fields.push((
            "income_per_person",
            per_person("income_per_person", raw.monthly_income, raw.num_occupants)?,
        ));
        fields.push((
            "square_feet_per_person",
            per_person("square_feet_per_person", raw.house_size_sqft, raw.num_occupants)?,
        ));
        fields.push((
            "high_income_flag",
            flag(raw.monthly_income > self.settings.high_income_threshold),
        ));
        fields.push(("low_temp_flag", flag(temp < threshold)));
        fields.extend(encode(season_hot));
        fields.push(("day_of_week_0", flag(day_of_week == 0)));
        fields.push(("day_of_week_6", flag(day_of_week == 6)));
        fields.push(("energy_star_home", flag(raw.energy_star_home)));

        let record = FeatureRecord::assemble(&FEATURE_SCHEMA, fields)?;
        tracing::debug!(
            date = %raw.date,
            day_of_week,
            season = ?season,
            "derived {} features",
            record.len()
        );
        Ok(record)
    }
}

/// Derives with the default thresholds and encoding.
pub fn derive(raw: &RawInput) -> Result<FeatureRecord> {
    FeatureDeriver::default().derive(raw)
}
