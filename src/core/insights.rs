use crate::core::schema::FeatureRecord;
use crate::domain::model::{CoolingType, HeatingType, RawInput};
use serde::Serialize;
use std::fmt;

/// Households with more occupants than this get the large-household insight.
pub const LARGE_HOUSEHOLD_OCCUPANTS: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Insight {
    HighTemperature,
    ElectricHeating,
    AirConditioning,
    LargeHousehold,
    NotEnergyStar,
    ManualOverride,
    HighIncome,
}

impl Insight {
    pub fn message(self) -> &'static str {
        match self {
            Insight::HighTemperature => {
                "High temperature may raise cooling costs (especially if AC is used)."
            }
            Insight::ElectricHeating => {
                "Electric heating increases consumption significantly during cold weather."
            }
            Insight::AirConditioning => "AC usage contributes to higher consumption.",
            Insight::LargeHousehold => "Larger households typically consume more energy.",
            Insight::NotEnergyStar => "Energy Star certified homes can reduce overall consumption.",
            Insight::ManualOverride => "Manual override may lead to suboptimal energy usage.",
            Insight::HighIncome => {
                "Higher income may correlate with larger homes and higher appliance usage."
            }
        }
    }
}

impl fmt::Display for Insight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Advisory notes for a household. Temperature and income rules read the
/// derived flags so they agree with whatever thresholds produced `features`.
pub fn insights_for(raw: &RawInput, features: &FeatureRecord, large_household: u32) -> Vec<Insight> {
    let rules = [
        (features.flag("temp_above_avg"), Insight::HighTemperature),
        (raw.heating_type == HeatingType::Electric, Insight::ElectricHeating),
        (raw.cooling_type == CoolingType::Ac, Insight::AirConditioning),
        (raw.num_occupants > large_household, Insight::LargeHousehold),
        (!raw.energy_star_home, Insight::NotEnergyStar),
        (raw.manual_override.is_enabled(), Insight::ManualOverride),
        (features.flag("high_income_flag"), Insight::HighIncome),
    ];

    rules
        .into_iter()
        .filter_map(|(holds, insight)| holds.then_some(insight))
        .collect()
}

/// The derived metrics shown next to a prediction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DerivedSummary {
    pub income_per_person: f64,
    pub square_feet_per_person: f64,
    pub above_average_temperature: bool,
    pub high_income: bool,
    pub weekend: bool,
}

impl DerivedSummary {
    pub fn from_features(features: &FeatureRecord) -> Self {
        Self {
            income_per_person: features.get("income_per_person").unwrap_or_default(),
            square_feet_per_person: features.get("square_feet_per_person").unwrap_or_default(),
            above_average_temperature: features.flag("temp_above_avg"),
            high_income: features.flag("high_income_flag"),
            weekend: features.flag("is_weekend"),
        }
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "Yes"
    } else {
        "No"
    }
}

impl fmt::Display for DerivedSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Income per person:  {:.2}", self.income_per_person)?;
        writeln!(f, "Sq ft per person:   {:.2}", self.square_feet_per_person)?;
        writeln!(f, "Above avg temp:     {}", yes_no(self.above_average_temperature))?;
        writeln!(f, "High income:        {}", yes_no(self.high_income))?;
        write!(f, "Weekend:            {}", yes_no(self.weekend))
    }
}
