use crate::domain::model::{CalendarDate, CoolingType, HeatingType, ManualOverride, RawInput};
use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Debug, Clone, Parser)]
#[command(name = "energy-predictor")]
#[command(about = "Estimate household energy consumption from a trained model")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "predictor.toml")]
    pub config: String,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    #[arg(long, value_enum, default_value = "compact")]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Compact,
    Json,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List the registered models
    Models,
    /// Derive features for one household and predict its consumption
    Predict(PredictArgs),
}

#[derive(Debug, Clone, Args)]
pub struct PredictArgs {
    /// Number of occupants
    #[arg(long, default_value_t = 3)]
    pub occupants: u32,

    /// House size in square feet
    #[arg(long, default_value_t = 2000.0)]
    pub sqft: f64,

    #[arg(long, default_value_t = 5000.0)]
    pub income: f64,

    /// Outside temperature in °C
    #[arg(long, default_value_t = 27.0, allow_negative_numbers = true)]
    pub temp: f64,

    #[arg(long, default_value_t = 2024)]
    pub year: i32,

    #[arg(long, default_value_t = 7)]
    pub month: u32,

    #[arg(long, default_value_t = 10)]
    pub day: u32,

    /// Electric, Gas or None
    #[arg(long, default_value = "Electric")]
    pub heating: HeatingType,

    /// AC, Fan or None
    #[arg(long, default_value = "AC")]
    pub cooling: CoolingType,

    /// Y or N
    #[arg(long, default_value = "Y")]
    pub manual_override: ManualOverride,

    /// Energy Star certified home
    #[arg(long)]
    pub energy_star: bool,

    /// Model to use; defaults to the first one configured
    #[arg(short, long, conflicts_with = "all_models")]
    pub model: Option<String>,

    /// Run every configured model
    #[arg(long)]
    pub all_models: bool,

    /// Write the feature record to the configured CSV export location
    #[arg(long)]
    pub export: bool,

    /// Print one JSON document instead of text
    #[arg(long)]
    pub json: bool,
}

impl PredictArgs {
    pub fn raw_input(&self) -> RawInput {
        RawInput {
            num_occupants: self.occupants,
            house_size_sqft: self.sqft,
            monthly_income: self.income,
            outside_temp_celsius: self.temp,
            date: CalendarDate::new(self.year, self.month, self.day),
            heating_type: self.heating,
            cooling_type: self.cooling,
            manual_override: self.manual_override,
            energy_star_home: self.energy_star,
        }
    }
}
