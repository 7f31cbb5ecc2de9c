use crate::core::export::DEFAULT_EXPORT_FILENAME;
use crate::core::features::{
    DerivationSettings, SeasonEncoding, HIGH_INCOME_THRESHOLD, TEMP_THRESHOLD_CELSIUS,
    WEEKEND_DAYS,
};
use crate::core::insights::LARGE_HOUSEHOLD_OCCUPANTS;
use crate::domain::ports::ModelEntry;
use crate::utils::error::{PredictorError, Result};
use crate::utils::validation::{
    validate_file_extension, validate_finite, validate_non_empty_string, validate_path,
    validate_range, validate_unique, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PredictorConfig {
    pub features: Option<FeaturesConfig>,
    pub insights: Option<InsightsConfig>,
    #[serde(default)]
    pub models: Vec<ModelEntry>,
    pub export: Option<ExportConfig>,

    /// Directory of the file this config was read from.
    #[serde(skip)]
    pub source_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeaturesConfig {
    pub temp_threshold_celsius: Option<f64>,
    pub high_income_threshold: Option<f64>,
    pub weekend_days: Option<Vec<u32>>,
    pub season_encoding: Option<SeasonEncoding>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InsightsConfig {
    pub large_household_occupants: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportConfig {
    pub output_path: Option<String>,
    pub filename: Option<String>,
}

impl PredictorConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(PredictorError::IoError)?;
        let mut config = Self::from_toml_str(&content)?;
        config.source_dir = Some(
            path.parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from(".")),
        );
        Ok(config)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| PredictorError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${MODEL_DIR})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| PredictorError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        if self.models.is_empty() {
            return Err(PredictorError::MissingConfigError {
                field: "models".to_string(),
            });
        }
        for model in &self.models {
            validate_non_empty_string("models.name", &model.name)?;
            validate_path("models.path", &model.path)?;
        }
        validate_unique("models.name", self.models.iter().map(|m| m.name.as_str()))?;

        let settings = self.derivation_settings();
        validate_finite("features.temp_threshold_celsius", settings.temp_threshold_celsius)?;
        validate_finite("features.high_income_threshold", settings.high_income_threshold)?;
        for day in &settings.weekend_days {
            validate_range("features.weekend_days", *day, 0, 6)?;
        }
        let days: Vec<String> = settings.weekend_days.iter().map(u32::to_string).collect();
        validate_unique("features.weekend_days", days.iter().map(String::as_str))?;

        validate_path("export.output_path", &self.export_output_path())?;
        validate_file_extension("export.filename", &self.export_filename(), &["csv"])?;

        Ok(())
    }

    /// 取得特徵推導設定，未設定者使用預設常數
    pub fn derivation_settings(&self) -> DerivationSettings {
        let features = self.features.clone().unwrap_or_default();
        DerivationSettings {
            temp_threshold_celsius: features
                .temp_threshold_celsius
                .unwrap_or(TEMP_THRESHOLD_CELSIUS),
            high_income_threshold: features
                .high_income_threshold
                .unwrap_or(HIGH_INCOME_THRESHOLD),
            weekend_days: features
                .weekend_days
                .unwrap_or_else(|| WEEKEND_DAYS.to_vec()),
            season_encoding: features.season_encoding.unwrap_or_default(),
        }
    }

    pub fn large_household_occupants(&self) -> u32 {
        self.insights
            .as_ref()
            .and_then(|i| i.large_household_occupants)
            .unwrap_or(LARGE_HOUSEHOLD_OCCUPANTS)
    }

    pub fn export_output_path(&self) -> String {
        self.export
            .as_ref()
            .and_then(|e| e.output_path.clone())
            .unwrap_or_else(|| "./output".to_string())
    }

    /// Export directory; relative paths resolve against the config file's
    /// directory, like model paths.
    pub fn export_dir(&self) -> PathBuf {
        let path = PathBuf::from(self.export_output_path());
        match &self.source_dir {
            Some(dir) if path.is_relative() => dir.join(path),
            _ => path,
        }
    }

    pub fn export_filename(&self) -> String {
        self.export
            .as_ref()
            .and_then(|e| e.filename.clone())
            .unwrap_or_else(|| DEFAULT_EXPORT_FILENAME.to_string())
    }

    /// Base directory for relative model paths.
    pub fn model_base_dir(&self) -> PathBuf {
        self.source_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}

impl Validate for PredictorConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
