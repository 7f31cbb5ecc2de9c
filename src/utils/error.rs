use thiserror::Error;

#[derive(Error, Debug)]
pub enum PredictorError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid input for '{field}' ({value}): {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid date: {year:04}-{month:02}-{day:02} is not a calendar date")]
    InvalidDate { year: i32, month: u32, day: u32 },

    #[error("Division by zero while computing '{field}'")]
    DivisionError { field: String },

    #[error("Schema mismatch ({context}): {detail}")]
    SchemaMismatch { context: String, detail: String },

    #[error("Unknown model '{name}'. Registered models: {}", .available.join(", "))]
    UnknownModel { name: String, available: Vec<String> },

    #[error("Failed to load model '{model}': {reason}")]
    ModelLoadError { model: String, reason: String },

    #[error("Model '{model}' failed during inference: {reason}")]
    ModelError { model: String, reason: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Schema,
    Model,
    Configuration,
    Io,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl PredictorError {
    pub fn invalid_input(
        field: impl Into<String>,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidInput {
            field: field.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    pub fn schema_mismatch(context: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::SchemaMismatch {
            context: context.into(),
            detail: detail.into(),
        }
    }

    pub fn model_load(model: impl Into<String>, reason: impl ToString) -> Self {
        Self::ModelLoadError {
            model: model.into(),
            reason: reason.to_string(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidInput { .. } | Self::InvalidDate { .. } | Self::DivisionError { .. } => {
                ErrorCategory::Validation
            }
            Self::SchemaMismatch { .. } => ErrorCategory::Schema,
            Self::UnknownModel { .. } | Self::ModelLoadError { .. } | Self::ModelError { .. } => {
                ErrorCategory::Model
            }
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorCategory::Configuration,
            Self::IoError(_) | Self::CsvError(_) | Self::SerializationError(_) => ErrorCategory::Io,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::InvalidInput { .. } | Self::InvalidDate { .. } => ErrorSeverity::High,
            Self::IoError(_) | Self::CsvError(_) | Self::SerializationError(_) => {
                ErrorSeverity::Medium
            }
            // unreachable past validation, so hitting it is a bug
            Self::DivisionError { .. } => ErrorSeverity::Critical,
            Self::SchemaMismatch { .. }
            | Self::UnknownModel { .. }
            | Self::ModelError { .. }
            | Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorSeverity::High,
            Self::ModelLoadError { .. } => ErrorSeverity::Critical,
        }
    }

    /// True for errors caused by the caller's household input rather than by
    /// configuration or model artifacts.
    pub fn is_validation_failure(&self) -> bool {
        matches!(self, Self::InvalidInput { .. } | Self::InvalidDate { .. })
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            Self::InvalidInput { field, .. } => {
                format!("Correct the value of '{}' and try again", field)
            }
            Self::InvalidDate { .. } => {
                "Check that the day exists in the given month (leap years included)".to_string()
            }
            Self::DivisionError { .. } => {
                "Number of occupants must be at least 1".to_string()
            }
            Self::SchemaMismatch { .. } => {
                "Make sure the model artifact was trained on the same feature schema as this build"
                    .to_string()
            }
            Self::UnknownModel { available, .. } => {
                format!("Choose one of: {}", available.join(", "))
            }
            Self::ModelLoadError { .. } => {
                "Check the model path in the configuration and that the artifact is valid JSON"
                    .to_string()
            }
            Self::ModelError { .. } => {
                "The model produced an unusable value; verify the artifact".to_string()
            }
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => {
                "Review the TOML configuration file".to_string()
            }
            Self::IoError(_) => "Check file paths and permissions".to_string(),
            Self::CsvError(_) => "Check the export location is writable".to_string(),
            Self::SerializationError(_) => "Check the JSON document is well formed".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Validation => format!("Invalid household input: {}", self),
            ErrorCategory::Schema => format!("Model and features do not line up: {}", self),
            ErrorCategory::Model => format!("Model problem: {}", self),
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Io => format!("File problem: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, PredictorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_model_lists_available_models() {
        let err = PredictorError::UnknownModel {
            name: "Gradient Boosting".to_string(),
            available: vec!["Linear Regression".to_string(), "Random Forest".to_string()],
        };
        let message = err.to_string();
        assert!(message.contains("Gradient Boosting"));
        assert!(message.contains("Linear Regression, Random Forest"));
        assert_eq!(err.category(), ErrorCategory::Model);
    }

    #[test]
    fn test_validation_failures() {
        let err = PredictorError::invalid_input("num_occupants", 0, "must be at least 1");
        assert!(err.is_validation_failure());
        assert_eq!(err.severity(), ErrorSeverity::High);

        let err = PredictorError::InvalidDate {
            year: 2023,
            month: 2,
            day: 29,
        };
        assert!(err.is_validation_failure());
        assert_eq!(err.to_string(), "Invalid date: 2023-02-29 is not a calendar date");
    }

    #[test]
    fn test_load_errors_are_critical() {
        let err = PredictorError::model_load("Random Forest", "file not found");
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert!(!err.is_validation_failure());
    }
}
