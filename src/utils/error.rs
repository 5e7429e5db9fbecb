use thiserror::Error;

#[derive(Error, Debug)]
pub enum GaleriError {
    #[error("API request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("API returned status {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration field '{field}' is invalid: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Validation error on '{field}': {message}")]
    ValidationError { field: String, message: String },

    #[error("Listing not found: {id}")]
    NotFound { id: String },

    #[error("Import error: {message}")]
    ImportError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Data,
    Configuration,
    Validation,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl GaleriError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::HttpError(_) | Self::ApiError { .. } => ErrorCategory::Network,
            Self::CsvError(_)
            | Self::SerializationError(_)
            | Self::NotFound { .. }
            | Self::ImportError { .. } => ErrorCategory::Data,
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorCategory::Configuration,
            Self::ValidationError { .. } => ErrorCategory::Validation,
            Self::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NotFound { .. } => ErrorSeverity::Low,
            Self::HttpError(_) => ErrorSeverity::Medium,
            // 5xx is worth a retry, 4xx is not
            Self::ApiError { status, .. } if *status >= 500 => ErrorSeverity::Medium,
            Self::ApiError { .. }
            | Self::CsvError(_)
            | Self::SerializationError(_)
            | Self::ValidationError { .. }
            | Self::ImportError { .. }
            | Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorSeverity::High,
            Self::IoError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::HttpError(_) => "Check the network connection and the source URL, then retry",
            Self::ApiError { status, .. } if *status == 401 || *status == 403 => {
                "Check that source.api_key is set and has access to the table"
            }
            Self::ApiError { .. } => "Inspect the API response and retry later",
            Self::CsvError(_) => "Check the output path is writable",
            Self::IoError(_) => "Check that the file exists and permissions are correct",
            Self::SerializationError(_) => "Make sure the input file is valid JSON",
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => "Review the TOML configuration file",
            Self::ValidationError { .. } => "Correct the listing fields and submit again",
            Self::NotFound { .. } => "Run `galeri list` to see available listing ids",
            Self::ImportError { .. } => "The scraped export must be a JSON array of listings",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::HttpError(_) | Self::ApiError { .. } => {
                format!("Could not reach the listing store: {}", self)
            }
            Self::NotFound { id } => format!("No listing with id '{}'", id),
            Self::ValidationError { field, message } => format!("{}: {}", field, message),
            Self::MissingConfigError { field } => {
                format!("Configuration is missing '{}'", field)
            }
            _ => self.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, GaleriError>;
