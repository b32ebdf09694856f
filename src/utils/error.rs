use thiserror::Error;

#[derive(Error, Debug)]
pub enum CongestionError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration value: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Required column '{column}' not found in vessel dataset")]
    MissingColumn { column: String },

    #[error("Invalid record at line {line}: {field} = '{value}' ({reason})")]
    InvalidRecord {
        line: u64,
        field: String,
        value: String,
        reason: String,
    },

    #[error("Duplicate port name in registry: {name}")]
    DuplicatePort { name: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    InputShape,
    InputData,
    Network,
    Storage,
    Serialization,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl CongestionError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ConfigError { .. }
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::DuplicatePort { .. }
            | Self::TomlError(_) => ErrorCategory::Configuration,
            Self::MissingColumn { .. } => ErrorCategory::InputShape,
            Self::InvalidRecord { .. } | Self::CsvError(_) => ErrorCategory::InputData,
            Self::HttpError(_) => ErrorCategory::Network,
            Self::IoError(_) | Self::ZipError(_) => ErrorCategory::Storage,
            Self::SerializationError(_) => ErrorCategory::Serialization,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 網路錯誤通常可以重試
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Configuration
            | ErrorCategory::InputShape
            | ErrorCategory::InputData => ErrorSeverity::High,
            ErrorCategory::Storage | ErrorCategory::Serialization => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            Self::MissingColumn { column } => format!(
                "Add a '{}' column to the input CSV (AIS feed headers such as LAT/LON/MMSI are renamed automatically)",
                column
            ),
            Self::InvalidRecord { line, .. } => format!(
                "Fix the value on line {} or rerun with --on-invalid drop to skip malformed rows",
                line
            ),
            Self::DuplicatePort { name } => {
                format!("Give every [[ports]] entry a unique name ('{}' appears twice)", name)
            }
            Self::InvalidConfigValueError { field, .. } | Self::MissingConfigError { field } => {
                format!("Check the '{}' setting", field)
            }
            Self::ConfigError { .. } | Self::TomlError(_) => {
                "Check the configuration file syntax and values".to_string()
            }
            Self::HttpError(_) => "Check the input URL and network connectivity, then retry".to_string(),
            Self::CsvError(_) => "Make sure the input is a well-formed CSV file".to_string(),
            Self::IoError(_) | Self::ZipError(_) => {
                "Check that the input exists and the output path is writable".to_string()
            }
            Self::SerializationError(_) => "Report this as a bug".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::InputShape => format!("The vessel dataset has the wrong shape: {}", self),
            ErrorCategory::InputData => format!("The vessel dataset contains bad data: {}", self),
            ErrorCategory::Network => format!("Could not download the vessel dataset: {}", self),
            ErrorCategory::Storage => format!("Could not read or write files: {}", self),
            ErrorCategory::Serialization => format!("Could not serialize the results: {}", self),
        }
    }

    /// 依嚴重程度決定程式結束碼
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, CongestionError>;
