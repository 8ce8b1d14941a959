use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExplorerError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("TSV parsing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Server returned {status} for {url}")]
    UpstreamError { status: u16, url: String },

    #[error("Metadata must have a date column.")]
    MissingDateColumn,

    #[error("Unknown column: {column}")]
    UnknownColumn { column: String },

    #[error("Session not found or expired: {id}")]
    SessionNotFound { id: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Input,
    NotFound,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ExplorerError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ExplorerError::HttpError(_) | ExplorerError::UpstreamError { .. } => {
                ErrorCategory::Network
            }
            ExplorerError::CsvError(_)
            | ExplorerError::MissingDateColumn
            | ExplorerError::UnknownColumn { .. }
            | ExplorerError::ValidationError { .. } => ErrorCategory::Input,
            ExplorerError::SessionNotFound { .. } => ErrorCategory::NotFound,
            ExplorerError::TomlError(_)
            | ExplorerError::InvalidConfigValueError { .. }
            | ExplorerError::MissingConfigError { .. } => ErrorCategory::Configuration,
            ExplorerError::IoError(_)
            | ExplorerError::SerializationError(_)
            | ExplorerError::ProcessingError { .. } => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::NotFound => ErrorSeverity::Low,
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Input | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ExplorerError::HttpError(e) if e.is_timeout() => {
                "Timed out while downloading the metadata file".to_string()
            }
            ExplorerError::HttpError(_) => "Could not download the metadata file".to_string(),
            ExplorerError::UpstreamError { status, url } => {
                format!("Download of {} failed with status {}", url, status)
            }
            ExplorerError::CsvError(_) => "The file is not valid tab-separated text".to_string(),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ExplorerError::HttpError(_) | ExplorerError::UpstreamError { .. } => {
                "Check the URL and your network connection, then try again"
            }
            ExplorerError::CsvError(_) => "Make sure the file is a TSV with a header row",
            ExplorerError::MissingDateColumn => "Add a 'date' column in YYYY-MM-DD format",
            ExplorerError::UnknownColumn { .. } => "Pick a column from the Color By list",
            ExplorerError::SessionNotFound { .. } => "Load the metadata file again",
            ExplorerError::TomlError(_)
            | ExplorerError::InvalidConfigValueError { .. }
            | ExplorerError::MissingConfigError { .. } => "Fix the configuration file and restart",
            ExplorerError::ValidationError { .. } => "Check the request parameters",
            ExplorerError::IoError(_)
            | ExplorerError::SerializationError(_)
            | ExplorerError::ProcessingError { .. } => "See the server log for details",
        }
    }
}

pub type Result<T> = std::result::Result<T, ExplorerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_date_column_message() {
        let err = ExplorerError::MissingDateColumn;
        assert_eq!(err.to_string(), "Metadata must have a date column.");
        assert_eq!(err.category(), ErrorCategory::Input);
        assert_eq!(err.severity(), ErrorSeverity::High);
    }

    #[test]
    fn test_upstream_error_is_network() {
        let err = ExplorerError::UpstreamError {
            status: 404,
            url: "https://example.com/m.tsv".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Network);
        assert!(err.user_friendly_message().contains("404"));
    }
}
