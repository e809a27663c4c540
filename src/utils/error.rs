use thiserror::Error;

#[derive(Error, Debug)]
pub enum PrepError {
    #[error("Input file not found: {path}")]
    InputNotFound { path: String },

    #[error("Invalid JSON format in {path}: {source}")]
    InvalidJson {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unexpected JSON root in {path}: expected {expected}, found {found}")]
    UnexpectedRoot {
        path: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Invalid reference data in {path}: {message}")]
    InvalidReference { path: String, message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
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
    Input,
    Data,
    Config,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl PrepError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            PrepError::InputNotFound { .. } => ErrorCategory::Input,
            PrepError::InvalidJson { .. }
            | PrepError::UnexpectedRoot { .. }
            | PrepError::InvalidReference { .. } => ErrorCategory::Data,
            PrepError::ConfigError { .. }
            | PrepError::InvalidConfigValueError { .. }
            | PrepError::MissingConfigError { .. } => ErrorCategory::Config,
            PrepError::IoError(_) | PrepError::SerializationError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Config => ErrorSeverity::Medium,
            ErrorCategory::Input | ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// Errors that only invalidate the single candidate file they came from.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            PrepError::InvalidJson { .. } | PrepError::UnexpectedRoot { .. }
        )
    }

    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            PrepError::InputNotFound { path } => {
                format!("Check that '{}' exists relative to the working directory", path)
            }
            PrepError::InvalidJson { path, .. } => {
                format!("Validate '{}' with a JSON linter and fix the syntax error", path)
            }
            PrepError::UnexpectedRoot { expected, .. } => {
                format!("Make sure the document root is {}", expected)
            }
            PrepError::InvalidReference { .. } => {
                "Every reference entry must be an object with a string \"name\" field"
                    .to_string()
            }
            PrepError::IoError(_) => {
                "Check file permissions and available disk space".to_string()
            }
            PrepError::SerializationError(_) => {
                "The data could not be serialized; inspect the offending record".to_string()
            }
            PrepError::ConfigError { .. } | PrepError::InvalidConfigValueError { .. } => {
                "Review the configuration file and command line flags".to_string()
            }
            PrepError::MissingConfigError { field } => {
                format!("Provide a value for '{}'", field)
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            PrepError::InputNotFound { path } => format!("Input file {} not found.", path),
            PrepError::InvalidJson { path, .. } => {
                format!("Input file {} is not valid JSON.", path)
            }
            PrepError::UnexpectedRoot {
                path,
                expected,
                found,
            } => format!(
                "The root element of {} must be {} (found {}).",
                path, expected, found
            ),
            other => format!("An error occurred: {}", other),
        }
    }
}

pub type Result<T> = std::result::Result<T, PrepError>;
