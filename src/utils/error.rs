use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Query file not found: {path}")]
    QueryFileNotFound { path: String },

    #[error("Failed to launch query tool '{program}': {source}")]
    QueryLaunchError {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Query tool '{program}' failed ({status}): {stderr}")]
    QueryExecutionError {
        program: String,
        status: String,
        stderr: String,
    },

    #[error("Failed to parse query output: {message}")]
    QueryOutputError { message: String },

    #[error("Cannot coerce field '{field}' (value {value}): {reason}")]
    CoercionError {
        field: String,
        value: String,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, EtlError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    ExternalTool,
    Data,
    Io,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    /// 依嚴重程度決定程序退出碼
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::IoError(_) => ErrorCategory::Io,
            EtlError::SerializationError(_) | EtlError::CoercionError { .. } => {
                ErrorCategory::Data
            }
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::MissingConfigError { .. }
            | EtlError::QueryFileNotFound { .. } => ErrorCategory::Configuration,
            EtlError::QueryLaunchError { .. }
            | EtlError::QueryExecutionError { .. }
            | EtlError::QueryOutputError { .. } => ErrorCategory::ExternalTool,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            EtlError::QueryFileNotFound { .. } => ErrorSeverity::Low,
            EtlError::CoercionError { .. } => ErrorSeverity::Medium,
            EtlError::QueryLaunchError { .. } | EtlError::IoError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    /// 只有缺少查詢檔案時可以跳過該時間區間繼續執行
    pub fn is_recoverable(&self) -> bool {
        matches!(self, EtlError::QueryFileNotFound { .. })
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            EtlError::QueryFileNotFound { .. } => {
                "Check that the query file exists under the base directory"
            }
            EtlError::QueryLaunchError { .. } => {
                "Make sure the bq CLI is installed and on PATH (or pass --bq-program)"
            }
            EtlError::QueryExecutionError { .. } => {
                "Run the query manually with bq and check authentication and SQL syntax"
            }
            EtlError::QueryOutputError { .. } => {
                "Verify the query tool is emitting JSON (--format=json)"
            }
            EtlError::CoercionError { .. } => {
                "Fix the offending rows in the query, or rerun with --lenient to skip them"
            }
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::MissingConfigError { .. } => {
                "Review the configuration file and command line flags"
            }
            EtlError::IoError(_) => "Check file permissions and available disk space",
            EtlError::SerializationError(_) => "Inspect the records being written",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            EtlError::QueryExecutionError { stderr, .. } => {
                format!("BigQuery error: {}", stderr.trim())
            }
            EtlError::QueryOutputError { message } => {
                format!("Failed to parse BigQuery output: {}", message)
            }
            EtlError::QueryLaunchError { program, .. } => {
                format!("Could not start query tool '{}'", program)
            }
            other => other.to_string(),
        }
    }
}
