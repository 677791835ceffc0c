use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("Content unavailable from {source_name}: {message}")]
    ContentUnavailable {
        source_name: String,
        message: String,
    },

    #[error("Invalid {entity} '{id}': field `{field}` {reason}")]
    ValidationError {
        entity: String,
        id: String,
        field: String,
        reason: String,
    },

    #[error("Failed to persist `{key}`: {message}")]
    PersistenceFailure { key: String, message: String },

    #[error("Operation `{operation}` timed out after {after_ms} ms")]
    TimedOut { operation: String, after_ms: u64 },

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid configuration value for `{field}` ('{value}'): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, ContentError>;

impl ContentError {
    pub fn validation(
        entity: &str,
        id: &str,
        field: &str,
        reason: impl Into<String>,
    ) -> Self {
        ContentError::ValidationError {
            entity: entity.to_string(),
            id: id.to_string(),
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    pub fn unavailable(source_name: &str, message: impl Into<String>) -> Self {
        ContentError::ContentUnavailable {
            source_name: source_name.to_string(),
            message: message.into(),
        }
    }

    pub fn persistence(key: &str, message: impl Into<String>) -> Self {
        ContentError::PersistenceFailure {
            key: key.to_string(),
            message: message.into(),
        }
    }

    /// 啟動階段的錯誤: 程式不應繼續執行
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ContentError::ContentUnavailable { .. }
                | ContentError::ValidationError { .. }
                | ContentError::ConfigError { .. }
                | ContentError::InvalidConfigValueError { .. }
        )
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ContentError::ContentUnavailable { .. } | ContentError::HttpError(_) => {
                "Check that the content source exists and is reachable, or set content.on_unavailable = \"embedded\""
            }
            ContentError::ValidationError { .. } | ContentError::SerializationError(_) => {
                "Fix the content document: every text field needs all configured languages"
            }
            ContentError::PersistenceFailure { .. } | ContentError::IoError(_) => {
                "Check that the storage directory is writable, then submit again"
            }
            ContentError::TimedOut { .. } => "Retry the operation or raise repository.timeout_ms",
            ContentError::CsvError(_) => "Check that the export path is writable",
            ContentError::ConfigError { .. } | ContentError::InvalidConfigValueError { .. } => {
                "Review the TOML configuration file"
            }
        }
    }
}
