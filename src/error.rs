use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrefsError {
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Failed to read '{key}': {reason}")]
    StorageRead { key: String, reason: String },

    #[error("Failed to write '{key}': {reason}")]
    StorageWrite { key: String, reason: String },

    #[error("Malformed value for '{key}': {value:?}")]
    MalformedValue { key: String, value: String },

    #[error("Config error: {0}")]
    Config(String),

    #[error("Browser environment error: {0}")]
    Environment(String),
}

impl From<PrefsError> for String {
    fn from(err: PrefsError) -> Self {
        err.to_string()
    }
}

impl From<serde_json::Error> for PrefsError {
    fn from(err: serde_json::Error) -> Self {
        PrefsError::Config(err.to_string())
    }
}
