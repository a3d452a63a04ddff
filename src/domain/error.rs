//! Domain error types.

/// Top-level error type for tradenotify.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("schema error: {reason}")]
    Schema { reason: String },

    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl NotifyError {
    pub fn schema(reason: impl Into<String>) -> Self {
        NotifyError::Schema {
            reason: reason.into(),
        }
    }

    pub fn invalid_parameter(name: &str, reason: impl Into<String>) -> Self {
        NotifyError::InvalidParameter {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<&NotifyError> for std::process::ExitCode {
    fn from(err: &NotifyError) -> Self {
        let code: u8 = match err {
            NotifyError::Io(_) | NotifyError::Csv(_) => 1,
            NotifyError::ConfigParse { .. }
            | NotifyError::ConfigMissing { .. }
            | NotifyError::ConfigInvalid { .. } => 2,
            NotifyError::Data { .. } => 3,
            NotifyError::Schema { .. } => 4,
            NotifyError::InvalidParameter { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
