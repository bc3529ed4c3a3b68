#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A mandatory identifying parameter was absent or empty.
    #[error("'{name}' is required")]
    MissingParameter { name: &'static str },

    #[error("invalid '{name}': {message}")]
    InvalidParameter { name: &'static str, message: String },

    #[error("unknown tool: {name}")]
    UnknownTool { name: String },

    #[error(transparent)]
    Media(#[from] larkbridge_media::Error),

    #[error(transparent)]
    Feishu(#[from] larkbridge_feishu::Error),

    #[error("failed to encode tool details: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    #[must_use]
    pub fn missing(name: &'static str) -> Self {
        Self::MissingParameter { name }
    }

    #[must_use]
    pub fn invalid(name: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
