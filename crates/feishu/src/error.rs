use std::path::Path;

/// Errors raised by the Feishu media client.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The image key, file key or message does not resolve remotely.
    #[error("{message}")]
    NotFound { message: String },

    /// The service refused the request (oversize, unsupported format,
    /// invalid destination, expired key, ...). `message` is the service's
    /// own text.
    #[error("{message}")]
    RemoteRejected { code: Option<i64>, message: String },

    /// Reading a local file failed.
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// The account credentials are unusable.
    #[error("invalid Feishu config: {message}")]
    InvalidConfig { message: String },

    /// The service answered with something that is not a valid API reply.
    #[error("invalid Feishu API response: {message}")]
    InvalidResponse { message: String },

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

impl Error {
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn remote_rejected(code: Option<i64>, message: impl Into<String>) -> Self {
        Self::RemoteRejected {
            code,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn read_failed(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            context: format!("failed to read '{}'", path.display()),
            source,
        }
    }

    #[must_use]
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
