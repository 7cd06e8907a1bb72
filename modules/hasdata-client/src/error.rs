use thiserror::Error;

pub type Result<T> = std::result::Result<T, HasDataError>;

#[derive(Debug, Error)]
pub enum HasDataError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Rate limit exceeded")]
    RateLimited,

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for HasDataError {
    fn from(err: reqwest::Error) -> Self {
        HasDataError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for HasDataError {
    fn from(err: serde_json::Error) -> Self {
        HasDataError::Parse(err.to_string())
    }
}
