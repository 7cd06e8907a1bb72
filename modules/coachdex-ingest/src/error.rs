pub type Result<T> = std::result::Result<T, IngestError>;

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// Upstream answered 429. Callers decide whether and when to retry;
    /// adapters never back off on their own.
    #[error("Rate limit exceeded. Please try again later.")]
    RateLimited,

    #[error("Upstream error{}: {message}", .status.map(|s| format!(" (status {s})")).unwrap_or_default())]
    Upstream {
        status: Option<u16>,
        message: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(#[from] coachdex_store::StoreError),
}

impl From<hasdata_client::HasDataError> for IngestError {
    fn from(err: hasdata_client::HasDataError) -> Self {
        use hasdata_client::HasDataError as E;
        match err {
            E::RateLimited => IngestError::RateLimited,
            E::Api { status, message } => IngestError::Upstream {
                status: Some(status),
                message,
            },
            E::Network(message) | E::Parse(message) => IngestError::Upstream {
                status: None,
                message,
            },
        }
    }
}

impl From<brightdata_client::BrightDataError> for IngestError {
    fn from(err: brightdata_client::BrightDataError) -> Self {
        use brightdata_client::BrightDataError as E;
        match err {
            E::RateLimited => IngestError::RateLimited,
            E::Api { status, message } => IngestError::Upstream {
                status: Some(status),
                message,
            },
            E::Network(message) | E::Parse(message) => IngestError::Upstream {
                status: None,
                message,
            },
        }
    }
}
