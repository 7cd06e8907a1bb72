use thiserror::Error;

pub type Result<T> = std::result::Result<T, MailerError>;

#[derive(Debug, Error)]
pub enum MailerError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Mail API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

impl From<reqwest::Error> for MailerError {
    fn from(err: reqwest::Error) -> Self {
        MailerError::Network(err.to_string())
    }
}
