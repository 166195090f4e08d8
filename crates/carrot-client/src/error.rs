use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Non-success response. The body text is the user-facing message.
    #[error("{body}")]
    Api { status: u16, body: String },

    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => Some(*status),
            Error::Request(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
