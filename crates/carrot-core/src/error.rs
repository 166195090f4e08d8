use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid download request: {0}")]
    InvalidRequest(String),

    #[error("Unknown tab: {0}")]
    UnknownTab(String),

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
