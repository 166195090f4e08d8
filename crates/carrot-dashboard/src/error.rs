use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Backend failure; displays the backend's message unchanged.
    #[error("{0}")]
    Api(#[from] carrot_client::Error),

    #[error(transparent)]
    Core(#[from] carrot_core::Error),

    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
