use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Vector store table '{0}' does not exist; run the ingest binary first")]
    StoreMissing(String),

    #[error("Question is empty")]
    EmptyQuestion,

    #[error("Model server error: {0}")]
    ModelServer(String),
}

pub type Result<T> = std::result::Result<T, Error>;
