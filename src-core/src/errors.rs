use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid account snapshot: {0}")]
    InvalidSnapshot(String),

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Member '{0}' not found")]
    MemberNotFound(String),

    #[error("Member data source error: {0}")]
    DataSource(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Missing field: {0}")]
    MissingField(String),
}

pub type Result<T> = std::result::Result<T, Error>;
