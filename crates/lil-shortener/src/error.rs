use lil_core::{CoreError, StoreError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ShortenerError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShortenerError {
    #[error("invalid short code: {0}")]
    InvalidCode(String),
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("invalid ttl: {0}")]
    InvalidTtl(String),
    #[error("short code already exists: {0}")]
    CodeCollision(String),
    #[error("no free short code found after {attempts} attempts")]
    CreateExhausted { attempts: usize },
    #[error("short code not found: {0}")]
    NotFound(String),
    #[error("invalid search limit: {0}")]
    InvalidLimit(usize),
    #[error("invalid search cursor: {0}")]
    InvalidCursor(String),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("storage error: {0}")]
    Storage(String),
}

impl From<CoreError> for ShortenerError {
    fn from(value: CoreError) -> Self {
        match value {
            CoreError::InvalidShortCode(message) => Self::InvalidCode(message),
            CoreError::InvalidUrl(message) => Self::InvalidUrl(message),
            CoreError::InvalidTtl(message) => Self::InvalidTtl(message),
        }
    }
}

impl From<StoreError> for ShortenerError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Collision(code) => Self::CodeCollision(code),
            StoreError::NotFound(code) => Self::NotFound(code),
            StoreError::InvalidLimit(limit) => Self::InvalidLimit(limit),
            StoreError::InvalidCursor(cursor) => Self::InvalidCursor(cursor),
            StoreError::Unavailable(message) => Self::Unavailable(message),
            StoreError::InvalidData(message) => Self::Storage(message),
        }
    }
}
