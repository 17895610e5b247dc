//! Error types for vaccine name resolution.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MapError {
    #[error("fuzzy threshold must be between 0 and 1, got {0}")]
    InvalidThreshold(f64),
}

pub type Result<T> = std::result::Result<T, MapError>;
