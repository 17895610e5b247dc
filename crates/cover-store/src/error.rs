//! Error type for `cover-store`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("invalid stored value: {0}")]
    Model(#[from] cover_model::ModelError),

    #[error("date/time parse error: {0}")]
    DateParse(String),
}

pub type Result<T, E = StoreError> = std::result::Result<T, E>;
