use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("invalid financial year label '{0}' (expected YYYY-YYYY)")]
    InvalidYearLabel(String),
    #[error("invalid area type '{0}'")]
    InvalidAreaType(String),
    #[error("invalid program type '{0}'")]
    InvalidProgramType(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
