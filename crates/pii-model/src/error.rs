use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("duplicate column key: {0}")]
    DuplicateKey(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
