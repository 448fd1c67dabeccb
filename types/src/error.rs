//! Errors raised while constructing or validating fundamental types.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypesError {
    #[error("invalid identity: {0}")]
    InvalidIdentity(String),

    #[error("invalid governance parameter {name}: {reason}")]
    InvalidParam { name: &'static str, reason: String },
}
