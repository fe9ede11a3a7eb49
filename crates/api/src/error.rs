use crate::models::{Scope, TypeName};

#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("Context for scope {0} is not active")]
    ContextNotActive(Scope),
    #[error("Unsupported operation: {0}")]
    Unsupported(String),
    #[error("Unknown type: {0}")]
    UnknownType(TypeName),
    #[error("Unknown bean: {0}")]
    UnknownBean(TypeName),
    #[error("Failed to create {bean}: {reason}")]
    Creation { bean: TypeName, reason: String },
    #[error("Internal error: {0}")]
    Internal(String),
}

pub type HostResult<T> = std::result::Result<T, HostError>;
