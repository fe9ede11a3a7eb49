use restbind_api::{HostError, TypeName};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AssemblyError {
    #[error("Host error: {0}")]
    Host(#[from] HostError),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Provider classes not claimed by any application: {}", join_names(.0))]
    OrphanProviders(Vec<TypeName>),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON serialization/deserialization error: {0}")]
    Json(#[from] serde_json::Error),
}

fn join_names(names: &[TypeName]) -> String {
    names
        .iter()
        .map(TypeName::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T> = std::result::Result<T, AssemblyError>;
