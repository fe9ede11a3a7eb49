pub mod error;
pub mod host;
pub mod models;

// Re-export commonly used types
pub use error::{HostError, HostResult};
pub use host::{AlterableContext, Application, BeanHost, MetaAnnotations};
pub use models::*;
