//! Reconciles discovered resource and provider classes with the
//! applications that claim them.

pub mod assembly;
pub mod classify;
pub mod config;
pub mod error;
pub mod grouping;
pub mod host;
pub mod logging;
pub mod registry;
pub mod resolver;
pub mod synthetic;

pub use assembly::{AssemblyOutcome, AssemblyPass};
pub use config::{AssemblyConfig, Markers, OrphanProviderPolicy};
pub use error::{AssemblyError, Result};
pub use registry::{CandidateRegistry, Owner, Role};
