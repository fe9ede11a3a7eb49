use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use super::qualifier::QualifierSet;
use super::scope::Scope;
use super::types::{TypeMetadata, TypeName};
use crate::host::Application;

pub const SYNTHETIC_APPLICATION_TYPE: &str = "restbind.SyntheticApplication";
pub const OBJECT_TYPE: &str = "java.lang.Object";

/// A bean the assembly pass asks the host to add.
#[derive(Debug, Clone)]
pub struct RegistrationRequest {
    pub types: Vec<TypeName>,
    pub scope: Scope,
    pub qualifiers: QualifierSet,
    pub origin: RegistrationOrigin,
}

#[derive(Debug, Clone)]
pub enum RegistrationOrigin {
    /// The base path declared on an application, exposed as a value bean.
    BasePath(String),
    /// Read from the declared structure of an existing class.
    ClassRead(TypeMetadata),
    /// Built by a factory capturing a fixed class set.
    Synthetic(SyntheticApplicationFactory),
}

impl RegistrationRequest {
    pub fn kind(&self) -> &'static str {
        match self.origin {
            RegistrationOrigin::BasePath(_) => "base-path",
            RegistrationOrigin::ClassRead(_) => "class-read",
            RegistrationOrigin::Synthetic(_) => "synthetic",
        }
    }

    /// Classes owned through this registration: the read class itself, or
    /// every class of a synthetic application.
    pub fn owned_classes(&self) -> BTreeSet<TypeName> {
        match &self.origin {
            RegistrationOrigin::BasePath(_) => BTreeSet::new(),
            RegistrationOrigin::ClassRead(meta) => BTreeSet::from([meta.name.clone()]),
            RegistrationOrigin::Synthetic(factory) => factory.classes().clone(),
        }
    }

    pub fn as_synthetic(&self) -> Option<&SyntheticApplicationFactory> {
        match &self.origin {
            RegistrationOrigin::Synthetic(factory) => Some(factory),
            _ => None,
        }
    }
}

/// Application fabricated for classes no declared application claimed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntheticApplication {
    classes: Arc<BTreeSet<TypeName>>,
}

impl Application for SyntheticApplication {
    fn classes(&self) -> BTreeSet<TypeName> {
        self.classes.as_ref().clone()
    }
}

/// Creates [`SyntheticApplication`]s over a class set fixed at construction.
#[derive(Clone)]
pub struct SyntheticApplicationFactory {
    classes: Arc<BTreeSet<TypeName>>,
    create: Arc<dyn Fn() -> SyntheticApplication + Send + Sync>,
}

impl SyntheticApplicationFactory {
    pub fn new(classes: BTreeSet<TypeName>) -> Self {
        let classes = Arc::new(classes);
        let captured = Arc::clone(&classes);
        Self {
            classes,
            create: Arc::new(move || SyntheticApplication {
                classes: Arc::clone(&captured),
            }),
        }
    }

    pub fn classes(&self) -> &BTreeSet<TypeName> {
        &self.classes
    }

    pub fn create(&self) -> SyntheticApplication {
        (self.create)()
    }
}

impl fmt::Debug for SyntheticApplicationFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyntheticApplicationFactory")
            .field("classes", &self.classes)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_instances_share_fixed_classes() {
        let classes = BTreeSet::from([TypeName::new("a.R1"), TypeName::new("a.P1")]);
        let factory = SyntheticApplicationFactory::new(classes.clone());

        let first = factory.create();
        let second = factory.create();
        assert_eq!(first, second);
        assert_eq!(first.classes(), classes);
    }
}
