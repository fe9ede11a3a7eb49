//! Boundary between the assembly pass and the container hosting it.
//!
//! The host discovers types, introspects annotations and owns instance
//! creation and scoping. The assembly pass only talks to it through these
//! traits.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::error::HostResult;
use crate::models::{Annotation, BeanAttributes, Scope, TypeMetadata, TypeName};

/// A runtime application instance.
pub trait Application: Send + Sync {
    /// Classes the application claims.
    fn classes(&self) -> BTreeSet<TypeName>;

    /// Types of pre-built singleton instances the application exposes.
    fn singletons(&self) -> Vec<TypeName> {
        Vec::new()
    }
}

/// A scope context whose instances can be retrieved and destroyed explicitly.
pub trait AlterableContext {
    /// Return the contextual instance of `bean`, creating it if needed.
    fn get(&self, bean: &BeanAttributes) -> HostResult<Arc<dyn Application>>;

    /// Destroy the contextual instance of `bean`.
    fn destroy(&self, bean: &BeanAttributes) -> HostResult<()>;
}

pub trait BeanHost {
    /// Alterable context for `scope`, if the host has one.
    fn context(&self, scope: &Scope) -> Option<&dyn AlterableContext>;

    /// Construct an instance of `bean` outside of any context.
    fn create(&self, bean: &BeanAttributes) -> HostResult<Arc<dyn Application>>;

    /// Destroy an instance previously returned by [`BeanHost::create`].
    fn destroy(&self, bean: &BeanAttributes, instance: Arc<dyn Application>) -> HostResult<()>;

    /// Read the static structure of a type.
    fn read_type(&self, type_name: &TypeName) -> HostResult<TypeMetadata>;
}

/// Annotations declared on annotation types, for meta-annotation lookups.
pub trait MetaAnnotations {
    fn annotations_of(&self, annotation_type: &TypeName) -> Vec<Annotation>;
}
