//! Claims declared classes on behalf of discovered applications.

mod acquire;

pub use acquire::AcquiredApplication;

use restbind_api::{
    BeanAttributes, BeanHost, QualifierSet, RegistrationOrigin, RegistrationRequest, TypeName,
};
use std::collections::{HashMap, HashSet};
use tracing::{debug, trace, warn};

use crate::config::AssemblyConfig;
use crate::error::Result;
use crate::registry::{CandidateRegistry, Owner};

pub struct ApplicationResolver<'a> {
    config: &'a AssemblyConfig,
    host: &'a dyn BeanHost,
    /// Class-read registrations already emitted, keyed by class and qualifiers.
    emitted: HashSet<(TypeName, QualifierSet)>,
}

impl<'a> ApplicationResolver<'a> {
    pub fn new(config: &'a AssemblyConfig, host: &'a dyn BeanHost) -> Self {
        Self {
            config,
            host,
            emitted: HashSet::new(),
        }
    }

    /// Resolve every application bean known to `registry`, in discovery order.
    pub fn resolve_all(
        &mut self,
        registry: &mut CandidateRegistry,
        base_paths: &HashMap<TypeName, String>,
    ) -> Result<Vec<RegistrationRequest>> {
        let applications: Vec<BeanAttributes> = registry.applications().cloned().collect();
        let mut registrations = Vec::new();
        for application in &applications {
            let base_path = base_paths.get(&application.bean_class).map(String::as_str);
            self.resolve(registry, application, base_path, &mut registrations)?;
        }
        Ok(registrations)
    }

    pub fn resolve(
        &mut self,
        registry: &mut CandidateRegistry,
        application: &BeanAttributes,
        base_path: Option<&str>,
        out: &mut Vec<RegistrationRequest>,
    ) -> Result<()> {
        let acquired = AcquiredApplication::acquire(self.host, application)?;
        debug!(
            "Resolving application {} ({})",
            application.bean_class,
            if acquired.is_contextual() { "contextual" } else { "constructed" }
        );

        if let Some(path) = base_path {
            out.push(RegistrationRequest {
                types: vec![self.config.markers.application_path.clone()],
                scope: self.config.host_scope.clone(),
                qualifiers: application.qualifiers.clone(),
                origin: RegistrationOrigin::BasePath(path.to_string()),
            });
        }

        let instance = acquired.application();
        let singletons = instance.singletons();
        if !singletons.is_empty() {
            trace!(
                "Ignoring {} singleton(s) of {}",
                singletons.len(),
                application.bean_class
            );
        }

        let owner = Owner::Application(application.bean_class.clone());
        for class in instance.classes() {
            self.claim_or_read(registry, &class, application, &owner, out)?;
        }

        acquired.release()?;
        Ok(())
    }

    fn claim_or_read(
        &mut self,
        registry: &mut CandidateRegistry,
        class: &TypeName,
        application: &BeanAttributes,
        owner: &Owner,
        out: &mut Vec<RegistrationRequest>,
    ) -> Result<()> {
        // Already a bean: ownership is tracked through the registry.
        let claims = registry.claims(class);
        if claims.any() {
            for role in claims.roles() {
                registry.assign(class, role, owner.clone());
            }
            return Ok(());
        }

        let owners = registry.owners(class);
        if !owners.is_empty() {
            let owners: Vec<String> = owners.iter().map(ToString::to_string).collect();
            warn!(
                "{} declares {} which is already owned by {}",
                application.bean_class,
                class,
                owners.join(", ")
            );
            return Ok(());
        }

        // A candidate without a bean is owned through its class read.
        registry.assign_pending(class, owner);

        let qualifiers = application
            .qualifiers
            .with(self.config.resource_marker.clone());
        if !self.emitted.insert((class.clone(), qualifiers.clone())) {
            debug!("{} already registered under {}", class, qualifiers);
            return Ok(());
        }

        let metadata = self.host.read_type(class)?;
        let scope = metadata
            .scope
            .clone()
            .unwrap_or_else(|| self.config.default_class_scope.clone());
        out.push(RegistrationRequest {
            types: metadata.closure(),
            scope,
            qualifiers,
            origin: RegistrationOrigin::ClassRead(metadata),
        });
        Ok(())
    }
}
