//! Synthetic applications for resources and providers no declared
//! application claimed, one per qualifier group.

use restbind_api::{
    OBJECT_TYPE, RegistrationOrigin, RegistrationRequest, SYNTHETIC_APPLICATION_TYPE,
    SyntheticApplicationFactory, TypeName,
};
use tracing::debug;

use crate::config::AssemblyConfig;
use crate::grouping::QualifierGroup;
use crate::registry::{CandidateRegistry, Owner, Role};

/// Emits one synthetic application registration per qualifier group.
pub struct SyntheticApplicationBuilder<'a> {
    config: &'a AssemblyConfig,
}

impl<'a> SyntheticApplicationBuilder<'a> {
    pub fn new(config: &'a AssemblyConfig) -> Self {
        Self { config }
    }

    pub fn build(
        &self,
        registry: &mut CandidateRegistry,
        groups: &[QualifierGroup],
    ) -> Vec<RegistrationRequest> {
        groups
            .iter()
            .map(|group| self.build_one(registry, group))
            .collect()
    }

    fn build_one(&self, registry: &mut CandidateRegistry, group: &QualifierGroup) -> RegistrationRequest {
        let owner = Owner::Synthetic(group.qualifiers.clone());
        for resource in &group.resources {
            registry.assign(resource, Role::Resource, owner.clone());
        }
        for provider in &group.providers {
            registry.assign(provider, Role::Provider, owner.clone());
        }
        registry.record_application_qualifiers(group.qualifiers.clone());

        let factory = SyntheticApplicationFactory::new(group.classes());
        debug!(
            "Synthetic application {} owns {} class(es)",
            group.qualifiers,
            factory.classes().len()
        );

        RegistrationRequest {
            types: vec![
                TypeName::new(SYNTHETIC_APPLICATION_TYPE),
                self.config.markers.application.clone(),
                TypeName::new(OBJECT_TYPE),
            ],
            scope: self.config.synthetic_scope.clone(),
            qualifiers: group.qualifiers.clone(),
            origin: RegistrationOrigin::Synthetic(factory),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use restbind_api::{BeanAttributes, Qualifier, QualifierSet, Scope};
    use std::collections::BTreeSet;

    #[test]
    fn test_build_assigns_members_and_records_qualifiers() {
        let config = AssemblyConfig::default();
        let mut registry = CandidateRegistry::new();
        let r1 = TypeName::new("a.R1");
        let p1 = TypeName::new("a.P1");
        registry.record_resource_candidate(r1.clone());
        registry.record_provider_candidate(p1.clone());
        registry.observe_bean_attributes(&r1, &BeanAttributes::new("a.R1"), false);
        registry.observe_bean_attributes(&p1, &BeanAttributes::new("a.P1"), false);

        let qualifiers = QualifierSet::of(Qualifier::new("q.A"));
        let group = QualifierGroup {
            key: qualifiers.clone(),
            qualifiers: qualifiers.clone(),
            resources: vec![r1.clone()],
            providers: vec![p1.clone()],
        };

        let registrations = SyntheticApplicationBuilder::new(&config).build(&mut registry, &[group]);
        assert_eq!(registrations.len(), 1);
        let registration = &registrations[0];
        assert_eq!(registration.scope, Scope::SINGLETON);
        assert_eq!(registration.qualifiers, qualifiers);
        assert_eq!(
            registration.as_synthetic().map(|f| f.classes().clone()),
            Some(BTreeSet::from([r1.clone(), p1.clone()]))
        );

        let owner = Owner::Synthetic(qualifiers.clone());
        assert_eq!(registry.owners(&r1), vec![&owner]);
        assert_eq!(registry.owners(&p1), vec![&owner]);
        assert!(registry.all_application_qualifier_sets().contains(&qualifiers));
    }
}
