//! The assembly pass: the ordered callback contract exposed to the host.
//!
//! The host reports every marked type through [`AssemblyPass::discover_type`],
//! every finished bean through [`AssemblyPass::observe_bean`], and finally
//! calls [`AssemblyPass::assemble`] once. `assemble` consumes the pass, so
//! its state cannot leak into another pass.

use restbind_api::{
    BeanAttributes, BeanHost, QualifierSet, RegistrationRequest, TypeMetadata, TypeName,
};
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, info};

use crate::classify::{Classification, Classifier};
use crate::config::AssemblyConfig;
use crate::error::{AssemblyError, Result};
use crate::grouping::QualifierGrouper;
use crate::registry::{CandidateRegistry, Claims, Owner, Role};
use crate::resolver::ApplicationResolver;
use crate::synthetic::SyntheticApplicationBuilder;

#[derive(Debug)]
pub struct AssemblyPass {
    config: AssemblyConfig,
    registry: CandidateRegistry,
    base_paths: HashMap<TypeName, String>,
}

#[derive(Debug)]
pub struct AssemblyOutcome {
    pub registrations: Vec<RegistrationRequest>,
    /// Distinct qualifier sets of every declared and synthetic application.
    pub application_qualifiers: BTreeSet<QualifierSet>,
    pub assignments: Vec<(TypeName, Role, Owner)>,
    pub orphan_providers: Vec<TypeName>,
    /// Candidates that were discovered but never backed by a bean.
    pub discarded: Vec<(TypeName, Role)>,
}

impl AssemblyOutcome {
    pub fn owners_of(&self, type_name: &TypeName) -> Vec<&Owner> {
        self.assignments
            .iter()
            .filter(|(name, _, _)| name == type_name)
            .map(|(_, _, owner)| owner)
            .collect()
    }

    pub fn synthetic_registrations(&self) -> impl Iterator<Item = &RegistrationRequest> {
        self.registrations
            .iter()
            .filter(|r| r.as_synthetic().is_some())
    }
}

impl Default for AssemblyPass {
    fn default() -> Self {
        Self::new(AssemblyConfig::default())
    }
}

impl AssemblyPass {
    pub fn new(config: AssemblyConfig) -> Self {
        Self {
            config,
            registry: CandidateRegistry::new(),
            base_paths: HashMap::new(),
        }
    }

    pub fn config(&self) -> &AssemblyConfig {
        &self.config
    }

    pub fn registry(&self) -> &CandidateRegistry {
        &self.registry
    }

    /// Classify a scanned type and record it as a candidate. A base path
    /// declared on the type is remembered for its application registration.
    pub fn discover_type(&mut self, metadata: &TypeMetadata) -> Result<Classification> {
        if metadata.name.is_blank() {
            return Err(AssemblyError::InvalidInput(
                "discovered type has no name".to_string(),
            ));
        }

        let markers = &self.config.markers;
        let classification = Classifier::new(markers).classify(metadata);
        if classification.resource {
            self.registry
                .record_resource_candidate(metadata.name.clone());
        }
        if classification.provider {
            self.registry
                .record_provider_candidate(metadata.name.clone());
        }

        if let Some(path) = metadata
            .annotation(markers.application_path.as_str())
            .and_then(|a| a.value())
        {
            self.base_paths
                .insert(metadata.name.clone(), path.to_string());
        }

        Ok(classification)
    }

    /// Account for a finished bean across its whole type closure.
    ///
    /// When the bean claims a candidate and marking is enabled, the resource
    /// marker is added to the bean's qualifiers before they are recorded.
    pub fn observe_bean(&mut self, bean: &mut BeanAttributes) -> Result<Claims> {
        if bean.bean_class.is_blank() {
            return Err(AssemblyError::InvalidInput(
                "bean has no bean class".to_string(),
            ));
        }

        if bean.types.is_empty() {
            return Err(AssemblyError::InvalidInput(format!(
                "bean {} has an empty type closure",
                bean.bean_class
            )));
        }

        // Applications keep the qualifiers they were declared with.
        if bean.has_type(&self.config.markers.application) {
            let mut declared = bean.clone();
            declared.qualifiers = declared.qualifiers.without(&self.config.resource_marker);
            self.registry.record_application(&declared);
        }

        let claims_candidate = bean.types.iter().any(|t| self.registry.is_pending(t));
        if claims_candidate && self.config.mark_claimed_beans {
            bean.qualifiers.insert(self.config.resource_marker.clone());
        }

        let mut claims = Claims::default();
        for type_name in &bean.types {
            let observed = self
                .registry
                .observe_bean_attributes(type_name, bean, false);
            claims.resource |= observed.resource;
            claims.provider |= observed.provider;
        }
        Ok(claims)
    }

    pub fn all_application_qualifier_sets(&self) -> BTreeSet<QualifierSet> {
        self.registry.all_application_qualifier_sets()
    }

    /// Resolve applications, then build synthetic applications for
    /// whatever none of them claimed.
    pub fn assemble(mut self, host: &dyn BeanHost) -> Result<AssemblyOutcome> {
        let mut resolver = ApplicationResolver::new(&self.config, host);
        let mut registrations = resolver.resolve_all(&mut self.registry, &self.base_paths)?;
        let declared = registrations.len();

        let discarded = self.registry.discard_pending();
        for (name, role) in &discarded {
            debug!("{} {} was discovered but never became a bean", role, name);
        }

        let resources = self.registry.leftovers(Role::Resource);
        let providers = self.registry.leftovers(Role::Provider);
        let grouping = QualifierGrouper::new(&self.config).group(resources, providers)?;
        registrations.extend(
            SyntheticApplicationBuilder::new(&self.config)
                .build(&mut self.registry, &grouping.groups),
        );

        let assignments = self.registry.assignments();
        let application_qualifiers = self.registry.all_application_qualifier_sets();
        info!(
            "Assembly complete: {} registration(s), {} synthetic application(s), {} owned candidate role(s), {} orphan provider(s)",
            registrations.len(),
            registrations.len() - declared,
            assignments.len(),
            grouping.orphan_providers.len()
        );
        self.registry.clear();

        Ok(AssemblyOutcome {
            registrations,
            application_qualifiers,
            assignments,
            orphan_providers: grouping.orphan_providers,
            discarded,
        })
    }
}
