//! Pass-owned bookkeeping of resource and provider candidates.
//!
//! Every candidate type has one entry holding a state per role. A role moves
//! `Pending` → `Claimed` when the host reports a bean for the type, then
//! `Claimed` → `Assigned` once an application, declared or synthetic, takes
//! ownership. A role is never in two states at once.

use indexmap::{IndexMap, IndexSet};
use restbind_api::{BeanAttributes, QualifierSet, TypeName};
use std::collections::BTreeSet;
use std::fmt;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Resource,
    Provider,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Resource => f.write_str("resource"),
            Role::Provider => f.write_str("provider"),
        }
    }
}

/// The application owning a candidate.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Owner {
    Application(TypeName),
    Synthetic(QualifierSet),
}

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Owner::Application(name) => write!(f, "{name}"),
            Owner::Synthetic(qualifiers) => write!(f, "synthetic application {qualifiers}"),
        }
    }
}

#[derive(Debug, Clone)]
pub enum CandidateState {
    /// Discovered by marker, no bean seen yet.
    Pending,
    /// Backed by a bean, not owned by any application yet.
    Claimed(BeanAttributes),
    Assigned(Owner),
}

#[derive(Debug, Default)]
struct CandidateEntry {
    resource: Option<CandidateState>,
    provider: Option<CandidateState>,
}

impl CandidateEntry {
    fn slot(&self, role: Role) -> Option<&CandidateState> {
        match role {
            Role::Resource => self.resource.as_ref(),
            Role::Provider => self.provider.as_ref(),
        }
    }

    fn slot_mut(&mut self, role: Role) -> &mut Option<CandidateState> {
        match role {
            Role::Resource => &mut self.resource,
            Role::Provider => &mut self.provider,
        }
    }

    fn is_empty(&self) -> bool {
        self.resource.is_none() && self.provider.is_none()
    }
}

/// Roles a type currently holds in the `Claimed` state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Claims {
    pub resource: bool,
    pub provider: bool,
}

impl Claims {
    pub fn any(&self) -> bool {
        self.resource || self.provider
    }

    pub fn roles(&self) -> impl Iterator<Item = Role> {
        let resource = self.resource.then_some(Role::Resource);
        let provider = self.provider.then_some(Role::Provider);
        resource.into_iter().chain(provider)
    }
}

#[derive(Debug, Default)]
pub struct CandidateRegistry {
    candidates: IndexMap<TypeName, CandidateEntry>,
    applications: IndexSet<BeanAttributes>,
    qualifiers: BTreeSet<QualifierSet>,
}

impl CandidateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_resource_candidate(&mut self, type_name: TypeName) -> bool {
        self.record(type_name, Role::Resource)
    }

    pub fn record_provider_candidate(&mut self, type_name: TypeName) -> bool {
        self.record(type_name, Role::Provider)
    }

    fn record(&mut self, type_name: TypeName, role: Role) -> bool {
        let slot = self.candidates.entry(type_name).or_default().slot_mut(role);
        if slot.is_some() {
            return false;
        }
        *slot = Some(CandidateState::Pending);
        true
    }

    /// Account for one type of a finished bean.
    ///
    /// Application beans are remembered and their qualifier set is added to
    /// the collection as a single element. Independently of that, a pending
    /// resource or provider role of `type_name` becomes claimed by `bean`: an
    /// application class may expose resource methods too.
    pub fn observe_bean_attributes(
        &mut self,
        type_name: &TypeName,
        bean: &BeanAttributes,
        is_application_type: bool,
    ) -> Claims {
        if is_application_type {
            self.record_application(bean);
        }

        let mut claims = Claims::default();
        if let Some(entry) = self.candidates.get_mut(type_name) {
            for role in [Role::Resource, Role::Provider] {
                let slot = entry.slot_mut(role);
                if matches!(slot, Some(CandidateState::Pending)) {
                    *slot = Some(CandidateState::Claimed(bean.clone()));
                    debug!("{} {} claimed by bean {}", role, type_name, bean.bean_class);
                    match role {
                        Role::Resource => claims.resource = true,
                        Role::Provider => claims.provider = true,
                    }
                }
            }
        }
        claims
    }

    /// Remember an application bean and add its qualifier set to the
    /// collection as a single element.
    pub fn record_application(&mut self, bean: &BeanAttributes) -> bool {
        self.qualifiers.insert(bean.qualifiers.clone());
        self.applications.insert(bean.clone())
    }

    /// Whether `type_name` has a pending role that a bean would claim.
    pub fn is_pending(&self, type_name: &TypeName) -> bool {
        self.candidates.get(type_name).is_some_and(|entry| {
            [Role::Resource, Role::Provider]
                .into_iter()
                .any(|role| matches!(entry.slot(role), Some(CandidateState::Pending)))
        })
    }

    pub fn state(&self, type_name: &TypeName, role: Role) -> Option<&CandidateState> {
        self.candidates
            .get(type_name)
            .and_then(|entry| entry.slot(role))
    }

    pub fn claims(&self, type_name: &TypeName) -> Claims {
        let claimed = |role| matches!(self.state(type_name, role), Some(CandidateState::Claimed(_)));
        Claims {
            resource: claimed(Role::Resource),
            provider: claimed(Role::Provider),
        }
    }

    /// Owners of the roles of `type_name` that are already assigned.
    pub fn owners(&self, type_name: &TypeName) -> Vec<&Owner> {
        [Role::Resource, Role::Provider]
            .into_iter()
            .filter_map(|role| match self.state(type_name, role) {
                Some(CandidateState::Assigned(owner)) => Some(owner),
                _ => None,
            })
            .collect()
    }

    /// Move a claimed role to `owner`. Returns false if the role was not claimed.
    pub fn assign(&mut self, type_name: &TypeName, role: Role, owner: Owner) -> bool {
        let Some(entry) = self.candidates.get_mut(type_name) else {
            return false;
        };
        let slot = entry.slot_mut(role);
        if !matches!(slot, Some(CandidateState::Claimed(_))) {
            return false;
        }
        debug!("{} {} assigned to {}", role, type_name, owner);
        *slot = Some(CandidateState::Assigned(owner));
        true
    }

    /// Hand the pending roles of `type_name` straight to `owner`. Used when
    /// an application declares a candidate the host never built a bean for.
    pub fn assign_pending(&mut self, type_name: &TypeName, owner: &Owner) -> Vec<Role> {
        let Some(entry) = self.candidates.get_mut(type_name) else {
            return Vec::new();
        };
        let mut assigned = Vec::new();
        for role in [Role::Resource, Role::Provider] {
            let slot = entry.slot_mut(role);
            if matches!(slot, Some(CandidateState::Pending)) {
                debug!("{} {} assigned to {} without a bean", role, type_name, owner);
                *slot = Some(CandidateState::Assigned(owner.clone()));
                assigned.push(role);
            }
        }
        assigned
    }

    /// Claimed but unassigned roles, in discovery order.
    pub fn leftovers(&self, role: Role) -> Vec<(TypeName, BeanAttributes)> {
        self.candidates
            .iter()
            .filter_map(|(name, entry)| match entry.slot(role) {
                Some(CandidateState::Claimed(bean)) => Some((name.clone(), bean.clone())),
                _ => None,
            })
            .collect()
    }

    /// Every assigned role with its owner, in discovery order.
    pub fn assignments(&self) -> Vec<(TypeName, Role, Owner)> {
        let mut assignments = Vec::new();
        for (name, entry) in &self.candidates {
            for role in [Role::Resource, Role::Provider] {
                if let Some(CandidateState::Assigned(owner)) = entry.slot(role) {
                    assignments.push((name.clone(), role, owner.clone()));
                }
            }
        }
        assignments
    }

    /// Drop roles that never got a bean, e.g. because the host vetoed the
    /// type, and return them.
    pub fn discard_pending(&mut self) -> Vec<(TypeName, Role)> {
        let mut discarded = Vec::new();
        for (name, entry) in self.candidates.iter_mut() {
            for role in [Role::Resource, Role::Provider] {
                let slot = entry.slot_mut(role);
                if matches!(slot, Some(CandidateState::Pending)) {
                    *slot = None;
                    discarded.push((name.clone(), role));
                }
            }
        }
        self.candidates.retain(|_, entry| !entry.is_empty());
        discarded
    }

    pub fn applications(&self) -> impl Iterator<Item = &BeanAttributes> {
        self.applications.iter()
    }

    pub fn record_application_qualifiers(&mut self, qualifiers: QualifierSet) -> bool {
        self.qualifiers.insert(qualifiers)
    }

    pub fn all_application_qualifier_sets(&self) -> BTreeSet<QualifierSet> {
        self.qualifiers.clone()
    }

    /// Drop candidate and application state. Application qualifier sets are
    /// kept so they stay queryable after the pass.
    pub fn clear(&mut self) {
        self.candidates.clear();
        self.applications.clear();
    }
}
