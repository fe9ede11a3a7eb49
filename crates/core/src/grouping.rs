//! Partitions unclaimed resources and providers by qualifier set.

use indexmap::IndexMap;
use restbind_api::{BeanAttributes, QualifierSet, TypeName};
use std::collections::BTreeSet;
use tracing::warn;

use crate::config::{AssemblyConfig, OrphanProviderPolicy};
use crate::error::{AssemblyError, Result};

/// Classes that will share one synthetic application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualifierGroup {
    /// Exact qualifier set the members were grouped by.
    pub key: QualifierSet,
    /// Qualifiers of the synthetic application: the key without the resource marker.
    pub qualifiers: QualifierSet,
    pub resources: Vec<TypeName>,
    pub providers: Vec<TypeName>,
}

impl QualifierGroup {
    pub fn classes(&self) -> BTreeSet<TypeName> {
        self.resources
            .iter()
            .chain(self.providers.iter())
            .cloned()
            .collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Grouping {
    pub groups: Vec<QualifierGroup>,
    /// Providers left without a group under [`OrphanProviderPolicy::Ignore`].
    pub orphan_providers: Vec<TypeName>,
}

pub struct QualifierGrouper<'a> {
    config: &'a AssemblyConfig,
}

impl<'a> QualifierGrouper<'a> {
    pub fn new(config: &'a AssemblyConfig) -> Self {
        Self { config }
    }

    /// Group leftover resources by exact qualifier set, then pull every
    /// leftover provider with an equal set into that group. Groups are
    /// visited in the order their first resource was discovered, so a
    /// provider joins the first matching group.
    pub fn group(
        &self,
        resources: Vec<(TypeName, BeanAttributes)>,
        providers: Vec<(TypeName, BeanAttributes)>,
    ) -> Result<Grouping> {
        let mut by_qualifiers: IndexMap<QualifierSet, Vec<TypeName>> = IndexMap::new();
        for (name, bean) in resources {
            by_qualifiers.entry(bean.qualifiers).or_default().push(name);
        }

        let mut remaining = providers;
        let mut groups: Vec<QualifierGroup> = by_qualifiers
            .into_iter()
            .map(|(key, resources)| {
                let mut matched = Vec::new();
                remaining.retain(|(name, bean)| {
                    if bean.qualifiers == key {
                        matched.push(name.clone());
                        false
                    } else {
                        true
                    }
                });
                QualifierGroup {
                    qualifiers: key.without(&self.config.resource_marker),
                    key,
                    resources,
                    providers: matched,
                }
            })
            .collect();

        let orphans: Vec<TypeName> = remaining.into_iter().map(|(name, _)| name).collect();
        if orphans.is_empty() {
            return Ok(Grouping {
                groups,
                orphan_providers: orphans,
            });
        }

        match self.config.orphan_providers {
            OrphanProviderPolicy::Ignore => {
                for name in &orphans {
                    warn!("Provider {} is not claimed by any application", name);
                }
                Ok(Grouping {
                    groups,
                    orphan_providers: orphans,
                })
            }
            OrphanProviderPolicy::Fail => Err(AssemblyError::OrphanProviders(orphans)),
            OrphanProviderPolicy::DefaultGroup => {
                match groups.iter_mut().find(|g| g.qualifiers.is_empty()) {
                    Some(group) => group.providers.extend(orphans),
                    None => groups.push(QualifierGroup {
                        key: QualifierSet::new(),
                        qualifiers: QualifierSet::new(),
                        resources: Vec::new(),
                        providers: orphans,
                    }),
                }
                Ok(Grouping {
                    groups,
                    orphan_providers: Vec::new(),
                })
            }
        }
    }
}
