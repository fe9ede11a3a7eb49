use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::fmt;

use super::types::{Annotation, TypeName};

/// A qualifier value used to tell apart beans of the same type.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
pub struct Qualifier {
    pub name: TypeName,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub members: BTreeMap<String, String>,
}

impl Qualifier {
    pub fn new(name: impl Into<TypeName>) -> Self {
        Self {
            name: name.into(),
            members: BTreeMap::new(),
        }
    }

    pub fn with_member(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.members.insert(key.into(), value.into());
        self
    }
}

impl From<Annotation> for Qualifier {
    fn from(annotation: Annotation) -> Self {
        Self {
            name: annotation.type_name,
            members: annotation.members,
        }
    }
}

impl fmt::Display for Qualifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.name.simple_name())?;
        if !self.members.is_empty() {
            let members: Vec<String> = self
                .members
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect();
            write!(f, "({})", members.join(", "))?;
        }
        Ok(())
    }
}

/// Unordered set of qualifiers with structural equality.
///
/// Backed by a `BTreeSet`, so two sets holding the same values compare and
/// hash equal regardless of the order they were built in. The empty set is
/// the key for unqualified beans.
#[derive(
    Debug,
    Clone,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    JsonSchema,
)]
#[serde(transparent)]
pub struct QualifierSet(BTreeSet<Qualifier>);

impl QualifierSet {
    pub fn new() -> Self {
        Self(BTreeSet::new())
    }

    pub fn of(qualifier: Qualifier) -> Self {
        Self(BTreeSet::from([qualifier]))
    }

    pub fn insert(&mut self, qualifier: Qualifier) -> bool {
        self.0.insert(qualifier)
    }

    pub fn contains(&self, qualifier: &Qualifier) -> bool {
        self.0.contains(qualifier)
    }

    /// Copy of this set with `qualifier` removed.
    pub fn without(&self, qualifier: &Qualifier) -> Self {
        let mut set = self.clone();
        set.0.remove(qualifier);
        set
    }

    /// Copy of this set with `qualifier` added.
    pub fn with(&self, qualifier: Qualifier) -> Self {
        let mut set = self.clone();
        set.0.insert(qualifier);
        set
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Qualifier> {
        self.0.iter()
    }
}

impl FromIterator<Qualifier> for QualifierSet {
    fn from_iter<I: IntoIterator<Item = Qualifier>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for QualifierSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("(unqualified)");
        }
        let parts: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        f.write_str(&parts.join(" "))
    }
}
