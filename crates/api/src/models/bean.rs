use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::qualifier::{Qualifier, QualifierSet};
use super::scope::Scope;
use super::types::TypeName;

/// Attributes of a bean the host has finished discovering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct BeanAttributes {
    /// Implementation class of the bean.
    pub bean_class: TypeName,
    /// Bean types, i.e. the type closure the bean is exposed under.
    #[serde(default)]
    pub types: Vec<TypeName>,
    #[serde(default)]
    pub qualifiers: QualifierSet,
    #[serde(default)]
    pub scope: Scope,
}

impl BeanAttributes {
    pub fn new(bean_class: impl Into<TypeName>) -> Self {
        let bean_class = bean_class.into();
        Self {
            types: vec![bean_class.clone()],
            bean_class,
            qualifiers: QualifierSet::new(),
            scope: Scope::DEPENDENT,
        }
    }

    pub fn with_type(mut self, type_name: impl Into<TypeName>) -> Self {
        let type_name = type_name.into();
        if !self.types.contains(&type_name) {
            self.types.push(type_name);
        }
        self
    }

    pub fn qualified(mut self, qualifier: Qualifier) -> Self {
        self.qualifiers.insert(qualifier);
        self
    }

    pub fn scoped(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    pub fn has_type(&self, type_name: &TypeName) -> bool {
        self.types.contains(type_name)
    }
}
