use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use super::scope::Scope;

/// Fully qualified name of a type, e.g. `com.example.OrderResource`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct TypeName(
    #[serde(with = "super::util::serde_arc_str")]
    #[schemars(with = "String")]
    Arc<str>,
);

impl TypeName {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Arc::from(name.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Simple (unqualified) name: the segment after the last `.` or `$`.
    pub fn simple_name(&self) -> &str {
        self.0
            .rsplit(['.', '$'])
            .next()
            .unwrap_or(&self.0)
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeName {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for TypeName {
    fn from(s: String) -> Self {
        Self(Arc::from(s))
    }
}

impl AsRef<str> for TypeName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    #[default]
    Class,
    Interface,
    Enum,
    Record,
    Annotation,
}

/// An annotation use site: the annotation type plus its member values.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
pub struct Annotation {
    #[serde(rename = "type")]
    pub type_name: TypeName,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub members: BTreeMap<String, String>,
}

impl Annotation {
    pub fn new(type_name: impl Into<TypeName>) -> Self {
        Self {
            type_name: type_name.into(),
            members: BTreeMap::new(),
        }
    }

    pub fn with_member(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.members.insert(key.into(), value.into());
        self
    }

    /// The conventional `value` member.
    pub fn value(&self) -> Option<&str> {
        self.members.get("value").map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct MethodMetadata {
    pub name: String,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

impl MethodMetadata {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            annotations: Vec::new(),
        }
    }

    pub fn annotated(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }
}

/// Static structure of a type as reported by the host's introspection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TypeMetadata {
    pub name: TypeName,
    #[serde(default)]
    pub kind: TypeKind,
    #[serde(default, rename = "abstract")]
    pub is_abstract: bool,
    /// Annotations present directly on the type declaration.
    #[serde(default)]
    pub annotations: Vec<Annotation>,
    #[serde(default)]
    pub methods: Vec<MethodMetadata>,
    /// Supertypes, the type itself included. Empty means "just the type".
    #[serde(default)]
    pub type_closure: Vec<TypeName>,
    /// Scope declared on the type, if any.
    #[serde(default)]
    pub scope: Option<Scope>,
}

impl TypeMetadata {
    pub fn class(name: impl Into<TypeName>) -> Self {
        Self {
            name: name.into(),
            kind: TypeKind::Class,
            is_abstract: false,
            annotations: Vec::new(),
            methods: Vec::new(),
            type_closure: Vec::new(),
            scope: None,
        }
    }

    pub fn annotated(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn with_method(mut self, method: MethodMetadata) -> Self {
        self.methods.push(method);
        self
    }

    pub fn with_supertype(mut self, supertype: impl Into<TypeName>) -> Self {
        if self.type_closure.is_empty() {
            self.type_closure.push(self.name.clone());
        }
        self.type_closure.push(supertype.into());
        self
    }

    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = Some(scope);
        self
    }

    pub fn has_annotation(&self, type_name: &str) -> bool {
        self.annotation(type_name).is_some()
    }

    pub fn annotation(&self, type_name: &str) -> Option<&Annotation> {
        self.annotations
            .iter()
            .find(|a| a.type_name.as_str() == type_name)
    }

    /// Closure with the type itself guaranteed to be present.
    pub fn closure(&self) -> Vec<TypeName> {
        let mut closure = self.type_closure.clone();
        if !closure.contains(&self.name) {
            closure.insert(0, self.name.clone());
        }
        closure
    }

    pub fn is_concrete(&self) -> bool {
        !self.is_abstract && matches!(self.kind, TypeKind::Class | TypeKind::Enum | TypeKind::Record)
    }
}
