use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Lifecycle scope of a bean.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct Scope(#[schemars(with = "String")] Cow<'static, str>);

impl Scope {
    /// Narrowest scope: one instance per injection point, request-local.
    pub const DEPENDENT: Scope = Scope(Cow::Borrowed("dependent"));
    pub const REQUEST: Scope = Scope(Cow::Borrowed("request"));
    pub const APPLICATION: Scope = Scope(Cow::Borrowed("application"));
    pub const SINGLETON: Scope = Scope(Cow::Borrowed("singleton"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::DEPENDENT
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Scope {
    fn from(s: &str) -> Self {
        Self::new(s.to_string())
    }
}

impl From<String> for Scope {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl AsRef<str> for Scope {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}
