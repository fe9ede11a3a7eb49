//! Configuration of an assembly pass.

use restbind_api::{Qualifier, Scope, TypeName};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;

/// Names of the marker annotations and types the pass looks for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Markers {
    /// Type-level marker of a root resource class.
    pub path: TypeName,
    /// Marker of a provider class.
    pub provider: TypeName,
    /// Meta-annotation marking request-handling method annotations.
    pub http_method: TypeName,
    /// Base path declared on an application class.
    pub application_path: TypeName,
    /// Supertype shared by every application.
    pub application: TypeName,
}

impl Default for Markers {
    fn default() -> Self {
        Self {
            path: TypeName::new("javax.ws.rs.Path"),
            provider: TypeName::new("javax.ws.rs.ext.Provider"),
            http_method: TypeName::new("javax.ws.rs.HttpMethod"),
            application_path: TypeName::new("javax.ws.rs.ApplicationPath"),
            application: TypeName::new("javax.ws.rs.core.Application"),
        }
    }
}

/// What to do with claimed providers no application ends up owning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum OrphanProviderPolicy {
    /// Leave them unowned and report them in the outcome.
    #[default]
    Ignore,
    /// Abort the pass.
    Fail,
    /// Add them to the unqualified synthetic application.
    DefaultGroup,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AssemblyConfig {
    pub markers: Markers,
    /// Scope of base-path registrations.
    pub host_scope: Scope,
    /// Scope of class-read registrations whose class declares none.
    pub default_class_scope: Scope,
    /// Scope of synthetic applications.
    pub synthetic_scope: Scope,
    /// Qualifier tagging beans owned by the REST layer.
    pub resource_marker: Qualifier,
    /// Add `resource_marker` to resource and provider beans as they are claimed.
    pub mark_claimed_beans: bool,
    pub orphan_providers: OrphanProviderPolicy,
}

impl Default for AssemblyConfig {
    fn default() -> Self {
        Self {
            markers: Markers::default(),
            host_scope: Scope::APPLICATION,
            default_class_scope: Scope::DEPENDENT,
            synthetic_scope: Scope::SINGLETON,
            resource_marker: Qualifier::new("restbind.Resource"),
            mark_claimed_beans: true,
            orphan_providers: OrphanProviderPolicy::default(),
        }
    }
}

impl AssemblyConfig {
    /// Load a JSON configuration file. Missing fields take their defaults.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn with_orphan_providers(mut self, policy: OrphanProviderPolicy) -> Self {
        self.orphan_providers = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_config_uses_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "orphan_providers": "default-group", "markers": {{ "path": "jakarta.ws.rs.Path" }} }}"#
        )
        .unwrap();

        let config = AssemblyConfig::from_path(file.path()).unwrap();
        assert_eq!(config.orphan_providers, OrphanProviderPolicy::DefaultGroup);
        assert_eq!(config.markers.path.as_str(), "jakarta.ws.rs.Path");
        assert_eq!(config.markers.provider.as_str(), "javax.ws.rs.ext.Provider");
        assert_eq!(config.synthetic_scope, Scope::SINGLETON);
        assert!(config.mark_claimed_beans);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = AssemblyConfig::from_path(Path::new("/nonexistent/restbind.json")).unwrap_err();
        assert!(matches!(err, crate::error::AssemblyError::Io(_)));
    }
}
