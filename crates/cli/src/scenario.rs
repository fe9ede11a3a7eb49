//! Offline scenario files: a scanned type set, the beans the container
//! would have built, and the declared applications it would instantiate.

use anyhow::Context;
use restbind_api::{BeanAttributes, Scope, TypeMetadata, TypeName};
use restbind_core::host::{ContextBehaviour, InMemoryHost, StaticApplication};
use restbind_core::{AssemblyConfig, AssemblyOutcome, AssemblyPass};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Scenario {
    pub config: AssemblyConfig,
    /// Every type the host can read. Types carrying a marker are also
    /// reported to the pass as discovered.
    pub types: Vec<TypeMetadata>,
    /// Finished beans, in the order the container reports them.
    pub beans: Vec<BeanAttributes>,
    pub applications: Vec<ApplicationSpec>,
    pub contexts: BTreeMap<Scope, ContextBehaviour>,
}

/// What a declared application returns once instantiated.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ApplicationSpec {
    pub bean_class: TypeName,
    #[serde(default)]
    pub classes: Vec<TypeName>,
    #[serde(default)]
    pub singletons: Vec<TypeName>,
}

impl Scenario {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("invalid scenario {}", path.display()))
    }

    pub fn host(&self) -> InMemoryHost {
        let mut host = InMemoryHost::new();
        for ty in &self.types {
            host = host.with_type(ty.clone());
        }
        for app in &self.applications {
            let mut application = StaticApplication::new(app.classes.iter().cloned());
            application.singletons = app.singletons.clone();
            host = host.with_application(app.bean_class.clone(), application);
        }
        for (scope, behaviour) in &self.contexts {
            host = host.with_context(scope.clone(), *behaviour);
        }
        host
    }

    /// Feed the scenario through a fresh pass and assemble it.
    pub fn run(&self, host: &InMemoryHost) -> restbind_core::Result<AssemblyOutcome> {
        let mut pass = AssemblyPass::new(self.config.clone());
        for ty in &self.types {
            let classification = pass.discover_type(ty)?;
            if classification.is_candidate() {
                debug!("Discovered {} ({:?})", ty.name, classification);
            }
        }
        for bean in &self.beans {
            let mut bean = bean.clone();
            pass.observe_bean(&mut bean)?;
        }
        pass.assemble(host)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SCENARIO: &str = r#"{
        "types": [
            { "name": "shop.ShopApp", "annotations": [{ "type": "javax.ws.rs.ApplicationPath", "members": { "value": "/api" } }] },
            { "name": "shop.Orders", "annotations": [{ "type": "javax.ws.rs.Path" }] },
            { "name": "shop.Health", "annotations": [{ "type": "javax.ws.rs.Path" }] }
        ],
        "beans": [
            { "bean_class": "shop.ShopApp", "types": ["shop.ShopApp", "javax.ws.rs.core.Application"], "scope": "application" },
            { "bean_class": "shop.Orders", "types": ["shop.Orders"] },
            { "bean_class": "shop.Health", "types": ["shop.Health"] }
        ],
        "applications": [
            { "bean_class": "shop.ShopApp", "classes": ["shop.Orders"] }
        ],
        "contexts": { "application": "active" }
    }"#;

    fn write_scenario(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_and_run_scenario() {
        let file = write_scenario(SCENARIO);
        let scenario = Scenario::load(file.path()).unwrap();
        assert_eq!(scenario.types.len(), 3);

        let host = scenario.host();
        let outcome = scenario.run(&host).unwrap();

        let kinds: Vec<&str> = outcome.registrations.iter().map(|r| r.kind()).collect();
        assert_eq!(kinds, vec!["base-path", "synthetic"]);
        assert_eq!(
            outcome.registrations[1].owned_classes(),
            BTreeSet::from([TypeName::from("shop.Health")])
        );
        assert_eq!(host.live_instances(), 0);
    }

    #[test]
    fn test_invalid_scenario_names_the_file() {
        let file = write_scenario("{ \"types\": 42 }");
        let err = Scenario::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("invalid scenario"));
    }
}
