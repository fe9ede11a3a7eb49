use restbind_api::{RegistrationOrigin, RegistrationRequest};
use restbind_core::{AssemblyOutcome, Role};
use serde::Serialize;
use tabled::Tabled;

#[derive(Tabled)]
pub struct RegistrationRow {
    #[tabled(rename = "Kind")]
    kind: &'static str,
    #[tabled(rename = "Types")]
    types: String,
    #[tabled(rename = "Scope")]
    scope: String,
    #[tabled(rename = "Qualifiers")]
    qualifiers: String,
    #[tabled(rename = "Detail")]
    detail: String,
}

impl From<&RegistrationRequest> for RegistrationRow {
    fn from(registration: &RegistrationRequest) -> Self {
        let detail = match &registration.origin {
            RegistrationOrigin::BasePath(path) => path.clone(),
            RegistrationOrigin::ClassRead(meta) => meta.name.to_string(),
            RegistrationOrigin::Synthetic(factory) => factory
                .classes()
                .iter()
                .map(|c| c.simple_name())
                .collect::<Vec<_>>()
                .join(", "),
        };
        Self {
            kind: registration.kind(),
            types: registration
                .types
                .iter()
                .map(|t| t.simple_name())
                .collect::<Vec<_>>()
                .join(", "),
            scope: registration.scope.to_string(),
            qualifiers: registration.qualifiers.to_string(),
            detail,
        }
    }
}

#[derive(Tabled)]
pub struct ClassificationRow {
    #[tabled(rename = "Type")]
    pub name: String,
    #[tabled(rename = "Resource")]
    pub resource: bool,
    #[tabled(rename = "Provider")]
    pub provider: bool,
    #[tabled(rename = "Handles requests")]
    pub general_resource: bool,
}

/// JSON rendering of an outcome.
#[derive(Serialize)]
pub struct OutcomeView {
    registrations: Vec<RegistrationView>,
    application_qualifiers: Vec<String>,
    assignments: Vec<AssignmentView>,
    orphan_providers: Vec<String>,
    discarded: Vec<AssignmentView>,
}

#[derive(Serialize)]
struct RegistrationView {
    kind: &'static str,
    types: Vec<String>,
    scope: String,
    qualifiers: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    base_path: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    classes: Vec<String>,
}

#[derive(Serialize)]
struct AssignmentView {
    class: String,
    role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    owner: Option<String>,
}

impl From<&AssemblyOutcome> for OutcomeView {
    fn from(outcome: &AssemblyOutcome) -> Self {
        let registrations = outcome
            .registrations
            .iter()
            .map(|r| RegistrationView {
                kind: r.kind(),
                types: r.types.iter().map(ToString::to_string).collect(),
                scope: r.scope.to_string(),
                qualifiers: r.qualifiers.iter().map(ToString::to_string).collect(),
                base_path: match &r.origin {
                    RegistrationOrigin::BasePath(path) => Some(path.clone()),
                    _ => None,
                },
                classes: r.owned_classes().iter().map(ToString::to_string).collect(),
            })
            .collect();

        let discarded = outcome
            .discarded
            .iter()
            .map(|(class, role)| role_view(class.to_string(), *role, None))
            .collect();

        Self {
            registrations,
            application_qualifiers: outcome
                .application_qualifiers
                .iter()
                .map(ToString::to_string)
                .collect(),
            assignments: outcome
                .assignments
                .iter()
                .map(|(class, role, owner)| {
                    role_view(class.to_string(), *role, Some(owner.to_string()))
                })
                .collect(),
            orphan_providers: outcome
                .orphan_providers
                .iter()
                .map(ToString::to_string)
                .collect(),
            discarded,
        }
    }
}

fn role_view(class: String, role: Role, owner: Option<String>) -> AssignmentView {
    AssignmentView {
        class,
        role: role.to_string(),
        owner,
    }
}
