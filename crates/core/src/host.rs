//! In-memory [`BeanHost`] for tests and offline scenario runs.

use restbind_api::{
    AlterableContext, Annotation, Application, BeanAttributes, BeanHost, HostError, HostResult,
    MetaAnnotations, Scope, TypeMetadata, TypeName,
};
use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;

/// Application with a fixed class list.
#[derive(Debug, Clone, Default)]
pub struct StaticApplication {
    pub classes: BTreeSet<TypeName>,
    pub singletons: Vec<TypeName>,
}

impl StaticApplication {
    pub fn new(classes: impl IntoIterator<Item = TypeName>) -> Self {
        Self {
            classes: classes.into_iter().collect(),
            singletons: Vec::new(),
        }
    }
}

impl Application for StaticApplication {
    fn classes(&self) -> BTreeSet<TypeName> {
        self.classes.clone()
    }

    fn singletons(&self) -> Vec<TypeName> {
        self.singletons.clone()
    }
}

/// How the context of a scope behaves.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize, schemars::JsonSchema,
)]
#[serde(rename_all = "kebab-case")]
pub enum ContextBehaviour {
    Active,
    /// `get` fails with "context not active".
    Inactive,
    /// `destroy` is rejected as unsupported.
    NoExplicitDestroy,
    /// `destroy` fails outright.
    FailingDestroy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    ContextGet(TypeName),
    Created(TypeName),
    ContextDestroyed(TypeName),
    ContextDestroyRejected(TypeName),
    ContextDestroyFailed(TypeName),
    Destroyed(TypeName),
}

#[derive(Debug, Default)]
pub struct InMemoryHost {
    types: HashMap<TypeName, TypeMetadata>,
    applications: HashMap<TypeName, Arc<StaticApplication>>,
    contexts: HashMap<Scope, ContextBehaviour>,
    failing: HashSet<TypeName>,
    events: RefCell<Vec<HostEvent>>,
}

impl InMemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_type(mut self, metadata: TypeMetadata) -> Self {
        self.types.insert(metadata.name.clone(), metadata);
        self
    }

    pub fn with_application(mut self, bean_class: impl Into<TypeName>, application: StaticApplication) -> Self {
        self.applications
            .insert(bean_class.into(), Arc::new(application));
        self
    }

    pub fn with_context(mut self, scope: Scope, behaviour: ContextBehaviour) -> Self {
        self.contexts.insert(scope, behaviour);
        self
    }

    /// Make creation of `bean_class` fail.
    pub fn failing(mut self, bean_class: impl Into<TypeName>) -> Self {
        self.failing.insert(bean_class.into());
        self
    }

    pub fn events(&self) -> Vec<HostEvent> {
        self.events.borrow().clone()
    }

    /// Instances acquired but not yet released.
    pub fn live_instances(&self) -> usize {
        let events = self.events.borrow();
        let acquired = events
            .iter()
            .filter(|e| matches!(e, HostEvent::ContextGet(_) | HostEvent::Created(_)))
            .count();
        let released = events
            .iter()
            .filter(|e| {
                matches!(
                    e,
                    HostEvent::ContextDestroyed(_)
                        | HostEvent::ContextDestroyRejected(_)
                        | HostEvent::ContextDestroyFailed(_)
                        | HostEvent::Destroyed(_)
                )
            })
            .count();
        acquired.saturating_sub(released)
    }

    fn record(&self, event: HostEvent) {
        self.events.borrow_mut().push(event);
    }

    fn instance(&self, bean: &BeanAttributes) -> HostResult<Arc<dyn Application>> {
        if self.failing.contains(&bean.bean_class) {
            return Err(HostError::Creation {
                bean: bean.bean_class.clone(),
                reason: "constructor failed".to_string(),
            });
        }
        let application = self
            .applications
            .get(&bean.bean_class)
            .ok_or_else(|| HostError::UnknownBean(bean.bean_class.clone()))?;
        Ok(Arc::clone(application) as Arc<dyn Application>)
    }

    fn behaviour(&self, scope: &Scope) -> Option<ContextBehaviour> {
        self.contexts.get(scope).copied()
    }
}

impl BeanHost for InMemoryHost {
    fn context(&self, scope: &Scope) -> Option<&dyn AlterableContext> {
        self.contexts
            .contains_key(scope)
            .then_some(self as &dyn AlterableContext)
    }

    fn create(&self, bean: &BeanAttributes) -> HostResult<Arc<dyn Application>> {
        let instance = self.instance(bean)?;
        self.record(HostEvent::Created(bean.bean_class.clone()));
        Ok(instance)
    }

    fn destroy(&self, bean: &BeanAttributes, _instance: Arc<dyn Application>) -> HostResult<()> {
        self.record(HostEvent::Destroyed(bean.bean_class.clone()));
        Ok(())
    }

    fn read_type(&self, type_name: &TypeName) -> HostResult<TypeMetadata> {
        self.types
            .get(type_name)
            .cloned()
            .ok_or_else(|| HostError::UnknownType(type_name.clone()))
    }
}

impl AlterableContext for InMemoryHost {
    fn get(&self, bean: &BeanAttributes) -> HostResult<Arc<dyn Application>> {
        if self.behaviour(&bean.scope) == Some(ContextBehaviour::Inactive) {
            return Err(HostError::ContextNotActive(bean.scope.clone()));
        }
        let instance = self.instance(bean)?;
        self.record(HostEvent::ContextGet(bean.bean_class.clone()));
        Ok(instance)
    }

    fn destroy(&self, bean: &BeanAttributes) -> HostResult<()> {
        match self.behaviour(&bean.scope) {
            Some(ContextBehaviour::NoExplicitDestroy) => {
                self.record(HostEvent::ContextDestroyRejected(bean.bean_class.clone()));
                Err(HostError::Unsupported(format!(
                    "context {} does not destroy instances",
                    bean.scope
                )))
            }
            Some(ContextBehaviour::FailingDestroy) => {
                self.record(HostEvent::ContextDestroyFailed(bean.bean_class.clone()));
                Err(HostError::Internal(format!(
                    "context {} lost track of {}",
                    bean.scope, bean.bean_class
                )))
            }
            _ => {
                self.record(HostEvent::ContextDestroyed(bean.bean_class.clone()));
                Ok(())
            }
        }
    }
}

impl MetaAnnotations for InMemoryHost {
    fn annotations_of(&self, annotation_type: &TypeName) -> Vec<Annotation> {
        self.types
            .get(annotation_type)
            .map(|meta| meta.annotations.clone())
            .unwrap_or_default()
    }
}
