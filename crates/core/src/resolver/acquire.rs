//! Scoped acquisition of application instances.

use restbind_api::{AlterableContext, Application, BeanAttributes, BeanHost, HostError, HostResult};
use std::sync::Arc;
use tracing::{debug, warn};

/// An application instance that is released when the guard goes away.
///
/// The instance comes from the bean's alterable context when there is one,
/// or is constructed directly when there is none or it is not active.
/// [`AcquiredApplication::release`] reports release failures; dropping the
/// guard without calling it releases as well and logs any failure.
pub struct AcquiredApplication<'h> {
    host: &'h dyn BeanHost,
    bean: &'h BeanAttributes,
    context: Option<&'h dyn AlterableContext>,
    instance: Arc<dyn Application>,
    released: bool,
}

impl<'h> AcquiredApplication<'h> {
    pub fn acquire(host: &'h dyn BeanHost, bean: &'h BeanAttributes) -> HostResult<Self> {
        let (context, instance) = match host.context(&bean.scope) {
            None => (None, host.create(bean)?),
            Some(context) => match context.get(bean) {
                Ok(instance) => (Some(context), instance),
                Err(HostError::ContextNotActive(scope)) => {
                    debug!(
                        "Context {} not active, constructing {} directly",
                        scope, bean.bean_class
                    );
                    (None, host.create(bean)?)
                }
                Err(e) => return Err(e),
            },
        };

        Ok(Self {
            host,
            bean,
            context,
            instance,
            released: false,
        })
    }

    pub fn application(&self) -> &dyn Application {
        self.instance.as_ref()
    }

    pub fn is_contextual(&self) -> bool {
        self.context.is_some()
    }

    pub fn release(mut self) -> HostResult<()> {
        self.release_instance()
    }

    fn release_instance(&mut self) -> HostResult<()> {
        if self.released {
            return Ok(());
        }
        self.released = true;
        match self.context {
            None => self.host.destroy(self.bean, Arc::clone(&self.instance)),
            Some(context) => match context.destroy(self.bean) {
                // Some contexts do not allow explicit destruction.
                Err(HostError::Unsupported(reason)) => {
                    debug!(
                        "Context of {} does not support destroy: {}",
                        self.bean.bean_class, reason
                    );
                    Ok(())
                }
                other => other,
            },
        }
    }
}

impl Drop for AcquiredApplication<'_> {
    fn drop(&mut self) {
        if let Err(e) = self.release_instance() {
            warn!("Failed to release {}: {}", self.bean.bean_class, e);
        }
    }
}
