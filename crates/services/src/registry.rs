//! Process-scoped service locator.
//!
//! A service kind is registered once with a factory; the first `ensure`
//! call runs the factory and memoizes the instance for process lifetime.
//! There is no teardown. Factories must not call back into the registry.

use std::{
    any::{type_name, Any, TypeId},
    collections::HashMap,
    sync::{Arc, Mutex, OnceLock},
};

use shared::error::ServiceError;

type AnyService = Arc<dyn Any + Send + Sync>;
type ServiceFactory = Box<dyn FnOnce() -> AnyService + Send>;

struct Slot {
    name: &'static str,
    factory: Option<ServiceFactory>,
    instance: Option<AnyService>,
}

#[derive(Default)]
struct Inner {
    slots: HashMap<TypeId, Slot>,
    exports: HashMap<String, TypeId>,
}

#[derive(Default)]
pub struct ServiceRegistry {
    inner: Mutex<Inner>,
}

impl ServiceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a service kind. Registering the same kind twice is an error.
    pub fn register<T: Send + Sync + 'static>(
        &self,
        factory: impl FnOnce() -> Arc<T> + Send + 'static,
    ) -> Result<(), ServiceError> {
        let mut inner = self.inner.lock().unwrap();
        let key = TypeId::of::<T>();
        if inner.slots.contains_key(&key) {
            return Err(ServiceError::AlreadyRegistered {
                name: type_name::<T>().to_string(),
            });
        }
        inner.slots.insert(
            key,
            Slot {
                name: type_name::<T>(),
                factory: Some(Box::new(move || {
                    let service: AnyService = factory();
                    service
                })),
                instance: None,
            },
        );
        Ok(())
    }

    /// Marks a registered kind as externally addressable under `name`.
    pub fn export<T: 'static>(&self, name: &str) -> Result<(), ServiceError> {
        let mut inner = self.inner.lock().unwrap();
        let key = TypeId::of::<T>();
        if !inner.slots.contains_key(&key) {
            return Err(ServiceError::NotRegistered {
                name: type_name::<T>().to_string(),
            });
        }
        if inner.exports.contains_key(name) {
            return Err(ServiceError::ExportTaken {
                name: name.to_string(),
            });
        }
        inner.exports.insert(name.to_string(), key);
        Ok(())
    }

    pub fn is_exported(&self, name: &str) -> bool {
        self.inner.lock().unwrap().exports.contains_key(name)
    }

    /// Returns the singleton for `T`, constructing it on first call. The
    /// factory runs at most once per process; later calls observe the same
    /// instance.
    pub fn ensure<T: Send + Sync + 'static>(&self) -> Result<Arc<T>, ServiceError> {
        let mut inner = self.inner.lock().unwrap();
        let slot = inner
            .slots
            .get_mut(&TypeId::of::<T>())
            .ok_or_else(|| ServiceError::NotRegistered {
                name: type_name::<T>().to_string(),
            })?;
        if slot.instance.is_none() {
            if let Some(factory) = slot.factory.take() {
                slot.instance = Some(factory());
            }
        }
        let instance = slot
            .instance
            .as_ref()
            .cloned()
            .ok_or_else(|| ServiceError::NotRegistered {
                name: slot.name.to_string(),
            })?;
        instance
            .downcast::<T>()
            .map_err(|_| ServiceError::NotRegistered {
                name: type_name::<T>().to_string(),
            })
    }
}

static REGISTRY: OnceLock<ServiceRegistry> = OnceLock::new();

/// The process-wide registry.
pub fn registry() -> &'static ServiceRegistry {
    REGISTRY.get_or_init(ServiceRegistry::new)
}

#[cfg(test)]
#[path = "tests/registry_tests.rs"]
mod tests;
