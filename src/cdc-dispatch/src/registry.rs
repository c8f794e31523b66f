use std::{
    collections::{hash_map::Entry, HashMap},
    sync::Arc,
};

use crate::{
    dispatcher::{
        handler::ChangeHandler,
        observer::{DispatchObserver, TracingObserver},
        Dispatcher, RouteHandler,
    },
    error::RegistryError,
};

/// Holds exactly one handler per entity.
///
/// Dispatchers handed out by the registry share the handler instance but
/// nothing else, so each concurrent consumer should take its own.
pub struct HandlerRegistry {
    handlers: HashMap<String, Arc<dyn RouteHandler>>,
    observer: Arc<dyn DispatchObserver>,
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
            observer: Arc::new(TracingObserver),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn DispatchObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn register(
        &mut self,
        entity: impl Into<String>,
        handler: impl ChangeHandler,
    ) -> Result<(), RegistryError> {
        match self.handlers.entry(entity.into()) {
            Entry::Occupied(entry) => Err(RegistryError::Duplicate(entry.key().clone())),
            Entry::Vacant(entry) => {
                tracing::debug!(entity = %entry.key(), "registered handler");
                entry.insert(Arc::new(handler));
                Ok(())
            }
        }
    }

    pub fn contains(&self, entity: &str) -> bool {
        self.handlers.contains_key(entity)
    }

    pub fn entities(&self) -> Vec<&str> {
        let mut entities: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        entities.sort_unstable();
        entities
    }

    /// A fresh dispatcher bound to the entity's handler.
    pub fn dispatcher(&self, entity: &str) -> Option<Dispatcher> {
        self.handlers.get(entity).map(|handler| {
            Dispatcher::from_shared(entity.to_string(), handler.clone(), self.observer.clone())
        })
    }
}
