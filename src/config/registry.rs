//! Registered component classes.
//!
//! Populate a [`ClassRegistry`] once at the composition root and share it
//! read-only with every [`ConfigProcessor`](super::ConfigProcessor).

use std::collections::HashMap;
use std::fmt;

use super::component::Component;
use crate::errors::ConfigError;

type Factory = Box<dyn Fn() -> Box<dyn Component> + Send + Sync>;

/// Collects factories before the registry is frozen
#[derive(Default)]
pub struct ClassRegistryBuilder {
    factories: HashMap<String, Factory>,
}

impl ClassRegistryBuilder {
    /// Register `factory` under `name`; a later registration of the same name
    /// wins.
    pub fn register<C, F>(mut self, name: impl Into<String>, factory: F) -> Self
    where
        C: Component,
        F: Fn() -> C + Send + Sync + 'static,
    {
        let factory: Factory = Box::new(move || -> Box<dyn Component> { Box::new(factory()) });
        self.factories.insert(name.into(), factory);
        self
    }

    /// Register a `Default`-constructible component under its own class name
    pub fn register_default<C: Component + Default>(self) -> Self {
        let name = C::default().class_name().to_string();
        self.register(name, C::default)
    }

    pub fn build(self) -> ClassRegistry {
        ClassRegistry {
            factories: self.factories,
        }
    }
}

/// Immutable table from type name to component factory
pub struct ClassRegistry {
    factories: HashMap<String, Factory>,
}

impl ClassRegistry {
    pub fn builder() -> ClassRegistryBuilder {
        ClassRegistryBuilder::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Fresh instance of `name`, matched exactly
    pub fn create(&self, name: &str) -> Option<Box<dyn Component>> {
        self.factories.get(name).map(|factory| factory())
    }

    /// Like [`create`](Self::create) but an unregistered name is an error
    pub fn instantiate(&self, name: &str) -> Result<Box<dyn Component>, ConfigError> {
        self.create(name).ok_or_else(|| ConfigError::UnknownType {
            type_name: name.to_string(),
        })
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }
}

impl fmt::Debug for ClassRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.names().collect();
        names.sort_unstable();
        f.debug_struct("ClassRegistry").field("classes", &names).finish()
    }
}
