//! Declarative configuration applied onto component graphs
//!
//! This module is organized into submodules:
//! - `node`: the configuration tree (`ConfigNode`, `ConfigMap`, `Callback`)
//! - `component`: the `Component` trait and the `Slot` capabilities
//! - `collections`: list and dictionary destinations, with and without templates
//! - `registry`: type name to factory table
//!
//! [`ConfigProcessor::apply`] walks a config object key by key, asks the
//! target for the slot behind each key, and merges the value according to the
//! slot's capability. It recurses into child components and collection
//! entries, so one call configures a whole component graph.

pub mod collections;
pub mod component;
pub mod node;
pub mod registry;

pub use collections::{Dictionary, DictionaryTemplate, Entry, List, ListTemplate};
pub use component::{Adapter, AdapterTarget, Component, EventDispatcher, EventTarget, Slot};
pub use node::{Callback, ConfigMap, ConfigNode, FORCE_CREATE_KEY, TYPE_KEY};
pub use registry::{ClassRegistry, ClassRegistryBuilder};

use std::cmp::Ordering;

use crate::errors::{ConfigError, CriticalConfigError};
use crate::log::{debug, warn};
use crate::types::{Value, coerce};

/// Keys that steer the processor and are never applied as properties
const RESERVED_KEYS: [&str; 2] = [TYPE_KEY, FORCE_CREATE_KEY];

/// Processor settings
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProcessorOptions {
    /// Key applied before every other key of an object, so that
    /// language-dependent defaults exist before the fields that use them
    pub first_key: String,
}

impl Default for ProcessorOptions {
    fn default() -> Self {
        Self {
            first_key: "language".to_string(),
        }
    }
}

impl ProcessorOptions {
    pub fn with_first_key(mut self, key: impl Into<String>) -> Self {
        self.first_key = key.into();
        self
    }
}

/// Applies configuration trees using a shared class registry
#[derive(Debug, Clone)]
pub struct ConfigProcessor<'r> {
    registry: &'r ClassRegistry,
    options: ProcessorOptions,
}

impl<'r> ConfigProcessor<'r> {
    pub fn new(registry: &'r ClassRegistry) -> Self {
        Self::with_options(registry, ProcessorOptions::default())
    }

    pub fn with_options(registry: &'r ClassRegistry, options: ProcessorOptions) -> Self {
        Self { registry, options }
    }

    pub fn registry(&self) -> &'r ClassRegistry {
        self.registry
    }

    pub fn options(&self) -> &ProcessorOptions {
        &self.options
    }

    /// Top-level entry point: apply `config` and report any failure as a
    /// single [`CriticalConfigError`].
    ///
    /// Nothing is rolled back; the target keeps whatever was applied before the
    /// failing key.
    pub fn configure(
        &self,
        target: &mut dyn Component,
        config: ConfigNode,
    ) -> Result<(), CriticalConfigError> {
        self.apply(target, config).map_err(|source| {
            let err = CriticalConfigError {
                class_name: target.class_name().to_string(),
                source,
            };
            warn!(
                class = %err.class_name,
                cause = %err.source,
                "configuration aborted; component left partially configured"
            );
            err
        })
    }

    /// Apply `config` onto `target`.
    ///
    /// Non-object configs have nothing to apply. Keys the target does not
    /// expose are skipped. The first error aborts the walk.
    pub fn apply(&self, target: &mut dyn Component, config: ConfigNode) -> Result<(), ConfigError> {
        let ConfigNode::Object(map) = config else {
            debug!(class = target.class_name(), "non-object config ignored");
            return Ok(());
        };

        for (key, value) in self.ordered(target, map) {
            if RESERVED_KEYS.contains(&key.as_str()) {
                continue;
            }
            match target.slot(&key) {
                Some(slot) => self.merge(slot, &key, value)?,
                None => {
                    debug!(class = target.class_name(), key = key.as_str(), "no such property");
                }
            }
        }
        Ok(())
    }

    /// Config entries in application order: the designated first key leads,
    /// everything else follows the target's own (stable) ordering.
    fn ordered(&self, target: &dyn Component, map: ConfigMap) -> Vec<(String, ConfigNode)> {
        let first = self.options.first_key.as_str();
        let mut entries: Vec<_> = map.into_iter().collect();
        entries.sort_by(|(a, _), (b, _)| {
            if a == b {
                Ordering::Equal
            } else if a == first {
                Ordering::Less
            } else if b == first {
                Ordering::Greater
            } else {
                target.config_order(a, b)
            }
        });
        entries
    }

    /// Merge one config value into one slot
    fn merge(&self, slot: Slot<'_>, key: &str, value: ConfigNode) -> Result<(), ConfigError> {
        // Component slots validate when they instantiate. Raw, adapter and
        // event slots take the node as-is.
        if !matches!(
            slot,
            Slot::Component(_) | Slot::Raw(_) | Slot::Adapter(_) | Slot::Events(_)
        ) {
            self.check_type(&value)?;
        }

        match slot {
            Slot::Adapter(adapter) => {
                for (name, handler) in value.into_entries() {
                    adapter.register(&name, handler);
                }
            }
            Slot::Events(events) => {
                for (name, handler) in value.into_entries() {
                    events.on(&name, handler);
                }
            }
            Slot::Raw(raw) => *raw = value,
            Slot::Component(current) => self.merge_component(current, key, value)?,
            Slot::ListTemplate(list) => self.merge_list_template(list, value)?,
            Slot::List(list) => self.merge_list(list, value)?,
            Slot::DictionaryTemplate(dict) => self.merge_dictionary_template(dict, value)?,
            Slot::Dictionary(_) => {
                warn!(key, "merging into a plain dictionary is not supported; ignored");
            }
            Slot::Typed(dest) => assign(dest, key, value),
            Slot::Value(dest) => merge_value(dest, key, value),
        }
        Ok(())
    }

    /// Reject a `type` the registry does not know
    fn check_type(&self, node: &ConfigNode) -> Result<(), ConfigError> {
        match node.type_name() {
            Some(type_name) if !self.registry.contains(type_name) => {
                Err(ConfigError::UnknownType {
                    type_name: type_name.to_string(),
                })
            }
            _ => Ok(()),
        }
    }

    #[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
    fn merge_component(
        &self,
        current: &mut Option<Box<dyn Component>>,
        key: &str,
        value: ConfigNode,
    ) -> Result<(), ConfigError> {
        if let ConfigNode::Instance(instance) = value {
            *current = Some(instance);
            return Ok(());
        }

        if let Some(type_name) = value.type_name() {
            let reusable = !value.force_create()
                && current
                    .as_ref()
                    .is_some_and(|existing| existing.class_name() == type_name);
            if !reusable {
                debug!(key, type_name, "instantiating component");
                *current = Some(self.registry.instantiate(type_name)?);
            }
        }

        match current {
            Some(child) => self.apply(child.as_mut(), value),
            None => {
                if value.is_object() {
                    warn!(key, "untyped config for an empty component slot; ignored");
                }
                Ok(())
            }
        }
    }

    fn merge_list_template(
        &self,
        list: &mut ListTemplate,
        value: ConfigNode,
    ) -> Result<(), ConfigError> {
        let entries = match value {
            ConfigNode::Array(entries) => entries,
            instance @ ConfigNode::Instance(_) => vec![instance],
            // A single object configures the shared template
            template @ ConfigNode::Object(_) => return self.apply(list.template_mut(), template),
            _ => return Ok(()),
        };

        for (index, entry) in entries.into_iter().enumerate() {
            if let ConfigNode::Instance(instance) = entry {
                list.set(index, instance);
                continue;
            }

            if index < list.len() && !entry.force_create() {
                self.check_type(&entry)?;
                if let Some(existing) = list.get_mut(index) {
                    self.apply(existing, entry)?;
                }
                continue;
            }

            let item = match entry.type_name() {
                Some(type_name) => list.push(self.registry.instantiate(type_name)?),
                None => list.create(),
            };
            debug!(index, class = item.class_name(), "list entry created");
            self.apply(item, entry)?;
        }
        Ok(())
    }

    fn merge_list(&self, list: &mut List, value: ConfigNode) -> Result<(), ConfigError> {
        let entries = match value {
            ConfigNode::Array(entries) => entries,
            single => vec![single],
        };

        for (index, entry) in entries.into_iter().enumerate() {
            match entry {
                ConfigNode::Instance(instance) => list.set(index, Entry::Component(instance)),
                entry @ ConfigNode::Object(_) => {
                    if index < list.len() && !entry.force_create() {
                        self.check_type(&entry)?;
                        if let Some(existing) = list.get_mut(index) {
                            self.merge_entry(existing, entry)?;
                        }
                        continue;
                    }
                    let mut item = match entry.type_name() {
                        Some(type_name) => Entry::Component(self.registry.instantiate(type_name)?),
                        None => Entry::Value(Value::empty_object()),
                    };
                    self.merge_entry(&mut item, entry)?;
                    list.push(item);
                }
                primitive => {
                    if let Some(value) = coerce(primitive) {
                        list.set(index, value);
                    }
                }
            }
        }
        Ok(())
    }

    fn merge_entry(&self, entry: &mut Entry, value: ConfigNode) -> Result<(), ConfigError> {
        match entry {
            Entry::Component(component) => self.apply(component.as_mut(), value),
            Entry::Value(dest) => {
                merge_value(dest, "entry", value);
                Ok(())
            }
        }
    }

    fn merge_dictionary_template(
        &self,
        dict: &mut DictionaryTemplate,
        value: ConfigNode,
    ) -> Result<(), ConfigError> {
        for (key, entry) in value.into_entries() {
            if let ConfigNode::Instance(instance) = entry {
                dict.insert(&key, instance);
                continue;
            }

            let item = match entry.type_name() {
                Some(type_name)
                    if entry.force_create()
                        || !dict.get(&key).is_some_and(|e| e.class_name() == type_name) =>
                {
                    dict.insert(&key, self.registry.instantiate(type_name)?)
                }
                _ => dict.get_or_create(&key),
            };
            self.apply(item, entry)?;
        }
        Ok(())
    }
}

/// Plain assignment with string coercion
#[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
fn assign(dest: &mut Value, key: &str, value: ConfigNode) {
    match coerce(value) {
        Some(value) => *dest = value,
        None => {
            warn!(key, "a component instance cannot be stored in a value property");
        }
    }
}

/// Object onto object is a shallow property union; anything else replaces.
fn merge_value(dest: &mut Value, key: &str, value: ConfigNode) {
    match (dest, value) {
        (Value::Object(fields), ConfigNode::Object(map)) => {
            for (name, node) in map {
                if RESERVED_KEYS.contains(&name.as_str()) {
                    continue;
                }
                if let Some(v) = Value::from_config(node) {
                    fields.insert(name, v);
                }
            }
        }
        (dest, value) => assign(dest, key, value),
    }
}
