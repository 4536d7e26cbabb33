//! Target components and the capabilities their properties expose.
//!
//! A component never hands out its fields by name-based probing. Instead
//! [`Component::slot`] answers with a [`Slot`]: a closed set of capabilities
//! the processor dispatches on with a single exhaustive `match`.

use std::any::Any;
use std::cmp::Ordering;
use std::fmt;

use super::collections::{Dictionary, DictionaryTemplate, List, ListTemplate};
use super::node::ConfigNode;
use crate::log::warn;
use crate::types::Value;

/// Anything configuration can be applied to
pub trait Component: fmt::Debug + 'static {
    /// Registered class name, compared against a config node's `type`
    fn class_name(&self) -> &str;

    /// The settable property under `key`, or `None` when there is no such
    /// property (the key is then skipped).
    fn slot(&mut self, key: &str) -> Option<Slot<'_>>;

    /// Deep copy, used to stamp collection entries out of a template
    fn clone_box(&self) -> Box<dyn Component>;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Extra ordering between config keys. Consulted only when neither key is
    /// the processor's designated first key; the sort is stable.
    fn config_order(&self, _a: &str, _b: &str) -> Ordering {
        Ordering::Equal
    }
}

impl dyn Component {
    pub fn downcast_ref<T: Component>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn downcast_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }

    pub fn is<T: Component>(&self) -> bool {
        self.as_any().is::<T>()
    }
}

impl Clone for Box<dyn Component> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// Implements the identity half of [`Component`] (`class_name`, `clone_box`,
/// `as_any`, `as_any_mut`) for a `Clone` type.
#[macro_export]
macro_rules! component_identity {
    ($name:expr) => {
        fn class_name(&self) -> &str {
            $name
        }

        fn clone_box(&self) -> ::std::boxed::Box<dyn $crate::config::Component> {
            ::std::boxed::Box::new(::std::clone::Clone::clone(self))
        }

        fn as_any(&self) -> &dyn ::std::any::Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
            self
        }
    };
}

/// What a property can do with a configuration value
pub enum Slot<'a> {
    /// Named interception points; every config entry registers a handler
    Adapter(&'a mut dyn AdapterTarget),
    /// Event listeners; every config entry registers a listener
    Events(&'a mut dyn EventTarget),
    /// Opaque field that takes the config node untouched (e.g. a locale)
    Raw(&'a mut ConfigNode),
    /// Nested component, possibly not created yet
    Component(&'a mut Option<Box<dyn Component>>),
    ListTemplate(&'a mut ListTemplate),
    List(&'a mut List),
    DictionaryTemplate(&'a mut DictionaryTemplate),
    /// Plain keyed values; configuration does not merge into these
    Dictionary(&'a mut Dictionary),
    /// Color or percentage wrapper, assigned directly
    Typed(&'a mut Value),
    /// Any other value
    Value(&'a mut Value),
}

impl Slot<'_> {
    /// Short capability name for diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Slot::Adapter(_) => "adapter",
            Slot::Events(_) => "events",
            Slot::Raw(_) => "raw",
            Slot::Component(_) => "component",
            Slot::ListTemplate(_) => "list-template",
            Slot::List(_) => "list",
            Slot::DictionaryTemplate(_) => "dictionary-template",
            Slot::Dictionary(_) => "dictionary",
            Slot::Typed(_) => "typed",
            Slot::Value(_) => "value",
        }
    }
}

impl fmt::Debug for Slot<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Slot::{}", self.kind())
    }
}

/// Registration side of an adapter
pub trait AdapterTarget {
    fn register(&mut self, key: &str, handler: ConfigNode);
}

/// Registration side of an event dispatcher
pub trait EventTarget {
    fn on(&mut self, event: &str, handler: ConfigNode);
}

/// Ordered list of value transformations keyed by name
#[derive(Clone, Debug, Default)]
pub struct Adapter {
    handlers: Vec<(String, ConfigNode)>,
}

impl Adapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has(&self, key: &str) -> bool {
        self.handlers.iter().any(|(k, _)| k == key)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Run `value` through every callback registered under `key`, in
    /// registration order.
    pub fn apply(&self, key: &str, value: Value) -> Value {
        self.handlers
            .iter()
            .filter(|(k, _)| k == key)
            .fold(value, |value, (_, handler)| match handler {
                ConfigNode::Callback(cb) => cb.call(value),
                _ => value,
            })
    }
}

impl AdapterTarget for Adapter {
    fn register(&mut self, key: &str, handler: ConfigNode) {
        if !matches!(handler, ConfigNode::Callback(_)) {
            warn!(key, "adapter handler is not callable; it will never run");
        }
        self.handlers.push((key.to_string(), handler));
    }
}

/// Event listeners keyed by event name
#[derive(Clone, Debug, Default)]
pub struct EventDispatcher {
    listeners: Vec<(String, ConfigNode)>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_listeners(&self, event: &str) -> bool {
        self.listeners.iter().any(|(k, _)| k == event)
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Invoke the listeners for `event`; returns how many ran.
    pub fn dispatch(&self, event: &str, payload: &Value) -> usize {
        let mut invoked = 0;
        for (_, listener) in self.listeners.iter().filter(|(k, _)| k == event) {
            if let ConfigNode::Callback(cb) = listener {
                cb.call(payload.clone());
                invoked += 1;
            }
        }
        invoked
    }
}

impl EventTarget for EventDispatcher {
    fn on(&mut self, event: &str, handler: ConfigNode) {
        if !matches!(handler, ConfigNode::Callback(_)) {
            warn!(event, "event listener is not callable; it will never run");
        }
        self.listeners.push((event.to_string(), handler));
    }
}
