//! The declarative configuration tree.
//!
//! A [`ConfigNode`] is consumed once by the processor and then discarded. Object
//! keys keep their insertion order, which is the order they are applied in
//! unless a component says otherwise.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::component::Component;
use crate::errors::ConfigError;
use crate::types::Value;

/// Key that names a registered component class inside an object node
pub const TYPE_KEY: &str = "type";

/// Key that forces a new collection entry instead of reusing one in place
pub const FORCE_CREATE_KEY: &str = "forceCreate";

type CallbackFn = dyn Fn(Value) -> Value + Send + Sync;

/// A handler value carried by configuration.
///
/// Adapters call it to transform a value; event dispatchers call it with the
/// event payload and ignore the result.
#[derive(Clone)]
pub struct Callback(Arc<CallbackFn>);

impl Callback {
    pub fn new(f: impl Fn(Value) -> Value + Send + Sync + 'static) -> Self {
        Callback(Arc::new(f))
    }

    pub fn call(&self, value: Value) -> Value {
        (self.0)(value)
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Callback({:p})", Arc::as_ptr(&self.0))
    }
}

/// Two callbacks are equal when they share the same closure.
impl PartialEq for Callback {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// One node of a configuration tree
#[derive(Clone, Debug, Default)]
pub enum ConfigNode {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<ConfigNode>),
    Object(ConfigMap),
    /// Handler for adapters and event dispatchers
    Callback(Callback),
    /// A pre-built component, assigned as-is
    Instance(Box<dyn Component>),
}

impl ConfigNode {
    /// Parse JSON text into a config tree, keeping object key order.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let json: serde_json::Value = serde_json::from_str(text)?;
        Ok(json.into())
    }

    pub fn callback(f: impl Fn(Value) -> Value + Send + Sync + 'static) -> Self {
        ConfigNode::Callback(Callback::new(f))
    }

    pub fn instance(component: impl Component) -> Self {
        ConfigNode::Instance(Box::new(component))
    }

    pub fn object<K: Into<String>>(entries: impl IntoIterator<Item = (K, ConfigNode)>) -> Self {
        ConfigNode::Object(entries.into_iter().collect())
    }

    pub fn is_object(&self) -> bool {
        matches!(self, ConfigNode::Object(_))
    }

    pub fn as_object(&self) -> Option<&ConfigMap> {
        match self {
            ConfigNode::Object(map) => Some(map),
            _ => None,
        }
    }

    /// The registered class this node asks for, if it is a typed node
    pub fn type_name(&self) -> Option<&str> {
        match self.as_object()?.get(TYPE_KEY)? {
            ConfigNode::String(name) => Some(name),
            _ => None,
        }
    }

    /// `true` when the node carries `forceCreate: true`
    pub fn force_create(&self) -> bool {
        matches!(
            self.as_object().and_then(|map| map.get(FORCE_CREATE_KEY)),
            Some(ConfigNode::Bool(true))
        )
    }

    /// Key/value pairs of an object node; anything else has none.
    pub fn into_entries(self) -> Vec<(String, ConfigNode)> {
        match self {
            ConfigNode::Object(map) => map.into_iter().collect(),
            _ => Vec::new(),
        }
    }
}

impl From<serde_json::Value> for ConfigNode {
    fn from(json: serde_json::Value) -> Self {
        use serde_json::Value as Json;
        match json {
            Json::Null => ConfigNode::Null,
            Json::Bool(b) => ConfigNode::Bool(b),
            Json::Number(n) => ConfigNode::Number(n.as_f64().unwrap_or(f64::NAN)),
            Json::String(s) => ConfigNode::String(s),
            Json::Array(items) => ConfigNode::Array(items.into_iter().map(Into::into).collect()),
            Json::Object(fields) => {
                ConfigNode::Object(fields.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
        }
    }
}

impl From<f64> for ConfigNode {
    fn from(n: f64) -> Self {
        ConfigNode::Number(n)
    }
}

impl From<i32> for ConfigNode {
    fn from(n: i32) -> Self {
        ConfigNode::Number(f64::from(n))
    }
}

impl From<bool> for ConfigNode {
    fn from(b: bool) -> Self {
        ConfigNode::Bool(b)
    }
}

impl From<&str> for ConfigNode {
    fn from(s: &str) -> Self {
        ConfigNode::String(s.to_string())
    }
}

impl From<String> for ConfigNode {
    fn from(s: String) -> Self {
        ConfigNode::String(s)
    }
}

impl From<Vec<ConfigNode>> for ConfigNode {
    fn from(items: Vec<ConfigNode>) -> Self {
        ConfigNode::Array(items)
    }
}

impl From<ConfigMap> for ConfigNode {
    fn from(map: ConfigMap) -> Self {
        ConfigNode::Object(map)
    }
}

/// Insertion-ordered string map of config nodes
#[derive(Clone, Default)]
pub struct ConfigMap {
    entries: Vec<(String, ConfigNode)>,
    /// Key to position in `entries`
    index: HashMap<String, usize>,
}

impl ConfigMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&ConfigNode> {
        self.index.get(key).map(|&i| &self.entries[i].1)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Insert or replace; a replaced key keeps its original position.
    pub fn insert(&mut self, key: impl Into<String>, value: ConfigNode) -> Option<ConfigNode> {
        let key = key.into();
        match self.index.get(&key) {
            Some(&i) => Some(std::mem::replace(&mut self.entries[i].1, value)),
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfigNode)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl fmt::Debug for ConfigMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Into<String>> FromIterator<(K, ConfigNode)> for ConfigMap {
    fn from_iter<I: IntoIterator<Item = (K, ConfigNode)>>(iter: I) -> Self {
        let mut map = ConfigMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl IntoIterator for ConfigMap {
    type Item = (String, ConfigNode);
    type IntoIter = std::vec::IntoIter<(String, ConfigNode)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
