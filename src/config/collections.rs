//! Collections configuration can merge into.
//!
//! Templated collections carry a prototype component; new entries start as a
//! copy of it, so shared defaults are applied once on the template and
//! per-entry overrides afterwards.

use std::collections::BTreeMap;

use super::component::Component;
use crate::types::Value;

/// Ordered components stamped from a shared template
#[derive(Clone, Debug)]
pub struct ListTemplate {
    template: Box<dyn Component>,
    items: Vec<Box<dyn Component>>,
}

impl ListTemplate {
    pub fn new(template: impl Component) -> Self {
        Self {
            template: Box::new(template),
            items: Vec::new(),
        }
    }

    pub fn template(&self) -> &dyn Component {
        self.template.as_ref()
    }

    pub fn template_mut(&mut self) -> &mut dyn Component {
        self.template.as_mut()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&dyn Component> {
        self.items.get(index).map(|item| item.as_ref())
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut dyn Component> {
        match self.items.get_mut(index) {
            Some(item) => Some(item.as_mut()),
            None => None,
        }
    }

    /// Append a copy of the template and return it
    pub fn create(&mut self) -> &mut dyn Component {
        let item = self.template.clone_box();
        self.push(item)
    }

    /// Append an existing component and return it
    pub fn push(&mut self, item: Box<dyn Component>) -> &mut dyn Component {
        self.items.push(item);
        let last = self.items.len() - 1;
        self.items[last].as_mut()
    }

    /// Replace the entry at `index`; out of range appends instead.
    pub fn set(&mut self, index: usize, item: Box<dyn Component>) {
        match self.items.get_mut(index) {
            Some(slot) => *slot = item,
            None => self.items.push(item),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Component> {
        self.items.iter().map(|item| item.as_ref())
    }
}

/// One element of a [`List`]
#[derive(Clone, Debug)]
pub enum Entry {
    Component(Box<dyn Component>),
    Value(Value),
}

impl Entry {
    pub fn as_component(&self) -> Option<&dyn Component> {
        match self {
            Entry::Component(c) => Some(c.as_ref()),
            Entry::Value(_) => None,
        }
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Entry::Value(v) => Some(v),
            Entry::Component(_) => None,
        }
    }
}

impl From<Value> for Entry {
    fn from(value: Value) -> Self {
        Entry::Value(value)
    }
}

/// Ordered entries without a template
#[derive(Clone, Debug, Default)]
pub struct List {
    entries: Vec<Entry>,
}

impl List {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Entry> {
        self.entries.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Entry> {
        self.entries.get_mut(index)
    }

    pub fn push(&mut self, entry: impl Into<Entry>) {
        self.entries.push(entry.into());
    }

    /// Replace the entry at `index`; out of range appends instead.
    pub fn set(&mut self, index: usize, entry: impl Into<Entry>) {
        let entry = entry.into();
        match self.entries.get_mut(index) {
            Some(slot) => *slot = entry,
            None => self.entries.push(entry),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter()
    }

    /// Plain values only, skipping component entries
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().filter_map(Entry::as_value)
    }
}

impl<V: Into<Value>> FromIterator<V> for List {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|v| Entry::Value(v.into())).collect(),
        }
    }
}

/// Keyed components stamped from a shared template, in insertion order
#[derive(Clone, Debug)]
pub struct DictionaryTemplate {
    template: Box<dyn Component>,
    entries: Vec<(String, Box<dyn Component>)>,
}

impl DictionaryTemplate {
    pub fn new(template: impl Component) -> Self {
        Self {
            template: Box::new(template),
            entries: Vec::new(),
        }
    }

    pub fn template(&self) -> &dyn Component {
        self.template.as_ref()
    }

    pub fn template_mut(&mut self) -> &mut dyn Component {
        self.template.as_mut()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    pub fn get(&self, key: &str) -> Option<&dyn Component> {
        self.position(key).map(|i| self.entries[i].1.as_ref())
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut dyn Component> {
        let index = self.position(key)?;
        Some(self.entries[index].1.as_mut())
    }

    /// Existing entry under `key`, or a fresh copy of the template stored there
    pub fn get_or_create(&mut self, key: &str) -> &mut dyn Component {
        let index = match self.position(key) {
            Some(index) => index,
            None => {
                let item = self.template.clone_box();
                self.entries.push((key.to_string(), item));
                self.entries.len() - 1
            }
        };
        self.entries[index].1.as_mut()
    }

    /// Store `item` under `key`, replacing any previous entry in place
    pub fn insert(&mut self, key: &str, item: Box<dyn Component>) -> &mut dyn Component {
        let index = match self.position(key) {
            Some(index) => {
                self.entries[index].1 = item;
                index
            }
            None => {
                self.entries.push((key.to_string(), item));
                self.entries.len() - 1
            }
        };
        self.entries[index].1.as_mut()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k == key)
    }
}

/// Plain keyed values
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Dictionary {
    entries: BTreeMap<String, Value>,
}

impl Dictionary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(key.into(), value.into())
    }
}
