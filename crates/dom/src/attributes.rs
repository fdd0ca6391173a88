//! DOM Attribute handling.

use indexmap::IndexMap;
use std::sync::Arc;

/// Map of element attributes preserving insertion order.
#[derive(Clone, Debug, Default)]
pub struct AttributeMap {
    attrs: IndexMap<Arc<str>, String>,
}

impl AttributeMap {
    pub fn new() -> Self {
        Self {
            attrs: IndexMap::new(),
        }
    }

    /// Set an attribute value. Existing attributes keep their position.
    pub fn set(&mut self, name: &str, value: &str) {
        self.attrs.insert(Arc::from(name), value.to_string());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(|s| s.as_str())
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.attrs.shift_remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.attrs.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attrs.iter().map(|(k, v)| (k.as_ref(), v.as_str()))
    }
}
