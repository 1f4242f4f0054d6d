//! Ordered, name-keyed attribute storage for elements.

use indexmap::map::Entry;
use indexmap::IndexMap;

/// A single `name="value"` pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

impl Attribute {
    /// Create a new attribute
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Attributes of one element, in order of first occurrence.
///
/// Names are unique. When a name is seen twice while building the list, the
/// first value wins, matching how a tree builder treats duplicate attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    map: IndexMap<String, String>,
}

impl Attributes {
    /// Create an empty attribute list
    pub fn new() -> Self {
        Self::default()
    }

    /// Get an attribute value by name
    pub fn get(&self, name: &str) -> Option<&str> {
        self.map.get(name).map(String::as_str)
    }

    /// Check if an attribute exists
    pub fn has(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    /// Update an attribute in place, or append it if the name is new
    pub fn set(&mut self, name: &str, value: &str) {
        match self.map.get_mut(name) {
            Some(existing) => {
                existing.clear();
                existing.push_str(value);
            }
            None => {
                self.map.insert(name.to_string(), value.to_string());
            }
        }
    }

    /// Remove an attribute, keeping the order of the others
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.map.shift_remove(name)
    }

    /// Append every incoming attribute whose name is not present yet.
    ///
    /// Returns how many attributes were added.
    pub fn adopt(&mut self, incoming: impl IntoIterator<Item = Attribute>) -> usize {
        let mut added = 0;
        for attr in incoming {
            if let Entry::Vacant(slot) = self.map.entry(attr.name) {
                slot.insert(attr.value);
                added += 1;
            }
        }
        added
    }

    /// Iterate over `(name, value)` pairs in order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.map.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Copy the attributes out as a list
    pub fn to_list(&self) -> Vec<Attribute> {
        self.map
            .iter()
            .map(|(name, value)| Attribute::new(name.as_str(), value.as_str()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl FromIterator<Attribute> for Attributes {
    fn from_iter<I: IntoIterator<Item = Attribute>>(iter: I) -> Self {
        let mut attributes = Attributes::new();
        attributes.adopt(iter);
        attributes
    }
}
