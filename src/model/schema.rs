//! The composed schema document.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::descriptor::ModelDescriptor;

/// Mapping from model name to its descriptor.
///
/// Serialises to the schema document: a single JSON object keyed by model
/// name. Keys are kept sorted so identical inputs produce identical bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    models: BTreeMap<String, ModelDescriptor>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a descriptor, replacing any previous entry of the same name.
    pub fn insert(&mut self, descriptor: ModelDescriptor) -> Option<ModelDescriptor> {
        self.models.insert(descriptor.name.clone(), descriptor)
    }

    pub fn get(&self, name: &str) -> Option<&ModelDescriptor> {
        self.models.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut ModelDescriptor> {
        self.models.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.models.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.models.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ModelDescriptor)> {
        self.models.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Compact JSON document.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Indented JSON document.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl FromIterator<ModelDescriptor> for Schema {
    fn from_iter<I: IntoIterator<Item = ModelDescriptor>>(iter: I) -> Self {
        let mut schema = Schema::new();
        for descriptor in iter {
            schema.insert(descriptor);
        }
        schema
    }
}
