//! Name-based inclusion/exclusion filtering.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Inclusion/exclusion configuration for one model.
///
/// Both lists may name scalar attributes and relations alike.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    pub included: Vec<String>,
    pub excluded: Vec<String>,
}

impl FieldConfig {
    pub fn new<I, E, S, T>(included: I, excluded: E) -> Self
    where
        I: IntoIterator<Item = S>,
        E: IntoIterator<Item = T>,
        S: Into<String>,
        T: Into<String>,
    {
        Self {
            included: included.into_iter().map(Into::into).collect(),
            excluded: excluded.into_iter().map(Into::into).collect(),
        }
    }

    pub fn filter(&self) -> FieldFilter {
        FieldFilter::from(self)
    }
}

/// Admissibility test built from an inclusion and an exclusion set.
///
/// Exclusion is a veto and inclusion an allow-list; a name must pass both.
/// An empty set places no constraint.
#[derive(Debug, Clone, Default)]
pub struct FieldFilter {
    included: HashSet<String>,
    excluded: HashSet<String>,
}

impl FieldFilter {
    pub fn new<I, E, S, T>(included: I, excluded: E) -> Self
    where
        I: IntoIterator<Item = S>,
        E: IntoIterator<Item = T>,
        S: Into<String>,
        T: Into<String>,
    {
        Self {
            included: included.into_iter().map(Into::into).collect(),
            excluded: excluded.into_iter().map(Into::into).collect(),
        }
    }

    /// A filter that admits every name.
    pub fn allow_all() -> Self {
        Self::default()
    }

    /// Test a field name; for dotted paths only the last segment counts.
    pub fn is_valid(&self, name: &str) -> bool {
        let name = name.rsplit('.').next().unwrap_or(name);

        if !self.excluded.is_empty() && self.excluded.contains(name) {
            return false;
        }
        if !self.included.is_empty() && !self.included.contains(name) {
            return false;
        }
        true
    }
}

impl From<&FieldConfig> for FieldFilter {
    fn from(config: &FieldConfig) -> Self {
        Self::new(config.included.iter().cloned(), config.excluded.iter().cloned())
    }
}
