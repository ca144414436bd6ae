//! Field-configuration discovery.
//!
//! The API layer a model is registered with decides which of its fields are
//! exposed. How that decision is captured is the discovery collaborator's
//! business; the composer only asks it for a [`FieldConfig`].

use inflector::Inflector;
use serde::{Deserialize, Serialize};

use crate::metadata::ModelMetadata;
use crate::render::FieldConfig;

/// What an API layer registered for one model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiRegistration {
    /// Externally visible collection name; defaults to the snake_cased model name.
    pub collection_name: Option<String>,
    pub include_columns: Vec<String>,
    pub include_relations: Vec<String>,
    pub exclude_columns: Vec<String>,
    pub exclude_relations: Vec<String>,
    /// Overrides the primary key reported by the model metadata.
    pub primary_key: Option<String>,
}

impl ApiRegistration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn collection(mut self, name: impl Into<String>) -> Self {
        self.collection_name = Some(name.into());
        self
    }

    pub fn include_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn exclude_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn include_relations<I, S>(mut self, relations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include_relations = relations.into_iter().map(Into::into).collect();
        self
    }

    pub fn exclude_relations<I, S>(mut self, relations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_relations = relations.into_iter().map(Into::into).collect();
        self
    }

    pub fn primary_key(mut self, name: impl Into<String>) -> Self {
        self.primary_key = Some(name.into());
        self
    }

    /// The collection name for `model_name` under this registration.
    pub fn collection_name_for(&self, model_name: &str) -> String {
        self.collection_name
            .clone()
            .unwrap_or_else(|| model_name.to_snake_case())
    }
}

/// Discovery failures. Any of them aborts composition.
#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    #[error("model '{0}' was never registered with the API layer")]
    NotRegistered(String),

    #[error("{0}")]
    Unavailable(String),
}

/// Produces a model's inclusion/exclusion configuration.
pub trait ConfigDiscovery: Send + Sync {
    fn discover(
        &self,
        model: &dyn ModelMetadata,
        api: Option<&ApiRegistration>,
    ) -> Result<FieldConfig, DiscoveryError>;
}

/// Discovery that reads column and relation lists straight off the registration.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegisteredColumns;

impl ConfigDiscovery for RegisteredColumns {
    fn discover(
        &self,
        model: &dyn ModelMetadata,
        api: Option<&ApiRegistration>,
    ) -> Result<FieldConfig, DiscoveryError> {
        let api = api.ok_or_else(|| DiscoveryError::NotRegistered(model.name().to_string()))?;

        Ok(FieldConfig {
            included: api
                .include_columns
                .iter()
                .chain(&api.include_relations)
                .cloned()
                .collect(),
            excluded: api
                .exclude_columns
                .iter()
                .chain(&api.exclude_relations)
                .cloned()
                .collect(),
        })
    }
}
