//! Schema composition.
//!
//! Composition is a pure function of the registered models: render each one
//! independently, resolve inheritance across the results, derive the
//! invocation endpoints, and freeze everything into a [`Snapshot`].
//!
//! ```text
//!   [(model, collection, config)] ──render──► descriptors
//!                                              │
//!                                              ▼ PolymorphismResolver
//!                                            Schema ──► EndpointTable
//!                                              │
//!                                              ▼
//!                                           Snapshot ──publish──► SchemaRegistry
//! ```

mod discovery;
mod polymorphism;
mod registry;
mod snapshot;

pub use discovery::{ApiRegistration, ConfigDiscovery, DiscoveryError, RegisteredColumns};
pub use polymorphism::{InheritanceLink, PolymorphismResolver};
pub use registry::SchemaRegistry;
pub use snapshot::Snapshot;

use std::collections::BTreeMap;
use std::sync::Arc;

use log::debug;

use crate::config::Settings;
use crate::endpoint::EndpointTable;
use crate::error::DatamodelResult;
use crate::metadata::ModelMetadata;
use crate::model::Schema;
use crate::render::{self, render_operations, FieldConfig};

/// One model as handed to the composer.
#[derive(Clone)]
pub struct Registration {
    pub model: Arc<dyn ModelMetadata>,
    pub collection_name: String,
    pub config: FieldConfig,
    /// Overrides the primary key reported by the metadata.
    pub primary_key: Option<String>,
}

impl Registration {
    pub fn new(model: Arc<dyn ModelMetadata>, collection_name: impl Into<String>) -> Self {
        Self {
            model,
            collection_name: collection_name.into(),
            config: FieldConfig::default(),
            primary_key: None,
        }
    }

    pub fn with_config(mut self, config: FieldConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_primary_key(mut self, primary_key: impl Into<String>) -> Self {
        self.primary_key = Some(primary_key.into());
        self
    }

    pub fn name(&self) -> &str {
        self.model.name()
    }
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("model", &self.model.name())
            .field("collection_name", &self.collection_name)
            .field("config", &self.config)
            .field("primary_key", &self.primary_key)
            .finish()
    }
}

/// Builds snapshots from registrations.
#[derive(Debug, Clone, Default)]
pub struct SchemaComposer {
    settings: Settings,
}

impl SchemaComposer {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Compose a fresh snapshot.
    ///
    /// Later registrations of the same model name replace earlier ones.
    pub fn compose(&self, registrations: &[Registration]) -> DatamodelResult<Snapshot> {
        let schema = self.compose_schema(registrations)?;
        let endpoints = EndpointTable::from_schema(&schema);
        Ok(Snapshot::new(schema, endpoints)?)
    }

    /// Compose only the schema mapping.
    pub fn compose_schema(&self, registrations: &[Registration]) -> DatamodelResult<Schema> {
        let mut schema = Schema::new();
        let mut hints = BTreeMap::new();

        for registration in registrations {
            let model = registration.model.as_ref();
            let mut descriptor = render::render(
                model,
                &registration.collection_name,
                &registration.config,
                registration.primary_key.as_deref(),
            )?;
            descriptor.methods = render_operations(model, &self.settings.operations);

            if schema.insert(descriptor).is_some() {
                debug!("{} registered twice; keeping the last registration", model.name());
            }
            hints.insert(model.name().to_string(), model.inheritance());
        }

        PolymorphismResolver::new()
            .strict(self.settings.polymorphism.strict)
            .resolve(&mut schema, &hints)?;

        Ok(schema)
    }
}

/// Compose with default settings.
pub fn compose(registrations: &[Registration]) -> DatamodelResult<Schema> {
    SchemaComposer::default().compose_schema(registrations)
}
