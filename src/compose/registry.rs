//! Process-wide schema registry with atomic snapshot publication.

use std::collections::BTreeMap;
use std::sync::Arc;

use log::info;
use parking_lot::{Mutex, RwLock};

use super::discovery::{ApiRegistration, ConfigDiscovery, RegisteredColumns};
use super::{Registration, SchemaComposer, Snapshot};
use crate::config::Settings;
use crate::error::{DatamodelError, DatamodelResult};
use crate::metadata::{Catalog, ModelMetadata};

#[derive(Clone)]
struct Entry {
    model: Arc<dyn ModelMetadata>,
    api: Option<ApiRegistration>,
}

/// Holds the registered models and the currently published snapshot.
///
/// Every change recomposes the whole schema off to the side and then swaps
/// the published `Arc<Snapshot>` in one step. Readers holding an older
/// snapshot keep it; new readers see the new one. A failed composition
/// publishes nothing and leaves the registrations as they were.
pub struct SchemaRegistry {
    composer: SchemaComposer,
    discovery: Box<dyn ConfigDiscovery>,
    /// Serializes writers; readers never take this lock.
    entries: Mutex<BTreeMap<String, Entry>>,
    current: RwLock<Arc<Snapshot>>,
}

impl SchemaRegistry {
    /// A registry using [`RegisteredColumns`] discovery.
    pub fn new(settings: Settings) -> Self {
        Self::with_discovery(settings, Box::new(RegisteredColumns))
    }

    pub fn with_discovery(settings: Settings, discovery: Box<dyn ConfigDiscovery>) -> Self {
        Self {
            composer: SchemaComposer::new(settings),
            discovery,
            entries: Mutex::new(BTreeMap::new()),
            current: RwLock::new(Arc::new(Snapshot::empty())),
        }
    }

    /// The currently published snapshot.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&self.current.read())
    }

    /// Names of the registered models.
    pub fn registered(&self) -> Vec<String> {
        self.entries.lock().keys().cloned().collect()
    }

    /// Register (or re-register) one model and republish.
    pub fn register(
        &self,
        model: Arc<dyn ModelMetadata>,
        api: Option<ApiRegistration>,
    ) -> DatamodelResult<Arc<Snapshot>> {
        self.register_all(vec![(model, api)])
    }

    /// Register several models with a single recomposition.
    pub fn register_all(
        &self,
        models: Vec<(Arc<dyn ModelMetadata>, Option<ApiRegistration>)>,
    ) -> DatamodelResult<Arc<Snapshot>> {
        self.update(|entries| {
            for (model, api) in models {
                entries.insert(model.name().to_string(), Entry { model, api });
            }
        })
    }

    /// Register every exposed model of a catalog.
    pub fn register_catalog(&self, catalog: &Catalog) -> DatamodelResult<Arc<Snapshot>> {
        let models = catalog
            .exposed()
            .map(|m| {
                let api = m.api().cloned();
                (Arc::clone(m) as Arc<dyn ModelMetadata>, api)
            })
            .collect();
        self.register_all(models)
    }

    /// Remove a model and republish. Unknown names are a no-op recomposition.
    pub fn unregister(&self, name: &str) -> DatamodelResult<Arc<Snapshot>> {
        self.update(|entries| {
            entries.remove(name);
        })
    }

    fn update<F>(&self, change: F) -> DatamodelResult<Arc<Snapshot>>
    where
        F: FnOnce(&mut BTreeMap<String, Entry>),
    {
        let mut entries = self.entries.lock();
        let mut next = entries.clone();
        change(&mut next);

        let snapshot = Arc::new(self.compose(&next)?);
        *entries = next;
        *self.current.write() = Arc::clone(&snapshot);

        info!(
            "published schema with {} models (etag {})",
            snapshot.schema().len(),
            &snapshot.etag()[..12]
        );
        Ok(snapshot)
    }

    fn compose(&self, entries: &BTreeMap<String, Entry>) -> DatamodelResult<Snapshot> {
        let registrations = entries
            .values()
            .map(|entry| {
                let model = entry.model.as_ref();
                let config = self
                    .discovery
                    .discover(model, entry.api.as_ref())
                    .map_err(|source| DatamodelError::Discovery {
                        model: model.name().to_string(),
                        source,
                    })?;
                let api = entry.api.clone().unwrap_or_default();

                Ok(Registration {
                    model: Arc::clone(&entry.model),
                    collection_name: api.collection_name_for(model.name()),
                    config,
                    primary_key: api.primary_key,
                })
            })
            .collect::<DatamodelResult<Vec<_>>>()?;

        self.composer.compose(&registrations)
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}
