//! Declarative model catalog.
//!
//! A [`Catalog`] is a [`ModelMetadata`] provider loaded from a JSON document
//! instead of a live ORM. It resolves what a mapper would resolve on its own:
//! association proxies are followed through their local relationship to the
//! remote attribute, and inheritance hints are computed from declared bases.
//!
//! ```json
//! {
//!   "models": [
//!     {
//!       "name": "Computer",
//!       "columns": [{ "name": "id", "type": "Integer", "primary_key": true }],
//!       "relationships": [
//!         { "name": "owner", "target_model": "Person", "direction": "MANY_TO_ONE",
//!           "backref": "computers", "local_columns": ["owner_id"] }
//!       ],
//!       "association_proxies": [
//!         { "name": "owner_name", "target_collection": "owner", "remote_attr": "name" }
//!       ],
//!       "api": { "collection_name": "compjutahs", "exclude_columns": ["name"] }
//!     }
//!   ]
//! }
//! ```

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::provider::ModelMetadata;
use super::types::*;
use crate::compose::ApiRegistration;

/// Errors raised while loading a catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to read catalog: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Model declared more than once: {0}")]
    DuplicateModel(String),

    #[error("Model '{model}' declares '{field}' more than once")]
    DuplicateField { model: String, field: String },
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Raw catalog document as it appears on disk.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CatalogDocument {
    #[serde(default)]
    pub models: Vec<ModelDefinition>,
}

/// A single model as declared in the catalog.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ModelDefinition {
    pub name: String,
    pub columns: Vec<ColumnInfo>,
    pub hybrid_properties: Vec<String>,
    pub relationships: Vec<RelationshipInfo>,
    pub association_proxies: Vec<ProxyDefinition>,
    pub operations: Vec<OperationSignature>,
    /// Declared base classes, in declaration order.
    pub bases: Vec<String>,
    /// Abstract models contribute fields to subclasses but are never rendered.
    #[serde(rename = "abstract")]
    pub is_abstract: bool,
    pub polymorphic_on: Option<String>,
    pub polymorphic_identity: Option<String>,
    /// API registration; models without one are not exposed.
    pub api: Option<ApiRegistration>,
}

/// An association proxy declaration: `remote_attr` reached through `target_collection`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProxyDefinition {
    pub name: String,
    pub target_collection: String,
    pub remote_attr: String,
}

/// A catalog model with proxies and inheritance already resolved.
#[derive(Debug, Clone)]
pub struct CatalogModel {
    definition: ModelDefinition,
    proxies: Vec<AssociationProxy>,
    inheritance: InheritanceHint,
}

impl CatalogModel {
    /// The API registration declared for this model, if any.
    pub fn api(&self) -> Option<&ApiRegistration> {
        self.definition.api.as_ref()
    }

    pub fn is_abstract(&self) -> bool {
        self.definition.is_abstract
    }
}

impl ModelMetadata for CatalogModel {
    fn name(&self) -> &str {
        &self.definition.name
    }

    fn columns(&self) -> Vec<ColumnInfo> {
        self.definition.columns.clone()
    }

    fn hybrid_properties(&self) -> Vec<String> {
        self.definition.hybrid_properties.clone()
    }

    fn relationships(&self) -> Vec<RelationshipInfo> {
        self.definition.relationships.clone()
    }

    fn association_proxies(&self) -> Vec<AssociationProxy> {
        self.proxies.clone()
    }

    fn operations(&self) -> Vec<OperationSignature> {
        self.definition.operations.clone()
    }

    fn inheritance(&self) -> InheritanceHint {
        self.inheritance.clone()
    }
}

/// A set of resolved models, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    models: Vec<Arc<CatalogModel>>,
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Load a catalog from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> CatalogResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse a catalog from a JSON string.
    pub fn from_json(json: &str) -> CatalogResult<Self> {
        let document: CatalogDocument = serde_json::from_str(json)?;
        Self::from_definitions(document.models)
    }

    /// Build a catalog from model definitions, resolving proxies and inheritance.
    pub fn from_definitions(definitions: Vec<ModelDefinition>) -> CatalogResult<Self> {
        let mut index = HashMap::new();
        for (i, def) in definitions.iter().enumerate() {
            if index.insert(def.name.clone(), i).is_some() {
                return Err(CatalogError::DuplicateModel(def.name.clone()));
            }
            check_unique_fields(def)?;
        }

        let resolver = Resolver {
            definitions: &definitions,
            index: &index,
        };

        let models = definitions
            .iter()
            .map(|def| {
                Arc::new(CatalogModel {
                    proxies: resolver.proxies(def),
                    inheritance: resolver.inheritance(def),
                    definition: resolver.flatten(def),
                })
            })
            .collect();

        Ok(Self { models, index })
    }

    /// Look up a model by name.
    pub fn get(&self, name: &str) -> Option<&Arc<CatalogModel>> {
        self.index.get(name).map(|&i| &self.models[i])
    }

    /// All models, including abstract ones.
    pub fn models(&self) -> &[Arc<CatalogModel>] {
        &self.models
    }

    /// Concrete models carrying an API registration, in declaration order.
    pub fn exposed(&self) -> impl Iterator<Item = &Arc<CatalogModel>> {
        self.models
            .iter()
            .filter(|m| !m.is_abstract() && m.api().is_some())
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

fn check_unique_fields(def: &ModelDefinition) -> CatalogResult<()> {
    let mut seen = HashSet::new();
    let names = def
        .columns
        .iter()
        .map(|c| c.name.as_str())
        .chain(def.hybrid_properties.iter().map(String::as_str))
        .chain(def.relationships.iter().map(|r| r.name.as_str()))
        .chain(def.association_proxies.iter().map(|p| p.name.as_str()));

    for name in names {
        if !seen.insert(name) {
            return Err(CatalogError::DuplicateField {
                model: def.name.clone(),
                field: name.to_string(),
            });
        }
    }
    Ok(())
}

/// Remote attribute found while following a proxy.
enum Attr<'a> {
    Column(&'a ColumnInfo),
    Relationship(&'a RelationshipInfo),
    Opaque,
}

struct Resolver<'a> {
    definitions: &'a [ModelDefinition],
    index: &'a HashMap<String, usize>,
}

impl<'a> Resolver<'a> {
    fn get(&self, name: &str) -> Option<&'a ModelDefinition> {
        self.index.get(name).map(|&i| &self.definitions[i])
    }

    /// The model followed by every catalog ancestor, nearest first.
    fn lineage(&self, def: &'a ModelDefinition) -> Vec<&'a ModelDefinition> {
        let mut out = Vec::new();
        let mut visited = HashSet::new();
        let mut stack = vec![def];

        while let Some(current) = stack.pop() {
            if !visited.insert(current.name.as_str()) {
                continue;
            }
            out.push(current);
            // Reverse so the first declared base is visited first.
            for base in current.bases.iter().rev() {
                if let Some(base_def) = self.get(base) {
                    stack.push(base_def);
                }
            }
        }
        out
    }

    fn lookup(&self, def: &'a ModelDefinition, attr: &str) -> Option<Attr<'a>> {
        for model in self.lineage(def) {
            if let Some(col) = model.columns.iter().find(|c| c.name == attr) {
                return Some(Attr::Column(col));
            }
            if let Some(rel) = model.relationships.iter().find(|r| r.name == attr) {
                return Some(Attr::Relationship(rel));
            }
            if model.hybrid_properties.iter().any(|h| h == attr)
                || model.association_proxies.iter().any(|p| p.name == attr)
            {
                return Some(Attr::Opaque);
            }
        }
        None
    }

    fn proxies(&self, def: &'a ModelDefinition) -> Vec<AssociationProxy> {
        def.association_proxies
            .iter()
            .filter_map(|proxy| {
                let local = match self.lookup(def, &proxy.target_collection)? {
                    Attr::Relationship(rel) => rel,
                    _ => return None,
                };
                let target = self
                    .get(&local.target_model)
                    .and_then(|remote| self.lookup(remote, &proxy.remote_attr))
                    .and_then(|attr| match attr {
                        Attr::Column(col) => Some(ProxyTarget::Column {
                            type_name: col.type_name.clone(),
                        }),
                        Attr::Relationship(rel) => Some(ProxyTarget::Relationship {
                            target_model: rel.target_model.clone(),
                        }),
                        Attr::Opaque => None,
                    });

                Some(AssociationProxy {
                    name: proxy.name.clone(),
                    scalar: !local.uselist,
                    target,
                })
            })
            .collect()
    }

    /// Copy of `def` as a mapper would report it.
    ///
    /// Fields of abstract ancestors are mixed in, operations are inherited
    /// from every ancestor, and a model declaring no primary key (single-table
    /// inheritance) takes the key columns of its nearest ancestor that has one.
    /// The model's own declarations always win.
    fn flatten(&self, def: &'a ModelDefinition) -> ModelDefinition {
        let mut out = def.clone();
        let mut taken: HashSet<String> = def
            .columns
            .iter()
            .map(|c| c.name.clone())
            .chain(def.hybrid_properties.iter().cloned())
            .chain(def.relationships.iter().map(|r| r.name.clone()))
            .collect();
        let ancestors = self.lineage(def).into_iter().skip(1).collect::<Vec<_>>();

        for base in ancestors.iter().filter(|b| b.is_abstract) {
            for col in &base.columns {
                if taken.insert(col.name.clone()) {
                    out.columns.push(col.clone());
                }
            }
            for hybrid in &base.hybrid_properties {
                if taken.insert(hybrid.clone()) {
                    out.hybrid_properties.push(hybrid.clone());
                }
            }
            for rel in &base.relationships {
                if taken.insert(rel.name.clone()) {
                    out.relationships.push(rel.clone());
                }
            }
        }

        if !out.columns.iter().any(|c| c.primary_key) {
            let keys = ancestors
                .iter()
                .map(|b| b.columns.iter().filter(|c| c.primary_key).collect::<Vec<_>>())
                .find(|keys| !keys.is_empty())
                .unwrap_or_default();
            for col in keys {
                if taken.insert(col.name.clone()) {
                    out.columns.push(col.clone());
                }
            }
        }

        let mut operations: HashSet<String> =
            def.operations.iter().map(|op| op.name.clone()).collect();
        for base in &ancestors {
            for op in &base.operations {
                if operations.insert(op.name.clone()) {
                    out.operations.push(op.clone());
                }
            }
        }

        out
    }

    fn inheritance(&self, def: &'a ModelDefinition) -> InheritanceHint {
        // Nearest concrete ancestor; abstract models in between are skipped.
        let parent = self
            .lineage(def)
            .into_iter()
            .skip(1)
            .find(|m| !m.is_abstract)
            .map(|m| m.name.clone());

        let discriminator = self
            .lineage(def)
            .into_iter()
            .find_map(|m| m.polymorphic_on.clone());

        InheritanceHint {
            identity: def.polymorphic_identity.clone(),
            parent,
            discriminator,
        }
    }
}
