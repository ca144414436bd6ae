//! Structural metadata providers.
//!
//! This module defines the narrow interface the reflection engine reads model
//! structure through, plus a declarative implementation of it.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                       ModelMetadata                             │
//! │  - columns()              - association_proxies()               │
//! │  - hybrid_properties()    - operations()                        │
//! │  - relationships()        - inheritance()                       │
//! └─────────────────────────────────────────────────────────────────┘
//!              ▲                                   ▲
//!              │                                   │
//! ┌────────────────────────┐         ┌────────────────────────────┐
//! │  ORM adapter (extern)  │         │  Catalog (JSON, bundled)   │
//! └────────────────────────┘         └────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use datamodel::metadata::{Catalog, ModelMetadata};
//!
//! let catalog = Catalog::from_file("models.json")?;
//! for model in catalog.exposed() {
//!     println!("{} ({} columns)", model.name(), model.columns().len());
//! }
//! ```

mod catalog;
mod provider;
mod types;

pub use catalog::{
    Catalog, CatalogDocument, CatalogError, CatalogModel, CatalogResult, ModelDefinition,
    ProxyDefinition,
};
pub use provider::ModelMetadata;
pub use types::*;
