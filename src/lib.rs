//! # datamodel
//!
//! Reflects relational model metadata into a declarative, JSON-serializable
//! schema: scalar attributes, relations, callable operations and inheritance
//! structure, without hand-written schema definitions.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │        ModelMetadata (ORM adapter or Catalog)            │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [render]  filter, attributes, relations,
//!                          │           proxies, operations
//! ┌─────────────────────────────────────────────────────────┐
//! │              ModelDescriptor (per model)                 │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [compose]  polymorphism resolution
//! ┌─────────────────────────────────────────────────────────┐
//! │          Snapshot: Schema + EndpointTable + etag         │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [SchemaRegistry]  atomic publish
//!                   JSON document / invocation
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use datamodel::prelude::*;
//!
//! let catalog = Catalog::from_file("models.json")?;
//! let registry = SchemaRegistry::default();
//! let snapshot = registry.register_catalog(&catalog)?;
//! println!("{}", snapshot.document());
//! ```

pub mod compose;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod metadata;
pub mod model;
pub mod render;

pub use error::{DatamodelError, DatamodelResult};

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::compose::{
        compose, ApiRegistration, ConfigDiscovery, DiscoveryError, Registration, RegisteredColumns,
        SchemaComposer, SchemaRegistry, Snapshot,
    };
    pub use crate::config::Settings;
    pub use crate::endpoint::{Arguments, EndpointTable, InstanceResolver, InvocationError};
    pub use crate::error::{DatamodelError, DatamodelResult};
    pub use crate::metadata::{Catalog, ModelMetadata};
    pub use crate::model::{
        ModelDescriptor, OperationDescriptor, PolymorphicInfo, RelationDescriptor, RelationType,
        Schema,
    };
    pub use crate::render::{FieldConfig, FieldFilter};
}
