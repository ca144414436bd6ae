//! Error types for schema composition.

use crate::compose::DiscoveryError;

/// Result type for composition operations.
pub type DatamodelResult<T> = Result<T, DatamodelError>;

/// Failures that abort composing a schema.
///
/// Unresolvable association proxies and (outside strict mode) polymorphic
/// declarations whose parent is not registered are not errors; they are
/// dropped during rendering and resolution.
#[derive(Debug, thiserror::Error)]
pub enum DatamodelError {
    #[error("Cannot determine field configuration for model '{model}': {source}")]
    Discovery {
        model: String,
        #[source]
        source: DiscoveryError,
    },

    #[error("Model '{0}' has no primary key")]
    MissingPrimaryKey(String),

    #[error("Model '{model}' inherits from '{parent}', which is not a registered model")]
    UnknownParent { model: String, parent: String },

    #[error("Parent model '{parent}' of '{model}' declares no discriminator column")]
    MissingDiscriminator { model: String, parent: String },

    #[error("Inheritance cycle between models: {}", .0.join(" -> "))]
    InheritanceCycle(Vec<String>),

    #[error("Failed to serialize schema: {0}")]
    Serialize(#[from] serde_json::Error),
}
