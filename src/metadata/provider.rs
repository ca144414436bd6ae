//! ModelMetadata trait definition.
//!
//! The ModelMetadata trait abstracts over the storage layer a model lives in.
//! An ORM adapter implements it by inspecting its mapped classes; the bundled
//! [`Catalog`](super::Catalog) implements it from a declarative JSON file.

use super::types::*;

/// Trait for reading the structural metadata of a single model.
///
/// Every method is synchronous and side-effect free: the metadata is assumed
/// to be resident in memory already. Implementations must report only what
/// the model itself declares; cross-model merging (inheritance) happens in
/// the composer, not here.
///
/// # Example
///
/// ```ignore
/// use datamodel::metadata::{ColumnInfo, ModelMetadata};
///
/// fn describe(model: &dyn ModelMetadata) {
///     for column in model.columns() {
///         println!("{}.{}: {}", model.name(), column.name, column.type_name);
///     }
/// }
/// ```
pub trait ModelMetadata: Send + Sync {
    // =========================================================================
    // Identity
    // =========================================================================

    /// The model's type name, unique across a schema.
    fn name(&self) -> &str;

    // =========================================================================
    // Fields
    // =========================================================================

    /// Stored columns of the model's own table.
    fn columns(&self) -> Vec<ColumnInfo>;

    /// Names of computed (hybrid) properties.
    fn hybrid_properties(&self) -> Vec<String> {
        Vec::new()
    }

    /// Direct relationships declared on the model.
    fn relationships(&self) -> Vec<RelationshipInfo> {
        Vec::new()
    }

    /// Association proxies declared on the model, already resolved to their remote target.
    fn association_proxies(&self) -> Vec<AssociationProxy> {
        Vec::new()
    }

    // =========================================================================
    // Behaviour and inheritance
    // =========================================================================

    /// Callable operations exposed by the model, including reserved and internal names.
    fn operations(&self) -> Vec<OperationSignature> {
        Vec::new()
    }

    /// The model's raw polymorphic declaration.
    fn inheritance(&self) -> InheritanceHint {
        InheritanceHint::default()
    }

    // =========================================================================
    // Derived
    // =========================================================================

    /// Name of the primary-key column exposed as the row identifier.
    ///
    /// Prefers a primary-key column literally named `id`, otherwise the first
    /// primary-key column in declaration order.
    fn primary_key_name(&self) -> Option<String> {
        let pks: Vec<String> = self
            .columns()
            .into_iter()
            .filter(|c| c.primary_key)
            .map(|c| c.name)
            .collect();

        if pks.iter().any(|name| name == "id") {
            return Some("id".to_string());
        }
        pks.into_iter().next()
    }
}
