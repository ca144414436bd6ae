//! Scalar attribute reflection.

use std::collections::BTreeMap;

use super::filter::FieldFilter;
use crate::metadata::{type_tag, ModelMetadata};

/// Type tag reserved for computed properties.
pub const HYBRID_TAG: &str = "hybrid";

/// Stored columns and hybrid properties that pass `filter`, keyed by name.
pub fn render_attributes(model: &dyn ModelMetadata, filter: &FieldFilter) -> BTreeMap<String, String> {
    let mut attributes = BTreeMap::new();

    for column in model.columns() {
        if filter.is_valid(&column.name) {
            attributes.insert(column.name, type_tag(&column.type_name));
        }
    }

    // Computed properties have no statically known storage type.
    for name in model.hybrid_properties() {
        if filter.is_valid(&name) {
            attributes.insert(name, HYBRID_TAG.to_string());
        }
    }

    attributes
}
