//! Per-model reflection.
//!
//! Turns one model's structural metadata into a [`ModelDescriptor`]. Nothing
//! here reads another model's descriptor; inheritance is merged later by the
//! composer.
//!
//! ```text
//!   ModelMetadata ──┬── attributes ──┐
//!                   ├── relations ───┼──► ModelDescriptor
//!                   ├── proxies ─────┤
//!                   └── operations ──┘   (methods, filled separately)
//! ```

pub mod attributes;
pub mod filter;
pub mod operations;
pub mod relations;

pub use attributes::{render_attributes, HYBRID_TAG};
pub use filter::{FieldConfig, FieldFilter};
pub use operations::render_operations;
pub use relations::{classify, render_proxies, render_relations, ProxyField};

use log::debug;

use crate::error::{DatamodelError, DatamodelResult};
use crate::metadata::ModelMetadata;
use crate::model::ModelDescriptor;

/// Render a model's attributes and relations.
///
/// The returned descriptor has neither `methods` nor `polymorphic` set.
/// `primary_key` overrides the key reported by the metadata.
pub fn render(
    model: &dyn ModelMetadata,
    collection_name: &str,
    config: &FieldConfig,
    primary_key: Option<&str>,
) -> DatamodelResult<ModelDescriptor> {
    let name = model.name();
    let primary_key_name = match primary_key {
        Some(pk) => pk.to_string(),
        None => model
            .primary_key_name()
            .ok_or_else(|| DatamodelError::MissingPrimaryKey(name.to_string()))?,
    };

    let filter = config.filter();
    let mut descriptor = ModelDescriptor::new(name, primary_key_name, collection_name);
    descriptor.relations = render_relations(model, &filter);

    for (attr, tag) in render_attributes(model, &filter) {
        if !descriptor.insert_attribute(attr.clone(), tag) {
            debug!("{}: attribute '{}' collides with a relation, dropped", name, attr);
        }
    }

    for field in render_proxies(model) {
        let (proxy, accepted) = match field {
            ProxyField::Relation { name, relation } => {
                (name.clone(), descriptor.insert_relation(name, relation))
            }
            ProxyField::Attribute { name, type_tag } => {
                (name.clone(), descriptor.insert_attribute(name, type_tag))
            }
        };
        if !accepted {
            debug!("{}: proxy '{}' collides with an existing field, dropped", name, proxy);
        }
    }

    debug!(
        "rendered {} ({} attributes, {} relations)",
        name,
        descriptor.attributes.len(),
        descriptor.relations.len()
    );

    Ok(descriptor)
}
