//! Relation reflection: direct relationships and association proxies.

use std::collections::BTreeMap;

use log::debug;

use super::filter::FieldFilter;
use crate::metadata::{type_tag, AssociationProxy, Direction, ModelMetadata, ProxyTarget, RelationshipInfo};
use crate::model::{RelationDescriptor, RelationType};

/// A field contributed by an association proxy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProxyField {
    /// The proxy reaches a relationship on the remote model.
    Relation {
        name: String,
        relation: RelationDescriptor,
    },
    /// The proxy reaches a plain stored column.
    Attribute { name: String, type_tag: String },
}

/// Cardinality of a direct relationship.
///
/// One-to-many with a scalar target side is reported as one-to-one.
pub fn classify(rel: &RelationshipInfo) -> RelationType {
    match rel.direction {
        Direction::OneToMany if !rel.uselist => RelationType::OneToOne,
        Direction::OneToMany => RelationType::OneToMany,
        Direction::ManyToOne => RelationType::ManyToOne,
        Direction::ManyToMany => RelationType::ManyToMany,
    }
}

/// Direct relationships that pass `filter`, keyed by name.
pub fn render_relations(
    model: &dyn ModelMetadata,
    filter: &FieldFilter,
) -> BTreeMap<String, RelationDescriptor> {
    model
        .relationships()
        .into_iter()
        .filter(|rel| filter.is_valid(&rel.name))
        .map(|rel| {
            let relation_type = classify(&rel);
            let local_column = if rel.direction == Direction::ManyToOne {
                rel.local_columns.first().cloned()
            } else {
                None
            };
            let descriptor = RelationDescriptor {
                foreign_model: rel.target_model,
                relation_type,
                backref: rel.backref,
                local_column,
                is_proxy: false,
            };
            (rel.name, descriptor)
        })
        .collect()
}

/// Classify one association proxy, or `None` if its remote target is opaque.
pub fn proxy_field(proxy: AssociationProxy) -> Option<ProxyField> {
    match proxy.target? {
        ProxyTarget::Relationship { target_model } => {
            let relation_type = if proxy.scalar {
                RelationType::ManyToOne
            } else {
                RelationType::OneToMany
            };
            Some(ProxyField::Relation {
                name: proxy.name,
                relation: RelationDescriptor::proxy(target_model, relation_type),
            })
        }
        ProxyTarget::Column { type_name } => Some(ProxyField::Attribute {
            name: proxy.name,
            type_tag: type_tag(&type_name),
        }),
    }
}

/// All resolvable association proxies on `model`.
///
/// Proxies are not subject to the field filter.
pub fn render_proxies(model: &dyn ModelMetadata) -> Vec<ProxyField> {
    model
        .association_proxies()
        .into_iter()
        .filter_map(|proxy| {
            let name = proxy.name.clone();
            let field = proxy_field(proxy);
            if field.is_none() {
                debug!("{}: skipping association proxy '{}' with opaque target", model.name(), name);
            }
            field
        })
        .collect()
}
