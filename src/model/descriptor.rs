//! Normalised, serialisable model descriptors.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Everything one model exposes: fields, relations, operations and inheritance role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    pub name: String,
    pub primary_key_name: String,
    pub collection_name: String,
    /// Attribute name → scalar type tag.
    pub attributes: BTreeMap<String, String>,
    pub relations: BTreeMap<String, RelationDescriptor>,
    #[serde(default)]
    pub methods: BTreeMap<String, OperationDescriptor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub polymorphic: Option<PolymorphicInfo>,
}

impl ModelDescriptor {
    pub fn new(
        name: impl Into<String>,
        primary_key_name: impl Into<String>,
        collection_name: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            primary_key_name: primary_key_name.into(),
            collection_name: collection_name.into(),
            attributes: BTreeMap::new(),
            relations: BTreeMap::new(),
            methods: BTreeMap::new(),
            polymorphic: None,
        }
    }

    /// Whether `name` is already taken by an attribute or a relation.
    pub fn defines(&self, name: &str) -> bool {
        self.attributes.contains_key(name) || self.relations.contains_key(name)
    }

    /// Add an attribute unless the name is already a relation.
    ///
    /// Returns `false` when the name was rejected.
    pub fn insert_attribute(&mut self, name: impl Into<String>, type_tag: impl Into<String>) -> bool {
        let name = name.into();
        if self.relations.contains_key(&name) {
            return false;
        }
        self.attributes.insert(name, type_tag.into());
        true
    }

    /// Add a relation unless the name is already an attribute.
    ///
    /// Returns `false` when the name was rejected.
    pub fn insert_relation(&mut self, name: impl Into<String>, relation: RelationDescriptor) -> bool {
        let name = name.into();
        if self.attributes.contains_key(&name) {
            return false;
        }
        self.relations.insert(name, relation);
        true
    }

    pub fn parent(&self) -> Option<&str> {
        self.polymorphic.as_ref().and_then(|p| p.parent.as_deref())
    }
}

/// Cardinality of a rendered relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationType {
    #[serde(rename = "MANYTOONE")]
    ManyToOne,
    #[serde(rename = "ONETOMANY")]
    OneToMany,
    #[serde(rename = "ONETOONE")]
    OneToOne,
    #[serde(rename = "MANYTOMANY")]
    ManyToMany,
}

impl RelationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationType::ManyToOne => "MANYTOONE",
            RelationType::OneToMany => "ONETOMANY",
            RelationType::OneToOne => "ONETOONE",
            RelationType::ManyToMany => "MANYTOMANY",
        }
    }
}

impl std::fmt::Display for RelationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationDescriptor {
    pub foreign_model: String,
    pub relation_type: RelationType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backref: Option<String>,
    /// Local foreign-key column; only for `MANYTOONE`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_column: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_proxy: bool,
}

impl RelationDescriptor {
    pub fn new(foreign_model: impl Into<String>, relation_type: RelationType) -> Self {
        Self {
            foreign_model: foreign_model.into(),
            relation_type,
            backref: None,
            local_column: None,
            is_proxy: false,
        }
    }

    /// A relation reached through an association proxy.
    pub fn proxy(foreign_model: impl Into<String>, relation_type: RelationType) -> Self {
        Self {
            is_proxy: true,
            ..Self::new(foreign_model, relation_type)
        }
    }
}

/// Parameter signature of an exposed operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationDescriptor {
    /// Required parameters, in declaration order.
    pub args: Vec<String>,
    /// Parameters with defaults, in declaration order.
    pub kwargs: Vec<String>,
    pub argsvar: Option<String>,
    pub kwargsvar: Option<String>,
}

impl OperationDescriptor {
    /// Whether `name` can be passed by keyword.
    pub fn accepts_keyword(&self, name: &str) -> bool {
        self.args.iter().chain(&self.kwargs).any(|p| p == name)
    }
}

/// Inheritance role of a model.
///
/// A child carries `parent`; a parent carries `on` and `identities`. A model
/// in the middle of a chain carries all three.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolymorphicInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub identities: BTreeMap<String, String>,
}
