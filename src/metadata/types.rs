//! Structural metadata types reported by a [`ModelMetadata`](super::ModelMetadata) provider.

use serde::{Deserialize, Serialize};

/// A stored column on a model's table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub name: String,
    /// Raw storage type name as the storage layer spells it (`Unicode`, `DateTime`, ...).
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub primary_key: bool,
}

impl ColumnInfo {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            primary_key: false,
        }
    }

    /// Mark this column as (part of) the primary key.
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }
}

/// Declared direction of a relationship, as the mapper records it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    #[serde(alias = "ONETOMANY")]
    OneToMany,
    #[serde(alias = "MANYTOONE")]
    ManyToOne,
    #[serde(alias = "MANYTOMANY")]
    ManyToMany,
}

/// A direct, foreign-key-backed relationship.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RelationshipRepr")]
pub struct RelationshipInfo {
    pub name: String,
    pub target_model: String,
    pub direction: Direction,
    /// Whether the target side is a collection.
    pub uselist: bool,
    pub backref: Option<String>,
    /// Local columns participating in the join, in declaration order.
    pub local_columns: Vec<String>,
}

/// On-disk form; `uselist` defaults from the direction when omitted.
#[derive(Deserialize)]
struct RelationshipRepr {
    name: String,
    target_model: String,
    direction: Direction,
    #[serde(default)]
    uselist: Option<bool>,
    #[serde(default)]
    backref: Option<String>,
    #[serde(default)]
    local_columns: Vec<String>,
}

impl From<RelationshipRepr> for RelationshipInfo {
    fn from(repr: RelationshipRepr) -> Self {
        let mut info = RelationshipInfo::new(repr.name, repr.target_model, repr.direction);
        if let Some(uselist) = repr.uselist {
            info.uselist = uselist;
        }
        info.backref = repr.backref;
        info.local_columns = repr.local_columns;
        info
    }
}

impl RelationshipInfo {
    pub fn new(name: impl Into<String>, target_model: impl Into<String>, direction: Direction) -> Self {
        Self {
            name: name.into(),
            target_model: target_model.into(),
            // Many-to-one points at a single row; everything else is a collection by default.
            uselist: direction != Direction::ManyToOne,
            direction,
            backref: None,
            local_columns: Vec::new(),
        }
    }

    pub fn with_backref(mut self, backref: impl Into<String>) -> Self {
        self.backref = Some(backref.into());
        self
    }

    pub fn with_local_column(mut self, column: impl Into<String>) -> Self {
        self.local_columns.push(column.into());
        self
    }

    pub fn with_uselist(mut self, uselist: bool) -> Self {
        self.uselist = uselist;
        self
    }
}

/// What an association proxy ultimately points at on the remote model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProxyTarget {
    /// The remote attribute is itself a relationship to `target_model`.
    Relationship { target_model: String },
    /// The remote attribute is a plain stored column.
    Column { type_name: String },
}

/// An association proxy declared on a model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssociationProxy {
    pub name: String,
    /// The proxy exposes a single object rather than a collection.
    pub scalar: bool,
    /// `None` when the remote attribute carries no inspectable property.
    pub target: Option<ProxyTarget>,
}

/// How a single declared parameter of an operation binds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamKind {
    /// Implicit receiver (`self`); never reported.
    Receiver,
    /// Positional parameter without a default.
    Required,
    /// Parameter with a default value.
    Optional,
    /// Variadic positional (`*args`).
    VarPositional,
    /// Variadic keyword (`**kwargs`).
    VarKeyword,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    pub kind: ParamKind,
}

impl Param {
    pub fn new(name: impl Into<String>, kind: ParamKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// A callable operation and its declared parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationSignature {
    pub name: String,
    #[serde(default)]
    pub params: Vec<Param>,
}

impl OperationSignature {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
        }
    }

    pub fn param(mut self, name: impl Into<String>, kind: ParamKind) -> Self {
        self.params.push(Param::new(name, kind));
        self
    }
}

/// Raw inheritance declaration of a model, before resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InheritanceHint {
    /// The polymorphic identity value this model declares, if any.
    pub identity: Option<String>,
    /// Nearest ancestor that is itself a recognised model (root base excluded).
    pub parent: Option<String>,
    /// Discriminator column this model (or its nearest declaring ancestor) is polymorphic on.
    pub discriminator: Option<String>,
}

impl InheritanceHint {
    pub fn is_declared(&self) -> bool {
        self.identity.is_some()
    }
}

/// Normalise a storage type name into a schema type tag.
///
/// `Unicode` → `unicode`, `String(50)` → `string`, `sa.DateTime` → `datetime`.
pub fn type_tag(type_name: &str) -> String {
    let base = type_name.split('(').next().unwrap_or(type_name);
    let base = base.rsplit('.').next().unwrap_or(base);
    base.trim().to_lowercase()
}
