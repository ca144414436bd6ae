//! Operation invocation endpoints.
//!
//! Every reflected operation gets an endpoint keyed by
//! `(collection_name, operation)`. The transport layer maps its routes onto
//! [`EndpointTable::invoke`]; looking up the object and running the
//! operation is delegated to an [`InstanceResolver`].

mod binding;

pub use binding::{bind, Arguments, BindError, BoundArguments};

use std::collections::BTreeMap;

use log::warn;
use serde_json::Value;

use crate::model::{OperationDescriptor, Schema};

/// Lookup key for an endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EndpointKey {
    pub collection_name: String,
    pub operation: String,
}

impl EndpointKey {
    pub fn new(collection_name: impl Into<String>, operation: impl Into<String>) -> Self {
        Self {
            collection_name: collection_name.into(),
            operation: operation.into(),
        }
    }
}

/// An invocable operation on instances of one model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub model: String,
    pub collection_name: String,
    pub operation: String,
    pub descriptor: OperationDescriptor,
}

impl Endpoint {
    /// Route template, with `<instid>` standing for the instance id.
    pub fn route(&self) -> String {
        format!(
            "/api/method/{}/<instid>/{}",
            self.collection_name, self.operation
        )
    }

    /// Validate and bind call arguments against this endpoint's signature.
    pub fn bind(&self, arguments: Arguments) -> Result<BoundArguments, BindError> {
        bind(&self.descriptor, arguments)
    }
}

/// Errors surfaced by [`EndpointTable::invoke`].
#[derive(Debug, thiserror::Error)]
pub enum InvocationError {
    #[error("No operation '{operation}' on collection '{collection_name}'")]
    UnknownEndpoint {
        collection_name: String,
        operation: String,
    },

    #[error("No {model} with id '{instance_id}'")]
    InstanceNotFound { model: String, instance_id: String },

    #[error("Invalid arguments: {0}")]
    Bind(#[from] BindError),

    #[error("Operation failed: {0}")]
    Failed(String),
}

/// Finds an object by id and runs one of its operations.
pub trait InstanceResolver {
    fn invoke(
        &self,
        model: &str,
        instance_id: &str,
        operation: &str,
        arguments: BoundArguments,
    ) -> Result<Value, InvocationError>;
}

/// All endpoints of a schema.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EndpointTable {
    endpoints: BTreeMap<EndpointKey, Endpoint>,
}

impl EndpointTable {
    /// One endpoint per operation of every model in `schema`.
    pub fn from_schema(schema: &Schema) -> Self {
        let mut endpoints = BTreeMap::new();

        for (name, model) in schema.iter() {
            for (operation, descriptor) in &model.methods {
                let key = EndpointKey::new(&model.collection_name, operation);
                let endpoint = Endpoint {
                    model: name.to_string(),
                    collection_name: model.collection_name.clone(),
                    operation: operation.clone(),
                    descriptor: descriptor.clone(),
                };
                if let Some(previous) = endpoints.insert(key, endpoint) {
                    warn!(
                        "collection '{}' is shared by {} and {}; operation '{}' resolves to {}",
                        model.collection_name, previous.model, name, operation, name
                    );
                }
            }
        }

        Self { endpoints }
    }

    pub fn get(&self, collection_name: &str, operation: &str) -> Option<&Endpoint> {
        self.endpoints
            .get(&EndpointKey::new(collection_name, operation))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Endpoint> {
        self.endpoints.values()
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    /// Resolve, validate and run an operation on one instance.
    pub fn invoke(
        &self,
        collection_name: &str,
        instance_id: &str,
        operation: &str,
        arguments: Arguments,
        resolver: &dyn InstanceResolver,
    ) -> Result<Value, InvocationError> {
        let endpoint =
            self.get(collection_name, operation)
                .ok_or_else(|| InvocationError::UnknownEndpoint {
                    collection_name: collection_name.to_string(),
                    operation: operation.to_string(),
                })?;
        let bound = endpoint.bind(arguments)?;
        resolver.invoke(&endpoint.model, instance_id, operation, bound)
    }
}
