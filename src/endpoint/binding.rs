//! Binding call arguments against an operation signature.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::model::OperationDescriptor;

/// Arguments as supplied by a caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Arguments {
    pub args: Vec<Value>,
    pub kwargs: Map<String, Value>,
}

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.args.push(value.into());
        self
    }

    pub fn kwarg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.kwargs.insert(name.into(), value.into());
        self
    }
}

/// Arguments matched to parameter names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundArguments {
    /// Declared parameters that received a value.
    pub named: BTreeMap<String, Value>,
    /// Surplus positionals collected by the variadic-positional parameter.
    pub extra_args: Vec<Value>,
    /// Unknown keywords collected by the variadic-keyword parameter.
    pub extra_kwargs: BTreeMap<String, Value>,
}

impl BoundArguments {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.named.get(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BindError {
    #[error("takes {expected} positional arguments but {given} were given")]
    TooManyPositional { expected: usize, given: usize },

    #[error("got multiple values for argument '{0}'")]
    DuplicateArgument(String),

    #[error("got an unexpected keyword argument '{0}'")]
    UnexpectedKeyword(String),

    #[error("missing required argument '{0}'")]
    MissingArgument(String),
}

/// Bind `arguments` to `descriptor`.
///
/// Positionals fill required then optional parameters in order; keywords
/// fill whatever remains. Surplus goes to the variadic parameters when the
/// operation declares them.
pub fn bind(descriptor: &OperationDescriptor, arguments: Arguments) -> Result<BoundArguments, BindError> {
    let mut bound = BoundArguments::default();
    let positional: Vec<&String> = descriptor.args.iter().chain(&descriptor.kwargs).collect();
    let given = arguments.args.len();

    for (i, value) in arguments.args.into_iter().enumerate() {
        match positional.get(i) {
            Some(name) => {
                bound.named.insert((*name).clone(), value);
            }
            None if descriptor.argsvar.is_some() => bound.extra_args.push(value),
            None => {
                return Err(BindError::TooManyPositional {
                    expected: positional.len(),
                    given,
                })
            }
        }
    }

    for (name, value) in arguments.kwargs {
        if descriptor.accepts_keyword(&name) {
            if bound.named.contains_key(&name) {
                return Err(BindError::DuplicateArgument(name));
            }
            bound.named.insert(name, value);
        } else if descriptor.kwargsvar.is_some() {
            bound.extra_kwargs.insert(name, value);
        } else {
            return Err(BindError::UnexpectedKeyword(name));
        }
    }

    if let Some(missing) = descriptor.args.iter().find(|a| !bound.named.contains_key(*a)) {
        return Err(BindError::MissingArgument(missing.clone()));
    }

    Ok(bound)
}
