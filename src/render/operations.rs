//! Operation reflection.

use std::collections::BTreeMap;

use crate::config::OperationSettings;
use crate::metadata::{ModelMetadata, OperationSignature, ParamKind};
use crate::model::OperationDescriptor;

/// Reserved (`__dunder__`) operations are never exposed; `_internal` ones
/// only when the settings ask for them.
pub fn is_exposed(name: &str, settings: &OperationSettings) -> bool {
    if name.starts_with("__") {
        return false;
    }
    if name.starts_with('_') {
        return settings.include_internal;
    }
    true
}

/// Classify the parameters of one operation.
pub fn describe(signature: &OperationSignature) -> OperationDescriptor {
    let mut descriptor = OperationDescriptor::default();

    for param in &signature.params {
        match param.kind {
            ParamKind::Receiver => {}
            ParamKind::Required => descriptor.args.push(param.name.clone()),
            ParamKind::Optional => descriptor.kwargs.push(param.name.clone()),
            ParamKind::VarPositional => descriptor.argsvar = Some(param.name.clone()),
            ParamKind::VarKeyword => descriptor.kwargsvar = Some(param.name.clone()),
        }
    }

    descriptor
}

/// Exposed operations of `model`, keyed by name.
pub fn render_operations(
    model: &dyn ModelMetadata,
    settings: &OperationSettings,
) -> BTreeMap<String, OperationDescriptor> {
    if !settings.include {
        return BTreeMap::new();
    }

    model
        .operations()
        .iter()
        .filter(|op| is_exposed(&op.name, settings))
        .map(|op| (op.name.clone(), describe(op)))
        .collect()
}
