//! Schema descriptor types.

pub mod descriptor;
pub mod schema;

pub use descriptor::{
    ModelDescriptor, OperationDescriptor, PolymorphicInfo, RelationDescriptor, RelationType,
};
pub use schema::Schema;
