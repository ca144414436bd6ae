//! Immutable composition results.

use sha2::{Digest, Sha256};

use crate::endpoint::EndpointTable;
use crate::model::Schema;

/// SHA-256 of a serialized document as 64 lowercase hex characters.
fn etag_for(s: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(s.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// A composed schema together with its invocation endpoints.
///
/// The JSON document is serialized once here and served as-is afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    schema: Schema,
    endpoints: EndpointTable,
    document: String,
    etag: String,
}

impl Snapshot {
    pub fn new(schema: Schema, endpoints: EndpointTable) -> Result<Self, serde_json::Error> {
        let document = schema.to_json()?;
        let etag = etag_for(&document);
        Ok(Self {
            schema,
            endpoints,
            document,
            etag,
        })
    }

    /// The snapshot of an empty registry.
    pub fn empty() -> Self {
        let document = "{}".to_string();
        Self {
            etag: etag_for(&document),
            schema: Schema::new(),
            endpoints: EndpointTable::default(),
            document,
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn endpoints(&self) -> &EndpointTable {
        &self.endpoints
    }

    /// Compact JSON schema document.
    pub fn document(&self) -> &str {
        &self.document
    }

    /// SHA-256 of [`document`](Self::document), usable as an HTTP entity tag.
    pub fn etag(&self) -> &str {
        &self.etag
    }

    pub fn into_schema(self) -> Schema {
        self.schema
    }
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::empty()
    }
}
