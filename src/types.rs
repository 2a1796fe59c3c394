use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// A stored JSON object, returned to clients as-is.
pub type Document = Map<String, Value>;

pub const ID_FIELD: &str = "_id";

/// Attaches the generated identifier to a stored document.
pub fn with_id(id: Uuid, mut document: Document) -> Document {
    document.insert(ID_FIELD.into(), Value::String(id.to_string()));
    document
}

/// Drops any client-supplied identifier; identifiers are generated on insert.
pub fn without_id(mut document: Document) -> Document {
    document.remove(ID_FIELD);
    document
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertAcknowledgment {
    pub acknowledged: bool,
    pub inserted_id: Uuid,
}

impl InsertAcknowledgment {
    pub fn new(inserted_id: Uuid) -> Self {
        Self {
            acknowledged: true,
            inserted_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAcknowledgment {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
    pub upserted_id: Option<Uuid>,
    pub upserted_count: u64,
}

impl UpdateAcknowledgment {
    pub fn new(matched_count: u64, modified_count: u64) -> Self {
        Self {
            acknowledged: true,
            matched_count,
            modified_count,
            upserted_id: None,
            upserted_count: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAcknowledgment {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

impl DeleteAcknowledgment {
    pub fn new(deleted_count: u64) -> Self {
        Self {
            acknowledged: true,
            deleted_count,
        }
    }
}
