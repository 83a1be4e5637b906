use bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

/// CRM-facing record captured from a registration event. Creation-only; it
/// has no lifecycle beyond that.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lead {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub webinar_id: ObjectId,
    pub name: String,
    pub email: String,
    pub created_at: DateTime,
}

impl Lead {
    pub const COLLECTION: &'static str = "leads";
}
