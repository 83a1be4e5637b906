use bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Webinar {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub host_id: ObjectId,
    pub title: String,
    pub description: Option<String>,
    pub cover_image: Option<String>,
    /// Opaque reference to an AI agent configuration, if one is attached.
    pub agent_id: Option<String>,
    pub scheduled_at: DateTime,
    /// Planned duration in minutes.
    pub duration_mins: u32,
    /// Host-controlled flag. The *effective* phase (upcoming/live/ended) is
    /// always derived from `scheduled_at` + `duration_mins`; this field only
    /// gates visibility (draft) and records explicit host actions.
    #[serde(default)]
    pub status: WebinarStatus,
    pub price_cents: Option<u32>,
    #[serde(default)]
    pub attendee_count: u32,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WebinarStatus {
    Draft,
    #[default]
    Scheduled,
    Live,
    Ended,
}

impl Webinar {
    pub const COLLECTION: &'static str = "webinars";
}
