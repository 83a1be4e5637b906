use bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

/// A registrant or participant record, scoped to one webinar.
///
/// At most one document exists per `(webinar_id, email)` — enforced by a
/// unique index, not by an application-level existence check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attendee {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub webinar_id: ObjectId,
    /// Set when the attendee is a known account; anonymous registration by
    /// email leaves this empty.
    pub user_id: Option<ObjectId>,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub status: AttendeeStatus,
    pub joined_at: Option<DateTime>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

/// `pending -> joined -> left`, with `joined` also reachable directly for
/// walk-ins that never registered, and re-entry from `left` allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AttendeeStatus {
    #[default]
    Pending,
    Joined,
    Left,
}

impl Attendee {
    pub const COLLECTION: &'static str = "attendees";
}
