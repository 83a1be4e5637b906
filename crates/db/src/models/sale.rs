use bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

/// A completed payment transaction tied to a webinar. Written once by the
/// Stripe webhook handler and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sale {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub webinar_id: ObjectId,
    pub user_id: Option<ObjectId>,
    pub amount_cents: i64,
    pub currency: String,
    #[serde(default)]
    pub status: SaleStatus,
    pub stripe_session_id: String,
    pub created_at: DateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SaleStatus {
    Completed,
    #[default]
    Pending,
    Failed,
    Refunded,
}

impl Sale {
    pub const COLLECTION: &'static str = "sales";
}
