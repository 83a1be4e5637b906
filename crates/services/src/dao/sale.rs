use aireach_db::models::{Sale, SaleStatus};
use bson::{doc, oid::ObjectId, DateTime};
use mongodb::Database;

use super::base::{BaseDao, DaoResult};

pub struct SaleDao {
    pub base: BaseDao<Sale>,
}

impl SaleDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, Sale::COLLECTION),
        }
    }

    /// Record a confirmed payment. The unique `stripe_session_id` index makes
    /// webhook redelivery idempotent at the storage layer.
    pub async fn record(
        &self,
        webinar_id: ObjectId,
        user_id: Option<ObjectId>,
        amount_cents: i64,
        currency: String,
        status: SaleStatus,
        stripe_session_id: String,
    ) -> DaoResult<Sale> {
        let sale = Sale {
            id: None,
            webinar_id,
            user_id,
            amount_cents,
            currency,
            status,
            stripe_session_id,
            created_at: DateTime::now(),
        };

        let id = self.base.insert_one(&sale).await?;
        self.base.find_by_id(id).await
    }

    pub async fn list_for_webinars(&self, webinar_ids: &[ObjectId]) -> DaoResult<Vec<Sale>> {
        if webinar_ids.is_empty() {
            return Ok(Vec::new());
        }
        self.base
            .find_many(
                doc! { "webinar_id": { "$in": webinar_ids } },
                Some(doc! { "created_at": -1 }),
            )
            .await
    }
}
