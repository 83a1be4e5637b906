use aireach_db::models::Lead;
use bson::{doc, oid::ObjectId, DateTime};
use mongodb::Database;

use super::base::{BaseDao, DaoResult};

pub struct LeadDao {
    pub base: BaseDao<Lead>,
}

impl LeadDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, Lead::COLLECTION),
        }
    }

    pub async fn create(
        &self,
        webinar_id: ObjectId,
        name: String,
        email: String,
    ) -> DaoResult<Lead> {
        let lead = Lead {
            id: None,
            webinar_id,
            name,
            email,
            created_at: DateTime::now(),
        };

        let id = self.base.insert_one(&lead).await?;
        self.base.find_by_id(id).await
    }

    pub async fn list_for_webinars(&self, webinar_ids: &[ObjectId]) -> DaoResult<Vec<Lead>> {
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
