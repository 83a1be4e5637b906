use aireach_db::models::{Attendee, Lead, Webinar, WebinarStatus};
use bson::{doc, oid::ObjectId, DateTime};
use mongodb::Database;

use super::base::{BaseDao, DaoError, DaoResult, PaginatedResult, PaginationParams};

pub struct WebinarDao {
    pub base: BaseDao<Webinar>,
    attendees: BaseDao<Attendee>,
    leads: BaseDao<Lead>,
}

impl WebinarDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, Webinar::COLLECTION),
            attendees: BaseDao::new(db, Attendee::COLLECTION),
            leads: BaseDao::new(db, Lead::COLLECTION),
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        host_id: ObjectId,
        title: String,
        description: Option<String>,
        cover_image: Option<String>,
        agent_id: Option<String>,
        scheduled_at: DateTime,
        duration_mins: u32,
        price_cents: Option<u32>,
    ) -> DaoResult<Webinar> {
        let now = DateTime::now();
        let webinar = Webinar {
            id: None,
            host_id,
            title,
            description,
            cover_image,
            agent_id,
            scheduled_at,
            duration_mins,
            status: WebinarStatus::Scheduled,
            price_cents,
            attendee_count: 0,
            created_at: now,
            updated_at: now,
        };

        let id = self.base.insert_one(&webinar).await?;
        self.base.find_by_id(id).await
    }

    pub async fn find_owned(
        &self,
        host_id: ObjectId,
        webinar_id: ObjectId,
    ) -> DaoResult<Webinar> {
        self.base
            .find_one(doc! { "_id": webinar_id, "host_id": host_id })
            .await?
            .ok_or(DaoError::NotFound)
    }

    pub async fn list_by_host(
        &self,
        host_id: ObjectId,
        params: &PaginationParams,
    ) -> DaoResult<PaginatedResult<Webinar>> {
        self.base
            .find_paginated(
                doc! { "host_id": host_id },
                Some(doc! { "created_at": -1 }),
                params,
            )
            .await
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn update(
        &self,
        host_id: ObjectId,
        webinar_id: ObjectId,
        title: Option<String>,
        description: Option<String>,
        cover_image: Option<String>,
        scheduled_at: Option<DateTime>,
        duration_mins: Option<u32>,
        price_cents: Option<u32>,
    ) -> DaoResult<bool> {
        let mut set_doc = doc! {};

        if let Some(title) = title {
            set_doc.insert("title", title);
        }
        if let Some(description) = description {
            set_doc.insert("description", description);
        }
        if let Some(cover_image) = cover_image {
            set_doc.insert("cover_image", cover_image);
        }
        if let Some(scheduled_at) = scheduled_at {
            set_doc.insert("scheduled_at", scheduled_at);
        }
        if let Some(duration) = duration_mins {
            set_doc.insert("duration_mins", duration);
        }
        if let Some(price) = price_cents {
            set_doc.insert("price_cents", price);
        }

        if set_doc.is_empty() {
            return Ok(false);
        }

        self.base
            .update_one(
                doc! { "_id": webinar_id, "host_id": host_id },
                doc! { "$set": set_doc },
            )
            .await
    }

    pub async fn set_status(
        &self,
        host_id: ObjectId,
        webinar_id: ObjectId,
        status: WebinarStatus,
    ) -> DaoResult<bool> {
        self.base
            .update_one(
                doc! { "_id": webinar_id, "host_id": host_id },
                doc! { "$set": { "status": bson::to_bson(&status).map_err(bson::ser::Error::from)? } },
            )
            .await
    }

    /// Delete a webinar together with its attendees and leads. Ownership is
    /// checked first so a foreign id deletes nothing.
    pub async fn delete_cascading(
        &self,
        host_id: ObjectId,
        webinar_id: ObjectId,
    ) -> DaoResult<()> {
        self.find_owned(host_id, webinar_id).await?;

        self.attendees
            .hard_delete(doc! { "webinar_id": webinar_id })
            .await?;
        self.leads
            .hard_delete(doc! { "webinar_id": webinar_id })
            .await?;
        let deleted = self.base.hard_delete(doc! { "_id": webinar_id }).await?;

        if deleted == 0 {
            return Err(DaoError::NotFound);
        }
        Ok(())
    }

    pub async fn increment_attendee_count(&self, webinar_id: ObjectId) -> DaoResult<bool> {
        self.base
            .update_by_id(webinar_id, doc! { "$inc": { "attendee_count": 1 } })
            .await
    }

    /// Ids of all webinars owned by `host_id`, for cross-collection queries
    /// (leads, sales, attendee rollups).
    pub async fn owned_ids(&self, host_id: ObjectId) -> DaoResult<Vec<ObjectId>> {
        let webinars = self
            .base
            .find_many(doc! { "host_id": host_id }, None)
            .await?;
        Ok(webinars.into_iter().filter_map(|w| w.id).collect())
    }

    pub async fn count_upcoming(&self, host_id: ObjectId) -> DaoResult<u64> {
        self.base
            .count(doc! {
                "host_id": host_id,
                "scheduled_at": { "$gt": DateTime::now() },
            })
            .await
    }
}
