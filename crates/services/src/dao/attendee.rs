use aireach_db::models::{Attendee, AttendeeStatus};
use bson::{doc, oid::ObjectId, DateTime};
use mongodb::Database;

use super::base::{BaseDao, DaoError, DaoResult, PaginatedResult, PaginationParams};

pub struct AttendeeDao {
    pub base: BaseDao<Attendee>,
}

impl AttendeeDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, Attendee::COLLECTION),
        }
    }

    /// Insert a fresh `pending` registration. The unique
    /// `(webinar_id, email)` index makes this the atomic duplicate check:
    /// a second insert for the same pair fails with `DuplicateKey`.
    pub async fn insert_pending(
        &self,
        webinar_id: ObjectId,
        user_id: Option<ObjectId>,
        name: String,
        email: String,
    ) -> DaoResult<Attendee> {
        let now = DateTime::now();
        let attendee = Attendee {
            id: None,
            webinar_id,
            user_id,
            name,
            email,
            status: AttendeeStatus::Pending,
            joined_at: None,
            created_at: now,
            updated_at: now,
        };

        let id = self.base.insert_one(&attendee).await?;
        self.base.find_by_id(id).await
    }

    /// Transition an attendee to `joined`, stamping `joined_at`. Upserts by
    /// `(webinar_id, email)` so an unregistered walk-in gets a row created
    /// directly in the `joined` state, and a repeat join merely refreshes
    /// `joined_at`.
    pub async fn upsert_joined(
        &self,
        webinar_id: ObjectId,
        user_id: Option<ObjectId>,
        name: Option<String>,
        email: &str,
        now: DateTime,
    ) -> DaoResult<Attendee> {
        let mut on_insert = doc! {
            "name": name.unwrap_or_else(|| email.to_string()),
            "created_at": now,
        };
        if let Some(uid) = user_id {
            on_insert.insert("user_id", uid);
        } else {
            on_insert.insert("user_id", bson::Bson::Null);
        }

        self.base
            .upsert_one(
                doc! { "webinar_id": webinar_id, "email": email },
                doc! {
                    "$set": {
                        "status": status_bson(AttendeeStatus::Joined)?,
                        "joined_at": now,
                    },
                    "$setOnInsert": on_insert,
                },
            )
            .await?;

        self.base
            .find_one(doc! { "webinar_id": webinar_id, "email": email })
            .await?
            .ok_or(DaoError::NotFound)
    }

    /// Mark every matching row `left`. Returns the matched count; zero is a
    /// legitimate outcome, not an error.
    pub async fn mark_left(&self, webinar_id: ObjectId, email: &str) -> DaoResult<u64> {
        self.base
            .update_many(
                doc! { "webinar_id": webinar_id, "email": email },
                doc! { "$set": { "status": status_bson(AttendeeStatus::Left)? } },
            )
            .await
    }

    pub async fn list_by_webinar(
        &self,
        webinar_id: ObjectId,
        params: &PaginationParams,
    ) -> DaoResult<PaginatedResult<Attendee>> {
        self.base
            .find_paginated(
                doc! { "webinar_id": webinar_id },
                Some(doc! { "created_at": 1 }),
                params,
            )
            .await
    }

    pub async fn list_all(&self, webinar_id: ObjectId) -> DaoResult<Vec<Attendee>> {
        self.base
            .find_many(doc! { "webinar_id": webinar_id }, Some(doc! { "created_at": 1 }))
            .await
    }

    pub async fn list_for_webinars(&self, webinar_ids: &[ObjectId]) -> DaoResult<Vec<Attendee>> {
        if webinar_ids.is_empty() {
            return Ok(Vec::new());
        }
        self.base
            .find_many(
                doc! { "webinar_id": { "$in": webinar_ids } },
                Some(doc! { "created_at": 1 }),
            )
            .await
    }

    /// Joined attendees across many webinars, most recent first. Feeds the
    /// host's cross-webinar customer list.
    pub async fn list_joined_for_webinars(
        &self,
        webinar_ids: &[ObjectId],
    ) -> DaoResult<Vec<Attendee>> {
        if webinar_ids.is_empty() {
            return Ok(Vec::new());
        }
        self.base
            .find_many(
                doc! {
                    "webinar_id": { "$in": webinar_ids },
                    "status": status_bson(AttendeeStatus::Joined)?,
                },
                Some(doc! { "joined_at": -1 }),
            )
            .await
    }

    pub async fn count_for_webinars(&self, webinar_ids: &[ObjectId]) -> DaoResult<u64> {
        if webinar_ids.is_empty() {
            return Ok(0);
        }
        self.base
            .count(doc! { "webinar_id": { "$in": webinar_ids } })
            .await
    }

    pub async fn count_joined_for_webinars(
        &self,
        webinar_ids: &[ObjectId],
    ) -> DaoResult<u64> {
        if webinar_ids.is_empty() {
            return Ok(0);
        }
        self.base
            .count(doc! {
                "webinar_id": { "$in": webinar_ids },
                "status": status_bson(AttendeeStatus::Joined)?,
            })
            .await
    }
}

fn status_bson(status: AttendeeStatus) -> DaoResult<bson::Bson> {
    Ok(bson::to_bson(&status).map_err(bson::ser::Error::from)?)
}
