use std::sync::Arc;

use aireach_config::AppSettings;
use aireach_db::models::{Attendee, Webinar};
use bson::oid::ObjectId;
use chrono::Utc;
use thiserror::Error;
use tracing::{debug, warn};

use crate::dao::base::DaoError;
use crate::dao::{AttendeeDao, LeadDao, WebinarDao};
use crate::lifecycle::{evaluate_phase_bson, Phase};
use crate::notification::{EmailContext, EmailKind, Notifier};

#[derive(Debug, Error)]
pub enum AttendanceError {
    #[error("Already registered for this webinar")]
    AlreadyRegistered,
    #[error("Webinar is not live")]
    NotLive { phase: Phase },
    #[error("Webinar not found")]
    WebinarNotFound,
    #[error(transparent)]
    Storage(DaoError),
}

impl From<DaoError> for AttendanceError {
    fn from(err: DaoError) -> Self {
        match err {
            DaoError::NotFound => AttendanceError::WebinarNotFound,
            other => AttendanceError::Storage(other),
        }
    }
}

/// Who is registering/joining/leaving. Authenticated callers carry a
/// `user_id`; anonymous registration and walk-in joins are keyed by email
/// alone.
#[derive(Debug, Clone)]
pub struct AttendeeIdentity {
    pub email: String,
    pub name: Option<String>,
    pub user_id: Option<ObjectId>,
}

/// Registration and join/leave transitions for webinar attendees.
///
/// Each operation is an independent unit of work against the store; no state
/// is held between calls. Email dispatch is decoupled from the storage
/// transaction and can never fail it.
pub struct AttendanceService {
    webinars: Arc<WebinarDao>,
    attendees: Arc<AttendeeDao>,
    leads: Arc<LeadDao>,
    notifier: Notifier,
    public_url: String,
}

impl AttendanceService {
    pub fn new(
        webinars: Arc<WebinarDao>,
        attendees: Arc<AttendeeDao>,
        leads: Arc<LeadDao>,
        notifier: Notifier,
        app: &AppSettings,
    ) -> Self {
        Self {
            webinars,
            attendees,
            leads,
            notifier,
            public_url: app.public_url.trim_end_matches('/').to_string(),
        }
    }

    /// Register an attendee for a webinar.
    ///
    /// The duplicate check is the unique `(webinar_id, email)` index: the
    /// insert either wins or surfaces `AlreadyRegistered`, with no
    /// check-then-create window between concurrent requests. A Lead is
    /// captured and a confirmation email dispatched on success; neither can
    /// roll the registration back.
    pub async fn register(
        &self,
        webinar_id: ObjectId,
        identity: AttendeeIdentity,
    ) -> Result<Attendee, AttendanceError> {
        let webinar = self.webinars.base.find_by_id(webinar_id).await?;

        let name = identity
            .name
            .clone()
            .unwrap_or_else(|| identity.email.clone());

        let attendee = self
            .attendees
            .insert_pending(webinar_id, identity.user_id, name.clone(), identity.email.clone())
            .await
            .map_err(|e| match e {
                DaoError::DuplicateKey(_) => AttendanceError::AlreadyRegistered,
                other => AttendanceError::from(other),
            })?;

        if let Err(e) = self.webinars.increment_attendee_count(webinar_id).await {
            warn!(%webinar_id, error = %e, "Failed to bump attendee count");
        }

        // Best-effort CRM capture; registration stands even if this fails.
        if let Err(e) = self
            .leads
            .create(webinar_id, name, identity.email.clone())
            .await
        {
            warn!(%webinar_id, error = %e, "Failed to capture lead for registration");
        }

        self.notifier.dispatch(
            EmailKind::Registration,
            identity.email,
            self.email_context(&webinar),
        );

        debug!(%webinar_id, attendee_id = ?attendee.id, "Attendee registered");
        Ok(attendee)
    }

    /// Join a live webinar.
    ///
    /// Gated on the derived phase, not the stored status flag: the webinar is
    /// joinable exactly within its `[scheduled_at, scheduled_at + duration)`
    /// window. Idempotent while live — a repeat call refreshes `joined_at`.
    /// A caller with no prior registration gets a row created directly in the
    /// `joined` state.
    pub async fn join(
        &self,
        webinar_id: ObjectId,
        identity: AttendeeIdentity,
    ) -> Result<Attendee, AttendanceError> {
        let webinar = self.webinars.base.find_by_id(webinar_id).await?;

        let now = Utc::now();
        let phase = evaluate_phase_bson(webinar.scheduled_at, webinar.duration_mins, now);
        if phase != Phase::Live {
            return Err(AttendanceError::NotLive { phase });
        }

        let attendee = self
            .attendees
            .upsert_joined(
                webinar_id,
                identity.user_id,
                identity.name,
                &identity.email,
                bson::DateTime::from_chrono(now),
            )
            .await?;

        debug!(%webinar_id, email = %identity.email, "Attendee joined");
        Ok(attendee)
    }

    /// Leave a webinar. A no-op when no matching attendee exists.
    pub async fn leave(
        &self,
        webinar_id: ObjectId,
        identity: AttendeeIdentity,
    ) -> Result<u64, AttendanceError> {
        let left = self.attendees.mark_left(webinar_id, &identity.email).await?;
        debug!(%webinar_id, email = %identity.email, left, "Attendee left");
        Ok(left)
    }

    /// Derived phase of a stored webinar at this instant.
    pub fn phase_of(&self, webinar: &Webinar) -> Phase {
        evaluate_phase_bson(webinar.scheduled_at, webinar.duration_mins, Utc::now())
    }

    /// Host-triggered bulk email to every attendee of a webinar.
    pub async fn notify_attendees(
        &self,
        webinar: &Webinar,
        kind: EmailKind,
    ) -> Result<usize, AttendanceError> {
        let webinar_id = webinar.id.ok_or(AttendanceError::WebinarNotFound)?;
        let attendees = self.attendees.list_all(webinar_id).await?;
        let count = attendees.len();

        let context = self.email_context(webinar);
        for attendee in attendees {
            self.notifier
                .dispatch(kind, attendee.email, context.clone());
        }

        Ok(count)
    }

    pub fn join_link(&self, webinar_id: ObjectId) -> String {
        format!("{}/attend/webinar/{}", self.public_url, webinar_id.to_hex())
    }

    fn email_context(&self, webinar: &Webinar) -> EmailContext {
        let scheduled = webinar.scheduled_at.to_chrono();
        EmailContext {
            webinar_title: webinar.title.clone(),
            webinar_date: scheduled.format("%B %d, %Y").to_string(),
            webinar_time: scheduled.format("%H:%M UTC").to_string(),
            join_link: self.join_link(webinar.id.unwrap()),
        }
    }
}
