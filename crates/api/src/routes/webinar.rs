use aireach_db::models::{Webinar, WebinarStatus};
use aireach_services::dao::base::PaginationParams;
use aireach_services::lifecycle::Phase;
use aireach_services::notification::EmailKind;
use axum::{Json, extract::{Path, Query, State}, http::StatusCode};
use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::{error::ApiError, extractors::auth::AuthUser, state::AppState};

#[derive(Debug, Deserialize)]
pub struct CreateWebinarRequest {
    pub title: String,
    pub description: Option<String>,
    pub cover_image: Option<String>,
    pub agent_id: Option<String>,
    /// RFC 3339 timestamp.
    pub scheduled_at: String,
    pub duration_mins: u32,
    pub price_cents: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateWebinarRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub cover_image: Option<String>,
    pub scheduled_at: Option<String>,
    pub duration_mins: Option<u32>,
    pub price_cents: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct NotifyRequest {
    #[serde(default)]
    pub kind: NotifyKind,
}

#[derive(Debug, Deserialize, Default, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum NotifyKind {
    #[default]
    Reminder,
    Registration,
}

#[derive(Debug, Serialize)]
pub struct WebinarResponse {
    pub id: String,
    pub host_id: String,
    pub title: String,
    pub description: Option<String>,
    pub cover_image: Option<String>,
    pub agent_id: Option<String>,
    pub scheduled_at: String,
    pub duration_mins: u32,
    pub status: WebinarStatus,
    /// Time-derived phase, independent of `status`.
    pub phase: Phase,
    pub price_cents: Option<u32>,
    pub attendee_count: u32,
}

pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let result = state.webinars.list_by_host(auth.user_id, &params).await?;

    let items: Vec<WebinarResponse> = result
        .items
        .into_iter()
        .map(|w| to_response(&state, w))
        .collect();

    Ok(Json(serde_json::json!({
        "items": items,
        "total": result.total,
        "page": result.page,
        "per_page": result.per_page,
        "total_pages": result.total_pages,
    })))
}

pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<CreateWebinarRequest>,
) -> Result<(StatusCode, Json<WebinarResponse>), ApiError> {
    let scheduled_at = parse_rfc3339(&body.scheduled_at)?;

    let webinar = state
        .webinars
        .create(
            auth.user_id,
            body.title,
            body.description,
            body.cover_image,
            body.agent_id,
            scheduled_at,
            body.duration_mins,
            body.price_cents,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(to_response(&state, webinar))))
}

pub async fn get(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(webinar_id): Path<String>,
) -> Result<Json<WebinarResponse>, ApiError> {
    let wid = parse_oid(&webinar_id)?;
    let webinar = state.webinars.find_owned(auth.user_id, wid).await?;
    Ok(Json(to_response(&state, webinar)))
}

pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(webinar_id): Path<String>,
    Json(body): Json<UpdateWebinarRequest>,
) -> Result<Json<WebinarResponse>, ApiError> {
    let wid = parse_oid(&webinar_id)?;

    // Ownership check doubles as the 404 for foreign webinars
    state.webinars.find_owned(auth.user_id, wid).await?;

    let scheduled_at = body
        .scheduled_at
        .as_deref()
        .map(parse_rfc3339)
        .transpose()?;

    state
        .webinars
        .update(
            auth.user_id,
            wid,
            body.title,
            body.description,
            body.cover_image,
            scheduled_at,
            body.duration_mins,
            body.price_cents,
        )
        .await?;

    let webinar = state.webinars.base.find_by_id(wid).await?;
    Ok(Json(to_response(&state, webinar)))
}

pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(webinar_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let wid = parse_oid(&webinar_id)?;
    state.webinars.delete_cascading(auth.user_id, wid).await?;
    Ok(Json(serde_json::json!({ "deleted": true })))
}

pub async fn go_live(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(webinar_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    set_status(&state, auth, &webinar_id, WebinarStatus::Live).await
}

pub async fn end(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(webinar_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    set_status(&state, auth, &webinar_id, WebinarStatus::Ended).await
}

async fn set_status(
    state: &AppState,
    auth: AuthUser,
    webinar_id: &str,
    status: WebinarStatus,
) -> Result<Json<serde_json::Value>, ApiError> {
    let wid = parse_oid(webinar_id)?;
    state.webinars.find_owned(auth.user_id, wid).await?;
    state.webinars.set_status(auth.user_id, wid, status).await?;
    Ok(Json(serde_json::json!({ "status": status })))
}

/// Unauthenticated view of a webinar, for the registration page. Draft
/// webinars stay hidden.
pub async fn public(
    State(state): State<AppState>,
    Path(webinar_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let wid = parse_oid(&webinar_id)?;
    let webinar = state.webinars.base.find_by_id(wid).await?;

    if webinar.status == WebinarStatus::Draft {
        return Err(ApiError::NotFound("Webinar not found".to_string()));
    }

    let host = state.users.base.find_by_id(webinar.host_id).await;
    let host_name = host
        .map(|h| h.display_name)
        .unwrap_or_else(|_| "Anonymous Host".to_string());

    let phase = state.attendance.phase_of(&webinar);

    Ok(Json(serde_json::json!({
        "id": webinar.id.unwrap().to_hex(),
        "title": webinar.title,
        "description": webinar.description,
        "cover_image": webinar.cover_image,
        "scheduled_at": rfc3339(webinar.scheduled_at),
        "duration_mins": webinar.duration_mins,
        "phase": phase,
        "host_name": host_name,
        "price_cents": webinar.price_cents,
    })))
}

/// Host-triggered bulk email to all registrants of a webinar.
pub async fn notify(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(webinar_id): Path<String>,
    Json(body): Json<NotifyRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let wid = parse_oid(&webinar_id)?;
    let webinar = state.webinars.find_owned(auth.user_id, wid).await?;

    let kind = match body.kind {
        NotifyKind::Reminder => EmailKind::Reminder,
        NotifyKind::Registration => EmailKind::Registration,
    };

    let dispatched = state.attendance.notify_attendees(&webinar, kind).await?;

    Ok(Json(serde_json::json!({ "dispatched": dispatched })))
}

pub(crate) fn parse_oid(s: &str) -> Result<ObjectId, ApiError> {
    ObjectId::parse_str(s).map_err(|_| ApiError::BadRequest(format!("Invalid ObjectId: {s}")))
}

pub(crate) fn parse_rfc3339(s: &str) -> Result<bson::DateTime, ApiError> {
    let parsed = chrono::DateTime::parse_from_rfc3339(s)
        .map_err(|_| ApiError::BadRequest(format!("Invalid RFC 3339 timestamp: {s}")))?;
    Ok(bson::DateTime::from_chrono(parsed.with_timezone(&chrono::Utc)))
}

fn rfc3339(dt: bson::DateTime) -> String {
    dt.to_chrono().to_rfc3339()
}

fn to_response(state: &AppState, webinar: Webinar) -> WebinarResponse {
    let phase = state.attendance.phase_of(&webinar);
    WebinarResponse {
        id: webinar.id.unwrap().to_hex(),
        host_id: webinar.host_id.to_hex(),
        title: webinar.title,
        description: webinar.description,
        cover_image: webinar.cover_image,
        agent_id: webinar.agent_id,
        scheduled_at: rfc3339(webinar.scheduled_at),
        duration_mins: webinar.duration_mins,
        status: webinar.status,
        phase,
        price_cents: webinar.price_cents,
        attendee_count: webinar.attendee_count,
    }
}
