use aireach_db::models::{Attendee, AttendeeStatus};
use aireach_services::attendance::AttendeeIdentity;
use aireach_services::dao::base::PaginationParams;
use axum::{Json, extract::{Path, Query, State}, http::StatusCode};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    error::ApiError,
    extractors::auth::{AuthUser, MaybeAuthUser},
    routes::webinar::parse_oid,
    state::AppState,
};

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterAttendeeRequest {
    #[validate(email)]
    pub email: String,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct JoinRequest {
    #[validate(email)]
    pub email: String,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LeaveRequest {
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct AttendeeResponse {
    pub id: String,
    pub webinar_id: String,
    pub name: String,
    pub email: String,
    pub status: AttendeeStatus,
    pub joined_at: Option<String>,
    pub created_at: String,
}

/// Public registration for a webinar. Works for both anonymous visitors and
/// signed-in users; a signed-in caller gets their user id attached to the row.
pub async fn register(
    State(state): State<AppState>,
    MaybeAuthUser(auth): MaybeAuthUser,
    Path(webinar_id): Path<String>,
    Json(body): Json<RegisterAttendeeRequest>,
) -> Result<(StatusCode, Json<AttendeeResponse>), ApiError> {
    body.validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let wid = parse_oid(&webinar_id)?;
    let identity = AttendeeIdentity {
        email: body.email,
        name: body.name,
        user_id: auth.map(|a| a.user_id),
    };

    let attendee = state.attendance.register(wid, identity).await?;
    Ok((StatusCode::CREATED, Json(to_response(attendee))))
}

/// Join a live webinar. Rejected with 403 outside the live window.
pub async fn join(
    State(state): State<AppState>,
    MaybeAuthUser(auth): MaybeAuthUser,
    Path(webinar_id): Path<String>,
    Json(body): Json<JoinRequest>,
) -> Result<Json<AttendeeResponse>, ApiError> {
    body.validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let wid = parse_oid(&webinar_id)?;
    let identity = AttendeeIdentity {
        email: body.email,
        name: body.name,
        user_id: auth.map(|a| a.user_id),
    };

    let attendee = state.attendance.join(wid, identity).await?;
    Ok(Json(to_response(attendee)))
}

/// Leave a webinar. Succeeds even when no matching attendee exists.
pub async fn leave(
    State(state): State<AppState>,
    MaybeAuthUser(auth): MaybeAuthUser,
    Path(webinar_id): Path<String>,
    Json(body): Json<LeaveRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let wid = parse_oid(&webinar_id)?;
    let identity = AttendeeIdentity {
        email: body.email,
        name: None,
        user_id: auth.map(|a| a.user_id),
    };

    let left = state.attendance.leave(wid, identity).await?;
    Ok(Json(serde_json::json!({ "left": left })))
}

/// Host-only attendee roster for a webinar.
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(webinar_id): Path<String>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let wid = parse_oid(&webinar_id)?;
    state.webinars.find_owned(auth.user_id, wid).await?;

    let result = state.attendees.list_by_webinar(wid, &params).await?;
    let items: Vec<AttendeeResponse> = result.items.into_iter().map(to_response).collect();

    Ok(Json(serde_json::json!({
        "items": items,
        "total": result.total,
        "page": result.page,
        "per_page": result.per_page,
        "total_pages": result.total_pages,
    })))
}

fn to_response(attendee: Attendee) -> AttendeeResponse {
    AttendeeResponse {
        id: attendee.id.unwrap().to_hex(),
        webinar_id: attendee.webinar_id.to_hex(),
        name: attendee.name,
        email: attendee.email,
        status: attendee.status,
        joined_at: attendee.joined_at.map(|d| d.to_chrono().to_rfc3339()),
        created_at: attendee.created_at.to_chrono().to_rfc3339(),
    }
}
