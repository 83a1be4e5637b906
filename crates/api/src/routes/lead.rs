use aireach_db::models::Lead;
use axum::{Json, extract::{Path, State}, http::StatusCode};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    error::ApiError,
    extractors::auth::AuthUser,
    routes::webinar::parse_oid,
    state::AppState,
};

#[derive(Debug, Deserialize, Validate)]
pub struct CaptureLeadRequest {
    pub name: String,
    #[validate(email)]
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct LeadResponse {
    pub id: String,
    pub webinar_id: String,
    pub name: String,
    pub email: String,
    pub created_at: String,
}

/// All leads across the host's webinars, newest first.
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<LeadResponse>>, ApiError> {
    let webinar_ids = state.webinars.owned_ids(auth.user_id).await?;
    let leads = state.leads.list_for_webinars(&webinar_ids).await?;
    Ok(Json(leads.into_iter().map(to_response).collect()))
}

/// Public lead capture from a webinar landing page.
pub async fn capture(
    State(state): State<AppState>,
    Path(webinar_id): Path<String>,
    Json(body): Json<CaptureLeadRequest>,
) -> Result<(StatusCode, Json<LeadResponse>), ApiError> {
    body.validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let wid = parse_oid(&webinar_id)?;
    state.webinars.base.find_by_id(wid).await?;

    let lead = state.leads.create(wid, body.name, body.email).await?;
    Ok((StatusCode::CREATED, Json(to_response(lead))))
}

fn to_response(lead: Lead) -> LeadResponse {
    LeadResponse {
        id: lead.id.unwrap().to_hex(),
        webinar_id: lead.webinar_id.to_hex(),
        name: lead.name,
        email: lead.email,
        created_at: lead.created_at.to_chrono().to_rfc3339(),
    }
}
