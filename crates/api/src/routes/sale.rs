use aireach_db::models::{Sale, SaleStatus};
use axum::{Json, extract::State};
use serde::Serialize;

use crate::{error::ApiError, extractors::auth::AuthUser, state::AppState};

#[derive(Debug, Serialize)]
pub struct SaleResponse {
    pub id: String,
    pub webinar_id: String,
    pub user_id: Option<String>,
    pub amount_cents: i64,
    pub currency: String,
    pub status: SaleStatus,
    pub stripe_session_id: String,
    pub created_at: String,
}

/// All sales across the host's webinars, newest first.
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<SaleResponse>>, ApiError> {
    let webinar_ids = state.webinars.owned_ids(auth.user_id).await?;
    let sales = state.sales.list_for_webinars(&webinar_ids).await?;
    Ok(Json(sales.into_iter().map(to_response).collect()))
}

fn to_response(sale: Sale) -> SaleResponse {
    SaleResponse {
        id: sale.id.unwrap().to_hex(),
        webinar_id: sale.webinar_id.to_hex(),
        user_id: sale.user_id.map(|u| u.to_hex()),
        amount_cents: sale.amount_cents,
        currency: sale.currency,
        status: sale.status,
        stripe_session_id: sale.stripe_session_id,
        created_at: sale.created_at.to_chrono().to_rfc3339(),
    }
}
