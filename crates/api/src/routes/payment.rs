use aireach_services::payments::StripeEvent;
use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
};
use serde::Deserialize;
use tracing::warn;

use crate::{
    error::ApiError,
    extractors::auth::MaybeAuthUser,
    routes::webinar::parse_oid,
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub webinar_id: String,
    pub success_url: Option<String>,
    pub cancel_url: Option<String>,
}

/// Create a one-off Stripe Checkout session for a paid webinar.
pub async fn checkout(
    State(state): State<AppState>,
    MaybeAuthUser(auth): MaybeAuthUser,
    Json(body): Json<CheckoutRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let wid = parse_oid(&body.webinar_id)?;
    let public_url = state.settings.app.public_url.trim_end_matches('/');

    let success_url = body
        .success_url
        .unwrap_or_else(|| format!("{public_url}/attend/webinar/{}?paid=1", body.webinar_id));
    let cancel_url = body
        .cancel_url
        .unwrap_or_else(|| format!("{public_url}/attend/webinar/{}", body.webinar_id));

    let user_id = auth.map(|a| a.user_id);
    let session = state
        .payments
        .create_checkout_session(
            &state.db,
            &wid,
            user_id.as_ref(),
            &success_url,
            &cancel_url,
        )
        .await?;

    Ok(Json(serde_json::json!({
        "url": session.url,
        "session_id": session.session_id,
    })))
}

/// Stripe webhook receiver. The body must be consumed raw so the signature
/// is computed over the exact bytes Stripe signed.
pub async fn webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<StatusCode, ApiError> {
    let signature = headers
        .get("stripe-signature")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Missing stripe-signature header".to_string()))?;

    aireach_services::PaymentService::verify_signature(
        &state.settings.stripe.webhook_secret,
        &body,
        signature,
    )?;

    let event: StripeEvent = serde_json::from_slice(&body).map_err(|e| {
        warn!(error = %e, "Unparseable Stripe webhook payload");
        ApiError::BadRequest("Invalid webhook payload".to_string())
    })?;

    state
        .payments
        .handle_webhook_event(&state.sales, &event)
        .await?;

    Ok(StatusCode::OK)
}
