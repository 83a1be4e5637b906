use std::collections::HashMap;

use axum::{Json, extract::State};
use serde::Serialize;

use crate::{error::ApiError, extractors::auth::AuthUser, state::AppState};

#[derive(Debug, Serialize)]
pub struct CustomerResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub webinar_attended: String,
    pub joined_at: Option<String>,
}

/// Everyone who actually showed up across the host's webinars, most recent
/// first. Registrants who never joined are not customers.
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<CustomerResponse>>, ApiError> {
    let webinars = state
        .webinars
        .base
        .find_many(bson::doc! { "host_id": auth.user_id }, None)
        .await?;

    let titles: HashMap<_, _> = webinars
        .iter()
        .filter_map(|w| w.id.map(|id| (id, w.title.clone())))
        .collect();
    let webinar_ids: Vec<_> = titles.keys().copied().collect();

    let attendees = state
        .attendees
        .list_joined_for_webinars(&webinar_ids)
        .await?;

    let customers = attendees
        .into_iter()
        .map(|a| CustomerResponse {
            id: a.id.unwrap().to_hex(),
            name: a.name,
            email: a.email,
            webinar_attended: titles
                .get(&a.webinar_id)
                .cloned()
                .unwrap_or_default(),
            joined_at: a.joined_at.map(|d| d.to_chrono().to_rfc3339()),
        })
        .collect();

    Ok(Json(customers))
}
