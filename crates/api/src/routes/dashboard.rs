use std::collections::BTreeMap;

use aireach_db::models::AttendeeStatus;
use axum::{Json, extract::{Query, State}};
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::{error::ApiError, extractors::auth::AuthUser, state::AppState};

#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub webinars: u64,
    pub upcoming_webinars: u64,
    pub registered: u64,
    pub joined: u64,
    pub leads: u64,
    pub revenue_cents: i64,
    /// Joined / registered, in percent. Zero when nobody has registered.
    pub conversion_rate: f64,
}

/// Aggregate stats across all of the host's webinars.
pub async fn stats(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<DashboardStats>, ApiError> {
    let webinar_ids = state.webinars.owned_ids(auth.user_id).await?;

    let webinars = webinar_ids.len() as u64;
    let upcoming_webinars = state.webinars.count_upcoming(auth.user_id).await?;
    let registered = state.attendees.count_for_webinars(&webinar_ids).await?;
    let joined = state.attendees.count_joined_for_webinars(&webinar_ids).await?;
    let leads = state.leads.list_for_webinars(&webinar_ids).await?.len() as u64;

    let revenue_cents: i64 = state
        .sales
        .list_for_webinars(&webinar_ids)
        .await?
        .iter()
        .filter(|s| s.status == aireach_db::models::SaleStatus::Completed)
        .map(|s| s.amount_cents)
        .sum();

    let conversion_rate = if registered > 0 {
        (joined as f64 / registered as f64) * 100.0
    } else {
        0.0
    };

    Ok(Json(DashboardStats {
        webinars,
        upcoming_webinars,
        registered,
        joined,
        leads,
        revenue_cents,
        conversion_rate,
    }))
}

#[derive(Debug, Deserialize)]
pub struct AnalyticsQuery {
    #[serde(default)]
    pub timeframe: Timeframe,
}

#[derive(Debug, Deserialize, Default, Clone, Copy)]
pub enum Timeframe {
    #[serde(rename = "7d")]
    Week,
    #[default]
    #[serde(rename = "30d")]
    Month,
    #[serde(rename = "90d")]
    Quarter,
}

impl Timeframe {
    fn days(self) -> i64 {
        match self {
            Timeframe::Week => 7,
            Timeframe::Month => 30,
            Timeframe::Quarter => 90,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Analytics {
    /// Registrations per webinar, all time.
    pub attendance_by_webinar: Vec<NamedCount>,
    /// Joins per day within the requested timeframe.
    pub attendance_over_time: Vec<DatedCount>,
    /// Attendee status breakdown, all time.
    pub attendee_status: Vec<NamedCount>,
}

#[derive(Debug, Serialize)]
pub struct NamedCount {
    pub name: String,
    pub count: u64,
}

#[derive(Debug, Serialize)]
pub struct DatedCount {
    pub date: String,
    pub count: u64,
}

/// Timeframe-windowed attendance series for the host's analytics charts.
pub async fn analytics(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Json<Analytics>, ApiError> {
    let since = Utc::now() - Duration::days(query.timeframe.days());

    let webinars = state
        .webinars
        .base
        .find_many(bson::doc! { "host_id": auth.user_id }, None)
        .await?;
    let webinar_ids: Vec<_> = webinars.iter().filter_map(|w| w.id).collect();

    let attendees = state.attendees.list_for_webinars(&webinar_ids).await?;

    let attendance_by_webinar = webinars
        .iter()
        .map(|w| NamedCount {
            name: w.title.clone(),
            count: attendees
                .iter()
                .filter(|a| Some(a.webinar_id) == w.id)
                .count() as u64,
        })
        .collect();

    let mut per_day: BTreeMap<String, u64> = BTreeMap::new();
    for attendee in &attendees {
        let Some(joined_at) = attendee.joined_at else {
            continue;
        };
        let joined_at = joined_at.to_chrono();
        if joined_at < since {
            continue;
        }
        *per_day
            .entry(joined_at.format("%Y-%m-%d").to_string())
            .or_default() += 1;
    }
    let attendance_over_time = per_day
        .into_iter()
        .map(|(date, count)| DatedCount { date, count })
        .collect();

    let attendee_status = [
        ("pending", AttendeeStatus::Pending),
        ("joined", AttendeeStatus::Joined),
        ("left", AttendeeStatus::Left),
    ]
    .into_iter()
    .map(|(name, status)| NamedCount {
        name: name.to_string(),
        count: attendees.iter().filter(|a| a.status == status).count() as u64,
    })
    .collect();

    Ok(Json(Analytics {
        attendance_by_webinar,
        attendance_over_time,
        attendee_status,
    }))
}
