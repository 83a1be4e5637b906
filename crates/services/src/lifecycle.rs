use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Effective phase of a webinar, derived purely from its schedule.
///
/// Independent of the stored host-controlled status flag: a host may still
/// have a webinar marked `scheduled` while the clock says it is `Live`, and
/// join gating trusts the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Upcoming,
    Live,
    Ended,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Upcoming => "upcoming",
            Phase::Live => "live",
            Phase::Ended => "ended",
        }
    }
}

/// Classify `now` against the `[scheduled_at, scheduled_at + duration)`
/// window. The three phases partition the timeline: no gap, no overlap.
///
/// `now` is an explicit argument so callers at the request boundary decide
/// what "current time" means and the function stays deterministic.
pub fn evaluate_phase(
    scheduled_at: DateTime<Utc>,
    duration_mins: u32,
    now: DateTime<Utc>,
) -> Phase {
    let ends_at = scheduled_at + Duration::minutes(i64::from(duration_mins));

    if now < scheduled_at {
        Phase::Upcoming
    } else if now < ends_at {
        Phase::Live
    } else {
        Phase::Ended
    }
}

/// Convenience for models storing bson timestamps.
pub fn evaluate_phase_bson(
    scheduled_at: bson::DateTime,
    duration_mins: u32,
    now: DateTime<Utc>,
) -> Phase {
    evaluate_phase(scheduled_at.to_chrono(), duration_mins, now)
}
