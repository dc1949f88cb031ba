//! Activity log records and relative-time labels.
//!
//! Activities are the human-facing audit trail ("Budget allocation updated",
//! "Optimization performed"). Like anomalies, the feed keeps the
//! [`MAX_ACTIVITIES`] most recent, newest first.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::sector::Sector;
use crate::window::hour_label;

/// Maximum activity records retained, newest first.
pub const MAX_ACTIVITIES: usize = 5;

/// Fixed catalog of activity labels.
pub const ACTIVITIES: [&str; 6] = [
    "Budget allocation updated",
    "New transaction processed",
    "AI recommendation applied",
    "Scenario analysis completed",
    "Optimization performed",
    "Budget approval",
];

/// Fixed catalog of acting users.
pub const USERS: [&str; 5] = [
    "Budget Officer",
    "Finance Director",
    "Department Head",
    "System",
    "Administrator",
];

/// One activity-log entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityRecord {
    /// Unique id, monotonic sequence: "act-1", "act-2", ...
    pub id: String,
    pub activity: String,
    pub sector: Sector,
    pub user: String,
    pub timestamp_ms: u64,
    /// Currency magnitude, present for roughly half the records.
    pub amount: Option<u64>,
}

/// Synthesize one activity at `now_ms` under sequence number `seq`.
pub fn synthesize<R: Rng + ?Sized>(seq: u64, now_ms: u64, rng: &mut R) -> ActivityRecord {
    let activity = ACTIVITIES[rng.random_range(0..ACTIVITIES.len())];
    let sector = Sector::ALL[rng.random_range(0..Sector::ALL.len())];
    let user = USERS[rng.random_range(0..USERS.len())];
    let amount = if rng.random_bool(0.5) {
        Some(rng.random_range(100_000..1_100_000))
    } else {
        None
    };
    ActivityRecord {
        id: format!("act-{seq}"),
        activity: activity.to_string(),
        sector,
        user: user.to_string(),
        timestamp_ms: now_ms,
        amount,
    }
}

/// Seed the activity log: five records scattered over the last few hours,
/// newest first. Returns the log and the next free sequence number.
pub fn seed<R: Rng + ?Sized>(now_ms: u64, rng: &mut R) -> (Vec<ActivityRecord>, u64) {
    const MIN_MS: u64 = 60_000;
    let mut records = Vec::with_capacity(MAX_ACTIVITIES);
    let mut minutes_back = 0u64;
    for seq in 1..=MAX_ACTIVITIES as u64 {
        minutes_back += rng.random_range(0..60);
        records.push(synthesize(
            seq,
            now_ms.saturating_sub(minutes_back * MIN_MS),
            rng,
        ));
    }
    (records, MAX_ACTIVITIES as u64 + 1)
}

/// Prepend `record`, truncating to the [`MAX_ACTIVITIES`] most recent.
pub fn push_newest(list: &mut Vec<ActivityRecord>, record: ActivityRecord) {
    list.insert(0, record);
    list.truncate(MAX_ACTIVITIES);
}

/// Relative-time label: "Just now" under a minute, "N min ago" under an
/// hour, otherwise the absolute "HH:MM".
pub fn format_relative(now_ms: u64, then_ms: u64) -> String {
    let diff_min = now_ms.saturating_sub(then_ms) / 60_000;
    if diff_min < 1 {
        "Just now".to_string()
    } else if diff_min < 60 {
        format!("{diff_min} min ago")
    } else {
        hour_label(then_ms)
    }
}
