//! Anomaly event records.
//!
//! Anomalies are discrete events layered over the spending window: a spike, a
//! duplicate payment, a delayed disbursement. The feed keeps only the
//! [`MAX_ANOMALIES`] most recent, newest first.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::sector::Sector;

/// Maximum anomaly records retained, newest first.
pub const MAX_ANOMALIES: usize = 5;

/// Fixed catalog of anomaly categories the feed can emit.
pub const CATEGORIES: [&str; 5] = [
    "Spending Spike",
    "Unusual Transaction",
    "Delayed Payment",
    "Budget Overrun",
    "Duplicate Payment",
];

/// Sequence number the first synthesized anomaly uses; the seed records
/// occupy 1019..=1023.
pub(crate) const FIRST_SEQ: u64 = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub const ALL: [Severity; 3] = [Severity::Low, Severity::Medium, Severity::High];

    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyStatus {
    Unresolved,
    UnderReview,
    Resolved,
}

impl AnomalyStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Unresolved => "Unresolved",
            Self::UnderReview => "Under Review",
            Self::Resolved => "Resolved",
        }
    }
}

/// One detected anomaly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnomalyEvent {
    /// Unique id, monotonic sequence: "ANM-1024", "ANM-1025", ...
    pub id: String,
    pub timestamp_ms: u64,
    pub sector: Sector,
    pub category: String,
    pub severity: Severity,
    pub status: AnomalyStatus,
}

/// Synthesize one anomaly at `now_ms` under sequence number `seq`.
/// New anomalies always start unresolved.
pub fn synthesize<R: Rng + ?Sized>(seq: u64, now_ms: u64, rng: &mut R) -> AnomalyEvent {
    let sector = Sector::ALL[rng.random_range(0..Sector::ALL.len())];
    let category = CATEGORIES[rng.random_range(0..CATEGORIES.len())];
    let severity = Severity::ALL[rng.random_range(0..Severity::ALL.len())];
    AnomalyEvent {
        id: format!("ANM-{seq}"),
        timestamp_ms: now_ms,
        sector,
        category: category.to_string(),
        severity,
        status: AnomalyStatus::Unresolved,
    }
}

/// Prepend `event`, truncating to the [`MAX_ANOMALIES`] most recent.
pub fn push_newest(list: &mut Vec<AnomalyEvent>, event: AnomalyEvent) {
    list.insert(0, event);
    list.truncate(MAX_ANOMALIES);
}

/// The fixed records every session starts with, newest first.
pub fn seed(now_ms: u64) -> Vec<AnomalyEvent> {
    const MIN_MS: u64 = 60_000;
    let at = |minutes_back: u64| now_ms.saturating_sub(minutes_back * MIN_MS);
    vec![
        AnomalyEvent {
            id: "ANM-1023".to_string(),
            timestamp_ms: at(38),
            sector: Sector::Healthcare,
            category: "Spending Spike".to_string(),
            severity: Severity::High,
            status: AnomalyStatus::Unresolved,
        },
        AnomalyEvent {
            id: "ANM-1022".to_string(),
            timestamp_ms: at(76),
            sector: Sector::Education,
            category: "Unusual Transaction".to_string(),
            severity: Severity::Medium,
            status: AnomalyStatus::UnderReview,
        },
        AnomalyEvent {
            id: "ANM-1021".to_string(),
            timestamp_ms: at(149),
            sector: Sector::Infrastructure,
            category: "Delayed Payment".to_string(),
            severity: Severity::Low,
            status: AnomalyStatus::Resolved,
        },
        AnomalyEvent {
            id: "ANM-1020".to_string(),
            timestamp_ms: at(1_088),
            sector: Sector::PublicSafety,
            category: "Budget Overrun".to_string(),
            severity: Severity::Medium,
            status: AnomalyStatus::Resolved,
        },
        AnomalyEvent {
            id: "ANM-1019".to_string(),
            timestamp_ms: at(1_215),
            sector: Sector::SocialServices,
            category: "Duplicate Payment".to_string(),
            severity: Severity::High,
            status: AnomalyStatus::Resolved,
        },
    ]
}
