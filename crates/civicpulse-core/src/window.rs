//! Rolling 24-hour spending window.
//!
//! The window is a fixed-length FIFO of hourly buckets: every tail insertion
//! is paired with a head removal, so its length never changes after seeding.

use std::collections::{BTreeMap, VecDeque};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::sector::Sector;

/// Number of hourly buckets in the rolling window (trailing 24 hours).
pub const WINDOW_LEN: usize = 24;

const HOUR_MS: u64 = 3_600_000;

/// One hourly bucket of per-sector spending magnitudes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeBucket {
    /// Bucket instant, milliseconds since the Unix epoch.
    pub timestamp_ms: u64,
    /// "HH:MM" label, truncated to the minute.
    pub label: String,
    pub values: BTreeMap<Sector, u64>,
}

impl TimeBucket {
    /// Draw a fresh bucket at `timestamp_ms`, one value per sector from its
    /// band.
    pub fn sample<R: Rng + ?Sized>(timestamp_ms: u64, rng: &mut R) -> Self {
        let values = Sector::ALL
            .into_iter()
            .map(|sector| {
                let (lo, hi) = sector.band();
                (sector, rng.random_range(lo..hi))
            })
            .collect();
        Self {
            timestamp_ms,
            label: hour_label(timestamp_ms),
            values,
        }
    }
}

/// Generate the trailing 24-hour window ending at `now_ms`: one bucket per
/// hour, oldest first.
pub fn generate_window<R: Rng + ?Sized>(now_ms: u64, rng: &mut R) -> VecDeque<TimeBucket> {
    (0..WINDOW_LEN)
        .map(|i| {
            let hours_back = (WINDOW_LEN - 1 - i) as u64;
            TimeBucket::sample(now_ms.saturating_sub(hours_back * HOUR_MS), rng)
        })
        .collect()
}

/// Advance the window one step: evict the head, append a fresh bucket at
/// `now_ms`. Length is preserved.
pub fn advance_window<R: Rng + ?Sized>(
    window: &mut VecDeque<TimeBucket>,
    now_ms: u64,
    rng: &mut R,
) {
    window.pop_front();
    window.push_back(TimeBucket::sample(now_ms, rng));
}

/// Format epoch milliseconds as an "HH:MM" label (UTC, truncated to the
/// minute).
pub fn hour_label(ms: u64) -> String {
    let secs = ms / 1000;
    let minute = (secs / 60) % 60;
    let hour = (secs / 3600) % 24;
    format!("{hour:02}:{minute:02}")
}
