//! Telemetry device fleet.
//!
//! A fixed set of five known devices feeds the dashboard. Entries are mutated
//! in place by ticks — never added or removed — so the fleet keeps a stable
//! order by id.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::sector::Sector;

/// Number of devices in the fleet.
pub const FLEET_SIZE: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceStatus {
    Online,
    Offline,
}

impl DeviceStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Online => "Online",
            Self::Offline => "Offline",
        }
    }
}

/// One telemetry device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceSource {
    pub id: String,
    pub name: String,
    pub sector: Sector,
    pub status: DeviceStatus,
    /// Instant of the device's last reported update.
    pub last_update_ms: u64,
    /// Cumulative data points reported by this device.
    pub data_points: u64,
}

/// The fixed fleet every session starts with, ordered by id.
pub fn seed_fleet(now_ms: u64) -> Vec<DeviceSource> {
    const MIN_MS: u64 = 60_000;
    let at = |minutes_back: u64| now_ms.saturating_sub(minutes_back * MIN_MS);
    vec![
        DeviceSource {
            id: "IOT-001".to_string(),
            name: "Traffic Sensors".to_string(),
            sector: Sector::Infrastructure,
            status: DeviceStatus::Online,
            last_update_ms: at(2),
            data_points: 1_245,
        },
        DeviceSource {
            id: "IOT-002".to_string(),
            name: "Hospital Occupancy".to_string(),
            sector: Sector::Healthcare,
            status: DeviceStatus::Online,
            last_update_ms: at(5),
            data_points: 876,
        },
        DeviceSource {
            id: "IOT-003".to_string(),
            name: "School Attendance".to_string(),
            sector: Sector::Education,
            status: DeviceStatus::Online,
            last_update_ms: at(10),
            data_points: 1_532,
        },
        DeviceSource {
            id: "IOT-004".to_string(),
            name: "Air Quality Monitors".to_string(),
            sector: Sector::Environment,
            status: DeviceStatus::Offline,
            last_update_ms: at(60),
            data_points: 432,
        },
        DeviceSource {
            id: "IOT-005".to_string(),
            name: "Emergency Response".to_string(),
            sector: Sector::PublicSafety,
            status: DeviceStatus::Online,
            last_update_ms: at(3),
            data_points: 654,
        },
    ]
}

/// Mark one device freshly updated: stamp `now_ms` and add a small batch of
/// data points.
pub fn nudge<R: Rng + ?Sized>(device: &mut DeviceSource, now_ms: u64, rng: &mut R) {
    device.last_update_ms = now_ms;
    device.data_points += rng.random_range(1..50);
}
