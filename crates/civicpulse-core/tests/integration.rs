//! Integration tests for civicpulse-core.
//!
//! These tests run the full pipeline: seeding → live ticking → filtering →
//! refresh → cancellation, with injected clocks and seeded rngs.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;

use civicpulse_core::{
    Clock, FeedConfig, FeedSession, ManualClock, Sector, WINDOW_LEN,
};

const NOW: u64 = 1_770_000_000_000;

fn fast_config() -> FeedConfig {
    FeedConfig {
        tick_interval: Duration::from_millis(10),
        activity_interval: Duration::from_millis(15),
        refresh_delay: Duration::from_millis(20),
        ..FeedConfig::default()
    }
}

fn start_session(config: FeedConfig, seed: u64) -> (Arc<ManualClock>, FeedSession) {
    let clock = Arc::new(ManualClock::new(NOW));
    let session = FeedSession::start_with(
        config,
        Arc::clone(&clock) as Arc<dyn Clock>,
        Box::new(StdRng::seed_from_u64(seed)),
    );
    (clock, session)
}

#[test]
fn session_seeds_every_dataset() {
    let (_clock, mut session) = start_session(fast_config(), 1);
    let snapshot = session.snapshot();
    session.stop();

    assert_eq!(snapshot.window.len(), WINDOW_LEN);
    assert_eq!(snapshot.anomalies.len(), 5);
    assert_eq!(snapshot.devices.len(), 5);
    assert_eq!(snapshot.activities.len(), 5);
    assert_eq!(snapshot.summary.total_budget, 24_500_000.0);
    assert!(!snapshot.session_id.is_empty());
}

#[test]
fn live_session_keeps_all_invariants_while_ticking() {
    let config = FeedConfig {
        // Make every probabilistic branch fire so the caps get exercised.
        device_update_p: 1.0,
        anomaly_p: 1.0,
        activity_p: 1.0,
        transaction_p: 1.0,
        ..fast_config()
    };
    let (clock, mut session) = start_session(config, 2);

    for step in 1..=20u64 {
        clock.set(NOW + step * 5_000);
        thread::sleep(Duration::from_millis(12));

        let snapshot = session.snapshot();
        assert_eq!(snapshot.window.len(), WINDOW_LEN);
        assert!(snapshot.anomalies.len() <= 5);
        assert_eq!(snapshot.devices.len(), 5);
        assert!(snapshot.activities.len() <= 5);
        assert!(snapshot.summary.allocated_budget >= 0.0);
        assert!(snapshot.summary.allocated_budget <= snapshot.summary.total_budget);
        assert!((0.0..=100.0).contains(&snapshot.summary.efficiency_score));
    }

    let snapshot = session.snapshot();
    session.stop();
    assert!(snapshot.tick_count >= 5, "got {} ticks", snapshot.tick_count);
    // Window timestamps never decrease.
    for pair in snapshot.window.windows(2) {
        assert!(pair[0].timestamp_ms <= pair[1].timestamp_ms);
    }
}

#[test]
fn filters_apply_end_to_end() {
    let (_clock, mut session) = start_session(fast_config(), 3);

    session.set_sector_filter("environment");
    let filtered = session.snapshot();
    assert_eq!(filtered.devices.len(), 1);
    assert_eq!(filtered.devices[0].id, "IOT-004");
    for anomaly in &filtered.anomalies {
        assert_eq!(anomaly.sector, Sector::Environment);
    }

    session.set_sector_filter("not-a-sector");
    let empty = session.snapshot();
    assert!(empty.devices.is_empty());
    assert!(empty.anomalies.is_empty());

    session.set_sector_filter("all");
    let full = session.snapshot();
    session.stop();
    assert_eq!(full.devices.len(), 5);
    assert_eq!(full.anomalies.len(), 5);
}

#[test]
fn refresh_round_trip_with_busy_guard() {
    let config = FeedConfig {
        tick_interval: Duration::from_secs(3_600),
        activity_interval: Duration::from_secs(3_600),
        refresh_delay: Duration::from_millis(25),
        ..FeedConfig::default()
    };
    let (clock, mut session) = start_session(config, 4);
    let before = session.snapshot();

    clock.set(NOW + 300_000);
    assert!(session.refresh());
    // Duplicate requests while in flight are ignored.
    assert!(!session.refresh());
    assert!(session.snapshot().refreshing);

    thread::sleep(Duration::from_millis(100));
    let after = session.snapshot();
    session.stop();

    assert!(!after.refreshing);
    assert_eq!(after.last_updated_ms, NOW + 300_000);
    assert_ne!(after.window, before.window);
    assert_eq!(after.window.len(), WINDOW_LEN);
    // Refresh rebuilds the window only; the fleet and lists are untouched.
    assert_eq!(after.devices, before.devices);
    assert_eq!(after.activities, before.activities);
}

#[test]
fn cancellation_freezes_the_session_for_good() {
    let (_clock, mut session) = start_session(fast_config(), 5);
    thread::sleep(Duration::from_millis(60));
    session.stop();

    let frozen = session.snapshot();
    thread::sleep(Duration::from_millis(100));
    assert_eq!(session.snapshot(), frozen);

    // Stopping again is harmless, and refresh stays refused.
    session.stop();
    assert!(!session.refresh());
    assert_eq!(session.snapshot(), frozen);
}

#[test]
fn sessions_are_independent_copies() {
    let (_clock_a, mut a) = start_session(fast_config(), 6);
    let (_clock_b, mut b) = start_session(fast_config(), 7);

    a.set_sector_filter("education");
    assert_eq!(b.sector_filter(), "all");
    assert_ne!(a.id(), b.id());

    // Same seed, same clock, same shape — different seeds, different values.
    let wa = a.snapshot().window;
    let wb = b.snapshot().window;
    assert_eq!(wa.len(), wb.len());
    assert_ne!(wa, wb);

    a.stop();
    b.stop();
}

#[test]
fn identical_seeds_produce_identical_feeds() {
    // Hour-long cadences: no tick can fire between start and snapshot.
    let quiet = FeedConfig {
        tick_interval: Duration::from_secs(3_600),
        activity_interval: Duration::from_secs(3_600),
        ..FeedConfig::default()
    };
    let (_ca, mut a) = start_session(quiet.clone(), 8);
    let (_cb, mut b) = start_session(quiet, 8);
    let wa = a.snapshot();
    let wb = b.snapshot();
    a.stop();
    b.stop();

    assert_eq!(wa.window, wb.window);
    assert_eq!(wa.activities, wb.activities);
    assert_eq!(wa.summary, wb.summary);
}
