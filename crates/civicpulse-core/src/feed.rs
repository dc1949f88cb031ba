//! Feed engine: configuration, state, and tick operations.
//!
//! [`FeedState`] owns every dataset one observation session exposes and
//! evolves them through three tick operations. It has no timers of its own —
//! [`crate::session::FeedSession`] drives it on fixed cadences and is the
//! only place scheduling lives.

use std::collections::VecDeque;
use std::time::Duration;

use rand::{Rng, RngCore};

use crate::activity::{self, ActivityRecord};
use crate::anomaly::{self, AnomalyEvent, AnomalyStatus};
use crate::device::{self, DeviceSource, DeviceStatus};
use crate::sector::SectorFilter;
use crate::summary::BudgetSummary;
use crate::window::{self, TimeBucket};

// ---------------------------------------------------------------------------
// FeedConfig
// ---------------------------------------------------------------------------

/// Tuning constants for the simulated feed.
///
/// The probabilities and cadences shape how lively the feed looks; none of
/// them is a contract, so all of them are configuration rather than
/// constants baked into the tick code.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Cadence of window and summary ticks.
    pub tick_interval: Duration,
    /// Cadence of activity ticks.
    pub activity_interval: Duration,
    /// Simulated round-trip delay for a manual refresh.
    pub refresh_delay: Duration,
    /// Probability a window tick nudges one device.
    pub device_update_p: f64,
    /// Probability a window tick emits a new anomaly.
    pub anomaly_p: f64,
    /// Probability an activity tick appends a record.
    pub activity_p: f64,
    /// Probability a summary tick counts a new transaction.
    pub transaction_p: f64,
    /// Uniform half-range of allocated-budget drift per summary tick.
    pub budget_jitter: f64,
    /// Uniform half-range of efficiency-score drift per summary tick.
    pub efficiency_jitter: f64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(5_000),
            activity_interval: Duration::from_millis(10_000),
            refresh_delay: Duration::from_millis(1_000),
            device_update_p: 0.3,
            anomaly_p: 0.1,
            activity_p: 0.3,
            transaction_p: 0.3,
            budget_jitter: 25_000.0,
            efficiency_jitter: 0.2,
        }
    }
}

// ---------------------------------------------------------------------------
// FeedState
// ---------------------------------------------------------------------------

/// All datasets of one observation session, plus the injected randomness.
pub struct FeedState {
    config: FeedConfig,
    rng: Box<dyn RngCore + Send>,
    window: VecDeque<TimeBucket>,
    anomalies: Vec<AnomalyEvent>,
    devices: Vec<DeviceSource>,
    activities: Vec<ActivityRecord>,
    summary: BudgetSummary,
    last_updated_ms: u64,
    next_anomaly_seq: u64,
    next_activity_seq: u64,
    tick_count: u64,
}

impl FeedState {
    /// Seed a fresh state at `now_ms`. The shape is deterministic (window
    /// length, fleet identities, list caps); only the values come from `rng`.
    pub fn new(config: FeedConfig, now_ms: u64, mut rng: Box<dyn RngCore + Send>) -> Self {
        let window = window::generate_window(now_ms, &mut rng);
        let (activities, next_activity_seq) = activity::seed(now_ms, &mut rng);
        Self {
            config,
            rng,
            window,
            anomalies: anomaly::seed(now_ms),
            devices: device::seed_fleet(now_ms),
            activities,
            summary: BudgetSummary::seed(),
            last_updated_ms: now_ms,
            next_anomaly_seq: anomaly::FIRST_SEQ,
            next_activity_seq,
            tick_count: 0,
        }
    }

    /// One window tick: advance the rolling window, maybe nudge a device,
    /// maybe emit an anomaly.
    pub fn window_tick(&mut self, now_ms: u64) {
        window::advance_window(&mut self.window, now_ms, &mut self.rng);
        self.last_updated_ms = now_ms;
        self.tick_count += 1;

        if self.rng.random_bool(self.config.device_update_p) {
            let idx = self.rng.random_range(0..self.devices.len());
            device::nudge(&mut self.devices[idx], now_ms, &mut self.rng);
        }

        if self.rng.random_bool(self.config.anomaly_p) {
            let event = anomaly::synthesize(self.next_anomaly_seq, now_ms, &mut self.rng);
            self.next_anomaly_seq += 1;
            anomaly::push_newest(&mut self.anomalies, event);
        }
    }

    /// One activity tick: maybe append a new activity record.
    pub fn activity_tick(&mut self, now_ms: u64) {
        if self.rng.random_bool(self.config.activity_p) {
            let record = activity::synthesize(self.next_activity_seq, now_ms, &mut self.rng);
            self.next_activity_seq += 1;
            activity::push_newest(&mut self.activities, record);
        }
    }

    /// One summary tick: bounded random drift on the headline scalars.
    pub fn summary_tick(&mut self) {
        let budget_jitter = self.config.budget_jitter;
        let efficiency_jitter = self.config.efficiency_jitter;
        let budget_delta = self.rng.random_range(-budget_jitter..=budget_jitter);
        let efficiency_delta = self
            .rng
            .random_range(-efficiency_jitter..=efficiency_jitter);
        self.summary.apply_drift(budget_delta, efficiency_delta);

        if self.rng.random_bool(self.config.transaction_p) {
            self.summary.transactions += 1;
        }
    }

    /// Rebuild the window from scratch (manual refresh) and reset the
    /// last-updated stamp. Lists and summary are untouched.
    pub fn regenerate(&mut self, now_ms: u64) {
        self.window = window::generate_window(now_ms, &mut self.rng);
        self.last_updated_ms = now_ms;
    }

    // --- Filtered read views (never mutate the underlying collections) ---

    pub fn anomalies_for(&self, filter: SectorFilter) -> Vec<AnomalyEvent> {
        self.anomalies
            .iter()
            .filter(|a| filter.matches(a.sector))
            .cloned()
            .collect()
    }

    pub fn devices_for(&self, filter: SectorFilter) -> Vec<DeviceSource> {
        self.devices
            .iter()
            .filter(|d| filter.matches(d.sector))
            .cloned()
            .collect()
    }

    /// Count of anomalies still unresolved.
    pub fn unresolved_anomalies(&self) -> usize {
        self.anomalies
            .iter()
            .filter(|a| a.status == AnomalyStatus::Unresolved)
            .count()
    }

    /// Count of devices currently online.
    pub fn online_devices(&self) -> usize {
        self.devices
            .iter()
            .filter(|d| d.status == DeviceStatus::Online)
            .count()
    }

    // --- Accessors ---

    pub fn window(&self) -> &VecDeque<TimeBucket> {
        &self.window
    }

    pub fn activities(&self) -> &[ActivityRecord] {
        &self.activities
    }

    pub fn summary(&self) -> &BudgetSummary {
        &self.summary
    }

    pub fn last_updated_ms(&self) -> u64 {
        self.last_updated_ms
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn config(&self) -> &FeedConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sector::Sector;
    use crate::window::WINDOW_LEN;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const NOW: u64 = 1_770_000_000_000;

    fn state_with(config: FeedConfig, seed: u64) -> FeedState {
        FeedState::new(config, NOW, Box::new(StdRng::seed_from_u64(seed)))
    }

    /// Config where every probabilistic branch always fires.
    fn certain_config() -> FeedConfig {
        FeedConfig {
            device_update_p: 1.0,
            anomaly_p: 1.0,
            activity_p: 1.0,
            transaction_p: 1.0,
            ..FeedConfig::default()
        }
    }

    /// Config where no probabilistic branch ever fires.
    fn quiet_config() -> FeedConfig {
        FeedConfig {
            device_update_p: 0.0,
            anomaly_p: 0.0,
            activity_p: 0.0,
            transaction_p: 0.0,
            ..FeedConfig::default()
        }
    }

    #[test]
    fn new_state_is_fully_seeded() {
        let state = state_with(FeedConfig::default(), 1);
        assert_eq!(state.window().len(), WINDOW_LEN);
        assert_eq!(state.anomalies_for(SectorFilter::All).len(), 5);
        assert_eq!(state.devices_for(SectorFilter::All).len(), 5);
        assert_eq!(state.activities().len(), 5);
        assert_eq!(state.last_updated_ms(), NOW);
        assert_eq!(state.tick_count(), 0);
    }

    #[test]
    fn window_tick_advances_and_stamps() {
        let mut state = state_with(quiet_config(), 2);
        let old_head = state.window().front().unwrap().clone();

        state.window_tick(NOW + 5_000);

        assert_eq!(state.window().len(), WINDOW_LEN);
        assert_ne!(state.window().front().unwrap(), &old_head);
        assert_eq!(state.window().back().unwrap().timestamp_ms, NOW + 5_000);
        assert_eq!(state.last_updated_ms(), NOW + 5_000);
        assert_eq!(state.tick_count(), 1);
    }

    #[test]
    fn certain_tick_emits_an_anomaly_and_nudges_a_device() {
        let mut state = state_with(certain_config(), 3);
        let points_before: u64 = state
            .devices_for(SectorFilter::All)
            .iter()
            .map(|d| d.data_points)
            .sum();

        state.window_tick(NOW + 5_000);

        let anomalies = state.anomalies_for(SectorFilter::All);
        assert_eq!(anomalies[0].id, "ANM-1024");
        assert_eq!(anomalies[0].timestamp_ms, NOW + 5_000);
        assert_eq!(anomalies.len(), 5);

        let points_after: u64 = state
            .devices_for(SectorFilter::All)
            .iter()
            .map(|d| d.data_points)
            .sum();
        assert!(points_after > points_before);
    }

    #[test]
    fn anomaly_list_stays_capped_and_newest_first_over_many_ticks() {
        let mut state = state_with(certain_config(), 4);
        for step in 1..=40u64 {
            state.window_tick(NOW + step * 5_000);
            let anomalies = state.anomalies_for(SectorFilter::All);
            assert!(anomalies.len() <= 5);
            for pair in anomalies.windows(2) {
                assert!(pair[0].timestamp_ms >= pair[1].timestamp_ms);
            }
        }
        // 40 certain ticks emitted 40 anomalies; ids kept climbing.
        assert_eq!(
            state.anomalies_for(SectorFilter::All)[0].id,
            format!("ANM-{}", 1024 + 39)
        );
    }

    #[test]
    fn quiet_ticks_leave_lists_and_summary_alone() {
        let mut state = state_with(quiet_config(), 5);
        let anomalies = state.anomalies_for(SectorFilter::All);
        let devices = state.devices_for(SectorFilter::All);
        let transactions = state.summary().transactions;

        for step in 1..=10u64 {
            state.window_tick(NOW + step * 5_000);
            state.activity_tick(NOW + step * 5_000);
        }

        assert_eq!(state.anomalies_for(SectorFilter::All), anomalies);
        assert_eq!(state.devices_for(SectorFilter::All), devices);
        assert_eq!(state.summary().transactions, transactions);
    }

    #[test]
    fn summary_tick_single_step_bounds() {
        // Concrete scenario: one tick from the seed lands in
        // [18_275_000, 18_325_000] (within [0, 24_500_000]).
        for seed in 0..20 {
            let mut state = state_with(FeedConfig::default(), seed);
            state.summary_tick();
            let allocated = state.summary().allocated_budget;
            assert!((18_275_000.0..=18_325_000.0).contains(&allocated));
            assert!(allocated >= 0.0 && allocated <= state.summary().total_budget);
        }
    }

    #[test]
    fn summary_invariants_hold_for_any_number_of_ticks() {
        let mut state = state_with(certain_config(), 6);
        for _ in 0..5_000 {
            state.summary_tick();
            let summary = state.summary();
            assert!(summary.allocated_budget >= 0.0);
            assert!(summary.allocated_budget <= summary.total_budget);
            assert!((0.0..=100.0).contains(&summary.efficiency_score));
        }
        // transaction_p = 1.0: every tick counted one transaction.
        assert_eq!(state.summary().transactions, 1_245 + 5_000);
    }

    #[test]
    fn activity_tick_appends_and_evicts() {
        let mut state = state_with(certain_config(), 7);
        let oldest = state.activities()[4].clone();

        state.activity_tick(NOW + 10_000);

        assert_eq!(state.activities().len(), 5);
        assert_eq!(state.activities()[0].id, "act-6");
        assert_eq!(state.activities()[0].timestamp_ms, NOW + 10_000);
        assert!(!state.activities().contains(&oldest));
    }

    #[test]
    fn regenerate_rebuilds_the_window_and_restamps() {
        let mut state = state_with(quiet_config(), 8);
        for step in 1..=3u64 {
            state.window_tick(NOW + step * 5_000);
        }

        state.regenerate(NOW + 60_000);

        assert_eq!(state.window().len(), WINDOW_LEN);
        assert_eq!(state.window().back().unwrap().timestamp_ms, NOW + 60_000);
        assert_eq!(state.last_updated_ms(), NOW + 60_000);
        // Tick counting is unaffected by refresh.
        assert_eq!(state.tick_count(), 3);
    }

    #[test]
    fn filter_all_is_identity() {
        let state = state_with(FeedConfig::default(), 9);
        assert_eq!(state.anomalies_for(SectorFilter::All).len(), 5);
        assert_eq!(state.devices_for(SectorFilter::All).len(), 5);
    }

    #[test]
    fn filter_environment_selects_exactly_the_air_quality_monitors() {
        let state = state_with(FeedConfig::default(), 10);
        let devices = state.devices_for(SectorFilter::parse("environment"));
        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0].id, "IOT-004");
        assert_eq!(devices[0].sector, Sector::Environment);
    }

    #[test]
    fn filter_unknown_key_yields_empty_sets() {
        let state = state_with(FeedConfig::default(), 11);
        assert!(state.anomalies_for(SectorFilter::parse("defense")).is_empty());
        assert!(state.devices_for(SectorFilter::parse("defense")).is_empty());
    }

    #[test]
    fn filtering_does_not_mutate_the_collections() {
        let state = state_with(FeedConfig::default(), 12);
        let before = state.devices_for(SectorFilter::All);
        let _ = state.devices_for(SectorFilter::parse("healthcare"));
        let _ = state.devices_for(SectorFilter::parse("nope"));
        assert_eq!(state.devices_for(SectorFilter::All), before);
    }

    #[test]
    fn unresolved_and_online_counts_from_the_seeds() {
        let state = state_with(FeedConfig::default(), 13);
        assert_eq!(state.unresolved_anomalies(), 1);
        assert_eq!(state.online_devices(), 4);
    }
}
