//! Observation sessions: cancellable periodic tasks over the feed engine.
//!
//! Design: one [`FeedSession`] per observer, no process-wide state. The
//! session owns the engine behind a single mutex and drives it with three
//! independent [`Ticker`]s (window, activity, summary). Stopping the session
//! joins every worker, so no tick can fire after `stop` returns and the
//! exposed snapshot is frozen from then on.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::debug;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde::Serialize;
use uuid::Uuid;

use crate::activity::ActivityRecord;
use crate::anomaly::AnomalyEvent;
use crate::clock::{Clock, SystemClock};
use crate::device::DeviceSource;
use crate::feed::{FeedConfig, FeedState};
use crate::sector::SectorFilter;
use crate::summary::BudgetSummary;
use crate::window::TimeBucket;

// ---------------------------------------------------------------------------
// Ticker
// ---------------------------------------------------------------------------

/// A cancellable periodic task.
///
/// The worker thread waits on a condvar with a timeout and runs the task on
/// every timeout. `stop` flips the flag, wakes the worker, and joins it —
/// after `stop` returns the task cannot run again.
pub struct Ticker {
    signal: Arc<(Mutex<bool>, Condvar)>,
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    /// Spawn a worker running `task` every `interval` until stopped.
    pub fn spawn<F>(name: &str, interval: Duration, mut task: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        let signal = Arc::new((Mutex::new(false), Condvar::new()));
        let worker_signal = Arc::clone(&signal);
        let handle = thread::Builder::new()
            .name(format!("civicpulse-{name}"))
            .spawn(move || {
                let (lock, cvar) = &*worker_signal;
                let mut stopped = lock.lock().unwrap();
                while !*stopped {
                    let (guard, wait) = cvar
                        .wait_timeout_while(stopped, interval, |s| !*s)
                        .unwrap();
                    stopped = guard;
                    if *stopped {
                        break;
                    }
                    if wait.timed_out() {
                        drop(stopped);
                        task();
                        stopped = lock.lock().unwrap();
                    }
                }
            })
            .expect("spawn ticker thread");
        Self {
            signal,
            handle: Some(handle),
        }
    }

    /// Stop the worker and wait for it to exit. Idempotent.
    pub fn stop(&mut self) {
        *self.signal.0.lock().unwrap() = true;
        self.signal.1.notify_all();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.stop();
    }
}

// ---------------------------------------------------------------------------
// Snapshot — single-lock capture of everything a session exposes
// ---------------------------------------------------------------------------

/// Point-in-time capture of one session's datasets and derived figures.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedSnapshot {
    pub session_id: String,
    /// The filter key the anomaly/device views were captured under.
    pub sector_filter: String,
    pub window: Vec<TimeBucket>,
    pub anomalies: Vec<AnomalyEvent>,
    pub devices: Vec<DeviceSource>,
    pub activities: Vec<ActivityRecord>,
    pub summary: BudgetSummary,
    pub utilization_rate: f64,
    pub unallocated: f64,
    pub unresolved_anomalies: usize,
    pub online_devices: usize,
    pub last_updated_ms: u64,
    pub refreshing: bool,
    pub tick_count: u64,
}

impl FeedSnapshot {
    /// Serialize to compact JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

// ---------------------------------------------------------------------------
// FeedSession
// ---------------------------------------------------------------------------

/// One independent, in-memory observation session over the simulated feed.
pub struct FeedSession {
    id: String,
    config: FeedConfig,
    clock: Arc<dyn Clock>,
    state: Arc<Mutex<FeedState>>,
    sector_filter: Mutex<String>,
    refreshing: Arc<AtomicBool>,
    stopped: Arc<AtomicBool>,
    refresh_worker: Mutex<Option<JoinHandle<()>>>,
    tickers: Vec<Ticker>,
}

impl FeedSession {
    /// Start a session on the wall clock with an OS-seeded rng.
    pub fn start(config: FeedConfig) -> Self {
        Self::start_with(config, Arc::new(SystemClock), Box::new(StdRng::from_os_rng()))
    }

    /// Start a session with an injected clock and randomness source.
    pub fn start_with(
        config: FeedConfig,
        clock: Arc<dyn Clock>,
        rng: Box<dyn RngCore + Send>,
    ) -> Self {
        let id = Uuid::new_v4().to_string();
        let state = Arc::new(Mutex::new(FeedState::new(
            config.clone(),
            clock.now_ms(),
            rng,
        )));

        let mut tickers = Vec::with_capacity(3);
        {
            let state = Arc::clone(&state);
            let clock = Arc::clone(&clock);
            tickers.push(Ticker::spawn("window", config.tick_interval, move || {
                state.lock().unwrap().window_tick(clock.now_ms());
            }));
        }
        {
            let state = Arc::clone(&state);
            let clock = Arc::clone(&clock);
            tickers.push(Ticker::spawn(
                "activity",
                config.activity_interval,
                move || {
                    state.lock().unwrap().activity_tick(clock.now_ms());
                },
            ));
        }
        {
            let state = Arc::clone(&state);
            tickers.push(Ticker::spawn("summary", config.tick_interval, move || {
                state.lock().unwrap().summary_tick();
            }));
        }

        debug!("feed session {id} started");
        Self {
            id,
            config,
            clock,
            state,
            sector_filter: Mutex::new("all".to_string()),
            refreshing: Arc::new(AtomicBool::new(false)),
            stopped: Arc::new(AtomicBool::new(false)),
            refresh_worker: Mutex::new(None),
            tickers,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    pub fn is_refreshing(&self) -> bool {
        self.refreshing.load(Ordering::Relaxed)
    }

    /// Set the sector filter applied by [`FeedSession::snapshot`].
    pub fn set_sector_filter(&self, filter: &str) {
        *self.sector_filter.lock().unwrap() = filter.to_string();
    }

    pub fn sector_filter(&self) -> String {
        self.sector_filter.lock().unwrap().clone()
    }

    /// Capture everything this session exposes under a single state lock,
    /// filtered by the session's current sector filter.
    pub fn snapshot(&self) -> FeedSnapshot {
        let key = self.sector_filter();
        self.snapshot_filtered(&key)
    }

    /// Capture a snapshot under an explicit filter key, without touching the
    /// session's own filter.
    pub fn snapshot_filtered(&self, key: &str) -> FeedSnapshot {
        let filter = SectorFilter::parse(key);
        let state = self.state.lock().unwrap();
        let summary = state.summary().clone();
        FeedSnapshot {
            session_id: self.id.clone(),
            sector_filter: key.to_string(),
            window: state.window().iter().cloned().collect(),
            anomalies: state.anomalies_for(filter),
            devices: state.devices_for(filter),
            activities: state.activities().to_vec(),
            utilization_rate: summary.utilization_rate(),
            unallocated: summary.unallocated(),
            summary,
            unresolved_anomalies: state.unresolved_anomalies(),
            online_devices: state.online_devices(),
            last_updated_ms: state.last_updated_ms(),
            refreshing: self.refreshing.load(Ordering::Relaxed),
            tick_count: state.tick_count(),
        }
    }

    /// Anomalies passing `key`, read under the lock.
    pub fn anomalies_for(&self, key: &str) -> Vec<AnomalyEvent> {
        self.state
            .lock()
            .unwrap()
            .anomalies_for(SectorFilter::parse(key))
    }

    /// Devices passing `key`, read under the lock.
    pub fn devices_for(&self, key: &str) -> Vec<DeviceSource> {
        self.state
            .lock()
            .unwrap()
            .devices_for(SectorFilter::parse(key))
    }

    pub fn activities(&self) -> Vec<ActivityRecord> {
        self.state.lock().unwrap().activities().to_vec()
    }

    pub fn summary(&self) -> BudgetSummary {
        self.state.lock().unwrap().summary().clone()
    }

    /// Trigger a manual refresh: after the configured delay the window is
    /// rebuilt from scratch. Returns false (and does nothing) when a refresh
    /// is already in flight or the session is stopped.
    pub fn refresh(&self) -> bool {
        if self.stopped.load(Ordering::SeqCst) {
            return false;
        }
        if self.refreshing.swap(true, Ordering::SeqCst) {
            return false;
        }

        let state = Arc::clone(&self.state);
        let clock = Arc::clone(&self.clock);
        let refreshing = Arc::clone(&self.refreshing);
        let stopped = Arc::clone(&self.stopped);
        let delay = self.config.refresh_delay;
        let handle = thread::spawn(move || {
            // Models the round trip a real fetch would take.
            thread::sleep(delay);
            if !stopped.load(Ordering::SeqCst) {
                state.lock().unwrap().regenerate(clock.now_ms());
            }
            refreshing.store(false, Ordering::SeqCst);
        });

        // The previous worker (if any) has already cleared the busy flag, so
        // joining it here is immediate.
        if let Some(prev) = self.refresh_worker.lock().unwrap().replace(handle) {
            let _ = prev.join();
        }
        true
    }

    /// Stop every periodic task and any pending refresh. After this returns,
    /// no further mutation occurs and snapshots are frozen.
    pub fn stop(&mut self) {
        if self.stopped.swap(true, Ordering::SeqCst) {
            return;
        }
        for ticker in &mut self.tickers {
            ticker.stop();
        }
        if let Some(handle) = self.refresh_worker.lock().unwrap().take() {
            let _ = handle.join();
        }
        debug!("feed session {} stopped", self.id);
    }
}

impl Drop for FeedSession {
    fn drop(&mut self) {
        self.stop();
    }
}
