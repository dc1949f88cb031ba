//! # civicpulse-core
//!
//! **A civic budget dashboard needs live-looking data before it has live data.**
//!
//! `civicpulse-core` is a simulated budget telemetry feed: it seeds and
//! continuously evolves bounded, time-windowed datasets for six fixed budget
//! sectors — a rolling 24-hour spending window, a capped anomaly list, a
//! fixed fleet of five telemetry devices, a capped activity log, and a
//! clamped budget summary. Values are synthesized locally from an injected
//! randomness source; nothing here talks to a network.
//!
//! ## Quick Start
//!
//! ```no_run
//! use civicpulse_core::{FeedConfig, FeedSession};
//!
//! // Start a session: seeds the datasets and begins ticking.
//! let mut session = FeedSession::start(FeedConfig::default());
//!
//! // Capture everything the session exposes under one lock.
//! let snapshot = session.snapshot();
//! assert_eq!(snapshot.window.len(), 24);
//! println!("{} devices online", snapshot.online_devices);
//!
//! // Stop deterministically: no tick fires after this returns.
//! session.stop();
//! ```
//!
//! ## Architecture
//!
//! Engine (window + lists + summary) → Session (cancellable tickers) → Snapshot
//!
//! The engine ([`feed::FeedState`]) is purely reactive: it mutates only when
//! a tick operation is called, with all randomness drawn from an injected
//! [`rand::RngCore`] and all timestamps passed in from an injected
//! [`clock::Clock`]. The session ([`session::FeedSession`]) owns the timers:
//! three independent periodic tasks on a cancellable [`session::Ticker`]
//! abstraction, plus a busy-flag-guarded manual refresh that models a network
//! round trip with a fixed delay. Every session is an independent copy; there
//! are no process-wide singletons and nothing is persisted.

pub mod activity;
pub mod anomaly;
pub mod clock;
pub mod device;
pub mod feed;
pub mod sector;
pub mod session;
pub mod summary;
pub mod window;

pub use activity::{ActivityRecord, MAX_ACTIVITIES, format_relative};
pub use anomaly::{AnomalyEvent, AnomalyStatus, MAX_ANOMALIES, Severity};
pub use clock::{Clock, ManualClock, SystemClock};
pub use device::{DeviceSource, DeviceStatus, FLEET_SIZE};
pub use feed::{FeedConfig, FeedState};
pub use sector::{Sector, SectorFilter};
pub use session::{FeedSession, FeedSnapshot, Ticker};
pub use summary::{BudgetSummary, format_inr};
pub use window::{TimeBucket, WINDOW_LEN, advance_window, generate_window, hour_label};

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
