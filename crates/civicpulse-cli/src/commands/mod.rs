pub mod sectors;
pub mod serve;
pub mod snapshot;
pub mod watch;

use std::time::Duration;

use civicpulse_core::{FeedConfig, FeedSession};

/// Start a session with the default config, optionally overriding the window
/// tick cadence, and apply the requested sector filter.
pub fn start_session(interval_secs: Option<f64>, sector: &str) -> FeedSession {
    let mut config = FeedConfig::default();
    if let Some(secs) = interval_secs {
        config.tick_interval = Duration::from_secs_f64(secs.max(0.1));
    }
    let session = FeedSession::start(config);
    session.set_sector_filter(sector);
    session
}
