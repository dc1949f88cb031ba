use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use civicpulse_core::{format_inr, hour_label};

pub fn run(interval: f64, sector: &str, ticks: u64) {
    let session = super::start_session(Some(interval), sector);

    let running = Arc::new(AtomicBool::new(true));
    {
        let running = Arc::clone(&running);
        let _ = ctrlc::set_handler(move || {
            running.store(false, Ordering::SeqCst);
        });
    }

    println!("Civicpulse feed — session {}", session.id());
    println!("Sector filter: {sector} | tick every {interval}s | Ctrl-C to stop");
    println!();

    let sleep_step = Duration::from_secs_f64((interval / 4.0).clamp(0.05, 1.0));
    let mut last_printed = u64::MAX;
    let mut session = session;

    while running.load(Ordering::SeqCst) {
        thread::sleep(sleep_step);
        let snapshot = session.snapshot();
        if snapshot.tick_count == last_printed {
            continue;
        }
        last_printed = snapshot.tick_count;

        println!(
            "[{}] tick {:>3} | allocated {} ({:.1}%) | efficiency {:>5.1} | {} anomalies active | {}/{} devices online{}",
            hour_label(snapshot.last_updated_ms),
            snapshot.tick_count,
            format_inr(snapshot.summary.allocated_budget),
            snapshot.utilization_rate,
            snapshot.summary.efficiency_score,
            snapshot.unresolved_anomalies,
            snapshot.online_devices,
            snapshot.devices.len(),
            if snapshot.refreshing { " | refreshing" } else { "" },
        );

        if ticks > 0 && snapshot.tick_count >= ticks {
            break;
        }
    }

    session.stop();
    println!();
    println!("Feed stopped.");
}
