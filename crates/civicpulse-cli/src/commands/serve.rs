use civicpulse_core::{FeedConfig, FeedSession};

pub fn run(host: &str, port: u16) {
    let session = FeedSession::start(FeedConfig::default());

    let base = format!("http://{host}:{port}");
    println!("Civicpulse Server v{}", civicpulse_core::VERSION);
    println!("   {base}");
    println!("   session {}", session.id());
    println!();
    println!("   Endpoints:");
    println!("     GET  /                 API index (try: curl {base})");
    println!("     GET  /snapshot         Full feed snapshot");
    println!("     GET  /window           Rolling 24-hour spending window");
    println!("     GET  /anomalies        Anomaly events, newest first");
    println!("     GET  /devices          Telemetry device fleet");
    println!("     GET  /activity         Activity log, newest first");
    println!("     GET  /summary          Budget summary with derived figures");
    println!("     GET  /health           Session health check");
    println!("     POST /refresh          Trigger a manual window refresh");
    println!();
    println!("   Query params for /snapshot, /anomalies, /devices:");
    println!("     sector=all|<name>     Case-insensitive; unknown names match nothing");
    println!();
    println!("   Examples:");
    println!("     curl {base}/devices?sector=environment");
    println!("     curl {base}/summary");
    println!("     curl -X POST {base}/refresh");
    println!();

    let rt = tokio::runtime::Runtime::new().unwrap();
    rt.block_on(civicpulse_server::run_server(session, host, port));
}
