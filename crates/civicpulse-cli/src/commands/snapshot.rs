use std::io;
use std::path::Path;

use civicpulse_core::session::FeedSnapshot;

pub fn run(sector: &str, pretty: bool, output: Option<&str>) {
    let mut session = super::start_session(None, sector);
    let snapshot = session.snapshot();
    session.stop();

    let json = encode(&snapshot, pretty);
    match output {
        Some(path) => {
            if let Err(e) = write_snapshot(Path::new(path), &json) {
                eprintln!("Error: could not write {path}: {e}");
                std::process::exit(1);
            }
            println!("Snapshot written to {path}");
        }
        None => println!("{json}"),
    }
}

fn encode(snapshot: &FeedSnapshot, pretty: bool) -> String {
    let encoded = if pretty {
        snapshot.to_json_pretty()
    } else {
        snapshot.to_json()
    };
    encoded.expect("snapshot serializes")
}

fn write_snapshot(path: &Path, json: &str) -> io::Result<()> {
    std::fs::write(path, json)
}
