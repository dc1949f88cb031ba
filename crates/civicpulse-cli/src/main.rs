//! CLI for civicpulse — simulated civic budget telemetry feed.

mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "civicpulse")]
#[command(about = "civicpulse — simulated civic budget telemetry feed")]
#[command(version = civicpulse_core::VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the sector catalog with per-hour magnitude bands
    Sectors,

    /// Capture one feed snapshot and print it as JSON
    Snapshot {
        /// Sector filter: "all" or a sector name (unknown names match nothing)
        #[arg(long, default_value = "all")]
        sector: String,

        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,

        /// Write the snapshot to a file instead of stdout
        #[arg(long)]
        output: Option<String>,
    },

    /// Run a live session and print one status line per tick interval
    Watch {
        /// Seconds between window ticks
        #[arg(long, default_value = "5.0")]
        interval: f64,

        /// Sector filter for the anomaly/device counts
        #[arg(long, default_value = "all")]
        sector: String,

        /// Stop after N ticks (0 = run until Ctrl-C)
        #[arg(long, default_value = "0")]
        ticks: u64,
    },

    /// Serve the feed over HTTP
    Serve {
        /// Bind host
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Bind port
        #[arg(long, default_value = "8077")]
        port: u16,
    },
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Sectors => commands::sectors::run(),
        Commands::Snapshot {
            sector,
            pretty,
            output,
        } => commands::snapshot::run(&sector, pretty, output.as_deref()),
        Commands::Watch {
            interval,
            sector,
            ticks,
        } => commands::watch::run(interval, &sector, ticks),
        Commands::Serve { host, port } => commands::serve::run(&host, port),
    }
}
