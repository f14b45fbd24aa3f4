//! Strand CLI — simulation, benchmarking, and debugging.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod scene;

#[derive(Parser)]
#[command(name = "strand")]
#[command(version, about = "Strand — position-based cable simulator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a simulation from a scene file.
    Simulate {
        /// Path to scene config (TOML).
        #[arg(short, long, default_value = "scene.toml")]
        config: String,

        /// Run on the background scheduler for this many wall-clock seconds.
        #[arg(long, conflicts_with_all = ["ticks", "dt"])]
        seconds: Option<f64>,

        /// Number of fixed ticks to run deterministically.
        #[arg(long, default_value_t = 100)]
        ticks: u64,

        /// Step size for deterministic ticks (seconds).
        #[arg(long, default_value_t = 0.02)]
        dt: f32,

        /// Write a binary snapshot of the final state.
        #[arg(long)]
        snapshot: Option<String>,
    },

    /// Run benchmark suite.
    Benchmark {
        /// Which scenario to run (hanging_cable, sphere_drape, box_drape, bridge, all).
        #[arg(short, long, default_value = "all")]
        scenario: String,

        /// Output CSV file path.
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Inspect a state snapshot file.
    Inspect {
        /// Path to snapshot file.
        path: String,
    },

    /// Validate a scene file.
    Validate {
        /// Path to scene file (TOML).
        path: String,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Simulate { config, seconds, ticks, dt, snapshot } => {
            let run = match seconds {
                Some(seconds) => commands::RunLength::WallClock(seconds),
                None => commands::RunLength::Ticks { count: ticks, dt },
            };
            commands::simulate(&config, run, snapshot.as_deref())
        }
        Commands::Benchmark { scenario, output } => commands::benchmark(&scenario, output.as_deref()),
        Commands::Inspect { path } => commands::inspect(&path),
        Commands::Validate { path } => commands::validate(&path),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
