//! Console front end for the ecosystem simulation.

mod renderer;
mod telemetry;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use eco_core::{PathfindingKind, SimulationConfig};
use eco_world::{scenario, Simulation, Status, StatusHandle};
use renderer::ConsoleRenderer;
use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::signal;
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Config files tried in order when `--config` is not given
const DEFAULT_CONFIG_PATHS: [&str; 2] = ["config.toml", "config.example.toml"];

#[derive(Parser, Debug)]
#[command(name = "eco-sim", author, version, about, long_about = None)]
struct Args {
    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Override the pathfinding strategy
    #[arg(long, value_enum)]
    strategy: Option<Strategy>,

    /// Run this many ticks without rendering and print a JSON summary
    #[arg(short, long)]
    ticks: Option<u64>,

    /// Override the delay between rendered ticks
    #[arg(long)]
    pacing_ms: Option<u64>,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Strategy {
    Bfs,
    Astar,
}

impl From<Strategy> for PathfindingKind {
    fn from(strategy: Strategy) -> Self {
        match strategy {
            Strategy::Bfs => PathfindingKind::Bfs,
            Strategy::Astar => PathfindingKind::Astar,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    telemetry::init_telemetry(args.json_logs)?;

    let config = load_config(&args)?;
    info!(
        seed = config.seed,
        width = config.world.width,
        height = config.world.height,
        pathfinding = ?config.pathfinding,
        "Configuration loaded"
    );

    let mut sim = scenario::build(&config).context("Failed to build simulation")?;

    if let Some(ticks) = args.ticks {
        let summary = sim.run(ticks)?;
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    run_interactive(sim, &config).await
}

fn load_config(args: &Args) -> Result<SimulationConfig> {
    let mut config = match &args.config {
        Some(path) => SimulationConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => match DEFAULT_CONFIG_PATHS
            .iter()
            .map(Path::new)
            .find(|path| path.exists())
        {
            Some(path) => SimulationConfig::load(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => {
                info!("No config file found, using defaults");
                SimulationConfig::default()
            }
        },
    };

    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(strategy) = args.strategy {
        config.pathfinding = strategy.into();
    }
    if let Some(pacing_ms) = args.pacing_ms {
        config.pacing_ms = pacing_ms;
    }

    config.validate()?;
    Ok(config)
}

/// Run the render loop on a blocking thread while stdin and ctrl-c drive
/// the shared status.
async fn run_interactive(mut sim: Simulation, config: &SimulationConfig) -> Result<()> {
    let status = StatusHandle::new(Status::Simulate);
    let pacing = Duration::from_millis(config.pacing_ms);
    let icons = config.icon.clone();

    let driver_status = status.clone();
    let mut driver = tokio::task::spawn_blocking(move || {
        let mut renderer = ConsoleRenderer::new(std::io::stdout(), icons);
        sim.start(&mut renderer, &driver_status, pacing)
    });

    // Blocking stdin reads live on a detached thread so shutdown never waits on them
    let (command_tx, mut commands) = mpsc::unbounded_channel();
    std::thread::Builder::new()
        .name("stdin-commands".to_string())
        .spawn(move || forward_commands(std::io::stdin().lock(), &command_tx))
        .context("Failed to spawn stdin reader")?;
    let mut commands_open = true;

    loop {
        tokio::select! {
            result = &mut driver => {
                result.context("Simulation thread panicked")??;
                return Ok(());
            }
            command = commands.recv(), if commands_open => {
                match command {
                    Some(next) => {
                        info!(status = ?next, "Status changed");
                        status.set(next);
                    }
                    None => commands_open = false,
                }
            }
            _ = signal::ctrl_c() => {
                info!("Interrupted, stopping simulation");
                status.set(Status::Quit);
            }
        }
    }
}

/// Forward console commands until quit, end of input or a closed receiver
fn forward_commands<R: BufRead>(reader: R, commands: &mpsc::UnboundedSender<Status>) {
    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                warn!(error = %e, "Failed to read command");
                return;
            }
        };

        match Status::from_command(&line) {
            Some(next) => {
                if commands.send(next).is_err() || next == Status::Quit {
                    return;
                }
            }
            None => warn!(command = %line.trim(), "Unknown command"),
        }
    }
}
