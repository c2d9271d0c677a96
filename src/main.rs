//! Physics Demos headless runner
//!
//! Lists the phenomenon catalogue or drives one variant for a fixed number of
//! frames and prints the resulting snapshot.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use physics_demos::sim::{Simulate, construct};
use physics_demos::{KernelError, PhenomenonKind, Result, Settings, SimulationClock};

#[derive(Debug, Parser)]
#[command(name = "physics-demos", version, about = "Run physics demo simulations headless")]
struct Cli {
    /// Settings file (JSON)
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print every phenomenon with its parameter table
    List,
    /// Step one phenomenon and print its final state
    Run {
        /// Phenomenon id, e.g. `double-pendulum`
        id: String,
        /// Frames to simulate
        #[arg(long, default_value_t = 600)]
        frames: u32,
        /// Frame delta in seconds
        #[arg(long, default_value_t = 1.0 / 60.0)]
        dt: f64,
        /// Parameter edit applied before the first frame (repeatable)
        #[arg(long = "set", value_name = "NAME=VALUE")]
        assignments: Vec<String>,
        /// Dump the whole snapshot as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Split `name=value`
fn parse_assignment(raw: &str) -> Result<(&str, f64)> {
    let invalid = || KernelError::InvalidParameterAssignment(raw.to_string());
    let (name, value) = raw.split_once('=').ok_or_else(invalid)?;
    let value = value.trim().parse::<f64>().map_err(|_| invalid())?;
    Ok((name.trim(), value))
}

/// Catalogue with each phenomenon's parameter table
fn listing() -> String {
    let mut out = String::new();
    for kind in PhenomenonKind::ALL {
        out.push_str(&format!("{} ({})\n", kind.id(), kind.display_name()));
        for spec in kind.specs() {
            let tag = if spec.integer { " int" } else { "" };
            out.push_str(&format!(
                "  {:<16} [{}, {}] default {}{}\n",
                spec.name, spec.min, spec.max, spec.default, tag
            ));
        }
    }
    out
}

fn run(
    settings: &Settings,
    id: &str,
    frames: u32,
    dt: f64,
    assignments: &[String],
    json: bool,
) -> Result<()> {
    let mut sim = construct(id, settings)?;
    for raw in assignments {
        let (name, value) = parse_assignment(raw)?;
        sim.update_parameter(name, value);
    }

    let mut clock = SimulationClock::from_settings(settings);
    for _ in 0..frames {
        clock.step(&mut sim, dt);
    }
    log::info!(
        "{}: {} ticks, {:.3}s simulated",
        sim.id(),
        clock.ticks(),
        clock.elapsed()
    );

    let snapshot = sim.sample();
    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        println!("{} after {:.3}s", sim.kind().display_name(), clock.elapsed());
        for readout in &snapshot.readouts {
            println!("  {:<16} {:.6}", readout.name, readout.value);
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let settings = match &cli.settings {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };

    match cli.command {
        Command::List => print!("{}", listing()),
        Command::Run {
            id,
            frames,
            dt,
            assignments,
            json,
        } => run(&settings, &id, frames, dt, &assignments, json)?,
    }
    Ok(())
}
