//! Skirmish Headless Simulation Harness
//!
//! Generates a population, round-trips it through a text snapshot, then runs
//! the threaded skirmish and prints the field each tick.
//!
//! Usage:
//!   cargo run -p skirmish-simtest -- npcs.txt
//!   cargo run -p skirmish-simtest -- npcs.txt --seed 7 --duration 5 --quiet

mod render;

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use skirmish_core::prelude::*;
use tracing::info;

use crate::render::render_field;

// ── Command line ────────────────────────────────────────────────────────

#[derive(Debug, Parser)]
#[command(name = "skirmish-simtest", about = "Run a headless NPC skirmish")]
struct Args {
    /// Snapshot file written after generation and read back before the run.
    snapshot: PathBuf,

    /// JSON config file; flags below override its fields.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    seed: Option<u64>,

    /// Number of NPCs to generate.
    #[arg(long)]
    population: Option<usize>,

    /// Running time in seconds.
    #[arg(long)]
    duration: Option<f64>,

    /// Kill log path.
    #[arg(long)]
    log: Option<PathBuf>,

    /// No field frames and no kill echo on the console.
    #[arg(long)]
    quiet: bool,
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    let config = build_config(&args)?;
    println!("=== Skirmish Simulation Harness ===\n");

    // 1. Generate and save
    let mut generated = simulation(&config, args.quiet)?;
    generated.generate()?;
    let file = File::create(&args.snapshot)
        .with_context(|| format!("creating snapshot {}", args.snapshot.display()))?;
    generated.save_snapshot(file)?;
    info!(path = %args.snapshot.display(), "snapshot written");

    // 2. Load into a fresh simulation
    let mut sim = simulation(&config, args.quiet)?;
    let file = File::open(&args.snapshot)
        .with_context(|| format!("opening snapshot {}", args.snapshot.display()))?;
    let loaded = sim.load_snapshot(BufReader::new(file))?;
    info!(loaded, "snapshot loaded");

    println!("--- Starting list ---");
    for npc in sim.population().iter() {
        println!("{npc}");
    }
    println!();

    // 3. Run
    let bounds = config.bounds();
    let quiet = args.quiet;
    let report = sim.run_with(|population| {
        if !quiet {
            println!("{}", render_field(population, bounds));
        }
    })?;

    // ── Summary ──
    print_statistics(&report);
    println!("--- Survivors ---");
    for kind in NpcKind::ALL {
        for npc in sim.population().alive().filter(|n| n.kind() == kind) {
            println!("  {npc}");
        }
    }
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn build_config(args: &Args) -> Result<SimConfig> {
    let mut config = match &args.config {
        Some(path) => SimConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SimConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.rng_seed = Some(seed);
    }
    if let Some(population) = args.population {
        config.population = population;
    }
    if let Some(duration) = args.duration {
        config.duration_secs = duration;
    }
    if let Some(log) = &args.log {
        config.log_path = log.clone();
    }
    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn simulation(config: &SimConfig, quiet: bool) -> Result<Simulation> {
    let observer = TextObserver::open(&config.log_path).with_console_echo(!quiet);
    Ok(Simulation::with_observer(config.clone(), Arc::new(observer))?)
}

fn print_statistics(report: &RunReport) {
    println!("--- Statistics ---");
    println!("{:<14}{:>8}{:>8}", "", "Before", "After");
    for kind in NpcKind::ALL {
        println!(
            "{:<14}{:>8}{:>8}",
            kind.name(),
            report.before.of_kind(kind),
            report.after.of_kind(kind)
        );
    }
    println!("{:<14}{:>8}{:>8}", "Dead", report.before.dead, report.after.dead);
    println!(
        "{:<14}{:>8}{:>8}",
        "Alive",
        report.before.alive(),
        report.after.alive()
    );
    println!(
        "\nticks: {}, fights queued: {}, resolved: {}, kills: {}, unprocessed: {}",
        report.ticks,
        report.events_queued,
        report.fights_resolved,
        report.kills,
        report.events_unprocessed
    );
}
