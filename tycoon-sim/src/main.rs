//! Tycoon simulator
//!
//! Builds a tycoon from a scene file, claims it for an actor, applies a
//! lock/unlock script and prints the resulting record as JSON.
//!
//! Usage:
//!   tycoon-sim --scene plot.toml --unlock Dropper --lock Conveyor

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;
use tycoon_engine::{ActorId, EngineConfig, ItemId};
use tycoon_sim::{Run, SceneFile, Script, load_record, run};

#[derive(Parser, Debug)]
#[command(name = "tycoon-sim")]
#[command(about = "Build a tycoon from a scene file and drive a lock script")]
struct Args {
    /// Scene description (TOML)
    #[arg(short, long)]
    scene: PathBuf,

    /// Engine configuration (TOML); defaults apply when absent
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Owner to claim with; a fresh id is generated when omitted
    #[arg(short, long)]
    actor: Option<ActorId>,

    /// Saved record (JSON) to claim with
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Item to unlock after claiming (repeatable)
    #[arg(long)]
    unlock: Vec<ItemId>,

    /// Item to lock after unlocking (repeatable)
    #[arg(long)]
    lock: Vec<ItemId>,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let scene = SceneFile::load(&args.scene)?;
    let config = args
        .config
        .as_ref()
        .map(EngineConfig::load_from)
        .unwrap_or_default();
    let saved = args.data.as_ref().map(load_record).transpose()?;
    let actor = args.actor.unwrap_or_default();
    info!(scene = %args.scene.display(), %actor, "Tycoon simulator starting");

    let record = run(&Run {
        scene,
        config,
        actor,
        saved,
        script: Script {
            unlock: args.unlock,
            lock: args.lock,
        },
    })?;

    let json = serde_json::to_string_pretty(&record).context("Failed to encode record")?;
    println!("{json}");
    Ok(())
}
