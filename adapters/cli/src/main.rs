#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays Hex Defence headless.
//!
//! The game is driven at a fixed tick by a scripted player until it is won,
//! lost, or the tick budget runs out, then the game over summary is printed.

mod autoplay;
mod settings;

use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use hex_defence_session::Session;
use hex_defence_world::query;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use autoplay::Autoplay;
use settings::Settings;

#[derive(Parser, Debug)]
#[command(name = "hex-defence")]
#[command(about = "Plays a headless game of Hex Defence")]
struct Args {
    /// TOML file overriding the stock map, catalog and pacing
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Seed for enemy routes; overrides the settings file
    #[arg(long)]
    seed: Option<u64>,

    /// Number of generated waves; overrides the settings file
    #[arg(long)]
    waves: Option<u32>,

    /// Length of one simulation tick in milliseconds
    #[arg(long, default_value_t = 50, value_parser = clap::value_parser!(u64).range(1..))]
    tick_ms: u64,

    /// Ticks to simulate before giving up
    #[arg(long, default_value_t = 500_000)]
    max_ticks: u64,
}

/// Entry point for the Hex Defence command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let mut settings = match &args.settings {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    settings.seed = args.seed.or(settings.seed);
    settings.waves = args.waves.or(settings.waves);

    let config = settings.into_config()?;
    let mut session = Session::new(config).context("settings describe an unplayable game")?;
    println!("{}", query::welcome_banner(session.world()));

    let dt = Duration::from_millis(args.tick_ms);
    let mut autoplay = Autoplay::new(&session);
    let mut ticks = 0;
    while ticks < args.max_ticks && session.outcome().is_none() {
        autoplay.act(&mut session);
        session.tick(dt);
        ticks += 1;
    }

    match session.summary() {
        Some(summary) => {
            info!(ticks, outcome = ?summary.outcome, "game finished");
            println!("{}", summary.headline());
            println!("{summary}");
        }
        None => {
            let status = session.wave_status();
            warn!(ticks, "tick budget exhausted");
            println!("Tick budget exhausted.");
            println!("Waves survived: {}/{}", status.current, status.total);
            println!("Money left: {}", session.money());
            println!("Lives left: {}", session.lives());
        }
    }
    Ok(())
}
