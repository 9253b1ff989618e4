//! Tenebris entry point
//!
//! Runs the game headlessly with the autopilot at the controls and prints a
//! JSON summary of the run.

use std::path::PathBuf;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use anyhow::{Context, bail};
use clap::Parser;

use tenebris::app::{FixedTimestep, Game};
use tenebris::input::{InputSource, ScriptedInput};
use tenebris::save::{Difficulty, MAX_LEVEL};
use tenebris::view::CountingRenderer;
use tenebris::Settings;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// RNG seed (defaults to the settings seed, then the clock)
    #[arg(long)]
    seed: Option<u64>,
    /// Stop after this many ticks (default: 30 minutes of play)
    #[arg(long, default_value_t = 30 * 60 * 30)]
    ticks: u64,
    /// Start a new game at this difficulty (normal, champion, heartless)
    /// instead of using the main menu
    #[arg(long, value_parser = parse_difficulty)]
    difficulty: Option<Difficulty>,
    /// Level to start the new game at
    #[arg(long)]
    level: Option<u32>,
    /// Settings file (JSON)
    #[arg(long)]
    settings: Option<PathBuf>,
    /// Save directory, overrides the settings file
    #[arg(long)]
    save_dir: Option<PathBuf>,
    /// Pace ticks at the configured rate instead of running flat out
    #[arg(long)]
    realtime: bool,
    /// Write the final arena state as JSON to this file
    #[arg(long)]
    snapshot_out: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let mut settings = Settings::load_or_default(cli.settings.as_deref());
    if let Some(dir) = cli.save_dir {
        settings.save_dir = dir;
    }
    let seed = cli.seed.or(settings.seed).unwrap_or_else(clock_seed);
    let tick_rate = settings.tick_rate_hz;
    log::info!("Tenebris starting (seed {}, {} Hz)", seed, tick_rate);

    let mut game = Game::new(settings, seed).context("failed to open save directory")?;

    if cli.difficulty.is_some() || cli.level.is_some() {
        let difficulty = cli.difficulty.unwrap_or_default();
        let level = cli.level.unwrap_or(1);
        if !(1..=MAX_LEVEL).contains(&level) {
            bail!("level must be between 1 and {MAX_LEVEL}");
        }
        game.start_new_game(difficulty, level)?;
    }

    let mut input = ScriptedInput::autopilot();
    let mut renderer = CountingRenderer::default();

    let summary = if cli.realtime {
        let mut timestep = FixedTimestep::new(tick_rate);
        let mut last = Instant::now();
        'run: while game.is_running() {
            let now = Instant::now();
            for _ in 0..timestep.advance(now - last) {
                if game.ticks() >= cli.ticks {
                    break 'run;
                }
                let tick_input = input.poll();
                game.step(&tick_input, &mut renderer)?;
            }
            last = now;
            std::thread::sleep(timestep.step() / 2);
        }
        game.summary()
    } else {
        game.run(&mut input, &mut renderer, Some(cli.ticks))?
    };

    log::info!(
        "Run finished after {} ticks ({} sprites drawn)",
        summary.ticks,
        renderer.sprites
    );
    if let Some(path) = &cli.snapshot_out {
        match game.snapshot() {
            Some(snapshot) => {
                let json = serde_json::to_string_pretty(&snapshot)?;
                std::fs::write(path, json)
                    .with_context(|| format!("failed to write {}", path.display()))?;
                log::info!("Arena snapshot written to {}", path.display());
            }
            None => log::warn!("No level in progress, snapshot not written"),
        }
    }
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn parse_difficulty(name: &str) -> Result<Difficulty, String> {
    Difficulty::from_name(name)
        .ok_or_else(|| format!("unknown difficulty {name:?} (normal, champion, heartless)"))
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}
