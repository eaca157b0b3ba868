mod render;

use std::fs::File;
use std::io::{self, Stdout};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::cursor::{Hide, Show};
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use maze_chase::config::Config;
use maze_chase::game::{Driver, Summary};

use crate::render::Terminal;

fn main() -> Result<()> {
    let config = Config::parse();
    config.validate()?;
    init_logging(&config)?;

    let rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut stdout = io::stdout();
    terminal::enable_raw_mode().context("failed to enable raw mode")?;
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(Hide)?;
    stdout.execute(EnableMouseCapture)?;

    let result = run(&mut stdout, &config, rng);

    stdout.execute(DisableMouseCapture)?;
    stdout.execute(Show)?;
    stdout.execute(LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;

    let summary = result?;
    println!(
        "Reached level {} with score {} ({} cleared, {} caught)",
        summary.level, summary.score, summary.levels_cleared, summary.deaths
    );
    Ok(())
}

fn run(stdout: &mut Stdout, config: &Config, rng: StdRng) -> Result<Summary> {
    info!(seed = ?config.seed, level = config.level, "starting run");
    let mut frontend = Terminal::new(stdout, config);
    let mut driver = Driver::new(config.rules(), rng, config.level);
    let summary = driver.run(&mut frontend)?;
    info!(?summary, "run finished");
    Ok(summary)
}

fn init_logging(config: &Config) -> Result<()> {
    let Some(path) = &config.log_file else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}
