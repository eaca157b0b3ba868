use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::constants::{DEFAULT_RENDER_FPS, DEFAULT_TICK_MS, DEFAULT_WIN_SCORE};
use crate::error::{Error, Result};
use crate::game::Rules;
use crate::level::MazeOptions;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Terminal maze chase", long_about = None)]
pub struct Config {
    /// Milliseconds per simulation tick
    #[arg(long, env = "MAZE_CHASE_TICK_MS", default_value_t = DEFAULT_TICK_MS)]
    pub tick_ms: u64,

    /// Redraws per second between ticks
    #[arg(long, env = "MAZE_CHASE_FPS", default_value_t = DEFAULT_RENDER_FPS)]
    pub fps: u64,

    /// Level to start on
    #[arg(long, default_value_t = 1)]
    pub level: u32,

    /// Score that completes a level early
    #[arg(long, env = "MAZE_CHASE_WIN_SCORE", default_value_t = DEFAULT_WIN_SCORE)]
    pub win_score: u32,

    /// Seed for maze generation and random steps
    #[arg(long, env = "MAZE_CHASE_SEED")]
    pub seed: Option<u64>,

    /// Keep unreachable pockets instead of carving them open
    #[arg(long, default_value_t = false)]
    pub no_repair: bool,

    /// Write tracing output to this file (filtered by RUST_LOG)
    #[arg(long, env = "MAZE_CHASE_LOG")]
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick_ms: DEFAULT_TICK_MS,
            fps: DEFAULT_RENDER_FPS,
            level: 1,
            win_score: DEFAULT_WIN_SCORE,
            seed: None,
            no_repair: false,
            log_file: None,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.tick_ms == 0 {
            return Err(Error::InvalidConfig("tick-ms must be positive".into()));
        }
        if self.fps == 0 {
            return Err(Error::InvalidConfig("fps must be positive".into()));
        }
        if self.level == 0 {
            return Err(Error::InvalidConfig("levels start at 1".into()));
        }
        if self.win_score == 0 {
            return Err(Error::InvalidConfig("win-score must be positive".into()));
        }
        Ok(())
    }

    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub fn frame_time(&self) -> Duration {
        Duration::from_micros(1_000_000 / self.fps.max(1))
    }

    pub fn rules(&self) -> Rules {
        Rules {
            win_score: self.win_score,
            maze: MazeOptions {
                repair: !self.no_repair,
                ..MazeOptions::default()
            },
            ..Rules::default()
        }
    }
}
