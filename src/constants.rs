pub const SCREEN_WIDTH: i32 = 640;
pub const SCREEN_HEIGHT: i32 = 480;
pub const TILE_SIZE: i32 = 40;
pub const ROWS: usize = (SCREEN_HEIGHT / TILE_SIZE) as usize;
pub const COLS: usize = (SCREEN_WIDTH / TILE_SIZE) as usize;

pub const POINT_SCORE: u32 = 1;
pub const BONUS_SCORE: u32 = 100;
pub const POWER_SCORE: u32 = 0;
pub const PURSUER_KILL_SCORE: u32 = 200;

pub const BONUS_COUNT: usize = 3;
pub const POWER_COUNT: usize = 2;

/// Ticks of empowerment granted by a power-up.
pub const POWER_TICKS: u32 = 420;
/// Remaining ticks at which the player starts blinking.
pub const BLINK_TICKS: u32 = 120;
/// Blink half-period in ticks.
pub const BLINK_PERIOD: u32 = 5;

pub const DEFAULT_TICK_MS: u64 = 100;
pub const DEFAULT_RENDER_FPS: u64 = 60;
pub const DEFAULT_WIN_SCORE: u32 = 1000;

pub const MIN_SCATTER_FACTOR: u32 = 2;
pub const BASE_SCATTER_FACTOR: u32 = 20;
pub const SCATTER_PER_LEVEL: u32 = 5;
