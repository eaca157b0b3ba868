use std::collections::VecDeque;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::components::{Direction, PickupKind};
use crate::constants::{
    BASE_SCATTER_FACTOR, BONUS_COUNT, COLS, MIN_SCATTER_FACTOR, POWER_COUNT, ROWS,
    SCATTER_PER_LEVEL, TILE_SIZE,
};
use crate::error::Result;
use crate::ghost;
use crate::grid::{Cell, Grid, Rect, Tile};
use crate::player;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pickup {
    pub cell: Cell,
    pub kind: PickupKind,
}

impl Pickup {
    /// Small rectangle inset a quarter tile into its cell.
    pub fn rect(&self) -> Rect {
        let origin = self.cell.rect();
        Rect::new(
            origin.x + TILE_SIZE / 4,
            origin.y + TILE_SIZE / 4,
            TILE_SIZE / 3,
            TILE_SIZE / 3,
        )
    }
}

#[derive(Debug, Clone)]
pub struct MazeOptions {
    pub rows: usize,
    pub cols: usize,
    /// Root of the connectivity repair; never hosts a bonus or power-up.
    pub player_spawn: Cell,
    /// Cells forced back to floor after scattering.
    pub keep_clear: Vec<Cell>,
    pub bonus_count: usize,
    pub power_count: usize,
    pub repair: bool,
}

impl Default for MazeOptions {
    fn default() -> Self {
        let player_spawn = player::SPAWN;
        let mut keep_clear = vec![player_spawn];
        keep_clear.extend(ghost::roster().iter().map(|spec| spec.spawn));
        Self {
            rows: ROWS,
            cols: COLS,
            player_spawn,
            keep_clear,
            bonus_count: BONUS_COUNT,
            power_count: POWER_COUNT,
            repair: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Maze {
    pub grid: Grid,
    pub pickups: Vec<Pickup>,
}

/// Odds denominator for placing a wall segment; lower is denser.
pub fn scatter_factor(level: u32) -> u32 {
    BASE_SCATTER_FACTOR
        .saturating_sub(level.saturating_mul(SCATTER_PER_LEVEL))
        .max(MIN_SCATTER_FACTOR)
}

pub fn generate(level: u32, options: &MazeOptions, rng: &mut impl Rng) -> Result<Maze> {
    let mut grid = Grid::bordered(options.rows, options.cols)?;
    scatter_walls(&mut grid, scatter_factor(level), rng);

    for &cell in &options.keep_clear {
        if grid.in_bounds(cell) && !grid.is_border(cell) {
            grid.set(cell, Tile::Floor);
        }
    }

    if options.repair && grid.is_walkable(options.player_spawn) {
        let carved = ensure_connected(&mut grid, options.player_spawn);
        if carved > 0 {
            debug!(level, carved, "carved walls to reconnect maze");
        }
    }

    let pickups = place_pickups(&grid, options, rng);
    Ok(Maze { grid, pickups })
}

fn scatter_walls(grid: &mut Grid, factor: u32, rng: &mut impl Rng) {
    let rows = grid.rows();
    let cols = grid.cols();
    for row in (2..rows.saturating_sub(2)).step_by(2) {
        for col in (2..cols.saturating_sub(2)).step_by(2) {
            if rng.gen_range(1..=factor) != 1 {
                continue;
            }
            grid.set(Cell::new(row, col), Tile::Wall);
            let vertical = rng.gen_bool(0.5);
            let side: isize = if rng.gen_bool(0.5) { -1 } else { 1 };
            let extra = if vertical {
                Cell::new(row.saturating_add_signed(side), col)
            } else {
                Cell::new(row, col.saturating_add_signed(side))
            };
            grid.set(extra, Tile::Wall);
        }
    }
}

/// Carves interior walls until every floor cell is reachable from `root`.
/// Returns the number of walls removed.
fn ensure_connected(grid: &mut Grid, root: Cell) -> usize {
    let mut carved = 0;
    loop {
        let reachable = flood(grid, root);
        let Some(tunnel) = shortest_tunnel(grid, &reachable) else {
            return carved;
        };
        for cell in tunnel {
            grid.set(cell, Tile::Floor);
            carved += 1;
        }
    }
}

fn flood(grid: &Grid, root: Cell) -> Vec<Vec<bool>> {
    let mut seen = vec![vec![false; grid.cols()]; grid.rows()];
    let mut queue = VecDeque::new();
    seen[root.row][root.col] = true;
    queue.push_back(root);
    while let Some(cell) = queue.pop_front() {
        for next in grid.neighbors(cell) {
            if !seen[next.row][next.col] {
                seen[next.row][next.col] = true;
                queue.push_back(next);
            }
        }
    }
    seen
}

/// Fewest interior walls separating the reachable region from a stranded
/// floor cell, or `None` when nothing is stranded.
fn shortest_tunnel(grid: &Grid, reachable: &[Vec<bool>]) -> Option<Vec<Cell>> {
    let stranded = |c: Cell| grid.is_walkable(c) && !reachable[c.row][c.col];
    if !grid.walkable_cells().into_iter().any(stranded) {
        return None;
    }

    let mut parent: Vec<Vec<Option<Cell>>> = vec![vec![None; grid.cols()]; grid.rows()];
    let mut seen = reachable.to_vec();
    let mut queue: VecDeque<Cell> = grid
        .walkable_cells()
        .into_iter()
        .filter(|c| reachable[c.row][c.col])
        .collect();

    while let Some(cell) = queue.pop_front() {
        for dir in Direction::ALL {
            let Some(next) = cell.offset(dir) else {
                continue;
            };
            if !grid.in_bounds(next) || grid.is_border(next) || seen[next.row][next.col] {
                continue;
            }
            seen[next.row][next.col] = true;
            parent[next.row][next.col] = Some(cell);
            if stranded(next) {
                let mut tunnel = Vec::new();
                let mut at = cell;
                while !grid.is_walkable(at) {
                    tunnel.push(at);
                    match parent[at.row][at.col] {
                        Some(prev) => at = prev,
                        None => break,
                    }
                }
                return Some(tunnel);
            }
            if !grid.is_walkable(next) {
                queue.push_back(next);
            }
        }
    }
    None
}

fn place_pickups(grid: &Grid, options: &MazeOptions, rng: &mut impl Rng) -> Vec<Pickup> {
    let walkable = grid.walkable_cells();
    let mut pickups: Vec<Pickup> = walkable
        .iter()
        .map(|&cell| Pickup {
            cell,
            kind: PickupKind::Point,
        })
        .collect();

    let mut candidates: Vec<Cell> = walkable
        .into_iter()
        .filter(|c| *c != options.player_spawn)
        .collect();
    candidates.shuffle(rng);

    let kinds = std::iter::repeat(PickupKind::Bonus)
        .take(options.bonus_count)
        .chain(std::iter::repeat(PickupKind::Power).take(options.power_count));
    for (cell, kind) in candidates.into_iter().zip(kinds) {
        pickups.retain(|p| p.cell != cell);
        pickups.push(Pickup { cell, kind });
    }
    pickups
}
