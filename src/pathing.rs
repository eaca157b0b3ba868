//! Grid searches used by pursuers.
//!
//! Every search treats the grid as read-only and expands neighbors in the
//! fixed order Up, Down, Left, Right. A returned path always starts with the
//! start cell; a path of length one means "stay put".

use std::collections::VecDeque;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::components::Direction;
use crate::grid::{Cell, Grid};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Breadth-first; shortest path in steps.
    ShortestPath,
    /// Depth-first; first path found, usually long and winding.
    ExhaustiveSearch,
    /// One random legal step, ignoring the goal.
    RandomStep,
}

impl Strategy {
    /// Plans from `start` toward `goal`. Never fails: an unreachable goal
    /// yields a path the caller can still step along or a single-cell hold.
    pub fn plan(self, grid: &Grid, start: Cell, goal: Cell, rng: &mut impl Rng) -> Vec<Cell> {
        match self {
            Strategy::ShortestPath => shortest_path(grid, start, goal).unwrap_or_else(|| vec![start]),
            Strategy::ExhaustiveSearch => exhaustive_path(grid, start, goal),
            Strategy::RandomStep => random_step(grid, start, rng),
        }
    }
}

fn assert_in_bounds(grid: &Grid, cell: Cell) {
    assert!(
        grid.in_bounds(cell),
        "path query cell {cell:?} outside {}x{} grid",
        grid.rows(),
        grid.cols()
    );
}

/// Shortest path from `start` to `goal`, or `None` when `goal` cannot be reached.
pub fn shortest_path(grid: &Grid, start: Cell, goal: Cell) -> Option<Vec<Cell>> {
    assert_in_bounds(grid, start);
    assert_in_bounds(grid, goal);

    let mut visited = vec![vec![false; grid.cols()]; grid.rows()];
    let mut came_from: Vec<Vec<Option<Cell>>> = vec![vec![None; grid.cols()]; grid.rows()];
    let mut queue = VecDeque::new();
    visited[start.row][start.col] = true;
    queue.push_back(start);

    while let Some(current) = queue.pop_front() {
        if current == goal {
            break;
        }
        for next in grid.neighbors(current) {
            if !visited[next.row][next.col] {
                visited[next.row][next.col] = true;
                came_from[next.row][next.col] = Some(current);
                queue.push_back(next);
            }
        }
    }

    if !visited[goal.row][goal.col] {
        return None;
    }

    let mut path = vec![goal];
    let mut current = goal;
    while let Some(prev) = came_from[current.row][current.col] {
        path.push(prev);
        current = prev;
    }
    path.reverse();
    Some(path)
}

/// Stack-based depth-first search. Cells are marked visited when popped, so
/// the last-pushed neighbor (Right) is explored first. When `goal` is never
/// reached the trail of the last cell actually expanded is returned; stale
/// stack entries popped after it are skipped and never replace it. Its second
/// cell is always a neighbor of `start`.
pub fn exhaustive_path(grid: &Grid, start: Cell, goal: Cell) -> Vec<Cell> {
    assert_in_bounds(grid, start);
    assert_in_bounds(grid, goal);

    let mut visited = vec![vec![false; grid.cols()]; grid.rows()];
    let mut stack: Vec<(Cell, Vec<Cell>)> = vec![(start, Vec::new())];
    let mut path = vec![start];

    while let Some((current, mut trail)) = stack.pop() {
        if visited[current.row][current.col] {
            continue;
        }
        visited[current.row][current.col] = true;
        trail.push(current);
        if current == goal {
            return trail;
        }
        for next in grid.neighbors(current) {
            if !visited[next.row][next.col] {
                stack.push((next, trail.clone()));
            }
        }
        path = trail;
    }
    path
}

/// `[start, neighbor]` for a uniformly shuffled first walkable neighbor, or
/// `[start]` when boxed in.
pub fn random_step(grid: &Grid, start: Cell, rng: &mut impl Rng) -> Vec<Cell> {
    assert_in_bounds(grid, start);

    let mut dirs = Direction::ALL;
    dirs.shuffle(rng);
    dirs.iter()
        .find_map(|dir| grid.step(start, *dir))
        .map_or_else(|| vec![start], |next| vec![start, next])
}

/// One-step retreat: of the shuffled neighbors, the first that ends farthest
/// (Manhattan) from `threat`. Stays put unless some step gains distance.
pub fn flee_step(grid: &Grid, start: Cell, threat: Cell, rng: &mut impl Rng) -> Vec<Cell> {
    assert_in_bounds(grid, start);

    let mut dirs = Direction::ALL;
    dirs.shuffle(rng);
    let mut best: Option<Cell> = None;
    let mut best_distance = start.manhattan(threat);
    for next in dirs.iter().filter_map(|dir| grid.step(start, *dir)) {
        let distance = next.manhattan(threat);
        if distance > best_distance {
            best = Some(next);
            best_distance = distance;
        }
    }
    match best {
        Some(next) => vec![start, next],
        None => vec![start],
    }
}
