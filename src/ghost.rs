use rand::Rng;
use tracing::trace;

use crate::components::Tint;
use crate::constants::{SCREEN_HEIGHT, SCREEN_WIDTH, TILE_SIZE};
use crate::grid::{Cell, Grid, Rect};
use crate::pathing::{self, Strategy};

/// Per-tick behavior, derived from the player's empowerment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Pursuing,
    Fleeing,
}

impl Mode {
    pub fn from_empowered(empowered: bool) -> Self {
        if empowered {
            Mode::Fleeing
        } else {
            Mode::Pursuing
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PursuerSpec {
    pub name: &'static str,
    pub spawn: Cell,
    pub tint: Tint,
    pub strategy: Strategy,
    /// Commits a step only every `speed` planned ticks.
    pub speed: u32,
}

fn spawn_at(x: i32, y: i32) -> Cell {
    Rect::new(x, y, TILE_SIZE, TILE_SIZE).cell()
}

/// The three pursuers placed around the screen center each level.
pub fn roster() -> [PursuerSpec; 3] {
    let cx = SCREEN_WIDTH / 2;
    let cy = SCREEN_HEIGHT / 2;
    [
        PursuerSpec {
            name: "pink",
            spawn: spawn_at(cx - TILE_SIZE, cy - TILE_SIZE),
            tint: Tint::Pink,
            strategy: Strategy::ShortestPath,
            speed: 4,
        },
        PursuerSpec {
            name: "red",
            spawn: spawn_at(cx, cy),
            tint: Tint::Red,
            strategy: Strategy::ExhaustiveSearch,
            speed: 3,
        },
        PursuerSpec {
            name: "purple",
            spawn: spawn_at(cx + TILE_SIZE, cy),
            tint: Tint::Purple,
            strategy: Strategy::RandomStep,
            speed: 2,
        },
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Plan had no next cell; the throttle counter is untouched.
    Idle,
    Throttled,
    /// Another pursuer occupies the next cell.
    Blocked,
    Moved(Cell),
}

#[derive(Debug, Clone)]
pub struct Pursuer {
    pub name: &'static str,
    pub rect: Rect,
    pub strategy: Strategy,
    pub tint: Tint,
    pub speed: u32,
    pub steps: u32,
    pub alive: bool,
}

impl Pursuer {
    pub fn new(spec: &PursuerSpec) -> Self {
        Self {
            name: spec.name,
            rect: spec.spawn.rect(),
            strategy: spec.strategy,
            tint: spec.tint,
            speed: spec.speed.max(1),
            steps: 0,
            alive: true,
        }
    }

    pub fn cell(&self) -> Cell {
        self.rect.cell()
    }

    pub fn display_tint(&self, mode: Mode) -> Tint {
        match mode {
            Mode::Pursuing => self.tint,
            Mode::Fleeing => Tint::Vulnerable,
        }
    }

    /// Path for this tick: the assigned strategy while pursuing, a
    /// distance-maximizing step away from `player` while fleeing.
    pub fn plan(&self, grid: &Grid, player: Cell, mode: Mode, rng: &mut impl Rng) -> Vec<Cell> {
        match mode {
            Mode::Pursuing => self.strategy.plan(grid, self.cell(), player, rng),
            Mode::Fleeing => pathing::flee_step(grid, self.cell(), player, rng),
        }
    }

    /// Applies the throttle, then commits `path[1]` unless it overlaps one of
    /// `others`.
    pub fn follow(&mut self, path: &[Cell], others: &[Rect]) -> Step {
        let Some(&next) = path.get(1) else {
            return Step::Idle;
        };
        self.steps = self.steps.wrapping_add(1);
        if self.steps % self.speed != 0 {
            return Step::Throttled;
        }
        let target = next.rect();
        if others.iter().any(|rect| rect.overlaps(&target)) {
            trace!(pursuer = self.name, ?next, "step blocked by another pursuer");
            return Step::Blocked;
        }
        self.rect = target;
        Step::Moved(next)
    }
}

/// Moves live pursuers one after another in roster order. Each pursuer sees
/// the positions already committed by those before it this tick.
pub fn move_all(
    pursuers: &mut [Pursuer],
    grid: &Grid,
    player: Cell,
    mode: Mode,
    rng: &mut impl Rng,
) -> Vec<Step> {
    let mut steps = Vec::with_capacity(pursuers.len());
    for idx in 0..pursuers.len() {
        if !pursuers[idx].alive {
            steps.push(Step::Idle);
            continue;
        }
        let path = pursuers[idx].plan(grid, player, mode, rng);
        let others: Vec<Rect> = pursuers
            .iter()
            .enumerate()
            .filter(|(other, p)| *other != idx && p.alive)
            .map(|(_, p)| p.rect)
            .collect();
        steps.push(pursuers[idx].follow(&path, &others));
    }
    steps
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    const ROOM: &str = "#######\n\
                        #.....#\n\
                        #.....#\n\
                        #######";

    fn pursuer(cell: Cell, strategy: Strategy, speed: u32) -> Pursuer {
        Pursuer::new(&PursuerSpec {
            name: "test",
            spawn: cell,
            tint: Tint::Red,
            strategy,
            speed,
        })
    }

    #[test]
    fn roster_spawns_around_center() {
        let specs = roster();
        assert_eq!(specs[0].spawn, Cell::new(5, 7));
        assert_eq!(specs[1].spawn, Cell::new(6, 8));
        assert_eq!(specs[2].spawn, Cell::new(6, 9));
        let speeds: Vec<u32> = specs.iter().map(|s| s.speed).collect();
        assert_eq!(speeds, vec![4, 3, 2]);
    }

    #[test]
    fn throttle_commits_every_nth_tick() {
        let mut p = pursuer(Cell::new(1, 1), Strategy::ShortestPath, 3);
        let path = vec![Cell::new(1, 1), Cell::new(1, 2)];
        assert_eq!(p.follow(&path, &[]), Step::Throttled);
        assert_eq!(p.follow(&path, &[]), Step::Throttled);
        assert_eq!(p.follow(&path, &[]), Step::Moved(Cell::new(1, 2)));
        assert_eq!(p.cell(), Cell::new(1, 2));
    }

    #[test]
    fn short_path_does_not_count_toward_throttle() {
        let mut p = pursuer(Cell::new(1, 1), Strategy::ShortestPath, 2);
        assert_eq!(p.follow(&[Cell::new(1, 1)], &[]), Step::Idle);
        assert_eq!(p.steps, 0);
    }

    #[test]
    fn occupied_target_is_skipped() {
        let mut p = pursuer(Cell::new(1, 1), Strategy::ShortestPath, 1);
        let path = vec![Cell::new(1, 1), Cell::new(1, 2)];
        assert_eq!(p.follow(&path, &[Cell::new(1, 2).rect()]), Step::Blocked);
        assert_eq!(p.cell(), Cell::new(1, 1));
        assert_eq!(p.follow(&path, &[]), Step::Moved(Cell::new(1, 2)));
    }

    #[test]
    fn earlier_pursuer_claims_cell_first() {
        let grid = Grid::parse(ROOM).unwrap();
        let mut rng = StdRng::seed_from_u64(2);
        // Both head for (1, 3); the first in order takes it.
        let mut pursuers = vec![
            pursuer(Cell::new(1, 2), Strategy::ShortestPath, 1),
            pursuer(Cell::new(1, 4), Strategy::ShortestPath, 1),
        ];
        let steps = move_all(&mut pursuers, &grid, Cell::new(1, 3), Mode::Pursuing, &mut rng);
        assert_eq!(steps, vec![Step::Moved(Cell::new(1, 3)), Step::Blocked]);
    }

    #[test]
    fn dead_pursuers_neither_move_nor_block() {
        let grid = Grid::parse(ROOM).unwrap();
        let mut rng = StdRng::seed_from_u64(2);
        let mut pursuers = vec![
            pursuer(Cell::new(1, 2), Strategy::ShortestPath, 1),
            pursuer(Cell::new(1, 4), Strategy::ShortestPath, 1),
        ];
        pursuers[0].alive = false;
        let steps = move_all(&mut pursuers, &grid, Cell::new(1, 3), Mode::Pursuing, &mut rng);
        assert_eq!(steps, vec![Step::Idle, Step::Moved(Cell::new(1, 3))]);
    }

    #[test]
    fn fleeing_moves_away_and_turns_vulnerable() {
        let grid = Grid::parse(ROOM).unwrap();
        let mut rng = StdRng::seed_from_u64(4);
        let mut pursuers = vec![pursuer(Cell::new(1, 3), Strategy::ShortestPath, 1)];
        let player = Cell::new(1, 2);
        let steps = move_all(&mut pursuers, &grid, player, Mode::Fleeing, &mut rng);
        let Step::Moved(cell) = steps[0] else {
            panic!("expected a retreat, got {:?}", steps[0]);
        };
        assert!(cell.manhattan(player) > 1);
        assert_eq!(pursuers[0].display_tint(Mode::Fleeing), Tint::Vulnerable);
        assert_eq!(pursuers[0].display_tint(Mode::Pursuing), Tint::Red);
    }

    #[test]
    fn mode_follows_empowerment() {
        assert_eq!(Mode::from_empowered(true), Mode::Fleeing);
        assert_eq!(Mode::from_empowered(false), Mode::Pursuing);
    }
}
