//! Per-level session state and the outer play loop.
//!
//! One call to [`Session::tick`] is one simulation step. Within a step the
//! order is fixed: power countdown, player move, pickups, completion check,
//! contacts, pursuer moves (roster order), then contacts again. A completed
//! level returns before any pursuer is evaluated, and a pursuer the player
//! walked into is resolved before it gets to move.

use rand::Rng;
use tracing::{debug, info};

use crate::components::{Direction, PickupKind, Tint};
use crate::constants::{DEFAULT_WIN_SCORE, PURSUER_KILL_SCORE};
use crate::error::Result;
use crate::ghost::{self, Mode, Pursuer, PursuerSpec};
use crate::grid::{Grid, Rect};
use crate::level::{self, Maze, MazeOptions, Pickup};
use crate::player::{self, Player};

#[derive(Debug, Clone)]
pub struct Rules {
    pub win_score: u32,
    pub maze: MazeOptions,
    /// Pursuers placed at the start of every level, in evaluation order.
    pub pursuers: Vec<PursuerSpec>,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            win_score: DEFAULT_WIN_SCORE,
            maze: MazeOptions::default(),
            pursuers: ghost::roster().to_vec(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Running,
    LevelComplete,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sprite {
    pub rect: Rect,
    pub tint: Tint,
}

/// Read-only view handed to the renderer once per tick.
#[derive(Debug, Clone)]
pub struct Frame<'a> {
    pub level: u32,
    pub score: u32,
    pub grid: &'a Grid,
    pub walls: &'a [Rect],
    pub pickups: &'a [Pickup],
    pub player: Sprite,
    pub pursuers: Vec<Sprite>,
    pub power_remaining: u32,
}

#[derive(Debug, Clone)]
pub struct Session {
    pub level: u32,
    pub score: u32,
    pub win_score: u32,
    pub grid: Grid,
    walls: Vec<Rect>,
    pub pickups: Vec<Pickup>,
    pub player: Player,
    pub pursuers: Vec<Pursuer>,
    pub ticks: u64,
}

impl Session {
    /// Generates a fresh maze for `level` and places the configured roster.
    pub fn new(level: u32, rules: &Rules, rng: &mut impl Rng) -> Result<Self> {
        let maze = level::generate(level, &rules.maze, rng)?;
        let pursuers = rules.pursuers.iter().map(Pursuer::new).collect();
        Ok(Self::from_parts(
            level,
            maze,
            Player::new(player::SPAWN),
            pursuers,
            rules.win_score,
        ))
    }

    pub fn from_parts(
        level: u32,
        maze: Maze,
        player: Player,
        pursuers: Vec<Pursuer>,
        win_score: u32,
    ) -> Self {
        let walls = maze.grid.wall_rects();
        Self {
            level,
            score: 0,
            win_score,
            grid: maze.grid,
            walls,
            pickups: maze.pickups,
            player,
            pursuers,
            ticks: 0,
        }
    }

    pub fn walls(&self) -> &[Rect] {
        &self.walls
    }

    pub fn remaining(&self, kind: PickupKind) -> usize {
        self.pickups.iter().filter(|p| p.kind == kind).count()
    }

    pub fn tick(&mut self, intent: Option<Direction>, rng: &mut impl Rng) -> TickOutcome {
        self.ticks += 1;
        self.player.tick_power();
        self.player.steer(intent);
        self.player.advance(&self.walls);
        self.collect_pickups();

        if self.pickups.is_empty() || self.score >= self.win_score {
            info!(
                level = self.level,
                score = self.score,
                ticks = self.ticks,
                "level complete"
            );
            return TickOutcome::LevelComplete;
        }

        // The player may have walked onto a pursuer that would step away below.
        if self.resolve_contacts() == TickOutcome::GameOver {
            return TickOutcome::GameOver;
        }

        let mode = Mode::from_empowered(self.player.is_empowered());
        ghost::move_all(
            &mut self.pursuers,
            &self.grid,
            self.player.cell(),
            mode,
            rng,
        );
        self.resolve_contacts()
    }

    fn collect_pickups(&mut self) {
        let reach = self.player.rect;
        let mut collected = Vec::new();
        self.pickups.retain(|pickup| {
            let hit = pickup.rect().overlaps(&reach);
            if hit {
                collected.push(pickup.kind);
            }
            !hit
        });
        for kind in collected {
            self.score += kind.score();
            if kind == PickupKind::Power {
                debug!(tick = self.ticks, "player empowered");
                self.player.empower();
            }
        }
    }

    fn resolve_contacts(&mut self) -> TickOutcome {
        let empowered = self.player.is_empowered();
        for pursuer in self.pursuers.iter_mut().filter(|p| p.alive) {
            if !pursuer.rect.overlaps(&self.player.rect) {
                continue;
            }
            if !empowered {
                info!(
                    level = self.level,
                    score = self.score,
                    pursuer = pursuer.name,
                    "player caught"
                );
                return TickOutcome::GameOver;
            }
            pursuer.alive = false;
            self.score += PURSUER_KILL_SCORE;
            debug!(pursuer = pursuer.name, score = self.score, "pursuer eaten");
        }
        self.pursuers.retain(|p| p.alive);
        TickOutcome::Running
    }

    pub fn frame(&self) -> Frame<'_> {
        let mode = Mode::from_empowered(self.player.is_empowered());
        Frame {
            level: self.level,
            score: self.score,
            grid: &self.grid,
            walls: &self.walls,
            pickups: &self.pickups,
            player: Sprite {
                rect: self.player.rect,
                tint: self.player.tint(),
            },
            pursuers: self
                .pursuers
                .iter()
                .filter(|p| p.alive)
                .map(|p| Sprite {
                    rect: p.rect,
                    tint: p.display_tint(mode),
                })
                .collect(),
            power_remaining: self.player.remaining_power(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Intent(Option<Direction>),
    Quit,
}

/// Input, rendering and the two modal prompts.
pub trait Frontend {
    /// Waits until the next tick is due and returns the latest input.
    fn poll(&mut self) -> Result<Control>;

    fn render(&mut self, frame: &Frame<'_>) -> Result<()>;

    /// `true` advances to the next level, `false` ends the run.
    fn level_complete(&mut self, level: u32, score: u32) -> Result<bool>;

    /// `true` replays the current level, `false` ends the run.
    fn game_over(&mut self, level: u32, score: u32) -> Result<bool>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub level: u32,
    pub score: u32,
    pub levels_cleared: u32,
    pub deaths: u32,
}

/// Outer loop: builds a session per level and replays or advances on the
/// frontend's answer.
pub struct Driver<R> {
    rules: Rules,
    rng: R,
    level: u32,
}

impl<R: Rng> Driver<R> {
    pub fn new(rules: Rules, rng: R, level: u32) -> Self {
        Self {
            rules,
            rng,
            level: level.max(1),
        }
    }

    pub fn run(&mut self, frontend: &mut impl Frontend) -> Result<Summary> {
        let mut summary = Summary {
            level: self.level,
            score: 0,
            levels_cleared: 0,
            deaths: 0,
        };

        loop {
            let mut session = Session::new(self.level, &self.rules, &mut self.rng)?;
            info!(level = self.level, "level started");
            summary.level = self.level;
            frontend.render(&session.frame())?;

            let outcome = loop {
                let intent = match frontend.poll()? {
                    Control::Quit => {
                        summary.score = session.score;
                        return Ok(summary);
                    }
                    Control::Intent(intent) => intent,
                };
                let outcome = session.tick(intent, &mut self.rng);
                frontend.render(&session.frame())?;
                if outcome != TickOutcome::Running {
                    break outcome;
                }
            };
            summary.score = session.score;

            match outcome {
                TickOutcome::LevelComplete => {
                    summary.levels_cleared += 1;
                    if !frontend.level_complete(self.level, session.score)? {
                        return Ok(summary);
                    }
                    self.level += 1;
                }
                TickOutcome::GameOver => {
                    summary.deaths += 1;
                    if !frontend.game_over(self.level, session.score)? {
                        return Ok(summary);
                    }
                }
                TickOutcome::Running => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::grid::Cell;
    use crate::pathing::Strategy;

    fn corridor(pickups: &[(usize, usize, PickupKind)]) -> Maze {
        Maze {
            grid: Grid::parse(
                "#######\n\
                 #.....#\n\
                 #######",
            )
            .unwrap(),
            pickups: pickups
                .iter()
                .map(|&(row, col, kind)| Pickup {
                    cell: Cell::new(row, col),
                    kind,
                })
                .collect(),
        }
    }

    fn chaser(cell: Cell, speed: u32) -> Pursuer {
        Pursuer::new(&PursuerSpec {
            name: "chaser",
            spawn: cell,
            tint: Tint::Red,
            strategy: Strategy::ShortestPath,
            speed,
        })
    }

    #[test]
    fn pickups_score_by_kind() {
        let maze = corridor(&[
            (1, 2, PickupKind::Point),
            (1, 3, PickupKind::Bonus),
            (1, 4, PickupKind::Power),
            (1, 5, PickupKind::Point),
        ]);
        let mut session = Session::from_parts(1, maze, Player::new(Cell::new(1, 1)), vec![], 10_000);
        let mut rng = StdRng::seed_from_u64(0);

        assert_eq!(session.tick(Some(Direction::Right), &mut rng), TickOutcome::Running);
        assert_eq!(session.score, 1);
        session.tick(None, &mut rng);
        assert_eq!(session.score, 101);
        session.tick(None, &mut rng);
        assert_eq!(session.score, 101);
        assert!(session.player.is_empowered());
        assert_eq!(session.remaining(PickupKind::Point), 1);
    }

    #[test]
    fn caught_while_normal_is_game_over() {
        let maze = corridor(&[(1, 5, PickupKind::Point)]);
        let mut session = Session::from_parts(
            1,
            maze,
            Player::new(Cell::new(1, 1)),
            vec![chaser(Cell::new(1, 2), 1)],
            10_000,
        );
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(session.tick(None, &mut rng), TickOutcome::GameOver);
        assert_eq!(session.score, 0);
    }

    #[test]
    fn contact_while_empowered_eats_pursuer() {
        let maze = corridor(&[(1, 5, PickupKind::Point)]);
        let mut player = Player::new(Cell::new(1, 1));
        player.empower();
        let mut session = Session::from_parts(
            1,
            maze,
            player,
            vec![chaser(Cell::new(1, 2), 1)],
            10_000,
        );
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(session.tick(Some(Direction::Right), &mut rng), TickOutcome::Running);
        assert_eq!(session.score, PURSUER_KILL_SCORE);
        assert!(session.pursuers.is_empty());
        assert!(session.frame().pursuers.is_empty());
    }

    #[test]
    fn walking_into_a_wandering_pursuer_is_caught_before_it_moves() {
        for seed in 0..20 {
            let maze = corridor(&[(1, 5, PickupKind::Point)]);
            let wanderer = Pursuer::new(&PursuerSpec {
                name: "wanderer",
                spawn: Cell::new(1, 2),
                tint: Tint::Purple,
                strategy: Strategy::RandomStep,
                speed: 1,
            });
            let mut session =
                Session::from_parts(1, maze, Player::new(Cell::new(1, 1)), vec![wanderer], 10_000);
            let mut rng = StdRng::seed_from_u64(seed);
            assert_eq!(
                session.tick(Some(Direction::Right), &mut rng),
                TickOutcome::GameOver,
                "seed {seed}"
            );
            assert_eq!(session.pursuers[0].steps, 0, "seed {seed}");
        }
    }

    #[test]
    fn fleeing_pursuer_cannot_step_away_from_a_contact() {
        let maze = corridor(&[(1, 5, PickupKind::Point)]);
        let mut player = Player::new(Cell::new(1, 2));
        player.empower();
        let mut session = Session::from_parts(
            1,
            maze,
            player,
            vec![chaser(Cell::new(1, 3), 1)],
            10_000,
        );
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(session.tick(Some(Direction::Right), &mut rng), TickOutcome::Running);
        assert_eq!(session.score, PURSUER_KILL_SCORE);
        assert!(session.pursuers.is_empty());
    }

    #[test]
    fn completion_returns_before_pursuers_act() {
        let maze = corridor(&[(1, 2, PickupKind::Point)]);
        let mut session = Session::from_parts(
            1,
            maze,
            Player::new(Cell::new(1, 1)),
            vec![chaser(Cell::new(1, 3), 1)],
            10_000,
        );
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(session.tick(Some(Direction::Right), &mut rng), TickOutcome::LevelComplete);
        assert_eq!(session.pursuers[0].cell(), Cell::new(1, 3));
        assert_eq!(session.pursuers[0].steps, 0);
    }

    #[test]
    fn win_score_forces_completion() {
        let maze = corridor(&[(1, 2, PickupKind::Bonus), (1, 5, PickupKind::Point)]);
        let mut session = Session::from_parts(1, maze, Player::new(Cell::new(1, 1)), vec![], 100);
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(session.tick(Some(Direction::Right), &mut rng), TickOutcome::LevelComplete);
    }

    #[test]
    fn frame_marks_pursuers_vulnerable_while_empowered() {
        let maze = corridor(&[(1, 5, PickupKind::Point)]);
        let mut session = Session::from_parts(
            3,
            maze,
            Player::new(Cell::new(1, 1)),
            vec![chaser(Cell::new(1, 4), 1)],
            10_000,
        );
        assert_eq!(session.frame().pursuers[0].tint, Tint::Red);
        session.player.empower();
        let frame = session.frame();
        assert_eq!(frame.pursuers[0].tint, Tint::Vulnerable);
        assert_eq!(frame.level, 3);
        assert_eq!(frame.walls.len(), session.grid.wall_cells().len());
    }
}
