use crate::components::{Direction, Tint};
use crate::constants::{BLINK_PERIOD, BLINK_TICKS, POWER_TICKS, TILE_SIZE};
use crate::grid::{Cell, Rect};

/// Where the player starts every level.
pub const SPAWN: Cell = Cell::new(1, 1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerState {
    Normal,
    Empowered { remaining: u32 },
}

#[derive(Debug, Clone)]
pub struct Player {
    pub rect: Rect,
    /// Most recent intent; kept until replaced.
    pub direction: Option<Direction>,
    pub power: PowerState,
}

impl Player {
    pub fn new(cell: Cell) -> Self {
        Self {
            rect: cell.rect(),
            direction: None,
            power: PowerState::Normal,
        }
    }

    pub fn cell(&self) -> Cell {
        self.rect.cell()
    }

    pub fn steer(&mut self, intent: Option<Direction>) {
        if let Some(direction) = intent {
            self.direction = Some(direction);
        }
    }

    /// Moves one tile in the held direction unless the target overlaps a
    /// wall. Returns whether the player moved.
    pub fn advance(&mut self, walls: &[Rect]) -> bool {
        let Some(direction) = self.direction else {
            return false;
        };
        let (dr, dc) = direction.delta();
        let target = self
            .rect
            .translated(dc as i32 * TILE_SIZE, dr as i32 * TILE_SIZE);
        if walls.iter().any(|wall| wall.overlaps(&target)) {
            return false;
        }
        self.rect = target;
        true
    }

    /// Starts (or restarts) the empowerment countdown.
    pub fn empower(&mut self) {
        self.power = PowerState::Empowered {
            remaining: POWER_TICKS,
        };
    }

    pub fn tick_power(&mut self) {
        if let PowerState::Empowered { remaining } = self.power {
            self.power = match remaining.saturating_sub(1) {
                0 => PowerState::Normal,
                remaining => PowerState::Empowered { remaining },
            };
        }
    }

    pub fn is_empowered(&self) -> bool {
        matches!(self.power, PowerState::Empowered { .. })
    }

    pub fn remaining_power(&self) -> u32 {
        match self.power {
            PowerState::Normal => 0,
            PowerState::Empowered { remaining } => remaining,
        }
    }

    pub fn is_blinking(&self) -> bool {
        matches!(self.power, PowerState::Empowered { remaining } if remaining <= BLINK_TICKS)
    }

    pub fn tint(&self) -> Tint {
        if self.is_blinking() && (self.remaining_power() / BLINK_PERIOD) % 2 == 0 {
            Tint::White
        } else {
            Tint::Yellow
        }
    }
}
