#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Neighbor expansion order shared by every search.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// (row, col) offset of one step.
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PickupKind {
    Point,
    Bonus,
    Power,
}

impl PickupKind {
    pub fn score(self) -> u32 {
        use crate::constants::{BONUS_SCORE, POINT_SCORE, POWER_SCORE};
        match self {
            PickupKind::Point => POINT_SCORE,
            PickupKind::Bonus => BONUS_SCORE,
            PickupKind::Power => POWER_SCORE,
        }
    }
}

/// Display colors handed to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tint {
    Yellow,
    White,
    Pink,
    Red,
    Purple,
    Vulnerable,
}
