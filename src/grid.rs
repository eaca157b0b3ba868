use crate::components::Direction;
use crate::constants::TILE_SIZE;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tile {
    Floor,
    Wall,
}

/// One grid coordinate at tile granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Tile-sized pixel rectangle covering this cell.
    pub fn rect(self) -> Rect {
        Rect::new(
            self.col as i32 * TILE_SIZE,
            self.row as i32 * TILE_SIZE,
            TILE_SIZE,
            TILE_SIZE,
        )
    }

    pub fn manhattan(self, other: Cell) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }

    /// Neighbor in `dir`, or `None` when it would underflow.
    pub fn offset(self, dir: Direction) -> Option<Cell> {
        let (dr, dc) = dir.delta();
        let row = self.row.checked_add_signed(dr)?;
        let col = self.col.checked_add_signed(dc)?;
        Some(Cell { row, col })
    }
}

/// Axis-aligned pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Strict overlap: rectangles that only share an edge do not collide.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.w
            && other.x < self.x + self.w
            && self.y < other.y + other.h
            && other.y < self.y + self.h
    }

    pub fn translated(&self, dx: i32, dy: i32) -> Rect {
        Rect::new(self.x + dx, self.y + dy, self.w, self.h)
    }

    /// Cell containing the top-left corner.
    pub fn cell(&self) -> Cell {
        Cell::new(
            self.y.max(0) as usize / TILE_SIZE as usize,
            self.x.max(0) as usize / TILE_SIZE as usize,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    tiles: Vec<Vec<Tile>>,
}

impl Grid {
    /// Floor everywhere except a solid border.
    pub fn bordered(rows: usize, cols: usize) -> Result<Self> {
        if rows < 3 || cols < 3 {
            return Err(Error::LayoutTooSmall { rows, cols });
        }
        let mut tiles = vec![vec![Tile::Floor; cols]; rows];
        for (row, line) in tiles.iter_mut().enumerate() {
            for (col, tile) in line.iter_mut().enumerate() {
                if row == 0 || row == rows - 1 || col == 0 || col == cols - 1 {
                    *tile = Tile::Wall;
                }
            }
        }
        Ok(Self { rows, cols, tiles })
    }

    /// Builds a grid from an ASCII layout: `#` is a wall, `.` or a space is floor.
    pub fn parse(layout: &str) -> Result<Self> {
        let lines: Vec<&str> = layout
            .lines()
            .map(str::trim_end)
            .filter(|l| !l.is_empty())
            .collect();
        if lines.is_empty() {
            return Err(Error::EmptyLayout);
        }
        let cols = lines[0].chars().count();
        let rows = lines.len();
        if rows < 3 || cols < 3 {
            return Err(Error::LayoutTooSmall { rows, cols });
        }

        let mut tiles = Vec::with_capacity(rows);
        for (row, line) in lines.iter().enumerate() {
            let actual = line.chars().count();
            if actual != cols {
                return Err(Error::RaggedLayout {
                    row,
                    expected: cols,
                    actual,
                });
            }
            let mut parsed = Vec::with_capacity(cols);
            for (col, glyph) in line.chars().enumerate() {
                let tile = match glyph {
                    '#' => Tile::Wall,
                    '.' | ' ' => Tile::Floor,
                    _ => return Err(Error::UnknownGlyph { glyph, row, col }),
                };
                parsed.push(tile);
            }
            tiles.push(parsed);
        }

        let grid = Self { rows, cols, tiles };
        if let Some(cell) = grid.border_cells().find(|c| grid.is_walkable(*c)) {
            return Err(Error::OpenBorder {
                row: cell.row,
                col: cell.col,
            });
        }
        Ok(grid)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn in_bounds(&self, cell: Cell) -> bool {
        cell.row < self.rows && cell.col < self.cols
    }

    pub fn is_border(&self, cell: Cell) -> bool {
        cell.row == 0 || cell.col == 0 || cell.row == self.rows - 1 || cell.col == self.cols - 1
    }

    /// Out-of-bounds cells are never walkable.
    pub fn is_walkable(&self, cell: Cell) -> bool {
        self.in_bounds(cell) && self.tiles[cell.row][cell.col] == Tile::Floor
    }

    /// In-bounds walkable neighbor of `cell` in `dir`.
    pub fn step(&self, cell: Cell, dir: Direction) -> Option<Cell> {
        cell.offset(dir).filter(|next| self.is_walkable(*next))
    }

    /// Walkable neighbors in Up, Down, Left, Right order.
    pub fn neighbors(&self, cell: Cell) -> impl Iterator<Item = Cell> + '_ {
        Direction::ALL
            .into_iter()
            .filter_map(move |dir| self.step(cell, dir))
    }

    pub fn walkable_cells(&self) -> Vec<Cell> {
        self.cells().filter(|c| self.is_walkable(*c)).collect()
    }

    pub fn wall_cells(&self) -> Vec<Cell> {
        self.cells().filter(|c| !self.is_walkable(*c)).collect()
    }

    /// Interior (non-border) walls.
    pub fn interior_wall_count(&self) -> usize {
        self.cells()
            .filter(|c| !self.is_border(*c) && !self.is_walkable(*c))
            .count()
    }

    pub fn border_cell_count(&self) -> usize {
        self.border_cells().count()
    }

    /// Tile-resolution rectangles of every wall cell.
    pub fn wall_rects(&self) -> Vec<Rect> {
        self.wall_cells().into_iter().map(Cell::rect).collect()
    }

    pub(crate) fn set(&mut self, cell: Cell, tile: Tile) {
        self.tiles[cell.row][cell.col] = tile;
    }

    fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.rows).flat_map(move |row| (0..self.cols).map(move |col| Cell::new(row, col)))
    }

    fn border_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.cells().filter(|c| self.is_border(*c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bordered_grid_walls_only_the_edge() {
        let grid = Grid::bordered(4, 5).unwrap();
        assert_eq!(grid.border_cell_count(), 14);
        assert_eq!(grid.walkable_cells().len(), 6);
        assert_eq!(grid.interior_wall_count(), 0);
        assert!(!grid.is_walkable(Cell::new(0, 2)));
        assert!(grid.is_walkable(Cell::new(1, 1)));
    }

    #[test]
    fn out_of_bounds_is_not_walkable() {
        let grid = Grid::bordered(3, 3).unwrap();
        assert!(!grid.is_walkable(Cell::new(3, 1)));
        assert!(!grid.is_walkable(Cell::new(1, 7)));
    }

    #[test]
    fn parse_reads_walls_and_floor() {
        let grid = Grid::parse(
            "#####\n\
             #..##\n\
             #...#\n\
             #####",
        )
        .unwrap();
        assert_eq!((grid.rows(), grid.cols()), (4, 5));
        assert!(!grid.is_walkable(Cell::new(1, 3)));
        assert!(grid.is_walkable(Cell::new(2, 3)));
        assert_eq!(grid.interior_wall_count(), 1);
    }

    #[test]
    fn parse_rejects_bad_layouts() {
        assert!(matches!(Grid::parse(""), Err(Error::EmptyLayout)));
        assert!(matches!(
            Grid::parse("###\n#.#"),
            Err(Error::LayoutTooSmall { rows: 2, cols: 3 })
        ));
        assert!(matches!(
            Grid::parse("###\n#.##\n###"),
            Err(Error::RaggedLayout { row: 1, .. })
        ));
        assert!(matches!(
            Grid::parse("###\n#x#\n###"),
            Err(Error::UnknownGlyph { glyph: 'x', .. })
        ));
        assert!(matches!(
            Grid::parse("###\n..#\n###"),
            Err(Error::OpenBorder { row: 1, col: 0 })
        ));
    }

    #[test]
    fn neighbors_follow_fixed_order() {
        let grid = Grid::bordered(5, 5).unwrap();
        let found: Vec<Cell> = grid.neighbors(Cell::new(2, 2)).collect();
        assert_eq!(
            found,
            vec![
                Cell::new(1, 2),
                Cell::new(3, 2),
                Cell::new(2, 1),
                Cell::new(2, 3)
            ]
        );
    }

    #[test]
    fn rects_overlap_strictly() {
        let a = Cell::new(1, 1).rect();
        let b = Cell::new(1, 2).rect();
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&a.translated(TILE_SIZE - 1, 0)));
        assert_eq!(a.cell(), Cell::new(1, 1));
    }

    #[test]
    fn wall_rects_cover_every_wall() {
        let grid = Grid::bordered(3, 4).unwrap();
        let rects = grid.wall_rects();
        assert_eq!(rects.len(), grid.wall_cells().len());
        assert!(rects.contains(&Cell::new(0, 0).rect()));
    }
}
