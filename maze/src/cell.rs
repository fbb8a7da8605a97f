use serde::{Deserialize, Serialize};

/// Coordinate on the grid.
///
/// Signed, so that lookups just outside the grid stay representable.
pub type Coord = i64;

/// A cell of the grid
///
/// `x` grows eastward, `y` grows southward, `(0, 0)` is the top-left corner.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: Coord,
    pub y: Coord,
}

impl Cell {
    /// Top-left cell, where generation starts
    pub const ORIGIN: Cell = Cell { x: 0, y: 0 };

    #[inline(always)]
    #[must_use]
    pub const fn new(x: Coord, y: Coord) -> Self {
        Self { x, y }
    }

    /// The cell one step away in `direction`
    /// ```
    /// use grid_maze::{Cell, Direction};
    ///
    /// assert_eq!(Cell::new(3, 0).towards(Direction::North), Some(Cell::new(3, -1)));
    /// assert_eq!(Cell::new(3, 0).towards(Direction::East), Some(Cell::new(4, 0)));
    /// assert_eq!(Cell::new(i64::MAX, 0).towards(Direction::East), None);
    /// ```
    #[inline(always)]
    #[must_use]
    pub const fn towards(self, direction: Direction) -> Option<Cell> {
        let [dx, dy] = direction.offset();
        let Some(x) = self.x.checked_add(dx) else {
            return None;
        };
        let Some(y) = self.y.checked_add(dy) else {
            return None;
        };
        Some(Cell { x, y })
    }

    /// Steps needed to reach `other` ignoring walls
    #[inline(always)]
    #[must_use]
    pub const fn manhattan(&self, other: &Cell) -> u64 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

/// Compass direction of a cell side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Toward -y
    North,
    /// Toward +y
    South,
    /// Toward +x
    East,
    /// Toward -x
    West,
}

impl Direction {
    /// Every direction, in the order both generation and search scan them
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    #[inline(always)]
    #[must_use]
    pub const fn offset(self) -> [Coord; 2] {
        match self {
            Direction::North => [0, -1],
            Direction::South => [0, 1],
            Direction::East => [1, 0],
            Direction::West => [-1, 0],
        }
    }

    /// The side facing this one across an edge
    #[inline(always)]
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
        }
    }
}

/// Extent of a grid
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Shape {
    pub cols: usize,
    pub rows: usize,
}

impl Shape {
    /// Check if a cell is inside the grid
    /// ```
    /// use grid_maze::{Cell, Shape};
    ///
    /// let shape = Shape { cols: 3, rows: 5 };
    /// assert!(shape.contains(&Cell::new(2, 4)));
    /// assert!(!shape.contains(&Cell::new(3, 0)));
    /// assert!(!shape.contains(&Cell::new(-1, 0)));
    /// ```
    #[inline(always)]
    #[must_use]
    pub const fn contains(&self, Cell { x, y }: &Cell) -> bool {
        *x >= 0 && (*x as u64) < self.cols as u64 && *y >= 0 && (*y as u64) < self.rows as u64
    }

    /// Number of cells
    #[inline(always)]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.cols * self.rows
    }

    #[inline(always)]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Convert a cell to its row-major index
    ///
    /// ```
    /// use grid_maze::{Cell, Shape};
    ///
    /// let shape = Shape { cols: 4, rows: 3 };
    /// assert_eq!(shape.cell_to_linear(&Cell::new(2, 1)), 6);
    /// ```
    #[inline(always)]
    #[must_use]
    pub const fn cell_to_linear(&self, cell: &Cell) -> usize {
        debug_assert!(self.contains(cell));
        cell.y as usize * self.cols + cell.x as usize
    }

    /// Convert a row-major index back to its cell
    ///
    /// ```
    /// use grid_maze::{Cell, Shape};
    ///
    /// let shape = Shape { cols: 4, rows: 3 };
    /// assert_eq!(shape.linear_to_cell(6), Cell::new(2, 1));
    /// ```
    #[inline(always)]
    #[must_use]
    pub const fn linear_to_cell(&self, pos: usize) -> Cell {
        debug_assert!(pos < self.len());
        Cell {
            x: (pos % self.cols) as Coord,
            y: (pos / self.cols) as Coord,
        }
    }

    /// All cells, in row-major order
    pub fn cells(self) -> impl Iterator<Item = Cell> {
        (0..self.len()).map(move |pos| self.linear_to_cell(pos))
    }
}
