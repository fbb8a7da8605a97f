//! Perfect rectangular mazes.
//!
//! A [`GridMaze`] is carved with a randomized depth-first backtracker, so its passages
//! form a spanning tree of the grid: any two cells are joined by exactly one simple path.
//! [`PathFinder`] finds that path with a breadth-first search, either in one go or as a
//! [`Search`] yielding a [`Snapshot`] per expanded cell for animated display.

use std::fmt::{self, Display};

use bitflags::bitflags;
use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_wyrand::WyRand;
use thiserror::Error;

mod cell;
pub use cell::{Cell, Coord, Direction, Shape};

pub mod config;
pub use config::Config;

mod level;
pub use level::{Level, Move};

mod solve;
pub use solve::{Path, PathFinder, Search, Snapshot, Step};

bitflags! {
    /// Walls around a cell
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Walls: u8 {
        const North = 0b1000;
        const South = 0b0100;
        const East  = 0b0010;
        const West  = 0b0001;
    }
}

impl From<Direction> for Walls {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::North => Walls::North,
            Direction::South => Walls::South,
            Direction::East => Walls::East,
            Direction::West => Walls::West,
        }
    }
}

/// Reasons a maze or a run of levels cannot be set up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MazeError {
    /// An extent is zero, or the grid is too large to index or allocate
    #[error("cannot build a {cols}x{rows} maze")]
    InvalidDimensions { cols: usize, rows: usize },
    /// The configured size range is empty or starts at zero
    #[error("maze size range {min}..={max} is empty or starts at zero")]
    InvalidSizeRange { min: usize, max: usize },
}

/// A perfect maze on a rectangular grid
///
/// Both extents are odd. The maze never changes after construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GridMaze {
    shape: Shape,
    /// Walls of each cell, row-major
    walls: Box<[Walls]>,
}

impl GridMaze {
    /// Generate a maze of at least `cols`x`rows` cells
    ///
    /// Even extents are raised to the next odd value.
    pub fn new<R>(cols: usize, rows: usize, rng: &mut R) -> Result<Self, MazeError>
    where
        R: Rng + ?Sized,
    {
        let shape = normalize(cols, rows)?;
        let invalid = MazeError::InvalidDimensions { cols, rows };
        let walls = filled(shape.len(), Walls::all()).ok_or(invalid)?;
        let visited = filled(shape.len(), false).ok_or(invalid)?;
        log::debug!("{}x{}: carving passages", shape.cols, shape.rows);
        let mut maze = Self { shape, walls };
        maze.carve(visited, rng);
        Ok(maze)
    }

    /// Generate a maze from a [`WyRand`] seeded with `seed`
    pub fn seeded(cols: usize, rows: usize, seed: u64) -> Result<Self, MazeError> {
        Self::new(cols, rows, &mut WyRand::seed_from_u64(seed))
    }

    /// Recursive backtracker, with an explicit stack
    fn carve<R>(&mut self, mut visited: Box<[bool]>, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        let shape = self.shape;
        let mut stack = vec![Cell::ORIGIN];
        visited[shape.cell_to_linear(&Cell::ORIGIN)] = true;
        let mut candidates = Vec::with_capacity(Direction::ALL.len());

        while let Some(&current) = stack.last() {
            candidates.clear();
            candidates.extend(Direction::ALL.into_iter().filter_map(|direction| {
                let next = current
                    .towards(direction)
                    .filter(|next| shape.contains(next))?;
                (!visited[shape.cell_to_linear(&next)]).then_some((direction, next))
            }));
            match candidates.choose(rng) {
                Some(&(direction, next)) => {
                    log::trace!("{current:?}: opening {direction:?} to {next:?}");
                    self.knock_down(current, direction);
                    visited[shape.cell_to_linear(&next)] = true;
                    stack.push(next);
                }
                None => {
                    stack.pop();
                }
            }
        }
        debug_assert!(visited.iter().all(|v| *v), "Every cell should be carved");
    }

    /// Remove the wall on `direction` of `cell`, and the matching one of its neighbour
    fn knock_down(&mut self, cell: Cell, direction: Direction) {
        let Some(next) = cell.towards(direction).filter(|n| self.shape.contains(n)) else {
            unreachable!("{cell:?}: the border on {direction:?} cannot be opened")
        };
        let here = self.shape.cell_to_linear(&cell);
        let there = self.shape.cell_to_linear(&next);
        self.walls[here].remove(direction.into());
        self.walls[there].remove(direction.opposite().into());
    }

    #[inline(always)]
    #[must_use]
    pub fn shape(&self) -> Shape {
        self.shape
    }

    #[inline(always)]
    #[must_use]
    pub fn cols(&self) -> usize {
        self.shape.cols
    }

    #[inline(always)]
    #[must_use]
    pub fn rows(&self) -> usize {
        self.shape.rows
    }

    #[inline(always)]
    #[must_use]
    pub fn contains(&self, cell: &Cell) -> bool {
        self.shape.contains(cell)
    }

    /// Walls around a cell. Cells outside the grid are walled on every side.
    #[must_use]
    pub fn walls(&self, cell: Cell) -> Walls {
        if self.shape.contains(&cell) {
            self.walls[self.shape.cell_to_linear(&cell)]
        } else {
            Walls::all()
        }
    }

    /// Check if the side `direction` of cell `(x, y)` is blocked
    ///
    /// Out of bounds cells are always blocked.
    #[must_use]
    pub fn is_wall(&self, x: Coord, y: Coord, direction: Direction) -> bool {
        self.walls(Cell::new(x, y)).contains(direction.into())
    }

    /// The cell reached by leaving `cell` through `direction`, if nothing blocks it
    #[must_use]
    pub fn step(&self, cell: Cell, direction: Direction) -> Option<Cell> {
        if self.is_wall(cell.x, cell.y, direction) {
            return None;
        }
        cell.towards(direction).filter(|next| self.contains(next))
    }

    /// Open neighbours of a cell, in [`Direction::ALL`] order
    pub fn neighbours(&self, cell: Cell) -> impl Iterator<Item = (Direction, Cell)> + '_ {
        Direction::ALL
            .into_iter()
            .filter_map(move |direction| Some((direction, self.step(cell, direction)?)))
    }

    /// Every open edge, once
    pub fn passages(&self) -> impl Iterator<Item = (Cell, Cell)> + '_ {
        self.shape.cells().flat_map(move |cell| {
            [Direction::South, Direction::East]
                .into_iter()
                .filter_map(move |direction| Some((cell, self.step(cell, direction)?)))
        })
    }

    /// Draw the maze as text, filling each cell with the character chosen by `fill`
    pub fn ascii(&self, mut fill: impl FnMut(Cell) -> char) -> String {
        let mut out = String::with_capacity((3 * self.shape.cols + 2) * (2 * self.shape.rows + 1));
        let side = |out: &mut String, closed: bool| {
            out.push_str(if closed { "--" } else { "  " });
        };
        for y in 0..self.shape.rows as Coord {
            for x in 0..self.shape.cols as Coord {
                out.push('+');
                side(&mut out, self.is_wall(x, y, Direction::North));
            }
            out.push_str("+\n");
            for x in 0..self.shape.cols as Coord {
                out.push(if self.is_wall(x, y, Direction::West) {
                    '|'
                } else {
                    ' '
                });
                let ch = fill(Cell::new(x, y));
                out.push(ch);
                out.push(ch);
            }
            out.push_str("|\n");
        }
        let last = self.shape.rows as Coord - 1;
        for x in 0..self.shape.cols as Coord {
            out.push('+');
            side(&mut out, self.is_wall(x, last, Direction::South));
        }
        out.push_str("+\n");
        out
    }
}

impl Display for GridMaze {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.ascii(|_| ' '))
    }
}

/// Check the requested extents and raise them to odd values
fn normalize(cols: usize, rows: usize) -> Result<Shape, MazeError> {
    let invalid = MazeError::InvalidDimensions { cols, rows };
    if cols == 0 || rows == 0 {
        return Err(invalid);
    }
    // usize::MAX is odd, so this never overflows
    let shape = Shape {
        cols: cols | 1,
        rows: rows | 1,
    };
    if shape.cols.checked_mul(shape.rows).is_none()
        || Coord::try_from(shape.cols).is_err()
        || Coord::try_from(shape.rows).is_err()
    {
        return Err(invalid);
    }
    Ok(shape)
}

/// A slice of `len` copies of `value`, or `None` if it cannot be allocated
fn filled<T: Clone>(len: usize, value: T) -> Option<Box<[T]>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len).ok()?;
    buf.resize(len, value);
    Some(buf.into_boxed_slice())
}

/// Write `path` cells as `x,y` pairs, separated by arrows
pub fn format_path(path: &[Cell]) -> String {
    path.iter()
        .map(|Cell { x, y }| format!("{x},{y}"))
        .collect::<Vec<_>>()
        .join(" -> ")
}
