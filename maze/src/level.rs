use rand::{Rng, SeedableRng};
use rand_wyrand::WyRand;

use crate::{Cell, Config, Coord, Direction, GridMaze, MazeError, Path, PathFinder, Search};

/// Outcome of a movement request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    /// A wall is in the way, the player did not move
    Blocked,
    /// The player moved to this cell
    Moved(Cell),
    /// The player moved onto the goal
    ReachedGoal(Cell),
}

/// A maze with its endpoints and the player walking it
#[derive(Debug, Clone)]
pub struct Level {
    index: u64,
    maze: GridMaze,
    start: Cell,
    goal: Cell,
    player: Cell,
}

impl Level {
    /// Build the level number `index` of a run
    ///
    /// Each level has its own seed, so it can be rebuilt on its own.
    pub fn generate(config: &Config, index: u64) -> Result<Self, MazeError> {
        config.validate()?;
        let mut rng = WyRand::seed_from_u64(config.seed.wrapping_add(index));
        let cols = rng.gen_range(config.min_size..=config.max_size);
        let rows = rng.gen_range(config.min_size..=config.max_size);
        log::debug!("Level {index}: drawing a {cols}x{rows} maze");
        let maze = GridMaze::new(cols, rows, &mut rng)?;
        Ok(Self::with_maze(index, maze))
    }

    /// Wrap an existing maze, from its top-left to its bottom-right corner
    pub fn with_maze(index: u64, maze: GridMaze) -> Self {
        let start = Cell::ORIGIN;
        let goal = Cell::new(maze.cols() as Coord - 1, maze.rows() as Coord - 1);
        Self {
            index,
            maze,
            start,
            goal,
            player: start,
        }
    }

    #[must_use]
    pub fn index(&self) -> u64 {
        self.index
    }

    #[must_use]
    pub fn maze(&self) -> &GridMaze {
        &self.maze
    }

    #[must_use]
    pub fn start(&self) -> Cell {
        self.start
    }

    #[must_use]
    pub fn goal(&self) -> Cell {
        self.goal
    }

    #[must_use]
    pub fn player(&self) -> Cell {
        self.player
    }

    /// Try to move the player one cell toward `direction`
    pub fn move_player(&mut self, direction: Direction) -> Move {
        match self.maze.step(self.player, direction) {
            None => {
                log::trace!("{:?}: {direction:?} is blocked", self.player);
                Move::Blocked
            }
            Some(next) => {
                self.player = next;
                if next == self.goal {
                    log::debug!("Level {}: goal reached", self.index);
                    Move::ReachedGoal(next)
                } else {
                    Move::Moved(next)
                }
            }
        }
    }

    pub fn reset_player(&mut self) {
        self.player = self.start;
    }

    /// Shortest path from the start to the goal
    #[must_use]
    pub fn solution(&self) -> Option<Path> {
        PathFinder::shortest_path(&self.maze, self.start, self.goal)
    }

    /// Animated search from the start to the goal
    #[must_use]
    pub fn search(&self) -> Search<'_> {
        PathFinder::animated_search(&self.maze, self.start, self.goal)
    }
}

#[cfg(test)]
mod tests {
    use super::{Level, Move};
    use crate::{Config, Direction, MazeError};

    fn config(seed: u64) -> Config {
        Config {
            seed,
            min_size: 5,
            max_size: 9,
        }
    }

    #[test]
    fn sizes_in_range() {
        for index in 0..20 {
            let level = Level::generate(&config(3), index).unwrap();
            for extent in [level.maze().cols(), level.maze().rows()] {
                assert!((5..=9).contains(&extent));
                assert_eq!(extent % 2, 1);
            }
            assert_eq!(level.start(), level.player());
            assert_eq!(level.goal().x as usize, level.maze().cols() - 1);
            assert_eq!(level.goal().y as usize, level.maze().rows() - 1);
        }
    }

    #[test]
    fn levels_are_reproducible() {
        let a = Level::generate(&config(11), 4).unwrap();
        let b = Level::generate(&config(11), 4).unwrap();
        assert_eq!(a.maze(), b.maze());
    }

    #[test]
    fn bad_config() {
        let config = Config {
            seed: 0,
            min_size: 9,
            max_size: 5,
        };
        assert!(matches!(
            Level::generate(&config, 0),
            Err(MazeError::InvalidSizeRange { min: 9, max: 5 })
        ));
    }

    #[test]
    fn walls_block_the_player() {
        let mut level = Level::generate(&config(0), 0).unwrap();
        // the start is the top-left corner
        assert_eq!(level.move_player(Direction::North), Move::Blocked);
        assert_eq!(level.move_player(Direction::West), Move::Blocked);
        assert_eq!(level.player(), level.start());
    }

    #[test]
    fn following_the_solution_wins() {
        let mut level = Level::generate(&config(8), 2).unwrap();
        let path = level.solution().unwrap();
        let mut outcome = None;
        for pair in path.windows(2) {
            let direction = Direction::ALL
                .into_iter()
                .find(|d| pair[0].towards(*d) == Some(pair[1]))
                .unwrap();
            outcome = Some(level.move_player(direction));
        }
        assert_eq!(outcome, Some(Move::ReachedGoal(level.goal())));
        level.reset_player();
        assert_eq!(level.player(), level.start());
    }
}
