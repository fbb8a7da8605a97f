use std::{
    collections::{HashMap, HashSet, VecDeque},
    iter::FusedIterator,
};

use crate::{Cell, GridMaze};

/// Cells from a start to a goal, each one open to the next
pub type Path = Vec<Cell>;

/// Breadth-first solver for a [`GridMaze`]
///
/// Holds no state: every call starts a fresh search.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathFinder;

impl PathFinder {
    /// The shortest path from `start` to `goal`
    ///
    /// In a generated maze every pair of in-bounds cells is connected, so `None` means one
    /// of the endpoints is outside the grid.
    #[must_use]
    pub fn shortest_path(maze: &GridMaze, start: Cell, goal: Cell) -> Option<Path> {
        let mut search = Search::new(maze, start, goal);
        while let Some(cell) = search.advance() {
            if cell == goal {
                let path = search.trace(cell);
                log::debug!(
                    "{start:?} -> {goal:?}: found a path of {} cells after visiting {}",
                    path.len(),
                    search.visited.len()
                );
                return Some(path);
            }
        }
        search.not_found();
        None
    }

    /// The same search as [`PathFinder::shortest_path`], one dequeued cell at a time
    #[must_use]
    pub fn animated_search(maze: &GridMaze, start: Cell, goal: Cell) -> Search<'_> {
        Search::new(maze, start, goal)
    }
}

/// State of the search when a cell is dequeued
///
/// Each snapshot owns a copy of the visited set, so a full animated search costs
/// time and memory quadratic in the number of cells. Use [`PathFinder::shortest_path`]
/// when only the path is needed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// The dequeued cell
    pub cell: Cell,
    /// How the search reached `cell`
    pub path: Path,
    /// Cells discovered so far
    pub visited: HashSet<Cell>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// A cell was dequeued
    Visit(Snapshot),
    /// The goal was dequeued, this is the shortest path to it
    Found(Path),
    /// The queue ran out without reaching the goal
    NotFound,
}

#[derive(Debug)]
enum State {
    Searching,
    Found(Path),
    Done,
}

/// A breadth-first search in progress
///
/// Yields a [`Step::Visit`] per dequeued cell, the goal included, then a single
/// [`Step::Found`] or [`Step::NotFound`]. Dropping it abandons the search.
#[derive(Debug)]
pub struct Search<'m> {
    maze: &'m GridMaze,
    start: Cell,
    goal: Cell,
    queue: VecDeque<Cell>,
    visited: HashSet<Cell>,
    /// Cell each discovered cell was reached from
    parents: HashMap<Cell, Cell>,
    state: State,
}

impl<'m> Search<'m> {
    fn new(maze: &'m GridMaze, start: Cell, goal: Cell) -> Self {
        let mut queue = VecDeque::new();
        let mut visited = HashSet::new();
        if maze.contains(&start) {
            queue.push_back(start);
            visited.insert(start);
        } else {
            log::warn!("{start:?}: search started outside of the maze");
        }
        Self {
            maze,
            start,
            goal,
            queue,
            visited,
            parents: HashMap::new(),
            state: State::Searching,
        }
    }

    /// Dequeue a cell and, unless it is the goal, enqueue its undiscovered neighbours
    fn advance(&mut self) -> Option<Cell> {
        let cell = self.queue.pop_front()?;
        if cell == self.goal {
            return Some(cell);
        }
        for (_, next) in self.maze.neighbours(cell) {
            if self.visited.insert(next) {
                log::trace!("{cell:?}: discovered {next:?}");
                self.parents.insert(next, cell);
                self.queue.push_back(next);
            }
        }
        Some(cell)
    }

    /// Path from the start to a discovered cell
    fn trace(&self, cell: Cell) -> Path {
        let mut path = vec![cell];
        let mut current = cell;
        while let Some(&parent) = self.parents.get(&current) {
            path.push(parent);
            current = parent;
        }
        debug_assert_eq!(current, self.start);
        path.reverse();
        path
    }

    fn not_found(&self) {
        log::debug!("{:?} -> {:?}: no path", self.start, self.goal);
        if self.maze.contains(&self.start) && self.maze.contains(&self.goal) {
            log::error!(
                "{:?} -> {:?}: the maze is not connected, generation is broken",
                self.start,
                self.goal
            );
            debug_assert!(false, "Every pair of cells of a maze should be connected");
        }
    }

    #[must_use]
    pub fn start(&self) -> Cell {
        self.start
    }

    #[must_use]
    pub fn goal(&self) -> Cell {
        self.goal
    }

    /// Number of discovered cells
    #[must_use]
    pub fn discovered(&self) -> usize {
        self.visited.len()
    }
}

impl Iterator for Search<'_> {
    type Item = Step;

    fn next(&mut self) -> Option<Self::Item> {
        match std::mem::replace(&mut self.state, State::Done) {
            State::Done => None,
            State::Found(path) => Some(Step::Found(path)),
            State::Searching => {
                // snapshot the visited set before the dequeued cell is expanded
                let visited = self.visited.clone();
                let Some(cell) = self.advance() else {
                    self.not_found();
                    return Some(Step::NotFound);
                };
                let path = self.trace(cell);
                self.state = if cell == self.goal {
                    State::Found(path.clone())
                } else {
                    State::Searching
                };
                Some(Step::Visit(Snapshot {
                    cell,
                    path,
                    visited,
                }))
            }
        }
    }
}

impl FusedIterator for Search<'_> {}

#[cfg(test)]
mod tests {
    mod shortest_path {
        use crate::{Cell, GridMaze, PathFinder};

        #[test]
        fn start_is_goal() {
            let maze = GridMaze::seeded(5, 5, 0).unwrap();
            let c = Cell::new(2, 3);
            assert_eq!(PathFinder::shortest_path(&maze, c, c), Some(vec![c]));
        }

        #[test]
        fn single_row() {
            let maze = GridMaze::seeded(5, 1, 9).unwrap();
            let path = PathFinder::shortest_path(&maze, Cell::new(0, 0), Cell::new(4, 0)).unwrap();
            assert_eq!(
                path,
                (0..5).map(|x| Cell::new(x, 0)).collect::<Vec<_>>()
            );
        }

        #[test]
        fn reversed_is_reverse() {
            let maze = GridMaze::seeded(15, 11, 4).unwrap();
            let [a, b] = [Cell::new(0, 0), Cell::new(14, 10)];
            let mut there = PathFinder::shortest_path(&maze, a, b).unwrap();
            let back = PathFinder::shortest_path(&maze, b, a).unwrap();
            there.reverse();
            assert_eq!(there, back);
        }

        #[test]
        fn outside_start() {
            let maze = GridMaze::seeded(3, 3, 0).unwrap();
            assert_eq!(
                PathFinder::shortest_path(&maze, Cell::new(-1, 0), Cell::new(2, 2)),
                None
            );
        }
    }

    mod animated {
        use std::collections::HashSet;

        use rand::rngs::mock::StepRng;

        use crate::{Cell, GridMaze, PathFinder, Step};

        /// The 3x3 maze carved by always taking the first open direction
        fn serpentine() -> GridMaze {
            GridMaze::new(3, 3, &mut StepRng::new(0, 0)).unwrap()
        }

        #[test]
        fn first_snapshot_holds_only_the_start() {
            let maze = serpentine();
            let start = Cell::new(1, 1);
            let Some(Step::Visit(first)) =
                PathFinder::animated_search(&maze, start, Cell::new(2, 2)).next()
            else {
                panic!("search should start with a visit")
            };
            assert_eq!(first.cell, start);
            assert_eq!(first.path, vec![start]);
            assert_eq!(first.visited, HashSet::from([start]));
        }

        #[test]
        fn visit_order() {
            let maze = serpentine();
            let mut visits = vec![];
            let mut found = None;
            for step in PathFinder::animated_search(&maze, Cell::new(1, 1), Cell::new(2, 2)) {
                match step {
                    Step::Visit(snap) => {
                        visits.push(((snap.cell.x, snap.cell.y), snap.visited.len()))
                    }
                    Step::Found(path) => found = Some(path),
                    Step::NotFound => panic!("the goal is reachable"),
                }
            }
            assert_eq!(
                visits,
                [
                    ((1, 1), 1),
                    ((1, 0), 3),
                    ((1, 2), 4),
                    ((2, 0), 5),
                    ((0, 2), 6),
                    ((2, 1), 7),
                    ((0, 1), 8),
                    ((2, 2), 9),
                ]
            );
            assert_eq!(
                found,
                Some(
                    [(1, 1), (1, 0), (2, 0), (2, 1), (2, 2)]
                        .map(|(x, y)| Cell::new(x, y))
                        .to_vec()
                )
            );
        }

        #[test]
        fn ends_like_shortest_path() {
            let maze = GridMaze::seeded(11, 7, 21).unwrap();
            let [start, goal] = [Cell::new(0, 0), Cell::new(10, 6)];
            let steps = PathFinder::animated_search(&maze, start, goal).collect::<Vec<_>>();
            let expected = PathFinder::shortest_path(&maze, start, goal).unwrap();
            let Some(Step::Found(path)) = steps.last() else {
                panic!("search should end with the path")
            };
            assert_eq!(*path, expected);
            // the goal is visited just before the end
            let Step::Visit(last) = &steps[steps.len() - 2] else {
                panic!("goal should be visited")
            };
            assert_eq!(last.cell, goal);
            assert_eq!(last.path, expected);
        }

        #[test]
        fn one_visit_per_cell_at_most() {
            let maze = GridMaze::seeded(9, 9, 2).unwrap();
            let visits = PathFinder::animated_search(&maze, Cell::new(0, 0), Cell::new(8, 8))
                .filter_map(|s| match s {
                    Step::Visit(snap) => Some(snap.cell),
                    _ => None,
                })
                .collect::<Vec<_>>();
            let unique = visits.iter().collect::<std::collections::HashSet<_>>();
            assert_eq!(unique.len(), visits.len());
            assert!(visits.len() <= 81);
        }

        #[test]
        fn snapshots_grow() {
            let maze = GridMaze::seeded(7, 7, 5).unwrap();
            let mut previous = 0;
            for step in PathFinder::animated_search(&maze, Cell::new(3, 3), Cell::new(0, 6)) {
                if let Step::Visit(snap) = step {
                    assert!(snap.visited.len() >= previous);
                    assert!(snap.visited.contains(&snap.cell));
                    assert_eq!(snap.path.first(), Some(&Cell::new(3, 3)));
                    assert_eq!(snap.path.last(), Some(&snap.cell));
                    previous = snap.visited.len();
                }
            }
        }

        #[test]
        fn fused_after_the_end() {
            let maze = GridMaze::seeded(3, 3, 0).unwrap();
            let mut search = PathFinder::animated_search(&maze, Cell::new(0, 0), Cell::new(0, 0));
            assert!(matches!(search.next(), Some(Step::Visit(_))));
            assert_eq!(search.next(), Some(Step::Found(vec![Cell::new(0, 0)])));
            assert_eq!(search.next(), None);
            assert_eq!(search.next(), None);
        }

        #[test]
        fn outside_goal_is_not_found() {
            let maze = GridMaze::seeded(3, 3, 0).unwrap();
            let steps = PathFinder::animated_search(&maze, Cell::new(0, 0), Cell::new(3, 3))
                .collect::<Vec<_>>();
            assert_eq!(steps.len(), 10);
            assert_eq!(steps.last(), Some(&Step::NotFound));
        }
    }
}
