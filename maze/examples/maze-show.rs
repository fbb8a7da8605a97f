use std::{collections::HashSet, fs::read_to_string, path::PathBuf};

use anyhow::{bail, Context};
use clap::Parser;
use simple_logger::SimpleLogger;

use grid_maze::config::PartialConfig;
use grid_maze::{format_path, Cell, Direction, Level, Step};

#[derive(Debug, Parser)]
struct Args {
    /// Configuration file for the run
    #[clap(short)]
    config: Option<PathBuf>,
    /// Overrides of the configuration file
    #[clap(flatten)]
    overrides: PartialConfig,
    /// Level to render
    #[clap(short, long, default_value = "0")]
    level: u64,
    /// Draw the solution
    #[clap(short, long)]
    solution: bool,
    /// Draw the cells the search visited before reaching the goal
    #[clap(short, long)]
    trace: bool,
    /// Output file
    #[clap(short, long)]
    output: PathBuf,
}

const TILE_SIZE: u32 = 10;
const WALL_SIZE: u32 = 1;
const WALL_COLOR: [u8; 3] = [0, 0, 0];
const FLOOR_COLOR: [u8; 3] = [230, 230, 250];
const VISITED_COLOR: [u8; 3] = [150, 150, 150];
const PATH_COLOR: [u8; 3] = [255, 255, 0];
const START_COLOR: [u8; 3] = [0, 0, 255];
const GOAL_COLOR: [u8; 3] = [0, 255, 0];

fn main() -> anyhow::Result<()> {
    SimpleLogger::new()
        .without_timestamps()
        .with_level(if cfg!(debug_assertions) {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .env()
        .init()
        .context("While initializing logging")?;

    let Args {
        config,
        overrides,
        level,
        solution,
        trace,
        output,
    } = Args::parse();
    let config = config
        .map(|path| {
            read_to_string(path)
                .context("Cannot read config file")
                .and_then(|s| {
                    toml::from_str::<PartialConfig>(&s).context("Cannot parse config file")
                })
        })
        .transpose()
        .context("While loading configs")?
        .unwrap_or_default()
        .merge(overrides)
        .or_defaults();

    let level = Level::generate(&config, level).context("While generating the level")?;
    let maze = level.maze();
    log::info!("Level {}: {}x{}", level.index(), maze.cols(), maze.rows());

    let mut path = HashSet::new();
    let mut visited = HashSet::new();
    if solution || trace {
        for step in level.search() {
            match step {
                Step::Visit(snapshot) => visited = snapshot.visited,
                Step::Found(found) => {
                    log::info!("Solution: {}", format_path(&found));
                    if solution {
                        path.extend(found);
                    }
                }
                Step::NotFound => bail!("The level has no solution"),
            }
        }
    }
    if !trace {
        visited.clear();
    }

    let floor = |cell: Cell| {
        if cell == level.start() {
            START_COLOR
        } else if cell == level.goal() {
            GOAL_COLOR
        } else if path.contains(&cell) {
            PATH_COLOR
        } else if visited.contains(&cell) {
            VISITED_COLOR
        } else {
            FLOOR_COLOR
        }
    };

    let mut image = image::RgbImage::new(
        TILE_SIZE * maze.cols() as u32,
        TILE_SIZE * maze.rows() as u32,
    );
    for cell in maze.shape().cells() {
        let [left, top] = [cell.x, cell.y].map(|c| c as u32 * TILE_SIZE);
        let color = floor(cell);
        for x in left..left + TILE_SIZE {
            for y in top..top + TILE_SIZE {
                image[(x, y)].0 = color;
            }
        }
        // corners are always walled
        for x in [left, left + TILE_SIZE - WALL_SIZE] {
            for y in [top, top + TILE_SIZE - WALL_SIZE] {
                image[(x, y)].0 = WALL_COLOR;
            }
        }
        let walled = |direction| maze.is_wall(cell.x, cell.y, direction);
        if walled(Direction::North) {
            for x in left..left + TILE_SIZE {
                for y in top..top + WALL_SIZE {
                    image[(x, y)].0 = WALL_COLOR;
                }
            }
        }
        if walled(Direction::South) {
            for x in left..left + TILE_SIZE {
                for y in top + TILE_SIZE - WALL_SIZE..top + TILE_SIZE {
                    image[(x, y)].0 = WALL_COLOR;
                }
            }
        }
        if walled(Direction::West) {
            for x in left..left + WALL_SIZE {
                for y in top..top + TILE_SIZE {
                    image[(x, y)].0 = WALL_COLOR;
                }
            }
        }
        if walled(Direction::East) {
            for x in left + TILE_SIZE - WALL_SIZE..left + TILE_SIZE {
                for y in top..top + TILE_SIZE {
                    image[(x, y)].0 = WALL_COLOR;
                }
            }
        }
    }
    image.save(output).context("While saving the image")?;
    Ok(())
}
