use std::{fs::read_to_string, io::BufRead, path::PathBuf, time::Duration};

use anyhow::{bail, Context};
use clap::Parser;
use simple_logger::SimpleLogger;

use grid_maze::config::PartialConfig;
use grid_maze::{format_path, Direction, Level, Move, Step};

#[derive(Debug, Parser)]
struct Args {
    /// Configuration file for the run
    #[clap(short)]
    config: Option<PathBuf>,
    /// Overrides of the configuration file
    #[clap(flatten)]
    overrides: PartialConfig,
    /// Level to start from
    #[clap(short, long, default_value = "0")]
    level: u64,
    /// Milliseconds between two frames of the search
    #[clap(short, long, default_value = "30")]
    delay: u64,
    /// Walk the maze from stdin (n, s, e, w) instead of watching the search
    #[clap(short, long)]
    play: bool,
}

const CLEAR: &str = "\x1b[2J\x1b[H";

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    SimpleLogger::new()
        .without_timestamps()
        .with_level(log::LevelFilter::Warn)
        .env()
        .init()
        .context("While initializing logging")?;

    let Args {
        config,
        overrides,
        level,
        delay,
        play,
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

    let mut level = Level::generate(&config, level).context("While generating the level")?;
    if play {
        walk(&mut level)
    } else {
        animate(&level, Duration::from_millis(delay)).await
    }
}

/// Play the search one snapshot per frame
async fn animate(level: &Level, delay: Duration) -> anyhow::Result<()> {
    let mut search = level.search();
    while let Some(step) = search.next() {
        match step {
            Step::Visit(snapshot) => {
                let frame = level.maze().ascii(|cell| {
                    if cell == search.start() {
                        'S'
                    } else if cell == search.goal() {
                        'G'
                    } else if snapshot.path.contains(&cell) {
                        '#'
                    } else if snapshot.visited.contains(&cell) {
                        '.'
                    } else {
                        ' '
                    }
                });
                println!(
                    "{CLEAR}Level {} - searching, {} cells discovered\n{frame}",
                    level.index() + 1,
                    search.discovered()
                );
                tokio::time::sleep(delay).await;
            }
            Step::Found(path) => {
                println!("Path found, {} steps: {}", path.len() - 1, format_path(&path));
                return Ok(());
            }
            Step::NotFound => bail!("No path found"),
        }
    }
    Ok(())
}

/// Move the player with lines read from stdin
fn walk(level: &mut Level) -> anyhow::Result<()> {
    let draw = |level: &Level| {
        level.maze().ascii(|cell| {
            if cell == level.player() {
                '@'
            } else if cell == level.goal() {
                'G'
            } else {
                ' '
            }
        })
    };
    println!("Level {} - find the exit!\n{}", level.index() + 1, draw(level));
    for line in std::io::stdin().lock().lines() {
        let line = line.context("While reading moves")?;
        for ch in line.chars() {
            let direction = match ch.to_ascii_lowercase() {
                'n' | 'k' => Direction::North,
                's' | 'j' => Direction::South,
                'e' | 'l' => Direction::East,
                'w' | 'h' => Direction::West,
                _ => continue,
            };
            match level.move_player(direction) {
                Move::Blocked => println!("{direction:?}: there is a wall"),
                Move::Moved(_) => (),
                Move::ReachedGoal(_) => {
                    println!("{}You won!", draw(level));
                    return Ok(());
                }
            }
        }
        println!("{}", draw(level));
    }
    Ok(())
}
