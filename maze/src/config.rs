use clap::Parser;
use serde::{Deserialize, Serialize};

use crate::MazeError;

/// Config for a run of levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Seed of the first level
    pub seed: u64,
    /// Smallest extent a level can be drawn with
    pub min_size: usize,
    /// Largest extent a level can be drawn with
    /// Levels can end up one cell larger, as extents are made odd
    pub max_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: 0,
            min_size: 15,
            max_size: 35,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), MazeError> {
        if self.min_size == 0 || self.min_size > self.max_size {
            return Err(MazeError::InvalidSizeRange {
                min: self.min_size,
                max: self.max_size,
            });
        }
        Ok(())
    }
}

/// Partial config for a run of levels
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Parser, Default)]
pub struct PartialConfig {
    /// Seed of the first level
    #[clap(long)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Smallest extent a level can be drawn with
    #[clap(long)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_size: Option<usize>,
    /// Largest extent a level can be drawn with
    #[clap(long)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_size: Option<usize>,
}

impl PartialConfig {
    pub fn merge(self, other: PartialConfig) -> Self {
        Self {
            seed: other.seed.or(self.seed),
            min_size: other.min_size.or(self.min_size),
            max_size: other.max_size.or(self.max_size),
        }
    }
    pub fn or_defaults(self) -> Config {
        let default = Config::default();
        Config {
            seed: self.seed.unwrap_or(default.seed),
            min_size: self.min_size.unwrap_or(default.min_size),
            max_size: self.max_size.unwrap_or(default.max_size),
        }
    }
}
