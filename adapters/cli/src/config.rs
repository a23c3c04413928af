//! Resolves the game configuration from defaults, a TOML file and flags.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use grid_tactics_core::GameConfig;

use crate::CliArgs;

/// Layers command-line overrides on top of the optional config file.
pub(crate) fn resolve(args: &CliArgs) -> Result<GameConfig> {
    let mut config = match &args.config {
        Some(path) => load(path)?,
        None => GameConfig::default(),
    };

    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(grid_size) = args.grid_size {
        config.grid_size = grid_size;
    }
    if let Some(move_radius) = args.move_radius {
        config.move_radius = move_radius;
    }
    if let Some(probability) = args.obstacle_probability {
        config.obstacle_probability = probability;
    }

    config.validate().context("invalid game configuration")?;
    Ok(config)
}

fn load(path: &Path) -> Result<GameConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    parse(&contents).with_context(|| format!("failed to parse config file {}", path.display()))
}

fn parse(contents: &str) -> Result<GameConfig> {
    toml::from_str(contents).context("config is not valid TOML")
}
