#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays Grid Tactics in a terminal.

mod app;
mod config;
mod input;
mod scene;
mod terminal;

use std::{io, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use grid_tactics_rendering::Palette;
use grid_tactics_session::Session;
use grid_tactics_world::query;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::{
    app::RunOptions,
    input::TerminalKeys,
    terminal::{TerminalGuard, TerminalRenderer},
};

/// Turn-based skirmish on a square grid, played in the terminal.
#[derive(Debug, Parser)]
#[command(name = "grid-tactics", version, about, long_about = None)]
struct CliArgs {
    /// TOML file with game configuration; flags override its values
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Seed for terrain generation and the enemy heuristic
    #[arg(long)]
    seed: Option<u64>,

    /// Number of cells along each grid edge
    #[arg(long)]
    grid_size: Option<u32>,

    /// Chebyshev radius a unit may move per turn
    #[arg(long)]
    move_radius: Option<u32>,

    /// Probability that a generated cell is blocked
    #[arg(long)]
    obstacle_probability: Option<f64>,

    /// Draw moves in a single frame instead of animating them
    #[arg(long)]
    no_animate: bool,

    /// Draw the grid without colors
    #[arg(long)]
    plain: bool,
}

/// Entry point for the Grid Tactics command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = CliArgs::parse();
    let config = config::resolve(&args)?;

    let session = Session::new(&config).context("failed to start session")?;
    info!(
        seed = config.seed,
        grid_size = query::grid_size(session.world()),
        "session started"
    );

    let _guard = TerminalGuard::enter()?;
    let mut renderer = TerminalRenderer::new(io::stdout().lock(), !args.plain).clearing_screen();
    let options = RunOptions {
        animate: !args.no_animate,
        palette: Palette::default(),
    };

    app::run(session, &mut renderer, TerminalKeys, &options)
}
