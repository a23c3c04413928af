//! Input loop that feeds key presses to the session and redraws the grid.

use std::thread;

use anyhow::Result;
use grid_tactics_core::{Event, InputEvent};
use grid_tactics_rendering::{draw_scene, MoveAnimation, Palette, Renderer};
use grid_tactics_session::{InputOutcome, Session, StepReport};
use tracing::{debug, info};

use crate::scene::build_scene;

/// Presentation settings for the input loop.
#[derive(Clone, Copy, Debug)]
pub(crate) struct RunOptions {
    /// Whether unit moves slide across the grid before the frame settles.
    pub(crate) animate: bool,
    /// Colors handed to the renderer.
    pub(crate) palette: Palette,
}

/// Plays the session until it finishes or the inputs run out.
///
/// Every input is handed to the session and followed by a fresh frame.
pub(crate) fn run<R, I>(
    mut session: Session,
    renderer: &mut R,
    inputs: I,
    options: &RunOptions,
) -> Result<()>
where
    R: Renderer + ?Sized,
    I: IntoIterator<Item = Result<InputEvent>>,
{
    present(&session, renderer, &[], options)?;

    for input in inputs {
        let input = input?;
        let report = session.handle_input(input);
        debug!(?input, outcome = ?report.outcome, "input handled");

        let notices = describe(&report);
        if options.animate {
            animate_moves(&session, renderer, &report.events, &notices, options)?;
        }
        present(&session, renderer, &notices, options)?;

        if session.is_finished() {
            info!(outcome = ?session.outcome(), "session finished");
            break;
        }
    }

    Ok(())
}

fn present<R>(
    session: &Session,
    renderer: &mut R,
    notices: &[String],
    options: &RunOptions,
) -> Result<()>
where
    R: Renderer + ?Sized,
{
    let scene = build_scene(session, notices)?;
    draw_scene(renderer, &scene, &options.palette)
}

fn animate_moves<R>(
    session: &Session,
    renderer: &mut R,
    events: &[Event],
    notices: &[String],
    options: &RunOptions,
) -> Result<()>
where
    R: Renderer + ?Sized,
{
    for event in events {
        let Event::UnitMoved { unit, from, to } = event else {
            continue;
        };
        let mut scene = build_scene(session, notices)?;
        let grid = scene.grid;
        let animation = MoveAnimation::new(*unit, grid.cell_center(*from), grid.cell_center(*to));
        for position in animation {
            if !scene.place_unit(*unit, position) {
                break;
            }
            draw_scene(renderer, &scene, &options.palette)?;
            thread::sleep(MoveAnimation::FRAME_DELAY);
        }
    }
    Ok(())
}

fn describe(report: &StepReport) -> Vec<String> {
    let mut lines = Vec::new();
    match report.outcome {
        InputOutcome::Rejected(reason) => lines.push(format!("Rejected: {reason}")),
        InputOutcome::ActionCommitted {
            wasted: Some(reason),
            ..
        } => lines.push(format!("Skill wasted: {reason}")),
        _ => {}
    }

    for event in &report.events {
        match event {
            Event::UnitDamaged {
                unit,
                amount,
                remaining,
                ..
            } => lines.push(format!(
                "Unit {} took {amount} damage ({remaining} left)",
                unit.get()
            )),
            Event::UnitDefeated { unit, team, .. } => {
                lines.push(format!("{team:?} unit {} was defeated", unit.get()));
            }
            _ => {}
        }
    }
    lines
}
