#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Greedy enemy heuristic.
//!
//! Every enemy picks a living opponent uniformly at random, takes one step
//! toward it on both axes, and strikes when the step leaves it adjacent to
//! the target. Terrain is ignored entirely.

use grid_tactics_core::{CellCoord, Command, UnitId, UnitView};
use rand::{seq::SliceRandom, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

const ENEMY_STREAM: u64 = 0x656e_656d_79;

/// Pure system that plans enemy actions from a seeded random source.
#[derive(Clone, Debug)]
pub struct EnemyAi {
    rng: ChaCha8Rng,
}

impl EnemyAi {
    /// Creates a planner whose choices are fully determined by `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        rng.set_stream(ENEMY_STREAM);
        Self { rng }
    }

    /// Emits the commands for one enemy's turn.
    ///
    /// The view must reflect every command applied for enemies that acted
    /// earlier in the phase. Units missing from the view, and enemies without
    /// living opponents, produce no commands.
    pub fn plan(&mut self, enemy: UnitId, units: &UnitView, out: &mut Vec<Command>) {
        let Some(actor) = units.get(enemy) else {
            return;
        };
        let candidates: Vec<_> = units.team(actor.team.opponent()).collect();
        let Some(target) = candidates.choose(&mut self.rng) else {
            return;
        };

        let (dx, dy) = step_toward(actor.cell, target.cell);
        let landing = actor.cell.offset(dx, dy).unwrap_or(actor.cell);
        if (dx, dy) != (0, 0) {
            out.push(Command::StepUnit { unit: enemy, dx, dy });
        }

        let strikes = landing.chebyshev_distance(target.cell) <= 1;
        debug!(
            enemy = enemy.get(),
            target = target.id.get(),
            ?landing,
            strikes,
            "enemy planned"
        );
        if strikes {
            out.push(Command::Attack {
                attacker: enemy,
                target: target.id,
            });
        }
    }
}

fn step_toward(from: CellCoord, to: CellCoord) -> (i32, i32) {
    let axis = |start: u32, end: u32| match end.cmp(&start) {
        std::cmp::Ordering::Greater => 1,
        std::cmp::Ordering::Less => -1,
        std::cmp::Ordering::Equal => 0,
    };
    (axis(from.column(), to.column()), axis(from.row(), to.row()))
}
