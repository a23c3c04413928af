#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Top-level game session that owns the world and drives every system.
//!
//! The session is the only caller of [`grid_tactics_world::apply`]. Each
//! input is resolved by the turn controller, the resulting commands are
//! applied, and once every player unit has acted the enemy phase runs before
//! the next round begins. The outcome is re-evaluated after every applied
//! command batch.

use grid_tactics_core::{
    Command, ConfigError, Event, GameConfig, InputEvent, Outcome, SnapshotError, Team,
    WorldSnapshot,
};
use grid_tactics_system_bootstrap::Bootstrap;
use grid_tactics_system_enemy_ai::EnemyAi;
use grid_tactics_system_turns::TurnController;
use grid_tactics_world::{self as world, query, World};
use thiserror::Error;
use tracing::{debug, info};

pub use grid_tactics_system_turns::{InputOutcome, TurnState};

/// Errors raised while starting a session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The configuration failed validation.
    #[error("invalid configuration")]
    Config(#[from] ConfigError),
    /// The snapshot could not be turned into a world.
    #[error("invalid world snapshot")]
    Snapshot(#[from] SnapshotError),
}

/// Everything that happened while resolving one input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StepReport {
    /// How the turn controller interpreted the input.
    pub outcome: InputOutcome,
    /// Events broadcast by the world, in application order.
    pub events: Vec<Event>,
    /// Whether the enemy phase ran as a consequence of the input.
    pub enemy_phase_ran: bool,
}

/// Running skirmish between the player and enemy squads.
#[derive(Debug)]
pub struct Session {
    world: World,
    controller: TurnController,
    enemy_ai: EnemyAi,
    outcome: Option<Outcome>,
    quit: bool,
}

impl Session {
    /// Generates terrain, deploys the default squads and starts the first round.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Config`] when the configuration is invalid.
    pub fn new(config: &GameConfig) -> Result<Self, SessionError> {
        let world = World::new(config)?;
        let mut commands = Vec::new();
        Bootstrap.deploy_default_squads(&world, &mut commands);
        Ok(Self::start(world, config, commands))
    }

    /// Resumes from a snapshot, starting a fresh round with the stored units.
    ///
    /// The grid size comes from the snapshot; the move radius and seed come
    /// from `config`.
    ///
    /// # Errors
    ///
    /// Returns a [`SessionError`] when the configuration or the snapshot is invalid.
    pub fn from_snapshot(
        snapshot: WorldSnapshot,
        config: &GameConfig,
    ) -> Result<Self, SessionError> {
        config.validate()?;
        let stale_selection: Vec<Command> = snapshot
            .units
            .iter()
            .filter(|unit| unit.is_selected)
            .map(|unit| Command::ReleaseUnit { unit: unit.id })
            .collect();
        let world = World::from_snapshot(snapshot)?;
        Ok(Self::start(world, config, stale_selection))
    }

    fn start(world: World, config: &GameConfig, setup: Vec<Command>) -> Self {
        let mut session = Self {
            world,
            controller: TurnController::new(config.move_radius),
            enemy_ai: EnemyAi::new(config.seed),
            outcome: None,
            quit: false,
        };
        let mut events = Vec::new();
        session.apply_batch(setup, &mut events);
        if session.outcome.is_none() {
            session.begin_round(&mut events);
        }
        session
    }

    /// Read-only access to the authoritative world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Read-only access to the turn controller.
    #[must_use]
    pub fn controller(&self) -> &TurnController {
        &self.controller
    }

    /// Result of the skirmish once a roster has been wiped out.
    #[must_use]
    pub const fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// Reports whether the session accepts no further input.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.quit || self.outcome.is_some()
    }

    /// Captures the current world state.
    #[must_use]
    pub fn snapshot(&self) -> WorldSnapshot {
        query::snapshot(&self.world)
    }

    /// Resolves one input event, running the enemy phase when the round's
    /// last player unit commits its action.
    pub fn handle_input(&mut self, input: InputEvent) -> StepReport {
        let mut events = Vec::new();
        if self.is_finished() {
            return StepReport {
                outcome: InputOutcome::Ignored,
                events,
                enemy_phase_ran: false,
            };
        }

        let mut commands = Vec::new();
        let units = query::unit_view(&self.world);
        let outcome = self.controller.handle(
            input,
            query::terrain_view(&self.world),
            &units,
            &mut commands,
        );
        match outcome {
            InputOutcome::QuitRequested => {
                info!(round = self.controller.round(), "session quit");
                self.quit = true;
            }
            InputOutcome::Rejected(reason) => debug!(%reason, "input rejected"),
            _ => {}
        }
        self.apply_batch(commands, &mut events);

        let mut enemy_phase_ran = false;
        if matches!(outcome, InputOutcome::ActionCommitted { .. }) && self.outcome.is_none() {
            let mut follow_up = Vec::new();
            self.controller
                .advance(&query::unit_view(&self.world), &mut follow_up);
            self.apply_batch(follow_up, &mut events);

            if self.controller.state() == &TurnState::EnemyPhase {
                self.run_enemy_phase(&mut events);
                enemy_phase_ran = true;
                if self.outcome.is_none() {
                    self.begin_round(&mut events);
                }
            }
        }

        StepReport {
            outcome,
            events,
            enemy_phase_ran,
        }
    }

    fn begin_round(&mut self, events: &mut Vec<Event>) {
        let mut commands = Vec::new();
        self.controller
            .begin_round(&query::unit_view(&self.world), &mut commands);
        info!(round = self.controller.round(), "round started");
        self.apply_batch(commands, events);
    }

    fn run_enemy_phase(&mut self, events: &mut Vec<Event>) {
        let enemies: Vec<_> = query::unit_view(&self.world)
            .team(Team::Enemy)
            .map(|unit| unit.id)
            .collect();

        for enemy in enemies {
            if self.outcome.is_some() {
                break;
            }
            let mut commands = Vec::new();
            self.enemy_ai
                .plan(enemy, &query::unit_view(&self.world), &mut commands);
            self.apply_batch(commands, events);
        }
    }

    fn apply_batch(&mut self, commands: Vec<Command>, events: &mut Vec<Event>) {
        if commands.is_empty() {
            self.refresh_outcome();
            return;
        }

        let first_new = events.len();
        for command in commands {
            world::apply(&mut self.world, command, events);
        }
        for event in &events[first_new..] {
            if let Event::UnitDefeated { unit, team, cell } = event {
                info!(unit = unit.get(), ?team, ?cell, "unit defeated");
            }
        }
        self.refresh_outcome();
    }

    fn refresh_outcome(&mut self) {
        if self.outcome.is_some() {
            return;
        }
        let units = query::unit_view(&self.world);
        self.outcome = if units.count(Team::Enemy) == 0 {
            Some(Outcome::Victory)
        } else if units.count(Team::Player) == 0 {
            Some(Outcome::Defeat)
        } else {
            None
        };
        if let Some(outcome) = self.outcome {
            info!(?outcome, round = self.controller.round(), "session decided");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grid_tactics_core::{CellCoord, UnitId};

    #[test]
    fn new_session_starts_first_round_with_first_player() {
        let session = Session::new(&GameConfig::default()).expect("session");

        assert_eq!(session.controller().round(), 1);
        assert_eq!(session.controller().active_unit(), Some(UnitId::new(0)));
        assert_eq!(session.outcome(), None);
        let view = query::unit_view(session.world());
        assert!(view.get(UnitId::new(0)).expect("player").is_selected);
        assert_eq!(view.count(Team::Enemy), 2);
    }

    #[test]
    fn invalid_config_is_reported() {
        let config = GameConfig {
            grid_size: 1,
            ..GameConfig::default()
        };
        assert!(matches!(
            Session::new(&config),
            Err(SessionError::Config(ConfigError::GridSize { grid_size: 1 }))
        ));
    }

    #[test]
    fn quit_finishes_without_outcome() {
        let mut session = Session::new(&GameConfig::default()).expect("session");
        let report = session.handle_input(InputEvent::Quit);

        assert_eq!(report.outcome, InputOutcome::QuitRequested);
        assert!(session.is_finished());
        assert_eq!(session.outcome(), None);

        let after = session.handle_input(InputEvent::Confirm);
        assert_eq!(after.outcome, InputOutcome::Ignored);
        assert!(after.events.is_empty());
    }

    #[test]
    fn restored_selection_is_replaced_by_new_round() {
        let session = Session::new(&GameConfig::default()).expect("session");
        let mut snapshot = session.snapshot();
        for unit in &mut snapshot.units {
            unit.is_selected = unit.id == UnitId::new(1);
        }

        let restored = Session::from_snapshot(snapshot, &GameConfig::default()).expect("restore");
        let view = query::unit_view(restored.world());
        let selected: Vec<UnitId> = view
            .iter()
            .filter(|unit| unit.is_selected)
            .map(|unit| unit.id)
            .collect();
        assert_eq!(selected, vec![UnitId::new(0)]);
        assert_eq!(restored.controller().cursor(), Some(CellCoord::new(0, 0)));
    }
}
