#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Turn state machine that resolves player input into world commands.
//!
//! Each round walks the living player units in roster order. The active unit
//! either moves to a cell in its accessible set or spends its turn on a skill,
//! after which the controller hands control to the next unit. Once the roster
//! is exhausted the controller parks in [`TurnState::EnemyPhase`] until the
//! caller resolves the enemy moves and starts the next round.

use std::collections::{BTreeSet, VecDeque};

use grid_tactics_core::{
    ActionError, CellCoord, Command, InputEvent, SkillSlot, Team, TerrainView, UnitId, UnitView,
};
use grid_tactics_system_reachability::{accessible_cells, targetable_cells};
use tracing::debug;

/// Phase of the round currently awaiting input or resolution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TurnState {
    /// No unit is active; the next unit is chosen when the round advances.
    PlayerUnitSelect,
    /// The active unit is choosing a destination with the move cursor.
    PlayerCursorMove {
        /// Unit whose turn is in progress.
        unit: UnitId,
        /// Cell under the move cursor.
        cursor: CellCoord,
    },
    /// The active unit is aiming a skill with the targeting cursor.
    SkillTargeting {
        /// Unit whose turn is in progress.
        unit: UnitId,
        /// Loadout slot of the skill being aimed.
        slot: SkillSlot,
        /// Cell under the targeting cursor.
        cursor: CellCoord,
        /// Cells the skill may be confirmed on.
        targetable: BTreeSet<CellCoord>,
    },
    /// The active unit committed its action and awaits [`TurnController::advance`].
    TurnEnd {
        /// Unit whose turn just ended.
        unit: UnitId,
    },
    /// Every player unit has acted this round.
    EnemyPhase,
}

/// Result of feeding one input event to the controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputOutcome {
    /// The input has no meaning in the current state.
    Ignored,
    /// The active cursor moved to a new cell.
    CursorMoved {
        /// Cell now under the cursor.
        cursor: CellCoord,
    },
    /// Targeting began for the skill in the slot.
    TargetingStarted {
        /// Slot of the skill being aimed.
        slot: SkillSlot,
    },
    /// The confirmed cell is not a legal choice; the state is unchanged.
    Rejected(ActionError),
    /// The active unit committed its action and its turn ended.
    ActionCommitted {
        /// Unit whose turn ended.
        unit: UnitId,
        /// Set when the action was spent without effect.
        wasted: Option<ActionError>,
    },
    /// The player asked to end the session.
    QuitRequested,
}

/// Pure system that owns the turn state machine.
#[derive(Debug)]
pub struct TurnController {
    move_radius: u32,
    round: u32,
    pending: VecDeque<UnitId>,
    state: TurnState,
}

impl TurnController {
    /// Creates a controller that lets units move `move_radius` cells per turn.
    #[must_use]
    pub fn new(move_radius: u32) -> Self {
        Self {
            move_radius,
            round: 0,
            pending: VecDeque::new(),
            state: TurnState::PlayerUnitSelect,
        }
    }

    /// Current phase of the round.
    #[must_use]
    pub fn state(&self) -> &TurnState {
        &self.state
    }

    /// One-based index of the current round, zero before the first round starts.
    #[must_use]
    pub const fn round(&self) -> u32 {
        self.round
    }

    /// Chebyshev radius of the move neighbourhood.
    #[must_use]
    pub const fn move_radius(&self) -> u32 {
        self.move_radius
    }

    /// Unit whose turn is in progress, if any.
    #[must_use]
    pub fn active_unit(&self) -> Option<UnitId> {
        match &self.state {
            TurnState::PlayerCursorMove { unit, .. }
            | TurnState::SkillTargeting { unit, .. }
            | TurnState::TurnEnd { unit } => Some(*unit),
            TurnState::PlayerUnitSelect | TurnState::EnemyPhase => None,
        }
    }

    /// Cell under whichever cursor is active, if any.
    #[must_use]
    pub fn cursor(&self) -> Option<CellCoord> {
        match &self.state {
            TurnState::PlayerCursorMove { cursor, .. }
            | TurnState::SkillTargeting { cursor, .. } => Some(*cursor),
            _ => None,
        }
    }

    /// Cells the active unit may move to, empty outside the move phase.
    #[must_use]
    pub fn accessible_cells(
        &self,
        terrain: TerrainView<'_>,
        units: &UnitView,
    ) -> BTreeSet<CellCoord> {
        match &self.state {
            TurnState::PlayerCursorMove { unit, .. } => units
                .get(*unit)
                .map(|snapshot| accessible_cells(terrain, snapshot, self.move_radius))
                .unwrap_or_default(),
            _ => BTreeSet::new(),
        }
    }

    /// Starts a new round by queueing every living player unit in roster order.
    pub fn begin_round(&mut self, units: &UnitView, out: &mut Vec<Command>) {
        self.round = self.round.saturating_add(1);
        self.pending = units.team(Team::Player).map(|unit| unit.id).collect();
        debug!(round = self.round, queued = self.pending.len(), "round queued");
        self.state = TurnState::PlayerUnitSelect;
        self.advance(units, out);
    }

    /// Hands control to the next living player unit once the current turn ended.
    ///
    /// Does nothing while a unit is still choosing its action.
    pub fn advance(&mut self, units: &UnitView, out: &mut Vec<Command>) {
        if !matches!(
            self.state,
            TurnState::PlayerUnitSelect | TurnState::TurnEnd { .. }
        ) {
            return;
        }

        while let Some(next) = self.pending.pop_front() {
            let Some(snapshot) = units.get(next) else {
                continue;
            };
            out.push(Command::SelectUnit { unit: next });
            self.state = TurnState::PlayerCursorMove {
                unit: next,
                cursor: snapshot.cell,
            };
            return;
        }

        self.state = TurnState::EnemyPhase;
    }

    /// Resolves one input event against the current state.
    ///
    /// Commands emitted here must be applied to the world before
    /// [`TurnController::advance`] is called.
    pub fn handle(
        &mut self,
        input: InputEvent,
        terrain: TerrainView<'_>,
        units: &UnitView,
        out: &mut Vec<Command>,
    ) -> InputOutcome {
        if input == InputEvent::Quit {
            return InputOutcome::QuitRequested;
        }

        let grid_size = terrain.size();
        let accessible = self.accessible_cells(terrain, units);

        match (&mut self.state, input) {
            (
                TurnState::PlayerCursorMove { cursor, .. }
                | TurnState::SkillTargeting { cursor, .. },
                InputEvent::Move(direction),
            ) => {
                let (dx, dy) = direction.delta();
                match cursor
                    .offset(dx, dy)
                    .filter(|candidate| candidate.is_within(grid_size))
                {
                    Some(next) => {
                        *cursor = next;
                        InputOutcome::CursorMoved { cursor: next }
                    }
                    None => InputOutcome::Ignored,
                }
            }
            (TurnState::PlayerCursorMove { unit, cursor }, InputEvent::Confirm) => {
                let (unit, destination) = (*unit, *cursor);
                if !accessible.contains(&destination) {
                    debug!(unit = unit.get(), ?destination, "move rejected");
                    return InputOutcome::Rejected(ActionError::IllegalAction { cell: destination });
                }
                out.push(Command::MoveUnit { unit, destination });
                self.end_turn(unit, None, out)
            }
            (TurnState::PlayerCursorMove { unit, .. }, InputEvent::SelectSkill(slot)) => {
                let unit = *unit;
                let Some(snapshot) = units.get(unit) else {
                    return InputOutcome::Ignored;
                };
                let targetable = targetable_cells(grid_size, snapshot, snapshot.skills.get(slot));
                self.state = TurnState::SkillTargeting {
                    unit,
                    slot,
                    cursor: snapshot.cell,
                    targetable,
                };
                InputOutcome::TargetingStarted { slot }
            }
            (
                TurnState::SkillTargeting {
                    unit,
                    slot,
                    cursor,
                    targetable,
                },
                InputEvent::Confirm,
            ) => {
                let (unit, slot, target) = (*unit, *slot, *cursor);
                if !targetable.contains(&target) {
                    debug!(unit = unit.get(), ?target, "skill target rejected");
                    return InputOutcome::Rejected(ActionError::IllegalAction { cell: target });
                }
                let wasted = units
                    .get(unit)
                    .filter(|caster| units.hostile_at(target, caster.team).is_none())
                    .map(|_| ActionError::EmptyTarget { cell: target });
                out.push(Command::UseSkill {
                    caster: unit,
                    slot,
                    target,
                });
                self.end_turn(unit, wasted, out)
            }
            _ => InputOutcome::Ignored,
        }
    }

    fn end_turn(
        &mut self,
        unit: UnitId,
        wasted: Option<ActionError>,
        out: &mut Vec<Command>,
    ) -> InputOutcome {
        out.push(Command::ReleaseUnit { unit });
        self.state = TurnState::TurnEnd { unit };
        InputOutcome::ActionCommitted { unit, wasted }
    }
}
