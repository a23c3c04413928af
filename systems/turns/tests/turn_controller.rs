use grid_tactics_core::{
    ActionError, CellCoord, Command, Direction, Event, InputEvent, SkillSlot, Team, TerrainKind,
    UnitId,
};
use grid_tactics_system_turns::{InputOutcome, TurnController, TurnState};
use grid_tactics_world::{self as world, query, GridModel, World};

struct Harness {
    world: World,
    controller: TurnController,
    events: Vec<Event>,
}

impl Harness {
    fn new(kinds: Vec<TerrainKind>, deployments: &[(Team, u32, u32, i32)]) -> Self {
        let size = (kinds.len() as f64).sqrt() as u32;
        let mut world = World::from_grid(GridModel::from_kinds(size, kinds).expect("grid"));
        let mut events = Vec::new();
        for &(team, column, row, health) in deployments {
            world::apply(
                &mut world,
                Command::DeployUnit {
                    team,
                    cell: CellCoord::new(column, row),
                    health,
                    attack_power: 2,
                },
                &mut events,
            );
        }

        let mut harness = Self {
            world,
            controller: TurnController::new(3),
            events: Vec::new(),
        };
        let mut commands = Vec::new();
        harness
            .controller
            .begin_round(&query::unit_view(&harness.world), &mut commands);
        harness.apply_all(commands);
        harness
    }

    fn press(&mut self, input: InputEvent) -> InputOutcome {
        let mut commands = Vec::new();
        let units = query::unit_view(&self.world);
        let outcome = self.controller.handle(
            input,
            query::terrain_view(&self.world),
            &units,
            &mut commands,
        );
        self.apply_all(commands);

        let mut follow_up = Vec::new();
        self.controller
            .advance(&query::unit_view(&self.world), &mut follow_up);
        self.apply_all(follow_up);
        outcome
    }

    fn press_all(&mut self, inputs: &[InputEvent]) {
        for input in inputs {
            let _ = self.press(*input);
        }
    }

    fn apply_all(&mut self, commands: Vec<Command>) {
        for command in commands {
            world::apply(&mut self.world, command, &mut self.events);
        }
    }

    fn cell_of(&self, unit: UnitId) -> Option<CellCoord> {
        query::unit_view(&self.world).get(unit).map(|snapshot| snapshot.cell)
    }
}

fn open_terrain() -> Vec<TerrainKind> {
    vec![TerrainKind::Traversable; 64]
}

fn steps(direction: Direction, count: usize) -> Vec<InputEvent> {
    vec![InputEvent::Move(direction); count]
}

fn diagonal_to_three_three() -> Vec<InputEvent> {
    let mut inputs = steps(Direction::Right, 3);
    inputs.extend(steps(Direction::Down, 3));
    inputs
}

#[test]
fn confirming_traversable_destination_moves_unit() {
    let mut harness = Harness::new(
        open_terrain(),
        &[(Team::Player, 0, 0, 10), (Team::Enemy, 6, 6, 8)],
    );
    let unit = UnitId::new(0);

    harness.press_all(&diagonal_to_three_three());
    let outcome = harness.press(InputEvent::Confirm);

    assert_eq!(
        outcome,
        InputOutcome::ActionCommitted { unit, wasted: None }
    );
    assert_eq!(harness.cell_of(unit), Some(CellCoord::new(3, 3)));
    assert_eq!(harness.controller.state(), &TurnState::EnemyPhase);
    let selected = query::unit_view(&harness.world)
        .get(unit)
        .expect("unit")
        .is_selected;
    assert!(!selected);
}

#[test]
fn confirming_blocked_destination_keeps_turn() {
    let mut terrain = open_terrain();
    terrain[3 * 8 + 3] = TerrainKind::NonTraversable;
    let mut harness = Harness::new(terrain, &[(Team::Player, 0, 0, 10), (Team::Enemy, 6, 6, 8)]);
    let unit = UnitId::new(0);

    harness.press_all(&diagonal_to_three_three());
    let outcome = harness.press(InputEvent::Confirm);

    assert_eq!(
        outcome,
        InputOutcome::Rejected(ActionError::IllegalAction {
            cell: CellCoord::new(3, 3)
        })
    );
    assert_eq!(harness.cell_of(unit), Some(CellCoord::new(0, 0)));
    assert_eq!(harness.controller.active_unit(), Some(unit));
    assert_eq!(harness.controller.cursor(), Some(CellCoord::new(3, 3)));
}

#[test]
fn confirming_beyond_move_radius_is_rejected() {
    let mut harness = Harness::new(
        open_terrain(),
        &[(Team::Player, 0, 0, 10), (Team::Enemy, 6, 6, 8)],
    );

    harness.press_all(&steps(Direction::Right, 4));
    let outcome = harness.press(InputEvent::Confirm);

    assert!(matches!(outcome, InputOutcome::Rejected(_)));
    assert_eq!(harness.cell_of(UnitId::new(0)), Some(CellCoord::new(0, 0)));
}

#[test]
fn each_player_unit_acts_once_in_roster_order() {
    let mut harness = Harness::new(
        open_terrain(),
        &[
            (Team::Player, 0, 0, 10),
            (Team::Player, 1, 0, 10),
            (Team::Enemy, 6, 6, 8),
        ],
    );

    assert_eq!(harness.controller.active_unit(), Some(UnitId::new(0)));
    let _ = harness.press(InputEvent::Move(Direction::Down));
    let _ = harness.press(InputEvent::Confirm);

    assert_eq!(harness.controller.active_unit(), Some(UnitId::new(1)));
    assert_eq!(harness.controller.cursor(), Some(CellCoord::new(1, 0)));
    let _ = harness.press(InputEvent::Confirm);

    assert_eq!(harness.controller.state(), &TurnState::EnemyPhase);
    assert_eq!(harness.cell_of(UnitId::new(0)), Some(CellCoord::new(0, 1)));
    assert_eq!(harness.cell_of(UnitId::new(1)), Some(CellCoord::new(1, 0)));
}

#[test]
fn skill_targeting_uses_manhattan_band() {
    let mut harness = Harness::new(
        open_terrain(),
        &[(Team::Player, 4, 4, 10), (Team::Enemy, 4, 6, 8)],
    );

    let outcome = harness.press(InputEvent::SelectSkill(SkillSlot::B));
    assert_eq!(
        outcome,
        InputOutcome::TargetingStarted { slot: SkillSlot::B }
    );
    assert_eq!(harness.controller.cursor(), Some(CellCoord::new(4, 4)));

    let _ = harness.press(InputEvent::Move(Direction::Down));
    let rejected = harness.press(InputEvent::Confirm);
    assert_eq!(
        rejected,
        InputOutcome::Rejected(ActionError::IllegalAction {
            cell: CellCoord::new(4, 5)
        })
    );

    let _ = harness.press(InputEvent::Move(Direction::Down));
    let committed = harness.press(InputEvent::Confirm);
    assert_eq!(
        committed,
        InputOutcome::ActionCommitted {
            unit: UnitId::new(0),
            wasted: None,
        }
    );
    let enemy = query::unit_view(&harness.world);
    assert_eq!(enemy.get(UnitId::new(1)).expect("enemy").health, 3);
}

#[test]
fn skill_on_empty_cell_consumes_turn() {
    let mut harness = Harness::new(
        open_terrain(),
        &[(Team::Player, 0, 0, 10), (Team::Enemy, 6, 6, 8)],
    );

    let _ = harness.press(InputEvent::SelectSkill(SkillSlot::A));
    let _ = harness.press(InputEvent::Move(Direction::Right));
    let outcome = harness.press(InputEvent::Confirm);

    assert_eq!(
        outcome,
        InputOutcome::ActionCommitted {
            unit: UnitId::new(0),
            wasted: Some(ActionError::EmptyTarget {
                cell: CellCoord::new(1, 0)
            }),
        }
    );
    assert!(harness.events.contains(&Event::SkillMissed {
        caster: UnitId::new(0),
        slot: SkillSlot::A,
        cell: CellCoord::new(1, 0),
    }));
    assert_eq!(harness.controller.state(), &TurnState::EnemyPhase);
}

#[test]
fn selecting_another_skill_while_targeting_is_ignored() {
    let mut harness = Harness::new(
        open_terrain(),
        &[(Team::Player, 0, 0, 10), (Team::Enemy, 6, 6, 8)],
    );

    let _ = harness.press(InputEvent::SelectSkill(SkillSlot::C));
    let outcome = harness.press(InputEvent::SelectSkill(SkillSlot::A));

    assert_eq!(outcome, InputOutcome::Ignored);
    assert!(matches!(
        harness.controller.state(),
        TurnState::SkillTargeting {
            slot: SkillSlot::C,
            ..
        }
    ));
}

#[test]
fn input_during_enemy_phase_is_ignored() {
    let mut harness = Harness::new(
        open_terrain(),
        &[(Team::Player, 0, 0, 10), (Team::Enemy, 6, 6, 8)],
    );
    let _ = harness.press(InputEvent::Confirm);
    assert_eq!(harness.controller.state(), &TurnState::EnemyPhase);

    for input in [
        InputEvent::Confirm,
        InputEvent::Move(Direction::Down),
        InputEvent::SelectSkill(SkillSlot::A),
    ] {
        assert_eq!(harness.press(input), InputOutcome::Ignored);
    }
    assert_eq!(harness.press(InputEvent::Quit), InputOutcome::QuitRequested);
}
