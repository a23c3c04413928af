//! Translates session state into the renderer-agnostic scene description.

use grid_tactics_core::{Outcome, UnitView};
use grid_tactics_rendering::{
    skill_panel, CursorKind, GridPresentation, HighlightKind, RenderingError, Scene, SceneCursor,
    SceneHighlight, SceneUnit,
};
use grid_tactics_session::{Session, TurnState};
use grid_tactics_system_bootstrap::Bootstrap;
use grid_tactics_world::query;

use crate::input::KEY_HELP;

/// Builds the frame for the current session state followed by `notices`.
pub(crate) fn build_scene(session: &Session, notices: &[String]) -> Result<Scene, RenderingError> {
    let world = session.world();
    let terrain = query::terrain_view(world);
    let units = query::unit_view(world);
    let grid = GridPresentation::new(terrain.size(), GridPresentation::DEFAULT_CELL_LENGTH)?;
    let controller = session.controller();

    let (highlight, cursor) = match controller.state() {
        _ if session.is_finished() => (None, None),
        TurnState::PlayerCursorMove { cursor, .. } => (
            Some(SceneHighlight {
                kind: HighlightKind::Accessible,
                cells: controller
                    .accessible_cells(terrain, &units)
                    .into_iter()
                    .collect(),
            }),
            Some(SceneCursor {
                kind: CursorKind::Move,
                cell: *cursor,
            }),
        ),
        TurnState::SkillTargeting {
            cursor, targetable, ..
        } => (
            Some(SceneHighlight {
                kind: HighlightKind::Targetable,
                cells: targetable.iter().copied().collect(),
            }),
            Some(SceneCursor {
                kind: CursorKind::Targeting,
                cell: *cursor,
            }),
        ),
        _ => (None, None),
    };

    let scene_units = units
        .iter()
        .map(|unit| SceneUnit {
            id: unit.id,
            team: unit.team,
            cell: unit.cell,
            position: grid.cell_center(unit.cell),
            health: unit.health,
            is_selected: unit.is_selected,
        })
        .collect();

    let mut text = vec![Bootstrap.welcome_banner(world).to_owned()];
    text.push(status_line(session, &units));
    if let Some(active) = controller.active_unit().and_then(|unit| units.get(unit)) {
        text.extend(skill_panel(&active.skills));
    }
    text.extend(notices.iter().cloned());
    if !session.is_finished() {
        text.push(KEY_HELP.to_owned());
    }

    Ok(Scene {
        grid,
        cells: terrain.iter().collect(),
        units: scene_units,
        highlight,
        cursor,
        text,
    })
}

fn status_line(session: &Session, units: &UnitView) -> String {
    let round = session.controller().round();
    match session.outcome() {
        Some(Outcome::Victory) => {
            return format!("Round {round}: victory, every enemy was defeated")
        }
        Some(Outcome::Defeat) => {
            return format!("Round {round}: defeat, every player unit was lost")
        }
        None if session.is_finished() => return format!("Round {round}: session ended"),
        None => {}
    }

    let phase = match session.controller().state() {
        TurnState::PlayerCursorMove { unit, .. } => format!("P{} choose a destination", unit.get()),
        TurnState::SkillTargeting { unit, slot, .. } => {
            let skill = units
                .get(*unit)
                .map(|caster| caster.skills.get(*slot).name().to_owned())
                .unwrap_or_default();
            format!("P{} aim {skill}", unit.get())
        }
        TurnState::PlayerUnitSelect | TurnState::TurnEnd { .. } => "selecting".to_owned(),
        TurnState::EnemyPhase => "enemy phase".to_owned(),
    };
    format!("Round {round}: {phase}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use grid_tactics_core::{
        CellCoord, GameConfig, InputEvent, SkillLoadout, SkillSlot, Team, TerrainKind, UnitId,
        UnitSnapshot, WorldSnapshot,
    };

    fn session() -> Session {
        let units = vec![
            UnitSnapshot {
                id: UnitId::new(0),
                team: Team::Player,
                cell: CellCoord::new(0, 0),
                health: 10,
                attack_power: 2,
                is_selected: false,
                skills: SkillLoadout::standard(),
            },
            UnitSnapshot {
                id: UnitId::new(1),
                team: Team::Enemy,
                cell: CellCoord::new(7, 7),
                health: 8,
                attack_power: 1,
                is_selected: false,
                skills: SkillLoadout::standard(),
            },
        ];
        let snapshot = WorldSnapshot {
            grid_size: 8,
            terrain: vec![TerrainKind::Traversable; 64],
            units,
            next_unit_id: 2,
        };
        Session::from_snapshot(snapshot, &GameConfig::default()).expect("session")
    }

    #[test]
    fn move_phase_highlights_accessible_cells() {
        let session = session();
        let scene = build_scene(&session, &[]).expect("scene");

        let highlight = scene.highlight.expect("highlight");
        assert_eq!(highlight.kind, HighlightKind::Accessible);
        assert_eq!(highlight.cells.len(), 16);
        assert_eq!(
            scene.cursor,
            Some(SceneCursor {
                kind: CursorKind::Move,
                cell: CellCoord::new(0, 0),
            })
        );
        assert_eq!(scene.cells.len(), 64);
        assert_eq!(scene.units.len(), 2);
        assert!(scene.units[0].is_selected);
        assert_eq!(scene.text[1], "Round 1: P0 choose a destination");
        assert_eq!(scene.text[2], "A: Pistol (Range: 1-3)");
    }

    #[test]
    fn targeting_phase_highlights_skill_band() {
        let mut session = session();
        let _ = session.handle_input(InputEvent::SelectSkill(SkillSlot::A));
        let scene = build_scene(&session, &["note".to_owned()]).expect("scene");

        let highlight = scene.highlight.expect("highlight");
        assert_eq!(highlight.kind, HighlightKind::Targetable);
        assert!(highlight.cells.contains(&CellCoord::new(0, 3)));
        assert!(!highlight.cells.contains(&CellCoord::new(0, 0)));
        assert_eq!(scene.cursor.map(|cursor| cursor.kind), Some(CursorKind::Targeting));
        assert_eq!(scene.text[1], "Round 1: P0 aim Pistol");
        assert!(scene.text.contains(&"note".to_owned()));
    }

    #[test]
    fn finished_session_has_no_cursor() {
        let mut session = session();
        let _ = session.handle_input(InputEvent::Quit);
        let scene = build_scene(&session, &[]).expect("scene");

        assert_eq!(scene.cursor, None);
        assert_eq!(scene.highlight, None);
        assert_eq!(scene.text[1], "Round 1: session ended");
        assert!(!scene.text.contains(&KEY_HELP.to_owned()));
    }
}
