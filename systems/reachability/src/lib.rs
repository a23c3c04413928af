#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure queries describing where a unit may move and what it may target.
//!
//! Movement uses a square (Chebyshev) neighbourhood filtered by terrain, while
//! skills use a Manhattan band that ignores terrain entirely. Neither query
//! performs pathfinding: a destination is reachable when it lies inside the
//! neighbourhood, regardless of what sits between it and the unit.

use std::collections::BTreeSet;

use grid_tactics_core::{CellCoord, Skill, TerrainView, UnitSnapshot};

/// Cells the unit may move to within `max_distance` steps on either axis.
///
/// The result holds every in-bounds traversable cell whose Chebyshev distance
/// from the unit is at most `max_distance`. The unit's own cell is included
/// whenever it is traversable.
#[must_use]
pub fn accessible_cells(
    terrain: TerrainView<'_>,
    unit: &UnitSnapshot,
    max_distance: u32,
) -> BTreeSet<CellCoord> {
    square_neighbourhood(unit.cell, max_distance, terrain.size())
        .filter(|cell| terrain.is_traversable(*cell))
        .collect()
}

/// Cells the unit may aim `skill` at.
///
/// The result holds every in-bounds cell whose Manhattan distance from the
/// unit lies within the skill's range band. Terrain is not consulted.
#[must_use]
pub fn targetable_cells(grid_size: u32, unit: &UnitSnapshot, skill: &Skill) -> BTreeSet<CellCoord> {
    let origin = unit.cell;
    square_neighbourhood(origin, skill.range_max(), grid_size)
        .filter(|cell| skill.covers(origin.manhattan_distance(*cell)))
        .collect()
}

fn square_neighbourhood(
    origin: CellCoord,
    radius: u32,
    grid_size: u32,
) -> impl Iterator<Item = CellCoord> {
    let last = grid_size.saturating_sub(1);
    let columns =
        origin.column().saturating_sub(radius)..=origin.column().saturating_add(radius).min(last);
    let rows = origin.row().saturating_sub(radius)..=origin.row().saturating_add(radius).min(last);
    let empty = grid_size == 0;

    rows.flat_map(move |row| columns.clone().map(move |column| CellCoord::new(column, row)))
        .filter(move |cell| !empty && cell.is_within(grid_size))
}

#[cfg(test)]
mod tests {
    use super::*;
    use grid_tactics_core::{SkillEffect, SkillLoadout, SkillSlot, Team, TerrainKind, UnitId};

    fn unit_at(column: u32, row: u32) -> UnitSnapshot {
        UnitSnapshot {
            id: UnitId::new(0),
            team: Team::Player,
            cell: CellCoord::new(column, row),
            health: 10,
            attack_power: 2,
            is_selected: true,
            skills: SkillLoadout::standard(),
        }
    }

    #[test]
    fn corner_unit_sees_clipped_square() {
        let kinds = vec![TerrainKind::Traversable; 64];
        let terrain = TerrainView::new(&kinds, 8);
        let cells = accessible_cells(terrain, &unit_at(0, 0), 3);

        assert_eq!(cells.len(), 16);
        assert!(cells.contains(&CellCoord::new(0, 0)));
        assert!(cells.contains(&CellCoord::new(3, 3)));
        assert!(!cells.contains(&CellCoord::new(4, 0)));
    }

    #[test]
    fn blocked_cells_are_excluded_including_origin() {
        let mut kinds = vec![TerrainKind::Traversable; 25];
        kinds[2 * 5 + 2] = TerrainKind::NonTraversable;
        kinds[2 * 5 + 3] = TerrainKind::NonTraversable;
        let terrain = TerrainView::new(&kinds, 5);

        let cells = accessible_cells(terrain, &unit_at(2, 2), 1);
        assert_eq!(cells.len(), 7);
        assert!(!cells.contains(&CellCoord::new(2, 2)));
        assert!(!cells.contains(&CellCoord::new(3, 2)));
    }

    #[test]
    fn band_excludes_cells_just_outside_range() {
        let skill = Skill::new("Rifle", 2, 5, SkillEffect::Damage, 5);
        let cells = targetable_cells(8, &unit_at(4, 4), &skill);

        assert!(cells.contains(&CellCoord::new(4, 6)));
        assert!(!cells.contains(&CellCoord::new(4, 5)));
        assert!(!cells.contains(&CellCoord::new(4, 4)));
        assert!(cells.contains(&CellCoord::new(7, 6)));
        assert!(!cells.contains(&CellCoord::new(7, 7)));
    }

    #[test]
    fn targeting_ignores_terrain() {
        let skills = SkillLoadout::standard();
        let cells = targetable_cells(8, &unit_at(0, 0), skills.get(SkillSlot::A));
        let expected: BTreeSet<CellCoord> = [
            (1, 0),
            (2, 0),
            (3, 0),
            (0, 1),
            (1, 1),
            (2, 1),
            (0, 2),
            (1, 2),
            (0, 3),
        ]
        .into_iter()
        .map(|(column, row)| CellCoord::new(column, row))
        .collect();
        assert_eq!(cells, expected);
    }

    #[test]
    fn empty_grid_has_no_cells() {
        let terrain = TerrainView::new(&[], 0);
        assert!(accessible_cells(terrain, &unit_at(0, 0), 3).is_empty());
        let skills = SkillLoadout::standard();
        assert!(targetable_cells(0, &unit_at(0, 0), skills.get(SkillSlot::C)).is_empty());
    }
}
