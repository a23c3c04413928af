//! Combat units and the rules that mutate them.

use grid_tactics_core::{CellCoord, SkillLoadout, SkillSlot, Team, UnitId, UnitSnapshot};

/// Mutable combat entity stored inside the world roster.
#[derive(Clone, Debug)]
pub(crate) struct Unit {
    id: UnitId,
    team: Team,
    cell: CellCoord,
    health: i32,
    attack_power: u32,
    is_selected: bool,
    skills: SkillLoadout,
}

impl Unit {
    /// Creates a unit carrying the standard loadout.
    pub(crate) fn new(
        id: UnitId,
        team: Team,
        cell: CellCoord,
        health: i32,
        attack_power: u32,
    ) -> Self {
        Self {
            id,
            team,
            cell,
            health,
            attack_power,
            is_selected: false,
            skills: SkillLoadout::standard(),
        }
    }

    /// Restores a unit from a previously captured snapshot.
    pub(crate) fn from_snapshot(snapshot: UnitSnapshot) -> Self {
        Self {
            id: snapshot.id,
            team: snapshot.team,
            cell: snapshot.cell,
            health: snapshot.health,
            attack_power: snapshot.attack_power,
            is_selected: snapshot.is_selected,
            skills: snapshot.skills,
        }
    }

    pub(crate) const fn id(&self) -> UnitId {
        self.id
    }

    pub(crate) const fn team(&self) -> Team {
        self.team
    }

    pub(crate) const fn cell(&self) -> CellCoord {
        self.cell
    }

    pub(crate) const fn health(&self) -> i32 {
        self.health
    }

    pub(crate) fn set_selected(&mut self, selected: bool) {
        self.is_selected = selected;
    }

    /// Shifts the unit by the delta when the destination stays inside the grid.
    ///
    /// Terrain and occupancy are not consulted. Returns the previous cell when
    /// the unit moved.
    pub(crate) fn step(&mut self, dx: i32, dy: i32, grid_size: u32) -> Option<CellCoord> {
        if (dx, dy) == (0, 0) {
            return None;
        }
        let destination = self
            .cell
            .offset(dx, dy)
            .filter(|candidate| candidate.is_within(grid_size))?;
        let from = self.cell;
        self.cell = destination;
        Some(from)
    }

    /// Places the unit on `destination` when it lies inside the grid.
    ///
    /// Returns the previous cell when the unit changed cells.
    pub(crate) fn relocate(
        &mut self,
        destination: CellCoord,
        grid_size: u32,
    ) -> Option<CellCoord> {
        if destination == self.cell || !destination.is_within(grid_size) {
            return None;
        }
        Some(std::mem::replace(&mut self.cell, destination))
    }

    /// Strikes an adjacent target, returning the damage dealt.
    ///
    /// Targets further than one cell away on either axis are left untouched.
    pub(crate) fn attack(&self, target: &mut Unit) -> Option<u32> {
        if self.cell.chebyshev_distance(target.cell) > 1 {
            return None;
        }
        target.apply_damage(self.attack_power);
        Some(self.attack_power)
    }

    /// Applies the skill stored in `slot` to the target, returning its power.
    ///
    /// Range is validated by the caller before the skill is committed.
    pub(crate) fn apply_skill_effect(&self, target: &mut Unit, slot: SkillSlot) -> u32 {
        let power = self.skills.get(slot).power();
        target.apply_damage(power);
        power
    }

    /// Reduces health by `amount`, never dropping below zero.
    pub(crate) fn apply_damage(&mut self, amount: u32) {
        let amount = i32::try_from(amount).unwrap_or(i32::MAX);
        self.health = self.health.saturating_sub(amount).max(0);
    }

    pub(crate) const fn is_defeated(&self) -> bool {
        self.health <= 0
    }

    pub(crate) fn snapshot(&self) -> UnitSnapshot {
        UnitSnapshot {
            id: self.id,
            team: self.team,
            cell: self.cell,
            health: self.health,
            attack_power: self.attack_power,
            is_selected: self.is_selected,
            skills: self.skills.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(id: u32, team: Team, column: u32, row: u32) -> Unit {
        Unit::new(UnitId::new(id), team, CellCoord::new(column, row), 10, 2)
    }

    #[test]
    fn step_beyond_edge_is_ignored() {
        let mut corner = unit(0, Team::Player, 0, 0);
        assert_eq!(corner.step(-1, 0, 8), None);
        assert_eq!(corner.step(0, -1, 8), None);
        assert_eq!(corner.cell(), CellCoord::new(0, 0));

        let mut far = unit(1, Team::Player, 7, 7);
        assert_eq!(far.step(1, 0, 8), None);
        assert_eq!(far.cell(), CellCoord::new(7, 7));
    }

    #[test]
    fn step_inside_grid_reports_origin() {
        let mut walker = unit(0, Team::Enemy, 3, 3);
        assert_eq!(walker.step(-1, 1, 8), Some(CellCoord::new(3, 3)));
        assert_eq!(walker.cell(), CellCoord::new(2, 4));
        assert_eq!(walker.step(0, 0, 8), None);
    }

    #[test]
    fn relocate_jumps_directly_to_destination() {
        let mut mover = unit(0, Team::Player, 0, 0);
        assert_eq!(mover.relocate(CellCoord::new(5, 2), 8), Some(CellCoord::new(0, 0)));
        assert_eq!(mover.cell(), CellCoord::new(5, 2));
        assert_eq!(mover.relocate(CellCoord::new(8, 2), 8), None);
        assert_eq!(mover.relocate(CellCoord::new(5, 2), 8), None);
        assert_eq!(mover.cell(), CellCoord::new(5, 2));
    }

    #[test]
    fn attack_requires_adjacency() {
        let attacker = unit(0, Team::Enemy, 2, 2);
        let mut distant = unit(1, Team::Player, 4, 2);
        assert_eq!(attacker.attack(&mut distant), None);
        assert_eq!(distant.health(), 10);

        let mut diagonal = unit(2, Team::Player, 3, 3);
        assert_eq!(attacker.attack(&mut diagonal), Some(2));
        assert_eq!(diagonal.health(), 8);
    }

    #[test]
    fn damage_clamps_at_zero() {
        let mut target = unit(0, Team::Enemy, 1, 1);
        target.apply_damage(25);
        assert_eq!(target.health(), 0);
        assert!(target.is_defeated());

        target.apply_damage(u32::MAX);
        assert_eq!(target.health(), 0);
    }

    #[test]
    fn skill_effect_uses_slot_power() {
        let caster = unit(0, Team::Player, 0, 0);
        let mut target = unit(1, Team::Enemy, 0, 4);
        assert_eq!(caster.apply_skill_effect(&mut target, SkillSlot::C), 4);
        assert_eq!(target.health(), 6);
    }

    #[test]
    fn snapshot_restores_identical_unit() {
        let mut original = unit(3, Team::Player, 5, 1);
        original.set_selected(true);
        original.apply_damage(3);

        let restored = Unit::from_snapshot(original.snapshot());
        assert_eq!(restored.snapshot(), original.snapshot());
    }
}
