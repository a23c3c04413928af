//! Ordered per-team unit storage.

use grid_tactics_core::{CellCoord, Event, Team, UnitId};

use crate::unit::Unit;

/// Player and enemy units kept in deployment order.
#[derive(Clone, Debug, Default)]
pub(crate) struct Roster {
    player: Vec<Unit>,
    enemy: Vec<Unit>,
}

impl Roster {
    pub(crate) fn push(&mut self, unit: Unit) {
        self.team_mut(unit.team()).push(unit);
    }

    pub(crate) fn team(&self, team: Team) -> &[Unit] {
        match team {
            Team::Player => &self.player,
            Team::Enemy => &self.enemy,
        }
    }

    fn team_mut(&mut self, team: Team) -> &mut Vec<Unit> {
        match team {
            Team::Player => &mut self.player,
            Team::Enemy => &mut self.enemy,
        }
    }

    /// Iterates over every unit, players first.
    pub(crate) fn iter(&self) -> impl Iterator<Item = &Unit> {
        self.player.iter().chain(self.enemy.iter())
    }

    pub(crate) fn get(&self, unit: UnitId) -> Option<&Unit> {
        self.iter().find(|candidate| candidate.id() == unit)
    }

    pub(crate) fn get_mut(&mut self, unit: UnitId) -> Option<&mut Unit> {
        self.player
            .iter_mut()
            .chain(self.enemy.iter_mut())
            .find(|candidate| candidate.id() == unit)
    }

    /// First unit of `team` standing on the cell.
    pub(crate) fn occupant(&self, team: Team, cell: CellCoord) -> Option<UnitId> {
        self.team(team)
            .iter()
            .find(|candidate| candidate.cell() == cell)
            .map(Unit::id)
    }

    /// Borrows two distinct units mutably at the same time.
    pub(crate) fn pair_mut(
        &mut self,
        first: UnitId,
        second: UnitId,
    ) -> Option<(&mut Unit, &mut Unit)> {
        if first == second {
            return None;
        }
        let (first_team, first_index) = self.locate(first)?;
        let (second_team, second_index) = self.locate(second)?;

        if first_team == second_team {
            let units = self.team_mut(first_team);
            if first_index < second_index {
                let (head, tail) = units.split_at_mut(second_index);
                Some((head.get_mut(first_index)?, tail.first_mut()?))
            } else {
                let (head, tail) = units.split_at_mut(first_index);
                Some((tail.first_mut()?, head.get_mut(second_index)?))
            }
        } else {
            let (first_units, second_units) = match first_team {
                Team::Player => (&mut self.player, &mut self.enemy),
                Team::Enemy => (&mut self.enemy, &mut self.player),
            };
            Some((
                first_units.get_mut(first_index)?,
                second_units.get_mut(second_index)?,
            ))
        }
    }

    /// Removes every unit whose health reached zero, announcing each removal.
    pub(crate) fn reap_defeated(&mut self, out_events: &mut Vec<Event>) {
        for units in [&mut self.player, &mut self.enemy] {
            units.retain(|unit| {
                if !unit.is_defeated() {
                    return true;
                }
                out_events.push(Event::UnitDefeated {
                    unit: unit.id(),
                    team: unit.team(),
                    cell: unit.cell(),
                });
                false
            });
        }
    }

    fn locate(&self, unit: UnitId) -> Option<(Team, usize)> {
        [Team::Player, Team::Enemy].into_iter().find_map(|team| {
            self.team(team)
                .iter()
                .position(|candidate| candidate.id() == unit)
                .map(|index| (team, index))
        })
    }
}
