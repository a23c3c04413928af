#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Grid Tactics.

mod grid;
mod roster;
mod unit;

use std::collections::BTreeSet;

use grid_tactics_core::{
    Command, ConfigError, DamageSource, Event, GameConfig, GridError, SnapshotError, UnitId,
    WorldSnapshot, WELCOME_BANNER,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub use grid::GridModel;

use roster::Roster;
use unit::Unit;

/// Represents the authoritative Grid Tactics world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    grid: GridModel,
    roster: Roster,
    next_unit_id: u32,
}

impl World {
    /// Creates a world with freshly generated terrain and empty rosters.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the configuration fails validation.
    pub fn new(config: &GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let grid = GridModel::generate(config.grid_size, config.obstacle_probability, &mut rng)?;
        Ok(Self::from_grid(grid))
    }

    /// Creates a world around an existing grid with empty rosters.
    #[must_use]
    pub fn from_grid(grid: GridModel) -> Self {
        Self {
            banner: WELCOME_BANNER,
            grid,
            roster: Roster::default(),
            next_unit_id: 0,
        }
    }

    /// Rebuilds a world from a snapshot captured by [`query::snapshot`].
    ///
    /// # Errors
    ///
    /// Returns a [`SnapshotError`] when the terrain does not cover the grid,
    /// a unit sits outside the grid or has no health left, or two units share
    /// an identifier.
    pub fn from_snapshot(snapshot: WorldSnapshot) -> Result<Self, SnapshotError> {
        let grid = GridModel::from_kinds(snapshot.grid_size, snapshot.terrain)?;
        let mut world = Self::from_grid(grid);
        let mut seen = BTreeSet::new();

        for unit in snapshot.units {
            if let Err(source) = world.grid.cell_at(unit.cell) {
                return Err(SnapshotError::UnitOutOfBounds {
                    unit: unit.id,
                    source,
                });
            }
            if !seen.insert(unit.id) {
                return Err(SnapshotError::DuplicateUnit { unit: unit.id });
            }
            if unit.health <= 0 {
                return Err(SnapshotError::DefeatedUnit { unit: unit.id });
            }
            world.roster.push(Unit::from_snapshot(unit));
        }

        let after_highest = seen
            .iter()
            .next_back()
            .map_or(0, |highest| highest.get().saturating_add(1));
        world.next_unit_id = snapshot.next_unit_id.max(after_highest);
        Ok(world)
    }

    fn allocate_unit_id(&mut self) -> UnitId {
        let id = UnitId::new(self.next_unit_id);
        self.next_unit_id = self.next_unit_id.saturating_add(1);
        id
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::DeployUnit {
            team,
            cell,
            health,
            attack_power,
        } => {
            if !cell.is_within(world.grid.size()) {
                out_events.push(Event::DeploymentRejected {
                    team,
                    reason: GridError::OutOfBounds {
                        column: cell.column(),
                        row: cell.row(),
                        size: world.grid.size(),
                    },
                });
                return;
            }
            let unit = world.allocate_unit_id();
            world
                .roster
                .push(Unit::new(unit, team, cell, health, attack_power));
            out_events.push(Event::UnitDeployed { unit, team, cell });
        }
        Command::SelectUnit { unit } => {
            if let Some(target) = world.roster.get_mut(unit) {
                target.set_selected(true);
                out_events.push(Event::UnitSelected { unit });
            }
        }
        Command::ReleaseUnit { unit } => {
            if let Some(target) = world.roster.get_mut(unit) {
                target.set_selected(false);
                out_events.push(Event::UnitReleased { unit });
            }
        }
        Command::MoveUnit { unit, destination } => {
            let Some(mover) = world.roster.get_mut(unit) else {
                return;
            };
            if let Some(from) = mover.relocate(destination, world.grid.size()) {
                out_events.push(Event::UnitMoved {
                    unit,
                    from,
                    to: destination,
                });
            }
        }
        Command::StepUnit { unit, dx, dy } => {
            let Some(mover) = world.roster.get_mut(unit) else {
                return;
            };
            if let Some(from) = mover.step(dx, dy, world.grid.size()) {
                out_events.push(Event::UnitMoved {
                    unit,
                    from,
                    to: mover.cell(),
                });
            }
        }
        Command::Attack { attacker, target } => {
            let Some((striker, victim)) = world.roster.pair_mut(attacker, target) else {
                return;
            };
            if let Some(amount) = striker.attack(victim) {
                out_events.push(Event::UnitDamaged {
                    unit: victim.id(),
                    source: DamageSource::Attack { attacker },
                    amount,
                    remaining: victim.health(),
                });
            }
            world.roster.reap_defeated(out_events);
        }
        Command::UseSkill {
            caster,
            slot,
            target,
        } => {
            let Some(team) = world.roster.get(caster).map(Unit::team) else {
                return;
            };
            let Some(victim_id) = world.roster.occupant(team.opponent(), target) else {
                out_events.push(Event::SkillMissed {
                    caster,
                    slot,
                    cell: target,
                });
                return;
            };
            let Some((user, victim)) = world.roster.pair_mut(caster, victim_id) else {
                return;
            };
            let amount = user.apply_skill_effect(victim, slot);
            out_events.push(Event::UnitDamaged {
                unit: victim_id,
                source: DamageSource::Skill { caster, slot },
                amount,
                remaining: victim.health(),
            });
            world.roster.reap_defeated(out_events);
        }
    }
}


/// Query functions that provide read-only access to the world state.
pub mod query {
    use grid_tactics_core::{TerrainView, UnitView, WorldSnapshot};

    use super::World;

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Number of cells along each edge of the grid.
    #[must_use]
    pub fn grid_size(world: &World) -> u32 {
        world.grid.size()
    }

    /// Exposes a read-only view of the terrain.
    #[must_use]
    pub fn terrain_view(world: &World) -> TerrainView<'_> {
        world.grid.view()
    }

    /// Captures a read-only view of every living unit, players first, each
    /// team in roster order.
    #[must_use]
    pub fn unit_view(world: &World) -> UnitView {
        UnitView::from_snapshots(world.roster.iter().map(|unit| unit.snapshot()).collect())
    }

    /// Captures the state needed to rebuild the world with
    /// [`World::from_snapshot`](super::World::from_snapshot).
    #[must_use]
    pub fn snapshot(world: &World) -> WorldSnapshot {
        WorldSnapshot {
            grid_size: world.grid.size(),
            terrain: world.grid.kinds().to_vec(),
            units: unit_view(world).into_vec(),
            next_unit_id: world.next_unit_id,
        }
    }
}
