#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure bootstrap system that prepares a Grid Tactics skirmish.

use grid_tactics_core::{CellCoord, Command, Team};
use grid_tactics_world::{query, World};

const PLAYER_HEALTH: i32 = 10;
const PLAYER_ATTACK_POWER: u32 = 2;
const ENEMY_HEALTH: i32 = 8;
const ENEMY_ATTACK_POWER: u32 = 1;

/// Produces data required to greet the player and populate the rosters.
#[derive(Debug, Default)]
pub struct Bootstrap;

impl Bootstrap {
    /// Derives the banner that should be shown when the experience starts.
    #[must_use]
    pub fn welcome_banner<'world>(&self, world: &'world World) -> &'world str {
        query::welcome_banner(world)
    }

    /// Emits deployment commands for the default squads.
    ///
    /// Players occupy the two leftmost cells of the top row. Enemies occupy
    /// the two rightmost cells of the second-to-last row.
    pub fn deploy_default_squads(&self, world: &World, out: &mut Vec<Command>) {
        let size = query::grid_size(world);
        let far = size.saturating_sub(1);
        let near_far = size.saturating_sub(2);

        for column in [0, 1] {
            out.push(Command::DeployUnit {
                team: Team::Player,
                cell: CellCoord::new(column, 0),
                health: PLAYER_HEALTH,
                attack_power: PLAYER_ATTACK_POWER,
            });
        }
        for column in [near_far, far] {
            out.push(Command::DeployUnit {
                team: Team::Enemy,
                cell: CellCoord::new(column, near_far),
                health: ENEMY_HEALTH,
                attack_power: ENEMY_ATTACK_POWER,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grid_tactics_core::{GameConfig, WELCOME_BANNER};
    use grid_tactics_world::apply;

    #[test]
    fn banner_comes_from_world() {
        let world = World::new(&GameConfig::default()).expect("world");
        assert_eq!(Bootstrap.welcome_banner(&world), WELCOME_BANNER);
    }

    #[test]
    fn default_grid_places_squads_at_known_cells() {
        let mut world = World::new(&GameConfig::default()).expect("world");
        let mut commands = Vec::new();
        Bootstrap.deploy_default_squads(&world, &mut commands);

        let mut events = Vec::new();
        for command in commands {
            apply(&mut world, command, &mut events);
        }

        let view = query::unit_view(&world);
        let players: Vec<(CellCoord, i32, u32)> = view
            .team(Team::Player)
            .map(|unit| (unit.cell, unit.health, unit.attack_power))
            .collect();
        let enemies: Vec<(CellCoord, i32, u32)> = view
            .team(Team::Enemy)
            .map(|unit| (unit.cell, unit.health, unit.attack_power))
            .collect();

        assert_eq!(
            players,
            vec![(CellCoord::new(0, 0), 10, 2), (CellCoord::new(1, 0), 10, 2)]
        );
        assert_eq!(
            enemies,
            vec![(CellCoord::new(6, 6), 8, 1), (CellCoord::new(7, 6), 8, 1)]
        );
    }

    #[test]
    fn smallest_grid_keeps_squads_apart() {
        let config = GameConfig {
            grid_size: GameConfig::MIN_GRID_SIZE,
            ..GameConfig::default()
        };
        let world = World::new(&config).expect("world");
        let mut commands = Vec::new();
        Bootstrap.deploy_default_squads(&world, &mut commands);

        let cells: Vec<CellCoord> = commands
            .iter()
            .filter_map(|command| match command {
                Command::DeployUnit { cell, .. } => Some(*cell),
                _ => None,
            })
            .collect();
        assert_eq!(
            cells,
            vec![
                CellCoord::new(0, 0),
                CellCoord::new(1, 0),
                CellCoord::new(1, 1),
                CellCoord::new(2, 1),
            ]
        );
    }
}
