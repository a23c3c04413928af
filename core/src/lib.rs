#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Grid Tactics engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Systems submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values describing what
//! actually changed. Systems never hold mutable references to world state;
//! they read immutable views such as [`TerrainView`] and [`UnitView`] and
//! respond exclusively with new command batches.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Grid Tactics.";

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Adds a new unit to the roster of the provided team.
    DeployUnit {
        /// Team whose roster receives the unit.
        team: Team,
        /// Cell the unit occupies when deployed.
        cell: CellCoord,
        /// Starting health of the unit.
        health: i32,
        /// Damage dealt by the unit's melee attack.
        attack_power: u32,
    },
    /// Marks a unit as the one currently acting.
    SelectUnit {
        /// Identifier of the unit to highlight.
        unit: UnitId,
    },
    /// Clears the selection flag of a unit whose turn ended.
    ReleaseUnit {
        /// Identifier of the unit that finished acting.
        unit: UnitId,
    },
    /// Relocates a unit to a destination already validated by the caller.
    MoveUnit {
        /// Identifier of the unit being moved.
        unit: UnitId,
        /// Cell the unit should occupy after the move.
        destination: CellCoord,
    },
    /// Shifts a unit by a relative delta, ignored when the result leaves the grid.
    StepUnit {
        /// Identifier of the unit taking the step.
        unit: UnitId,
        /// Column delta of the step.
        dx: i32,
        /// Row delta of the step.
        dy: i32,
    },
    /// Requests a melee attack between two units.
    Attack {
        /// Identifier of the attacking unit.
        attacker: UnitId,
        /// Identifier of the unit receiving the blow.
        target: UnitId,
    },
    /// Resolves a skill against whatever hostile unit occupies the target cell.
    UseSkill {
        /// Identifier of the unit using the skill.
        caster: UnitId,
        /// Loadout slot holding the skill.
        slot: SkillSlot,
        /// Cell targeted by the skill.
        target: CellCoord,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that a unit joined a roster.
    UnitDeployed {
        /// Identifier allocated to the unit by the world.
        unit: UnitId,
        /// Team the unit belongs to.
        team: Team,
        /// Cell the unit occupies.
        cell: CellCoord,
    },
    /// Reports that a deployment request was rejected.
    DeploymentRejected {
        /// Team named in the rejected request.
        team: Team,
        /// Reason the deployment failed.
        reason: GridError,
    },
    /// Confirms that a unit became the active unit.
    UnitSelected {
        /// Identifier of the selected unit.
        unit: UnitId,
    },
    /// Confirms that a unit is no longer the active unit.
    UnitReleased {
        /// Identifier of the released unit.
        unit: UnitId,
    },
    /// Confirms that a unit changed cells.
    UnitMoved {
        /// Identifier of the unit that moved.
        unit: UnitId,
        /// Cell occupied before moving.
        from: CellCoord,
        /// Cell occupied after moving.
        to: CellCoord,
    },
    /// Reports that a unit lost health.
    UnitDamaged {
        /// Identifier of the damaged unit.
        unit: UnitId,
        /// Origin of the damage.
        source: DamageSource,
        /// Amount of health removed.
        amount: u32,
        /// Health remaining after the damage was applied.
        remaining: i32,
    },
    /// Reports that a unit was removed from its roster after reaching zero health.
    UnitDefeated {
        /// Identifier of the defeated unit.
        unit: UnitId,
        /// Team the unit belonged to.
        team: Team,
        /// Cell the unit occupied when it fell.
        cell: CellCoord,
    },
    /// Reports that a skill resolved against a cell without a hostile occupant.
    SkillMissed {
        /// Identifier of the unit that used the skill.
        caster: UnitId,
        /// Loadout slot of the skill.
        slot: SkillSlot,
        /// Cell the skill was aimed at.
        cell: CellCoord,
    },
}

/// Origin of a health reduction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DamageSource {
    /// Melee attack performed by an adjacent unit.
    Attack {
        /// Identifier of the attacker.
        attacker: UnitId,
    },
    /// Ranged skill effect.
    Skill {
        /// Identifier of the caster.
        caster: UnitId,
        /// Loadout slot of the skill that hit.
        slot: SkillSlot,
    },
}

/// Side a unit fights for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Team {
    /// Units controlled through player input.
    Player,
    /// Units controlled by the enemy heuristic.
    Enemy,
}

impl Team {
    /// Returns the team opposing this one.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::Player => Self::Enemy,
            Self::Enemy => Self::Player,
        }
    }
}

/// Unique identifier assigned to a unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitId(u32);

impl UnitId {
    /// Creates a new unit identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }

    /// Computes the Chebyshev distance between two cell coordinates.
    #[must_use]
    pub fn chebyshev_distance(self, other: CellCoord) -> u32 {
        self.column()
            .abs_diff(other.column())
            .max(self.row().abs_diff(other.row()))
    }

    /// Returns the cell shifted by the provided delta.
    ///
    /// Returns `None` when either axis would become negative or overflow. Upper
    /// grid bounds are not consulted; callers check those against the grid size.
    #[must_use]
    pub fn offset(self, dx: i32, dy: i32) -> Option<CellCoord> {
        let column = self.column.checked_add_signed(dx)?;
        let row = self.row.checked_add_signed(dy)?;
        Some(Self::new(column, row))
    }

    /// Reports whether the cell lies inside a square grid of the provided size.
    #[must_use]
    pub const fn is_within(&self, grid_size: u32) -> bool {
        self.column < grid_size && self.row < grid_size
    }
}

/// Cardinal directions delivered by input adapters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    Up,
    /// Movement toward increasing row indices.
    Down,
    /// Movement toward decreasing column indices.
    Left,
    /// Movement toward increasing column indices.
    Right,
}

impl Direction {
    /// Column and row delta associated with the direction.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }
}

/// Discrete input events consumed by the turn controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InputEvent {
    /// Moves the active cursor one cell.
    Move(Direction),
    /// Confirms the move or skill target under the cursor.
    Confirm,
    /// Starts targeting with the skill stored in the slot.
    SelectSkill(SkillSlot),
    /// Ends the session.
    Quit,
}

/// Terrain classification of a grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerrainKind {
    /// Units may be moved onto the cell by the player.
    Traversable,
    /// The cell never appears in a unit's accessible set.
    NonTraversable,
}

impl TerrainKind {
    /// Reports whether the terrain admits player movement.
    #[must_use]
    pub const fn is_traversable(self) -> bool {
        matches!(self, Self::Traversable)
    }
}

/// Immutable grid square with a fixed terrain kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Cell {
    coord: CellCoord,
    kind: TerrainKind,
}

impl Cell {
    /// Creates a new cell descriptor.
    #[must_use]
    pub const fn new(coord: CellCoord, kind: TerrainKind) -> Self {
        Self { coord, kind }
    }

    /// Location of the cell.
    #[must_use]
    pub const fn coord(&self) -> CellCoord {
        self.coord
    }

    /// Terrain kind assigned at grid generation.
    #[must_use]
    pub const fn kind(&self) -> TerrainKind {
        self.kind
    }
}

/// Read-only view into the dense, row-major terrain grid.
#[derive(Clone, Copy, Debug)]
pub struct TerrainView<'a> {
    kinds: &'a [TerrainKind],
    size: u32,
}

impl<'a> TerrainView<'a> {
    /// Captures a new terrain view backed by the provided row-major slice.
    #[must_use]
    pub fn new(kinds: &'a [TerrainKind], size: u32) -> Self {
        Self { kinds, size }
    }

    /// Number of cells along each edge of the square grid.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Reports whether the cell lies inside the grid.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.is_within(self.size)
    }

    /// Returns the cell stored at the coordinate.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::OutOfBounds`] when the coordinate lies outside the grid.
    pub fn cell_at(&self, cell: CellCoord) -> Result<Cell, GridError> {
        self.index(cell)
            .and_then(|index| self.kinds.get(index).copied())
            .map(|kind| Cell::new(cell, kind))
            .ok_or(GridError::OutOfBounds {
                column: cell.column(),
                row: cell.row(),
                size: self.size,
            })
    }

    /// Reports whether the cell exists and is traversable.
    #[must_use]
    pub fn is_traversable(&self, cell: CellCoord) -> bool {
        self.cell_at(cell)
            .map_or(false, |found| found.kind().is_traversable())
    }

    /// Iterates over every cell in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = Cell> + 'a {
        let size = self.size.max(1);
        self.kinds.iter().enumerate().map(move |(index, kind)| {
            let index = index as u32;
            Cell::new(CellCoord::new(index % size, index / size), *kind)
        })
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }
        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let width = usize::try_from(self.size).ok()?;
        Some(row * width + column)
    }
}

/// Effect applied when a skill resolves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SkillEffect {
    /// Removes `power` health from the hostile unit in the target cell.
    Damage,
}

/// Immutable descriptor of a ranged action.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Skill {
    name: String,
    range_min: u32,
    range_max: u32,
    effect: SkillEffect,
    power: u32,
}

impl Skill {
    /// Creates a new skill descriptor.
    #[must_use]
    pub fn new<N>(name: N, range_min: u32, range_max: u32, effect: SkillEffect, power: u32) -> Self
    where
        N: Into<String>,
    {
        Self {
            name: name.into(),
            range_min,
            range_max,
            effect,
            power,
        }
    }

    /// Display name of the skill.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Smallest Manhattan distance the skill can reach.
    #[must_use]
    pub const fn range_min(&self) -> u32 {
        self.range_min
    }

    /// Largest Manhattan distance the skill can reach.
    #[must_use]
    pub const fn range_max(&self) -> u32 {
        self.range_max
    }

    /// Effect applied on resolution.
    #[must_use]
    pub const fn effect(&self) -> SkillEffect {
        self.effect
    }

    /// Magnitude of the effect.
    #[must_use]
    pub const fn power(&self) -> u32 {
        self.power
    }

    /// Reports whether a Manhattan distance falls inside the skill's band.
    #[must_use]
    pub const fn covers(&self, distance: u32) -> bool {
        distance >= self.range_min && distance <= self.range_max
    }
}

/// One of the three fixed loadout slots.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SkillSlot {
    /// First slot.
    A,
    /// Second slot.
    B,
    /// Third slot.
    C,
}

impl SkillSlot {
    /// Every slot in loadout order.
    pub const ALL: [SkillSlot; 3] = [SkillSlot::A, SkillSlot::B, SkillSlot::C];

    /// Zero-based index of the slot.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::A => 0,
            Self::B => 1,
            Self::C => 2,
        }
    }

    /// Letter shown next to the slot in skill listings.
    #[must_use]
    pub const fn label(self) -> char {
        match self {
            Self::A => 'A',
            Self::B => 'B',
            Self::C => 'C',
        }
    }
}

/// Fixed set of three skills owned by a unit.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SkillLoadout {
    skills: [Skill; 3],
}

impl SkillLoadout {
    /// Creates a loadout from three skills stored in slot order.
    #[must_use]
    pub const fn new(skills: [Skill; 3]) -> Self {
        Self { skills }
    }

    /// Loadout granted to every newly deployed unit.
    #[must_use]
    pub fn standard() -> Self {
        Self::new([
            Skill::new("Pistol", 1, 3, SkillEffect::Damage, 3),
            Skill::new("Rifle", 2, 5, SkillEffect::Damage, 5),
            Skill::new("Grenade", 3, 7, SkillEffect::Damage, 4),
        ])
    }

    /// Skill stored in the slot.
    #[must_use]
    pub fn get(&self, slot: SkillSlot) -> &Skill {
        &self.skills[slot.index()]
    }

    /// Iterates over the skills in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (SkillSlot, &Skill)> {
        SkillSlot::ALL.into_iter().zip(self.skills.iter())
    }
}

/// Immutable representation of a single unit's state used for queries.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnitSnapshot {
    /// Unique identifier assigned to the unit.
    pub id: UnitId,
    /// Team the unit fights for.
    pub team: Team,
    /// Grid cell currently occupied by the unit.
    pub cell: CellCoord,
    /// Remaining health.
    pub health: i32,
    /// Damage dealt by a melee attack.
    pub attack_power: u32,
    /// Whether the unit is the one currently acting.
    pub is_selected: bool,
    /// Skills available to the unit.
    pub skills: SkillLoadout,
}

/// Read-only snapshot describing every living unit in roster order.
#[derive(Clone, Debug, Default)]
pub struct UnitView {
    snapshots: Vec<UnitSnapshot>,
}

impl UnitView {
    /// Creates a new unit view from snapshots already arranged in roster order.
    #[must_use]
    pub fn from_snapshots(snapshots: Vec<UnitSnapshot>) -> Self {
        Self { snapshots }
    }

    /// Iterator over every captured unit.
    pub fn iter(&self) -> impl Iterator<Item = &UnitSnapshot> {
        self.snapshots.iter()
    }

    /// Iterator over the units of one team in roster order.
    pub fn team(&self, team: Team) -> impl Iterator<Item = &UnitSnapshot> {
        self.snapshots
            .iter()
            .filter(move |snapshot| snapshot.team == team)
    }

    /// Number of living units on the team.
    #[must_use]
    pub fn count(&self, team: Team) -> usize {
        self.team(team).count()
    }

    /// Looks up a unit by identifier.
    #[must_use]
    pub fn get(&self, unit: UnitId) -> Option<&UnitSnapshot> {
        self.snapshots.iter().find(|snapshot| snapshot.id == unit)
    }

    /// Returns the first unit occupying the cell, if any.
    #[must_use]
    pub fn occupant(&self, cell: CellCoord) -> Option<&UnitSnapshot> {
        self.snapshots.iter().find(|snapshot| snapshot.cell == cell)
    }

    /// Returns the first unit hostile to `team` occupying the cell, if any.
    #[must_use]
    pub fn hostile_at(&self, cell: CellCoord, team: Team) -> Option<&UnitSnapshot> {
        self.team(team.opponent()).find(|snapshot| snapshot.cell == cell)
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<UnitSnapshot> {
        self.snapshots
    }
}

/// Serializable capture of the authoritative world state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    /// Number of cells along each grid edge.
    pub grid_size: u32,
    /// Terrain kinds in row-major order.
    pub terrain: Vec<TerrainKind>,
    /// Living units in roster order, players first.
    pub units: Vec<UnitSnapshot>,
    /// Identifier the world allocates to the next deployed unit.
    pub next_unit_id: u32,
}

/// Final result of a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// Every enemy unit was defeated.
    Victory,
    /// Every player unit was defeated.
    Defeat,
}

/// Immutable tuning values handed to the world and the turn controller.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Number of cells along each edge of the square grid.
    pub grid_size: u32,
    /// Chebyshev radius of the player move neighborhood.
    pub move_radius: u32,
    /// Probability that a generated cell is non-traversable.
    pub obstacle_probability: f64,
    /// Seed for terrain generation and the enemy heuristic.
    pub seed: u64,
}

impl GameConfig {
    /// Grid size used when none is configured.
    pub const DEFAULT_GRID_SIZE: u32 = 8;
    /// Move radius used when none is configured.
    pub const DEFAULT_MOVE_RADIUS: u32 = 3;
    /// Obstacle probability used when none is configured.
    pub const DEFAULT_OBSTACLE_PROBABILITY: f64 = 0.2;
    /// Seed used when none is configured.
    pub const DEFAULT_SEED: u64 = 0x5eed_7ac7_1c5f_00d5;
    /// Smallest grid that fits both default squads without overlap.
    pub const MIN_GRID_SIZE: u32 = 3;
    /// Largest supported grid.
    pub const MAX_GRID_SIZE: u32 = 256;

    /// Checks the configuration for values the engine cannot honour.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] encountered.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(Self::MIN_GRID_SIZE..=Self::MAX_GRID_SIZE).contains(&self.grid_size) {
            return Err(ConfigError::GridSize {
                grid_size: self.grid_size,
            });
        }
        if self.move_radius == 0 {
            return Err(ConfigError::MoveRadius);
        }
        if !(0.0..=1.0).contains(&self.obstacle_probability) {
            return Err(ConfigError::ObstacleProbability {
                probability: self.obstacle_probability,
            });
        }
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: Self::DEFAULT_GRID_SIZE,
            move_radius: Self::DEFAULT_MOVE_RADIUS,
            obstacle_probability: Self::DEFAULT_OBSTACLE_PROBABILITY,
            seed: Self::DEFAULT_SEED,
        }
    }
}

/// Errors raised by grid queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum GridError {
    /// The coordinate lies outside the grid.
    #[error("cell ({column}, {row}) lies outside the {size}x{size} grid")]
    OutOfBounds {
        /// Requested column.
        column: u32,
        /// Requested row.
        row: u32,
        /// Edge length of the grid.
        size: u32,
    },
}

/// Reasons a confirmed player action did not resolve as requested.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum ActionError {
    /// The cursor cell is not in the active accessible or targetable set.
    #[error(
        "cell ({}, {}) is not a legal choice for the active action",
        .cell.column(),
        .cell.row()
    )]
    IllegalAction {
        /// Cell under the cursor when confirm was pressed.
        cell: CellCoord,
    },
    /// The skill was aimed at a cell without a hostile occupant.
    #[error("no hostile unit occupies ({}, {})", .cell.column(), .cell.row())]
    EmptyTarget {
        /// Cell the skill was aimed at.
        cell: CellCoord,
    },
}

/// Errors raised when validating a [`GameConfig`].
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// The grid size is outside the supported range.
    #[error(
        "grid_size must lie within {}..={} (received {grid_size})",
        GameConfig::MIN_GRID_SIZE,
        GameConfig::MAX_GRID_SIZE
    )]
    GridSize {
        /// Provided grid size.
        grid_size: u32,
    },
    /// The move radius is zero.
    #[error("move_radius must be positive")]
    MoveRadius,
    /// The obstacle probability is not a probability.
    #[error("obstacle_probability must lie within 0.0..=1.0 (received {probability})")]
    ObstacleProbability {
        /// Provided probability.
        probability: f64,
    },
}

/// Errors raised when rebuilding a world from a [`WorldSnapshot`].
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SnapshotError {
    /// The terrain does not hold exactly one kind per cell.
    #[error("terrain holds {actual} cells but a {size}x{size} grid needs {expected}")]
    TerrainSize {
        /// Edge length declared by the snapshot.
        size: u32,
        /// Number of cells the grid requires.
        expected: usize,
        /// Number of cells the snapshot provided.
        actual: usize,
    },
    /// A unit sits outside the grid.
    #[error("unit {} is placed outside the grid", .unit.get())]
    UnitOutOfBounds {
        /// Identifier of the misplaced unit.
        unit: UnitId,
        /// Underlying grid error.
        #[source]
        source: GridError,
    },
    /// Two units share an identifier.
    #[error("unit identifier {} appears more than once", .unit.get())]
    DuplicateUnit {
        /// Identifier that was repeated.
        unit: UnitId,
    },
    /// A unit has no health left and would already have been removed.
    #[error("unit {} has no health left", .unit.get())]
    DefeatedUnit {
        /// Identifier of the defeated unit.
        unit: UnitId,
    },
}
