#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Grid Tactics adapters.

use anyhow::Result as AnyResult;
use glam::Vec2;
use grid_tactics_core::{Cell, CellCoord, SkillLoadout, Team, TerrainKind, UnitId};
use std::{error::Error, fmt, time::Duration};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Byte RGB channels, rounding each float channel to the nearest step.
    #[must_use]
    pub fn to_rgb_u8(self) -> [u8; 3] {
        [self.red, self.green, self.blue]
            .map(|channel| (channel.clamp(0.0, 1.0) * 255.0).round() as u8)
    }
}

/// Colors assigned to every element of a frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    /// Fill behind the grid.
    pub background: Color,
    /// Fill of traversable cells.
    pub traversable: Color,
    /// Fill of non-traversable cells.
    pub non_traversable: Color,
    /// Body of player units.
    pub player: Color,
    /// Body of enemy units.
    pub enemy: Color,
    /// Fill drawn under the unit whose turn is in progress.
    pub selected_backdrop: Color,
    /// Cells the active unit may move to.
    pub accessible: Color,
    /// Cells the active skill may be aimed at.
    pub targetable: Color,
    /// Cursor used while choosing a destination.
    pub move_cursor: Color,
    /// Cursor used while aiming a skill.
    pub targeting_cursor: Color,
    /// Portion of the health bar representing lost health.
    pub health_lost: Color,
    /// Portion of the health bar representing remaining health.
    pub health_remaining: Color,
    /// Panel text.
    pub text: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Color::from_rgb_u8(0, 0, 0),
            traversable: Color::from_rgb_u8(144, 238, 144),
            non_traversable: Color::from_rgb_u8(220, 20, 60),
            player: Color::from_rgb_u8(0, 0, 255),
            enemy: Color::from_rgb_u8(255, 0, 0),
            selected_backdrop: Color::from_rgb_u8(0, 255, 0),
            accessible: Color::from_rgb_u8(30, 144, 255),
            targetable: Color::from_rgb_u8(255, 255, 0),
            move_cursor: Color::from_rgb_u8(0, 0, 255),
            targeting_cursor: Color::from_rgb_u8(255, 0, 0),
            health_lost: Color::from_rgb_u8(255, 0, 0),
            health_remaining: Color::from_rgb_u8(0, 255, 0),
            text: Color::from_rgb_u8(255, 255, 255),
        }
    }
}

impl Palette {
    /// Fill used for a terrain kind.
    #[must_use]
    pub const fn terrain(&self, kind: TerrainKind) -> Color {
        match kind {
            TerrainKind::Traversable => self.traversable,
            TerrainKind::NonTraversable => self.non_traversable,
        }
    }

    /// Body color used for a team.
    #[must_use]
    pub const fn team(&self, team: Team) -> Color {
        match team {
            Team::Player => self.player,
            Team::Enemy => self.enemy,
        }
    }
}

/// Describes the square grid in world units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridPresentation {
    /// Number of cells along each grid edge.
    pub size: u32,
    /// Side length of a single cell expressed in world units.
    pub cell_length: f32,
}

impl GridPresentation {
    /// Cell side length used when adapters have no preference.
    pub const DEFAULT_CELL_LENGTH: f32 = 60.0;

    /// Creates a new grid descriptor.
    ///
    /// Returns an error when `cell_length` is not a positive finite number.
    pub fn new(size: u32, cell_length: f32) -> Result<Self, RenderingError> {
        if !cell_length.is_finite() || cell_length <= 0.0 {
            return Err(RenderingError::InvalidCellLength { cell_length });
        }
        Ok(Self { size, cell_length })
    }

    /// Total width and height of the grid.
    #[must_use]
    pub fn extent(&self) -> f32 {
        self.size as f32 * self.cell_length
    }

    /// World-space position of the cell's top-left corner.
    #[must_use]
    pub fn cell_origin(&self, cell: CellCoord) -> Vec2 {
        Vec2::new(cell.column() as f32, cell.row() as f32) * self.cell_length
    }

    /// World-space position of the cell's center.
    #[must_use]
    pub fn cell_center(&self, cell: CellCoord) -> Vec2 {
        self.cell_origin(cell) + Vec2::splat(self.cell_length * 0.5)
    }
}

/// Purpose of a highlighted cell set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HighlightKind {
    /// Destinations for the active unit.
    Accessible,
    /// Targets for the active skill.
    Targetable,
}

/// Purpose of the cursor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CursorKind {
    /// Destination cursor.
    Move,
    /// Skill targeting cursor.
    Targeting,
}

/// Unit as it should appear in the current frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneUnit {
    /// Identifier allocated to the unit by the world.
    pub id: UnitId,
    /// Team the unit fights for.
    pub team: Team,
    /// Cell the unit occupies in the world.
    pub cell: CellCoord,
    /// Drawn center of the unit, which differs from the cell center mid-animation.
    pub position: Vec2,
    /// Remaining health.
    pub health: i32,
    /// Whether the unit's turn is in progress.
    pub is_selected: bool,
}

impl SceneUnit {
    /// Health that fills the health bar completely.
    pub const FULL_HEALTH_BAR: i32 = 10;

    /// Filled share of the health bar.
    #[must_use]
    pub fn health_ratio(&self) -> f32 {
        (self.health as f32 / Self::FULL_HEALTH_BAR as f32).clamp(0.0, 1.0)
    }
}

/// Colors resolved for drawing a single unit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UnitStyle {
    /// Body color.
    pub body: Color,
    /// Fill drawn under a selected unit.
    pub backdrop: Option<Color>,
    /// Health bar color for lost health.
    pub health_lost: Color,
    /// Health bar color for remaining health.
    pub health_remaining: Color,
}

/// Highlighted cell set drawn over the terrain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SceneHighlight {
    /// Why the cells are highlighted.
    pub kind: HighlightKind,
    /// Highlighted cells in ascending order.
    pub cells: Vec<CellCoord>,
}

/// Cursor drawn over the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SceneCursor {
    /// Cursor purpose.
    pub kind: CursorKind,
    /// Cell under the cursor.
    pub cell: CellCoord,
}

/// Immutable description of everything a frame shows.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Grid dimensions.
    pub grid: GridPresentation,
    /// Every grid cell in row-major order.
    pub cells: Vec<Cell>,
    /// Living units, players first.
    pub units: Vec<SceneUnit>,
    /// Highlighted cells, if any phase requires them.
    pub highlight: Option<SceneHighlight>,
    /// Active cursor, if any.
    pub cursor: Option<SceneCursor>,
    /// Panel text lines.
    pub text: Vec<String>,
}

impl Scene {
    /// Places a unit at an arbitrary drawn position, leaving its cell untouched.
    ///
    /// Returns `false` when the scene holds no unit with the identifier.
    pub fn place_unit(&mut self, unit: UnitId, position: Vec2) -> bool {
        match self.units.iter_mut().find(|candidate| candidate.id == unit) {
            Some(found) => {
                found.position = position;
                true
            }
            None => false,
        }
    }
}

/// Lines describing each skill slot, such as `A: Pistol (Range: 1-3)`.
#[must_use]
pub fn skill_panel(loadout: &SkillLoadout) -> Vec<String> {
    loadout
        .iter()
        .map(|(slot, skill)| {
            format!(
                "{}: {} (Range: {}-{})",
                slot.label(),
                skill.name(),
                skill.range_min(),
                skill.range_max()
            )
        })
        .collect()
}

/// Drawing surface supplied by an adapter.
///
/// Draw calls are issued back to front. Nothing needs to become visible until
/// [`Renderer::present_frame`] is called.
pub trait Renderer {
    /// Draws a terrain cell.
    fn draw_cell(&mut self, grid: &GridPresentation, cell: Cell, color: Color);

    /// Tints a set of cells.
    fn draw_highlight(&mut self, grid: &GridPresentation, cells: &[CellCoord], color: Color);

    /// Draws a unit with its health bar.
    fn draw_unit(&mut self, grid: &GridPresentation, unit: &SceneUnit, style: UnitStyle);

    /// Marks the cursor cell.
    fn draw_cursor(&mut self, grid: &GridPresentation, cell: CellCoord, color: Color);

    /// Writes panel text.
    fn draw_text(&mut self, lines: &[String], color: Color);

    /// Makes the frame visible.
    fn present_frame(&mut self) -> AnyResult<()>;
}

/// Issues every draw call needed for the scene and presents the frame.
pub fn draw_scene<R>(renderer: &mut R, scene: &Scene, palette: &Palette) -> AnyResult<()>
where
    R: Renderer + ?Sized,
{
    let grid = &scene.grid;
    for cell in &scene.cells {
        renderer.draw_cell(grid, *cell, palette.terrain(cell.kind()));
    }

    if let Some(highlight) = &scene.highlight {
        let color = match highlight.kind {
            HighlightKind::Accessible => palette.accessible,
            HighlightKind::Targetable => palette.targetable,
        };
        renderer.draw_highlight(grid, &highlight.cells, color);
    }

    for unit in &scene.units {
        let style = UnitStyle {
            body: palette.team(unit.team),
            backdrop: unit.is_selected.then_some(palette.selected_backdrop),
            health_lost: palette.health_lost,
            health_remaining: palette.health_remaining,
        };
        renderer.draw_unit(grid, unit, style);
    }

    if let Some(cursor) = scene.cursor {
        let color = match cursor.kind {
            CursorKind::Move => palette.move_cursor,
            CursorKind::Targeting => palette.targeting_cursor,
        };
        renderer.draw_cursor(grid, cursor.cell, color);
    }

    renderer.draw_text(&scene.text, palette.text);
    renderer.present_frame()
}

/// Interpolated positions shown while a unit slides between two cells.
#[derive(Clone, Debug, PartialEq)]
pub struct MoveAnimation {
    unit: UnitId,
    from: Vec2,
    to: Vec2,
    frame: u32,
}

impl MoveAnimation {
    /// Number of frames between the start and end positions.
    pub const FRAME_COUNT: u32 = 10;

    /// Pause adapters insert between frames.
    pub const FRAME_DELAY: Duration = Duration::from_millis(30);

    /// Creates an animation between two world-space positions.
    #[must_use]
    pub fn new(unit: UnitId, from: Vec2, to: Vec2) -> Self {
        Self {
            unit,
            from,
            to,
            frame: 0,
        }
    }

    /// Unit being animated.
    #[must_use]
    pub const fn unit(&self) -> UnitId {
        self.unit
    }
}

impl Iterator for MoveAnimation {
    type Item = Vec2;

    fn next(&mut self) -> Option<Self::Item> {
        if self.frame >= Self::FRAME_COUNT {
            return None;
        }
        self.frame += 1;
        let progress = self.frame as f32 / Self::FRAME_COUNT as f32;
        Some(self.from.lerp(self.to, progress))
    }
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// Cell length must be a positive finite number.
    InvalidCellLength {
        /// Provided length that failed validation.
        cell_length: f32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCellLength { cell_length } => {
                write!(
                    f,
                    "cell_length must be a positive finite number (received {cell_length})"
                )
            }
        }
    }
}

impl Error for RenderingError {}
