//! Terrain grid generation and lookup.

use grid_tactics_core::{
    Cell, CellCoord, ConfigError, GridError, SnapshotError, TerrainKind, TerrainView,
};
use rand::{
    distributions::{Bernoulli, Distribution},
    Rng,
};

/// Square grid of cells whose terrain is fixed at construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridModel {
    size: u32,
    kinds: Vec<TerrainKind>,
}

impl GridModel {
    /// Generates a grid where each cell independently becomes non-traversable
    /// with the provided probability.
    ///
    /// Cells are drawn in row-major order, so the same RNG state always yields
    /// the same layout.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ObstacleProbability`] when the probability lies
    /// outside `0.0..=1.0`.
    pub fn generate<R>(
        size: u32,
        obstacle_probability: f64,
        rng: &mut R,
    ) -> Result<Self, ConfigError>
    where
        R: Rng + ?Sized,
    {
        let obstacles = Bernoulli::new(obstacle_probability).map_err(|_| {
            ConfigError::ObstacleProbability {
                probability: obstacle_probability,
            }
        })?;

        let capacity = cell_capacity(size);
        let mut kinds = Vec::with_capacity(capacity);
        for _ in 0..capacity {
            let kind = if obstacles.sample(rng) {
                TerrainKind::NonTraversable
            } else {
                TerrainKind::Traversable
            };
            kinds.push(kind);
        }

        Ok(Self { size, kinds })
    }

    /// Rebuilds a grid from terrain kinds stored in row-major order.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::TerrainSize`] when the number of kinds does not
    /// match the number of cells in a `size` by `size` grid.
    pub fn from_kinds(size: u32, kinds: Vec<TerrainKind>) -> Result<Self, SnapshotError> {
        let expected = cell_capacity(size);
        if kinds.len() != expected {
            return Err(SnapshotError::TerrainSize {
                size,
                expected,
                actual: kinds.len(),
            });
        }
        Ok(Self { size, kinds })
    }

    /// Number of cells along each edge of the grid.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Terrain kinds in row-major order.
    #[must_use]
    pub fn kinds(&self) -> &[TerrainKind] {
        &self.kinds
    }

    /// Returns the cell stored at the coordinate.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::OutOfBounds`] when the coordinate lies outside the grid.
    pub fn cell_at(&self, cell: CellCoord) -> Result<Cell, GridError> {
        self.view().cell_at(cell)
    }

    /// Reports whether the cell exists and is traversable.
    #[must_use]
    pub fn is_traversable(&self, cell: CellCoord) -> bool {
        self.view().is_traversable(cell)
    }

    /// Exposes a read-only view for systems.
    #[must_use]
    pub fn view(&self) -> TerrainView<'_> {
        TerrainView::new(&self.kinds, self.size)
    }
}

fn cell_capacity(size: u32) -> usize {
    let edge = size as usize;
    edge * edge
}
