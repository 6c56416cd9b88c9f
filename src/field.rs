//! Weighted scalar fields on the sphere: gridded maps and point sets.

use crate::grid::SphereGrid;
use crate::{AngularPoint, PartitionError};

/// A weighted field the partitioner can split.
///
/// Entries are addressed by a dense index (cell ID for maps, point index
/// for point sets). Weights are finite and non-negative.
pub trait WeightedField {
    /// Number of entries, including zero-weight ones.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn weight(&self, index: usize) -> f64;

    fn position(&self, index: usize) -> AngularPoint;

    /// True if zero-weight entries are background (never assigned a
    /// partition). Gridded maps have background, point sets do not.
    fn has_background(&self) -> bool;

    /// Grid adjacency of an entry, if the field has any.
    fn neighbors(&self, index: usize) -> Option<[u32; 8]>;

    /// Whether `index` takes part in partitioning.
    #[inline]
    fn is_active(&self, index: usize) -> bool {
        !self.has_background() || self.weight(index) > 0.0
    }

    /// Sum of all weights.
    fn total_weight(&self) -> f64 {
        (0..self.len()).map(|i| self.weight(i)).sum()
    }
}

fn validate_weights(weights: &[f64]) -> Result<(), PartitionError> {
    match weights
        .iter()
        .enumerate()
        .find(|(_, &w)| !w.is_finite() || w < 0.0)
    {
        Some((index, &weight)) => Err(PartitionError::InvalidWeight { index, weight }),
        None => Ok(()),
    }
}

/// A dense weight map over the cells of a spherical grid.
///
/// Cells with zero weight are unfilled background.
#[derive(Debug, Clone)]
pub struct SkyMap<G> {
    grid: G,
    weights: Vec<f64>,
}

impl<G: SphereGrid> SkyMap<G> {
    /// Wrap a weight vector indexed by the cells of `grid`.
    pub fn new(grid: G, weights: Vec<f64>) -> Result<Self, PartitionError> {
        if weights.len() != grid.num_cells() {
            return Err(PartitionError::LengthMismatch {
                weights: weights.len(),
                positions: grid.num_cells(),
            });
        }
        validate_weights(&weights)?;
        Ok(Self { grid, weights })
    }

    /// Build a map, deriving the grid resolution from the number of weights.
    pub fn from_weights(weights: Vec<f64>) -> Result<Self, PartitionError> {
        let grid = G::from_cell_count(weights.len())?;
        Self::new(grid, weights)
    }

    /// A map holding `value` at the given cells and zero elsewhere.
    pub fn from_cells(grid: G, cells: &[usize], value: f64) -> Result<Self, PartitionError> {
        let mut weights = vec![0.0; grid.num_cells()];
        for &cell in cells {
            match weights.get_mut(cell) {
                Some(w) => *w = value,
                None => {
                    return Err(PartitionError::CellOutOfRange {
                        cell,
                        num_cells: grid.num_cells(),
                    })
                }
            }
        }
        Self::new(grid, weights)
    }

    #[inline]
    pub fn grid(&self) -> &G {
        &self.grid
    }

    #[inline]
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Cells with nonzero weight.
    pub fn filled_cells(&self) -> Vec<usize> {
        self.weights
            .iter()
            .enumerate()
            .filter(|(_, &w)| w > 0.0)
            .map(|(i, _)| i)
            .collect()
    }
}

impl<G: SphereGrid> WeightedField for SkyMap<G> {
    #[inline]
    fn len(&self) -> usize {
        self.weights.len()
    }

    #[inline]
    fn weight(&self, index: usize) -> f64 {
        self.weights[index]
    }

    #[inline]
    fn position(&self, index: usize) -> AngularPoint {
        self.grid.cell_to_angle(index)
    }

    #[inline]
    fn has_background(&self) -> bool {
        true
    }

    #[inline]
    fn neighbors(&self, index: usize) -> Option<[u32; 8]> {
        Some(self.grid.neighbors(index))
    }
}

/// A set of weighted points on the sphere.
///
/// Every point takes part in partitioning, including zero-weight ones.
#[derive(Debug, Clone)]
pub struct PointSet {
    points: Vec<AngularPoint>,
    weights: Vec<f64>,
}

impl PointSet {
    pub fn new(points: Vec<AngularPoint>, weights: Vec<f64>) -> Result<Self, PartitionError> {
        if points.len() != weights.len() {
            return Err(PartitionError::LengthMismatch {
                weights: weights.len(),
                positions: points.len(),
            });
        }
        validate_weights(&weights)?;
        Ok(Self { points, weights })
    }

    /// Every point with weight 1.
    pub fn uniform(points: Vec<AngularPoint>) -> Self {
        let weights = vec![1.0; points.len()];
        Self { points, weights }
    }

    #[inline]
    pub fn points(&self) -> &[AngularPoint] {
        &self.points
    }

    #[inline]
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }
}

impl WeightedField for PointSet {
    #[inline]
    fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    fn weight(&self, index: usize) -> f64 {
        self.weights[index]
    }

    #[inline]
    fn position(&self, index: usize) -> AngularPoint {
        self.points[index]
    }

    #[inline]
    fn has_background(&self) -> bool {
        false
    }

    #[inline]
    fn neighbors(&self, _index: usize) -> Option<[u32; 8]> {
        None
    }
}
