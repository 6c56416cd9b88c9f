//! Spherical pixel grids used by gridded maps.
//!
//! A [`SphereGrid`] tessellates the sphere into cells at a given resolution
//! and answers the four questions the partitioner needs: how many cells a
//! resolution has, where a cell is, which cell holds a direction, and which
//! cells touch it. [`CubeSphereGrid`] is the built-in implementation.

mod cube;
mod projection;


pub use cube::CubeSphereGrid;

use crate::{AngularPoint, PartitionError};

/// Sentinel for a missing neighbor slot.
pub const NO_NEIGHBOR: u32 = u32::MAX;

/// A resolution-parameterized tessellation of the unit sphere.
pub trait SphereGrid: Sized {
    /// Resolution whose grid has exactly `num_cells` cells.
    fn resolution_from_cell_count(num_cells: usize) -> Result<usize, PartitionError>;

    /// Build the grid at a given resolution.
    fn with_resolution(res: usize) -> Result<Self, PartitionError>;

    /// Build the grid whose cell count is `num_cells`.
    fn from_cell_count(num_cells: usize) -> Result<Self, PartitionError> {
        Self::with_resolution(Self::resolution_from_cell_count(num_cells)?)
    }

    fn resolution(&self) -> usize;

    fn num_cells(&self) -> usize;

    /// Center of a cell.
    fn cell_to_angle(&self, cell: usize) -> AngularPoint;

    /// Cell containing a direction.
    fn angle_to_cell(&self, p: AngularPoint) -> usize;

    /// Up to 8 adjacent cells; unused slots hold [`NO_NEIGHBOR`].
    fn neighbors(&self, cell: usize) -> [u32; 8];
}
