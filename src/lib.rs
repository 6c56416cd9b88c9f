//! Weight-balanced partitioning of fields on the unit sphere (S2).
//!
//! This crate splits a weighted field on the sphere, either a gridded map
//! or a set of weighted points, into N regions of near-equal total weight
//! by recursive bisection along rotated meridians.
//!
//! # Example
//!
//! ```
//! use s2_partition::{split_into_n, CubeSphereGrid, SkyMap};
//!
//! // A uniform map over the whole sphere.
//! let grid = CubeSphereGrid::new(8).unwrap();
//! let map = SkyMap::new(grid, vec![1.0; 6 * 64]).unwrap();
//!
//! let assignment = split_into_n(&map, 4).expect("partitioning should succeed");
//! assert_eq!(assignment.partition_ids(), vec![1, 2, 3, 4]);
//! ```

/// Conditionally parallel iterator over a range.
macro_rules! maybe_par_range {
    ($range:expr) => {{
        #[cfg(feature = "parallel")]
        {
            ($range).into_par_iter()
        }
        #[cfg(not(feature = "parallel"))]
        {
            $range
        }
    }};
}

/// Conditionally parallel iterator over a slice.
macro_rules! maybe_par_iter {
    ($slice:expr) => {{
        #[cfg(feature = "parallel")]
        {
            $slice.par_iter()
        }
        #[cfg(not(feature = "parallel"))]
        {
            $slice.iter()
        }
    }};
}

mod assignment;
mod balance;
pub mod coords;
mod error;
pub mod extremal;
mod field;
pub mod grid;
mod partition;
pub mod rotate;
mod timing;
mod types;

pub use assignment::{PartitionAssignment, BACKGROUND};
pub use balance::{find_balanced_split, weight_imbalance, BalanceSearch};
pub use error::PartitionError;
pub use extremal::ExtremalSearch;
pub use field::{PointSet, SkyMap, WeightedField};
pub use grid::{CubeSphereGrid, SphereGrid, NO_NEIGHBOR};
pub use partition::{split_into_n, split_into_n_with, split_region_in_two, split_region_in_two_with};
pub use rotate::{EulerAngles, SplitTransform};
pub use types::AngularPoint;

/// Configuration for partitioning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartitionConfig {
    /// How each region's two extremal points are located.
    pub extremal: ExtremalSearch,
    /// Grid search for the balanced cut longitude.
    pub balance: BalanceSearch,
    /// Slack, in cosine, before a region is considered to spill past the
    /// hemisphere around its barycenter.
    ///
    /// Only checked by [`ExtremalSearch::NeighborBoundary`], which assumes
    /// hemispherical regions.
    pub hemisphere_tolerance: f64,
}

impl PartitionConfig {
    /// Reject settings that would silently disable part of the search.
    pub fn validate(&self) -> Result<(), PartitionError> {
        if let ExtremalSearch::BorderTrace { bins: 0 } = self.extremal {
            return Err(PartitionError::InvalidConfig(
                "border tracing needs at least one bin".to_string(),
            ));
        }
        if !(self.hemisphere_tolerance.is_finite() && self.hemisphere_tolerance >= 0.0) {
            return Err(PartitionError::InvalidConfig(format!(
                "hemisphere tolerance must be finite and non-negative, got {}",
                self.hemisphere_tolerance
            )));
        }
        if !(self.balance.refine_span.is_finite() && self.balance.refine_span >= 0.0) {
            return Err(PartitionError::InvalidConfig(format!(
                "refine span must be finite and non-negative, got {}",
                self.balance.refine_span
            )));
        }
        Ok(())
    }
}

impl Default for PartitionConfig {
    fn default() -> Self {
        Self {
            extremal: ExtremalSearch::default(),
            balance: BalanceSearch::default(),
            hemisphere_tolerance: 0.05,
        }
    }
}
