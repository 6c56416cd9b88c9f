//! Extremal point search: two maximally separated points of a region.
//!
//! The pair seeds the great circle along which a region is cut. Two
//! strategies are available:
//!
//! - [`ExtremalSearch::BorderTrace`] rotates the region's weighted
//!   barycenter onto the pole, keeps the member farthest from the pole in
//!   each azimuth bin, and searches that border. Works for maps and point
//!   sets of any extent.
//! - [`ExtremalSearch::NeighborBoundary`] searches all grid cells that touch
//!   a cell outside the region. Maps only, and only valid for regions that
//!   fit in a hemisphere.

use std::f64::consts::TAU;

use glam::DVec3;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::assignment::PartitionAssignment;
use crate::coords::unit_distance;
use crate::field::WeightedField;
use crate::grid::NO_NEIGHBOR;
use crate::rotate::EulerAngles;
use crate::{AngularPoint, PartitionError};

/// Barycenters shorter than this have no meaningful direction.
const BARYCENTER_EPS: f64 = 1e-12;

/// Strategy for locating a region's two extremal points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtremalSearch {
    /// Barycenter-centered border tracing with `bins` azimuth bins.
    BorderTrace { bins: usize },
    /// All-pairs search over grid boundary cells.
    NeighborBoundary,
}

impl Default for ExtremalSearch {
    fn default() -> Self {
        ExtremalSearch::BorderTrace { bins: 180 }
    }
}

impl ExtremalSearch {
    /// Extremal pair of partition `partition`, whose members are `members`.
    pub fn find<F: WeightedField>(
        &self,
        field: &F,
        assignment: &PartitionAssignment,
        partition: u32,
        members: &[u32],
        hemisphere_tolerance: f64,
    ) -> Result<(AngularPoint, AngularPoint), PartitionError> {
        let pair = match *self {
            ExtremalSearch::BorderTrace { bins } => border_trace_extremes(field, members, bins)?,
            ExtremalSearch::NeighborBoundary => {
                neighbor_boundary_extremes(field, assignment, partition, hemisphere_tolerance)?
            }
        };
        log::trace!(
            "partition {}: extremal points ({:.6}, {:.6}) / ({:.6}, {:.6})",
            partition,
            pair.0.phi,
            pair.0.theta,
            pair.1.phi,
            pair.1.theta
        );
        Ok(pair)
    }
}

/// Weighted mean direction of `members`, as an unnormalized vector.
fn barycenter_vec<F: WeightedField>(field: &F, members: &[u32]) -> DVec3 {
    members
        .iter()
        .map(|&i| field.weight(i as usize) * field.position(i as usize).to_vec())
        .fold(DVec3::ZERO, |acc, v| acc + v)
}

/// Weighted barycenter direction of `members`.
///
/// Falls back to the north pole when the weighted mean vanishes (a region
/// with no weight, or one balanced over the whole sphere).
pub fn weighted_barycenter<F: WeightedField>(field: &F, members: &[u32]) -> AngularPoint {
    AngularPoint::from_vec(barycenter_vec(field, members))
}

/// Indices `(i, j)`, `i < j`, of the two most distant points.
///
/// Ties go to the lexicographically smallest pair, so the result does not
/// depend on thread scheduling. A single point pairs with itself.
pub fn farthest_pair(points: &[DVec3]) -> Option<(usize, usize)> {
    match points.len() {
        0 => return None,
        1 => return Some((0, 0)),
        _ => {}
    }
    maybe_par_range!(0..points.len() - 1)
        .map(|i| {
            let mut best = (f64::NEG_INFINITY, i, i + 1);
            for j in i + 1..points.len() {
                let d = unit_distance(points[i], points[j]);
                if d > best.0 {
                    best = (d, i, j);
                }
            }
            best
        })
        .max_by(|a, b| {
            a.0.total_cmp(&b.0)
                .then_with(|| (b.1, b.2).cmp(&(a.1, a.2)))
        })
        .map(|(_, i, j)| (i, j))
}

fn pair_of<F: WeightedField>(field: &F, candidates: &[u32]) -> Option<(AngularPoint, AngularPoint)> {
    let positions: Vec<AngularPoint> = candidates
        .iter()
        .map(|&i| field.position(i as usize))
        .collect();
    let vecs: Vec<DVec3> = positions.iter().map(|p| p.to_vec()).collect();
    farthest_pair(&vecs).map(|(i, j)| (positions[i], positions[j]))
}

/// Border samples of `members`: per azimuth bin around the barycenter, the
/// member farthest from it. Returned in bin order; empty when `bins` is 0.
pub fn border_trace<F: WeightedField>(field: &F, members: &[u32], bins: usize) -> Vec<u32> {
    if bins == 0 {
        return Vec::new();
    }
    let to_pole = EulerAngles::to_pole(weighted_barycenter(field, members)).matrix();

    let mut border: Vec<Option<(f64, u32)>> = vec![None; bins];
    for &i in members {
        let q = to_pole * field.position(i as usize).to_vec();
        let azimuth = q.y.atan2(q.x).rem_euclid(TAU);
        let colatitude = q.x.hypot(q.y).atan2(q.z);
        let bin = ((azimuth / TAU * bins as f64) as usize).min(bins - 1);
        match border[bin] {
            Some((best, _)) if colatitude <= best => {}
            _ => border[bin] = Some((colatitude, i)),
        }
    }
    border.into_iter().flatten().map(|(_, i)| i).collect()
}

/// Extremal pair by barycenter-centered border tracing.
///
/// Any non-empty region yields a pair; a region whose border collapses to a
/// single sample returns that sample twice. `bins` must be at least 1.
pub fn border_trace_extremes<F: WeightedField>(
    field: &F,
    members: &[u32],
    bins: usize,
) -> Result<(AngularPoint, AngularPoint), PartitionError> {
    if bins == 0 {
        return Err(PartitionError::InvalidConfig(
            "border tracing needs at least one bin".to_string(),
        ));
    }
    let border = border_trace(field, members, bins);
    pair_of(field, &border).ok_or(PartitionError::EmptyField)
}

/// Members of `partition` with at least one grid neighbor outside it.
pub fn boundary_cells<F: WeightedField>(
    field: &F,
    assignment: &PartitionAssignment,
    partition: u32,
) -> Result<Vec<u32>, PartitionError> {
    if assignment.len() != field.len() {
        return Err(PartitionError::LengthMismatch {
            weights: field.len(),
            positions: assignment.len(),
        });
    }
    let ids = assignment.as_slice();
    let mut boundary = Vec::new();
    for (cell, &id) in ids.iter().enumerate() {
        if id != partition {
            continue;
        }
        let neighbors = field
            .neighbors(cell)
            .ok_or(PartitionError::MissingAdjacency)?;
        let on_edge = neighbors
            .iter()
            .filter(|&&n| n != NO_NEIGHBOR)
            .any(|&n| ids[n as usize] != partition);
        if on_edge {
            boundary.push(cell as u32);
        }
    }
    Ok(boundary)
}

/// Extremal pair by all-pairs search over the boundary cells of `partition`.
///
/// The partition must fit in the hemisphere around its barycenter, up to
/// `hemisphere_tolerance` in cosine.
pub fn neighbor_boundary_extremes<F: WeightedField>(
    field: &F,
    assignment: &PartitionAssignment,
    partition: u32,
    hemisphere_tolerance: f64,
) -> Result<(AngularPoint, AngularPoint), PartitionError> {
    let boundary = boundary_cells(field, assignment, partition)?;
    log::trace!("partition {}: {} boundary cells", partition, boundary.len());
    if boundary.is_empty() {
        return Err(PartitionError::NoBoundary { partition });
    }
    check_hemisphere(
        field,
        &assignment.members(partition),
        partition,
        hemisphere_tolerance,
    )?;
    pair_of(field, &boundary).ok_or(PartitionError::NoBoundary { partition })
}

/// Reject regions reaching more than `tolerance` past the hemisphere
/// centered on their barycenter.
fn check_hemisphere<F: WeightedField>(
    field: &F,
    members: &[u32],
    partition: u32,
    tolerance: f64,
) -> Result<(), PartitionError> {
    let b = barycenter_vec(field, members);
    if b.length() < BARYCENTER_EPS {
        return Err(PartitionError::HemisphereExceeded {
            partition,
            min_cos: -1.0,
        });
    }
    let b = b.normalize();
    let min_cos = members
        .iter()
        .map(|&i| field.position(i as usize).to_vec().dot(b))
        .fold(f64::INFINITY, f64::min);
    if min_cos < -tolerance {
        return Err(PartitionError::HemisphereExceeded { partition, min_cos });
    }
    Ok(())
}
