//! Cube-map pixelization of the unit sphere.
//!
//! Projects the sphere onto 6 cube faces and divides each face into a
//! `res × res` grid through the S2 quadratic transform, giving 6·res² cells
//! of roughly equal area. Cell centers and the stitched 8-neighborhood are
//! precomputed on construction, so lookups are O(1).

use glam::DVec3;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::projection::{cell_center, cell_to_face_ij, face_uv_to_cell, point_to_face_uv};
use super::{SphereGrid, NO_NEIGHBOR};
use crate::{AngularPoint, PartitionError};

/// Cube-map grid with precomputed cell centers and neighborhoods.
#[derive(Debug, Clone)]
pub struct CubeSphereGrid {
    res: usize,
    /// Unit vector at the center of each cell.
    /// Length: 6 * res²
    centers: Vec<DVec3>,
    /// 8-neighborhood of each cell, padded with NO_NEIGHBOR.
    /// Length: 6 * res²
    neighbors: Vec<[u32; 8]>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum EdgeDir {
    Left,
    Right,
    Down,
    Up,
}

impl EdgeDir {
    pub(super) const ALL: [EdgeDir; 4] = [EdgeDir::Left, EdgeDir::Right, EdgeDir::Down, EdgeDir::Up];
}

#[inline]
fn cross_face_edge(
    face: usize,
    iu: usize,
    iv: usize,
    dir: EdgeDir,
    res: usize,
) -> (usize, usize, usize) {
    let last = res - 1;
    let iu_flip = last - iu;
    let iv_flip = last - iv;

    match (face, dir) {
        (0, EdgeDir::Left) => (4, last, iv),
        (0, EdgeDir::Right) => (5, 0, iv),
        (0, EdgeDir::Down) => (3, last, iu_flip),
        (0, EdgeDir::Up) => (2, last, iu),
        (1, EdgeDir::Left) => (5, last, iv),
        (1, EdgeDir::Right) => (4, 0, iv),
        (1, EdgeDir::Down) => (3, 0, iu),
        (1, EdgeDir::Up) => (2, 0, iu_flip),
        (2, EdgeDir::Left) => (1, iv_flip, last),
        (2, EdgeDir::Right) => (0, iv, last),
        (2, EdgeDir::Down) => (4, iu, last),
        (2, EdgeDir::Up) => (5, iu_flip, last),
        (3, EdgeDir::Left) => (1, iv, 0),
        (3, EdgeDir::Right) => (0, iv_flip, 0),
        (3, EdgeDir::Down) => (5, iu_flip, 0),
        (3, EdgeDir::Up) => (4, iu, 0),
        (4, EdgeDir::Left) => (1, last, iv),
        (4, EdgeDir::Right) => (0, 0, iv),
        (4, EdgeDir::Down) => (3, iu, last),
        (4, EdgeDir::Up) => (2, iu, 0),
        (5, EdgeDir::Left) => (0, last, iv),
        (5, EdgeDir::Right) => (1, 0, iv),
        (5, EdgeDir::Down) => (3, iu_flip, 0),
        (5, EdgeDir::Up) => (2, iu_flip, last),
        _ => unreachable!("invalid cube face"),
    }
}

/// One step across a cell edge, stitching across cube faces.
#[inline]
pub(super) fn step_one(
    face: usize,
    iu: usize,
    iv: usize,
    dir: EdgeDir,
    res: usize,
) -> (usize, usize, usize) {
    match dir {
        EdgeDir::Left if iu > 0 => (face, iu - 1, iv),
        EdgeDir::Right if iu + 1 < res => (face, iu + 1, iv),
        EdgeDir::Down if iv > 0 => (face, iu, iv - 1),
        EdgeDir::Up if iv + 1 < res => (face, iu, iv + 1),
        _ => cross_face_edge(face, iu, iv, dir, res),
    }
}

#[inline]
fn step_cell(cell: u32, dir: EdgeDir, res: usize) -> u32 {
    let (face, iu, iv) = cell_to_face_ij(cell as usize, res);
    let (nf, nu, nv) = step_one(face, iu, iv, dir, res);
    (nf * res * res + nv * res + nu) as u32
}

/// The diagonal neighbor shared by two edge neighbors `a` and `b` of `center`.
///
/// Returns NO_NEIGHBOR at cube vertices, where only three cells meet.
#[inline]
fn diagonal_from_edge_neighbors(center: u32, a: u32, b: u32, res: usize) -> u32 {
    let b_edges = EdgeDir::ALL.map(|dir| step_cell(b, dir, res));

    let mut found: Option<u32> = None;
    for dir in EdgeDir::ALL {
        let cand = step_cell(a, dir, res);
        if cand == center || cand == a || cand == b {
            continue;
        }
        if b_edges.contains(&cand) {
            match found {
                Some(prev) if prev != cand => return NO_NEIGHBOR,
                _ => found = Some(cand),
            }
        }
    }

    found.unwrap_or(NO_NEIGHBOR)
}

fn cell_neighbors(cell: usize, res: usize) -> [u32; 8] {
    let (face, iu, iv) = cell_to_face_ij(cell, res);

    // Interior cells: the whole 3×3 block stays on one face.
    if iu >= 1 && iv >= 1 && iu + 1 < res && iv + 1 < res {
        return [
            (cell - res - 1) as u32,
            (cell - res) as u32,
            (cell - res + 1) as u32,
            (cell - 1) as u32,
            (cell + 1) as u32,
            (cell + res - 1) as u32,
            (cell + res) as u32,
            (cell + res + 1) as u32,
        ];
    }

    let center = cell as u32;
    let [left, right, down, up] = EdgeDir::ALL.map(|dir| {
        let (nf, nu, nv) = step_one(face, iu, iv, dir, res);
        (nf * res * res + nv * res + nu) as u32
    });

    let mut ns = [
        diagonal_from_edge_neighbors(center, down, left, res),
        down,
        diagonal_from_edge_neighbors(center, down, right, res),
        left,
        right,
        diagonal_from_edge_neighbors(center, up, left, res),
        up,
        diagonal_from_edge_neighbors(center, up, right, res),
    ];

    // At very coarse resolutions several directions reach the same cell.
    for i in 0..ns.len() {
        if ns[i] == center || ns[..i].contains(&ns[i]) {
            ns[i] = NO_NEIGHBOR;
        }
    }
    ns
}

impl CubeSphereGrid {
    /// Build a grid with 6 * res² cells.
    pub fn new(res: usize) -> Result<Self, PartitionError> {
        if res == 0 {
            return Err(PartitionError::InvalidCellCount(0));
        }
        let num_cells = 6 * res * res;

        let centers: Vec<DVec3> = maybe_par_range!(0..num_cells)
            .map(|cell| cell_center(cell, res))
            .collect();
        let neighbors: Vec<[u32; 8]> = maybe_par_range!(0..num_cells)
            .map(|cell| cell_neighbors(cell, res))
            .collect();

        Ok(Self {
            res,
            centers,
            neighbors,
        })
    }

    /// Unit vector at the center of a cell.
    #[inline]
    pub fn cell_vec(&self, cell: usize) -> DVec3 {
        self.centers[cell]
    }

    /// Cell containing a (not necessarily normalized) direction.
    #[inline]
    pub fn vec_to_cell(&self, p: DVec3) -> usize {
        let (face, u, v) = point_to_face_uv(p);
        face_uv_to_cell(face, u, v, self.res)
    }
}

impl SphereGrid for CubeSphereGrid {
    fn resolution_from_cell_count(num_cells: usize) -> Result<usize, PartitionError> {
        if num_cells == 0 || num_cells % 6 != 0 {
            return Err(PartitionError::InvalidCellCount(num_cells));
        }
        let per_face = num_cells / 6;
        let res = (per_face as f64).sqrt().round() as usize;
        if res * res != per_face {
            return Err(PartitionError::InvalidCellCount(num_cells));
        }
        Ok(res)
    }

    fn with_resolution(res: usize) -> Result<Self, PartitionError> {
        Self::new(res)
    }

    #[inline]
    fn resolution(&self) -> usize {
        self.res
    }

    #[inline]
    fn num_cells(&self) -> usize {
        self.centers.len()
    }

    #[inline]
    fn cell_to_angle(&self, cell: usize) -> AngularPoint {
        AngularPoint::from_vec(self.centers[cell])
    }

    #[inline]
    fn angle_to_cell(&self, p: AngularPoint) -> usize {
        self.vec_to_cell(p.to_vec())
    }

    #[inline]
    fn neighbors(&self, cell: usize) -> [u32; 8] {
        self.neighbors[cell]
    }
}
