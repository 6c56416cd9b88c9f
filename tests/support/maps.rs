#![allow(dead_code)]

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use s2_partition::{AngularPoint, CubeSphereGrid, SkyMap, SphereGrid};

/// Uniform weight 1 over every cell.
pub fn full_sphere_map(res: usize) -> SkyMap<CubeSphereGrid> {
    let grid = CubeSphereGrid::new(res).unwrap();
    let n = grid.num_cells();
    SkyMap::new(grid, vec![1.0; n]).unwrap()
}

/// Weight 1 on cells whose centers lie within `radius` of `center`.
pub fn cap_map(res: usize, center: AngularPoint, radius: f64) -> SkyMap<CubeSphereGrid> {
    let grid = CubeSphereGrid::new(res).unwrap();
    let cells: Vec<usize> = (0..grid.num_cells())
        .filter(|&c| grid.cell_to_angle(c).distance(center) <= radius)
        .collect();
    SkyMap::from_cells(grid, &cells, 1.0).unwrap()
}

/// Random weights in [0.5, 2) over a cap, zero elsewhere.
pub fn noisy_cap_map(
    res: usize,
    center: AngularPoint,
    radius: f64,
    seed: u64,
) -> SkyMap<CubeSphereGrid> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let grid = CubeSphereGrid::new(res).unwrap();
    let weights: Vec<f64> = (0..grid.num_cells())
        .map(|c| {
            let w: f64 = rng.gen_range(0.5..2.0);
            if grid.cell_to_angle(c).distance(center) <= radius {
                w
            } else {
                0.0
            }
        })
        .collect();
    SkyMap::new(grid, weights).unwrap()
}
