#![allow(dead_code)]

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use s2_partition::AngularPoint;
use std::f64::consts::{FRAC_PI_2, TAU};

/// Generate random points uniformly distributed on the unit sphere.
pub fn random_sphere_points(n: usize, seed: u64) -> Vec<AngularPoint> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    random_sphere_points_with_rng(n, &mut rng)
}

pub fn random_sphere_points_with_rng<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Vec<AngularPoint> {
    (0..n)
        .map(|_| {
            let z: f64 = rng.gen_range(-1.0..1.0);
            AngularPoint::new(rng.gen_range(0.0..TAU), z.acos())
        })
        .collect()
}

/// Points on the equator with uniformly random longitude.
pub fn equator_ring_points(n: usize, seed: u64) -> Vec<AngularPoint> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..n)
        .map(|_| AngularPoint::new(rng.gen_range(0.0..TAU), FRAC_PI_2))
        .collect()
}

/// Points uniform in area within `cap_radius_rad` of `center`.
pub fn cap_points(n: usize, center: AngularPoint, cap_radius_rad: f64, seed: u64) -> Vec<AngularPoint> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let cos_max = cap_radius_rad.cos();
    let back = s2_partition::EulerAngles::to_pole(center).inverse();
    (0..n)
        .map(|_| {
            let u: f64 = rng.gen();
            let cos_theta = 1.0 - u * (1.0 - cos_max);
            let local = AngularPoint::new(rng.gen_range(0.0..TAU), cos_theta.acos());
            s2_partition::rotate::rotate(local, back)
        })
        .collect()
}

/// Upper-hemisphere points.
pub fn hemisphere_points(n: usize, seed: u64) -> Vec<AngularPoint> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            let z: f64 = rng.gen_range(0.0..1.0);
            AngularPoint::new(rng.gen_range(0.0..TAU), z.acos())
        })
        .collect()
}

/// Uniform background plus a tight cluster around the north pole.
///
/// Returns points and weights; cluster points carry `cluster_weight`.
pub fn bimodal_weighted_points(
    n: usize,
    cluster_radius_rad: f64,
    cluster_weight: f64,
    seed: u64,
) -> (Vec<AngularPoint>, Vec<f64>) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let n_clustered = n / 2;
    let n_sparse = n - n_clustered;

    let mut points = random_sphere_points_with_rng(n_sparse, &mut rng);
    let mut weights = vec![1.0; n_sparse];

    let cos_max = cluster_radius_rad.cos();
    for _ in 0..n_clustered {
        let u: f64 = rng.gen();
        let cos_theta = 1.0 - u * (1.0 - cos_max);
        points.push(AngularPoint::new(rng.gen_range(0.0..TAU), cos_theta.acos()));
        weights.push(cluster_weight);
    }
    (points, weights)
}
