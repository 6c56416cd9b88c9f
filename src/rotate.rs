//! Euler rotations on the unit sphere and the canonical split frame.
//!
//! All rotations are active (right-handed) and applied about the z axis,
//! then the y axis, then the z axis again. A [`SplitTransform`] chains three
//! such rotations so that two reference points land on the equator with
//! their chord midpoint at longitude π.

use std::f64::consts::{FRAC_PI_2, PI};

use glam::DMat3;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::AngularPoint;

/// Chord midpoints shorter than this are treated as antipodal pairs.
const ANTIPODAL_EPS: f64 = 1e-12;

/// Euler angles for a z-y-z rotation sequence.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EulerAngles {
    /// First rotation, about z.
    pub alpha: f64,
    /// Second rotation, about y.
    pub beta: f64,
    /// Third rotation, about z.
    pub gamma: f64,
}

impl EulerAngles {
    #[inline]
    pub const fn new(alpha: f64, beta: f64, gamma: f64) -> Self {
        Self { alpha, beta, gamma }
    }

    /// Rotation that moves `p` onto the north pole.
    #[inline]
    pub fn to_pole(p: AngularPoint) -> Self {
        Self::new(-p.phi, -p.theta, 0.0)
    }

    /// The inverse sequence: negated and order-reversed.
    #[inline]
    pub fn inverse(self) -> Self {
        Self::new(-self.gamma, -self.beta, -self.alpha)
    }

    /// Combined rotation matrix `Rz(gamma) * Ry(beta) * Rz(alpha)`.
    #[inline]
    pub fn matrix(self) -> DMat3 {
        DMat3::from_rotation_z(self.gamma)
            * DMat3::from_rotation_y(self.beta)
            * DMat3::from_rotation_z(self.alpha)
    }
}

impl From<[f64; 3]> for EulerAngles {
    #[inline]
    fn from([alpha, beta, gamma]: [f64; 3]) -> Self {
        Self::new(alpha, beta, gamma)
    }
}

/// Rotate a single point.
#[inline]
pub fn rotate(p: AngularPoint, angles: EulerAngles) -> AngularPoint {
    AngularPoint::from_vec(angles.matrix() * p.to_vec())
}

/// Rotate a batch of points.
pub fn rotate_points(points: &[AngularPoint], angles: EulerAngles) -> Vec<AngularPoint> {
    apply_matrix(points, angles.matrix())
}

pub(crate) fn apply_matrix(points: &[AngularPoint], m: DMat3) -> Vec<AngularPoint> {
    maybe_par_iter!(points)
        .map(|p| AngularPoint::from_vec(m * p.to_vec()))
        .collect()
}

/// Chord midpoint of two points, projected back onto the sphere.
///
/// This is the normalized average of the two Cartesian positions, not the
/// geodesic midpoint, so it always sits over the shorter arc. For exactly
/// antipodal inputs the chord midpoint is the origin and the result is the
/// north pole.
#[inline]
pub fn midpoint(a: AngularPoint, b: AngularPoint) -> AngularPoint {
    AngularPoint::from_vec(0.5 * (a.to_vec() + b.to_vec()))
}

/// Three z-y-z rotations that carry two reference points into the canonical
/// frame: both on the equator, chord midpoint at longitude π.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitTransform {
    pub a1: EulerAngles,
    pub a2: EulerAngles,
    pub a3: EulerAngles,
}

impl SplitTransform {
    /// Fixed final step: pole to equator, midpoint to longitude π.
    pub const EQUATOR_STEP: EulerAngles = EulerAngles::new(FRAC_PI_2, FRAC_PI_2, PI);

    /// Build the canonicalizing rotation for the reference pair `(c1, c2)`.
    ///
    /// Each step is derived from the points as rotated by the previous steps.
    /// After the transform `c1` sits at longitude `π - d/2` and `c2` at
    /// `π + d/2`, where `d` is their separation.
    pub fn canonicalize(c1: AngularPoint, c2: AngularPoint) -> Self {
        let mid = 0.5 * (c1.to_vec() + c2.to_vec());
        let mid = if mid.length() < ANTIPODAL_EPS {
            // Every great circle through an antipodal pair is equally valid.
            AngularPoint::from_vec(c1.to_vec().normalize().any_orthonormal_vector())
        } else {
            AngularPoint::from_vec(mid)
        };

        let a1 = EulerAngles::to_pole(mid);
        let c1_rotated = rotate(c1, a1);

        let a2 = EulerAngles::new(PI - c1_rotated.phi, 0.0, 0.0);

        let transform = Self {
            a1,
            a2,
            a3: Self::EQUATOR_STEP,
        };
        log::trace!(
            "canonical frame for ({:.6}, {:.6}) / ({:.6}, {:.6}): {:?}",
            c1.phi,
            c1.theta,
            c2.phi,
            c2.theta,
            transform
        );
        transform
    }

    /// Rotation matrix of the full forward sequence.
    #[inline]
    pub fn forward_matrix(&self) -> DMat3 {
        self.a3.matrix() * self.a2.matrix() * self.a1.matrix()
    }

    /// Rotation matrix of the full backward sequence.
    #[inline]
    pub fn backward_matrix(&self) -> DMat3 {
        self.a1.inverse().matrix() * self.a2.inverse().matrix() * self.a3.inverse().matrix()
    }

    /// Apply `a1`, `a2`, `a3` in order.
    #[inline]
    pub fn forward(&self, p: AngularPoint) -> AngularPoint {
        let p = rotate(p, self.a1);
        let p = rotate(p, self.a2);
        rotate(p, self.a3)
    }

    /// Undo [`forward`](Self::forward).
    #[inline]
    pub fn backward(&self, p: AngularPoint) -> AngularPoint {
        let p = rotate(p, self.a3.inverse());
        let p = rotate(p, self.a2.inverse());
        rotate(p, self.a1.inverse())
    }

    /// Forward-rotate a batch of points.
    pub fn forward_points(&self, points: &[AngularPoint]) -> Vec<AngularPoint> {
        apply_matrix(points, self.forward_matrix())
    }

    /// Backward-rotate a batch of points.
    pub fn backward_points(&self, points: &[AngularPoint]) -> Vec<AngularPoint> {
        apply_matrix(points, self.backward_matrix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::great_circle_distance;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;
    use std::f64::consts::TAU;

    fn random_point(rng: &mut ChaCha8Rng) -> AngularPoint {
        let z: f64 = rng.gen_range(-1.0..1.0);
        AngularPoint::new(rng.gen_range(0.0..TAU), z.acos())
    }

    fn assert_close(a: AngularPoint, b: AngularPoint, tol: f64) {
        let d = great_circle_distance(a, b);
        assert!(d < tol, "points differ by {}: {:?} vs {:?}", d, a, b);
    }

    #[test]
    fn test_rotate_about_z_shifts_longitude() {
        let p = AngularPoint::new(0.5, 1.0);
        let q = rotate(p, EulerAngles::new(0.25, 0.0, 0.0));
        assert!((q.phi - 0.75).abs() < 1e-12);
        assert!((q.theta - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_to_pole() {
        let p = AngularPoint::new(2.3, 1.9);
        let q = rotate(p, EulerAngles::to_pole(p));
        assert!(q.theta < 1e-7, "theta = {}", q.theta);
    }

    #[test]
    fn test_inverse_round_trip() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..200 {
            let p = random_point(&mut rng);
            let angles = EulerAngles::new(
                rng.gen_range(-TAU..TAU),
                rng.gen_range(-TAU..TAU),
                rng.gen_range(-TAU..TAU),
            );
            let back = rotate(rotate(p, angles), angles.inverse());
            assert_close(p, back, 1e-9);
        }
    }

    #[test]
    fn test_midpoint_is_chord_midpoint() {
        let a = AngularPoint::new(0.0, FRAC_PI_2);
        let b = AngularPoint::new(FRAC_PI_2, FRAC_PI_2);
        let m = midpoint(a, b);
        assert!((m.phi - 0.25 * PI).abs() < 1e-12);
        assert!((m.theta - FRAC_PI_2).abs() < 1e-12);

        // Chord midpoint picks the shorter arc.
        let a = AngularPoint::new(0.1, FRAC_PI_2);
        let b = AngularPoint::new(TAU - 0.1, FRAC_PI_2);
        let m = midpoint(a, b);
        assert!(m.phi < 1e-12 || TAU - m.phi < 1e-12, "phi = {}", m.phi);
    }

    #[test]
    fn test_canonicalize_places_pair_on_equator() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        for _ in 0..200 {
            let c1 = random_point(&mut rng);
            let c2 = random_point(&mut rng);
            let t = SplitTransform::canonicalize(c1, c2);
            let r1 = t.forward(c1);
            let r2 = t.forward(c2);
            assert!((r1.theta - FRAC_PI_2).abs() < 1e-7, "c1 theta {}", r1.theta);
            assert!((r2.theta - FRAC_PI_2).abs() < 1e-7, "c2 theta {}", r2.theta);

            let half = 0.5 * great_circle_distance(c1, c2);
            assert!((r1.phi - (PI - half)).abs() < 1e-7, "c1 phi {}", r1.phi);
            assert!((r2.phi - (PI + half)).abs() < 1e-7, "c2 phi {}", r2.phi);

            let m = t.forward(midpoint(c1, c2));
            assert!((m.phi - PI).abs() < 1e-7);
        }
    }

    #[test]
    fn test_canonicalize_antipodal_pair() {
        let c1 = AngularPoint::new(0.3, FRAC_PI_2);
        let c2 = AngularPoint::from_vec(-c1.to_vec());
        let t = SplitTransform::canonicalize(c1, c2);
        let r1 = t.forward(c1);
        let r2 = t.forward(c2);
        assert!((r1.theta - FRAC_PI_2).abs() < 1e-9);
        assert!((r2.theta - FRAC_PI_2).abs() < 1e-9);
        assert!((great_circle_distance(r1, r2) - PI).abs() < 1e-9);
    }

    #[test]
    fn test_canonicalize_identical_points() {
        let c = AngularPoint::new(4.0, 0.4);
        let t = SplitTransform::canonicalize(c, c);
        let r = t.forward(c);
        assert!((r.theta - FRAC_PI_2).abs() < 1e-7);
        assert!((r.phi - PI).abs() < 1e-7);
    }

    #[test]
    fn test_forward_backward_round_trip() {
        let mut rng = ChaCha8Rng::seed_from_u64(2024);
        for _ in 0..50 {
            let t = SplitTransform {
                a1: EulerAngles::new(rng.gen_range(-PI..PI), rng.gen_range(-PI..PI), 0.0),
                a2: EulerAngles::new(rng.gen_range(-PI..PI), 0.0, rng.gen_range(-PI..PI)),
                a3: EulerAngles::new(
                    rng.gen_range(-PI..PI),
                    rng.gen_range(-PI..PI),
                    rng.gen_range(-PI..PI),
                ),
            };
            let points: Vec<AngularPoint> = (0..20).map(|_| random_point(&mut rng)).collect();
            for &p in &points {
                assert_close(p, t.backward(t.forward(p)), 1e-9);
            }
            let batch = t.backward_points(&t.forward_points(&points));
            for (p, q) in points.iter().zip(&batch) {
                assert_close(*p, *q, 1e-9);
            }
        }
    }

    #[test]
    fn test_batch_matches_stepwise() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let c1 = random_point(&mut rng);
        let c2 = random_point(&mut rng);
        let t = SplitTransform::canonicalize(c1, c2);
        let points: Vec<AngularPoint> = (0..100).map(|_| random_point(&mut rng)).collect();
        let batch = t.forward_points(&points);
        for (p, q) in points.iter().zip(&batch) {
            assert_close(t.forward(*p), *q, 1e-9);
        }
    }
}
