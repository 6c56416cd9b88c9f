//! Cartesian/spherical conversion and great-circle distances.

use std::f64::consts::TAU;

use glam::DVec3;

use crate::AngularPoint;

/// Spherical (r, φ, θ) to Cartesian, offset by `center`.
#[inline]
pub fn to_cartesian(r: f64, phi: f64, theta: f64, center: DVec3) -> DVec3 {
    let (sin_phi, cos_phi) = phi.sin_cos();
    let (sin_theta, cos_theta) = theta.sin_cos();
    DVec3::new(
        r * cos_phi * sin_theta,
        r * sin_phi * sin_theta,
        r * cos_theta,
    ) + center
}

/// Cartesian to spherical (r, φ, θ) around `center`.
///
/// φ is in [0, 2π) and θ in [0, π]; θ is 0 when r = 0.
#[inline]
pub fn to_spherical(p: DVec3, center: DVec3) -> (f64, f64, f64) {
    let d = p - center;
    let r = d.length();
    let mut phi = d.y.atan2(d.x);
    if phi < 0.0 {
        phi += TAU;
        if phi >= TAU {
            phi = 0.0;
        }
    }
    // Equivalent to acos(z / r), without the precision loss near the poles.
    let theta = if r != 0.0 {
        d.x.hypot(d.y).atan2(d.z)
    } else {
        0.0
    };
    (r, phi, theta)
}

/// Great-circle distance between two points on the unit sphere, in [0, π].
///
/// Uses `atan2(|a × b|, a · b)`, which stays accurate near 0 and π.
#[inline]
pub fn great_circle_distance(a: AngularPoint, b: AngularPoint) -> f64 {
    unit_distance(a.to_vec(), b.to_vec())
}

/// Great-circle distance between two unit vectors.
#[inline]
pub(crate) fn unit_distance(a: DVec3, b: DVec3) -> f64 {
    a.cross(b).length().atan2(a.dot(b))
}
