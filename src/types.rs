//! Core types for spherical partitioning.

use std::f64::consts::{PI, TAU};

use glam::DVec3;

use crate::coords;

/// A point on the unit sphere in longitude/colatitude form.
///
/// `phi` is the longitude in [0, 2π), `theta` the colatitude in [0, π]
/// (0 at the north pole). Values are normalized on construction; rotations
/// always produce new points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngularPoint {
    pub phi: f64,
    pub theta: f64,
}

impl AngularPoint {
    /// Create a point, wrapping `phi` into [0, 2π) and clamping `theta` into [0, π].
    #[inline]
    pub fn new(phi: f64, theta: f64) -> Self {
        Self {
            phi: wrap_longitude(phi),
            theta: theta.clamp(0.0, PI),
        }
    }

    /// The north pole (θ = 0).
    pub const NORTH_POLE: Self = Self {
        phi: 0.0,
        theta: 0.0,
    };

    /// Create from latitude/longitude in degrees (latitude +90 at the north pole).
    pub fn from_lonlat_degrees(lon: f64, lat: f64) -> Self {
        Self::new(lon.to_radians(), (90.0 - lat).to_radians())
    }

    /// Project a (not necessarily normalized) direction onto the sphere.
    ///
    /// The zero vector maps to the north pole.
    #[inline]
    pub fn from_vec(v: DVec3) -> Self {
        let (_, phi, theta) = coords::to_spherical(v, DVec3::ZERO);
        Self { phi, theta }
    }

    /// Unit vector for this point.
    #[inline]
    pub fn to_vec(self) -> DVec3 {
        coords::to_cartesian(1.0, self.phi, self.theta, DVec3::ZERO)
    }

    /// Great-circle distance to another point, in [0, π].
    #[inline]
    pub fn distance(self, other: Self) -> f64 {
        coords::great_circle_distance(self, other)
    }
}

impl From<(f64, f64)> for AngularPoint {
    #[inline]
    fn from((phi, theta): (f64, f64)) -> Self {
        Self::new(phi, theta)
    }
}

impl From<AngularPoint> for (f64, f64) {
    #[inline]
    fn from(p: AngularPoint) -> Self {
        (p.phi, p.theta)
    }
}

/// Wrap a longitude into [0, 2π).
#[inline]
pub(crate) fn wrap_longitude(phi: f64) -> f64 {
    let mut phi = phi.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs.
    if phi >= TAU {
        phi -= TAU;
    }
    phi
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_normalizes() {
        let p = AngularPoint::new(-0.5 * PI, 4.0);
        assert!((p.phi - 1.5 * PI).abs() < 1e-12);
        assert_eq!(p.theta, PI);

        let p = AngularPoint::new(5.0 * PI, -1.0);
        assert!((p.phi - PI).abs() < 1e-12);
        assert_eq!(p.theta, 0.0);
    }

    #[test]
    fn test_wrap_longitude_tiny_negative() {
        let phi = wrap_longitude(-1e-18);
        assert!((0.0..TAU).contains(&phi));
    }

    #[test]
    fn test_vec_round_trip() {
        let p = AngularPoint::new(1.2, 0.7);
        let q = AngularPoint::from_vec(p.to_vec() * 3.0);
        assert!((p.phi - q.phi).abs() < 1e-12);
        assert!((p.theta - q.theta).abs() < 1e-12);
    }

    #[test]
    fn test_lonlat_degrees() {
        let p = AngularPoint::from_lonlat_degrees(90.0, 0.0);
        assert!((p.phi - 0.5 * PI).abs() < 1e-12);
        assert!((p.theta - 0.5 * PI).abs() < 1e-12);
        let pole = AngularPoint::from_lonlat_degrees(0.0, 90.0);
        assert!(pole.theta.abs() < 1e-12);
    }

    #[test]
    fn test_zero_vector_is_north_pole() {
        assert_eq!(AngularPoint::from_vec(DVec3::ZERO), AngularPoint::NORTH_POLE);
    }
}
