use glam::DVec3;

// S2-style quadratic projection to reduce cube map distortion.
// Maps UV in [-1, 1] to ST in [0, 1] with an area-equalizing transform:
// corners get compressed, face centers expanded.

/// S2 quadratic transform: UV [-1, 1] -> ST [0, 1]
#[inline]
pub(crate) fn uv_to_st(u: f64) -> f64 {
    if u >= 0.0 {
        0.5 * (1.0 + 3.0 * u).sqrt()
    } else {
        1.0 - 0.5 * (1.0 - 3.0 * u).sqrt()
    }
}

/// S2 inverse transform: ST [0, 1] -> UV [-1, 1]
#[inline]
pub(crate) fn st_to_uv(s: f64) -> f64 {
    if s >= 0.5 {
        (1.0 / 3.0) * (4.0 * s * s - 1.0)
    } else {
        (1.0 / 3.0) * (1.0 - 4.0 * (1.0 - s) * (1.0 - s))
    }
}

/// Map a direction to (face, u, v) where u,v in [-1, 1].
#[inline]
pub(crate) fn point_to_face_uv(p: DVec3) -> (usize, f64, f64) {
    let (x, y, z) = (p.x, p.y, p.z);
    let (ax, ay, az) = (x.abs(), y.abs(), z.abs());

    if ax >= ay && ax >= az {
        // +/-X
        if x >= 0.0 {
            (0, -z / ax, y / ax)
        } else {
            (1, z / ax, y / ax)
        }
    } else if ay >= ax && ay >= az {
        // +/-Y
        if y >= 0.0 {
            (2, x / ay, -z / ay)
        } else {
            (3, x / ay, z / ay)
        }
    } else if z >= 0.0 {
        (4, x / az, y / az)
    } else {
        (5, -x / az, y / az)
    }
}

/// Convert (face, u, v) to cell index.
#[inline]
pub(crate) fn face_uv_to_cell(face: usize, u: f64, v: f64, res: usize) -> usize {
    let fu = (uv_to_st(u) * res as f64).max(0.0);
    let fv = (uv_to_st(v) * res as f64).max(0.0);
    let iu = (fu as usize).min(res - 1);
    let iv = (fv as usize).min(res - 1);
    face * res * res + iv * res + iu
}

/// Convert (face, u, v) back to a unit vector (inverse of `point_to_face_uv`).
#[inline]
pub(crate) fn face_uv_to_3d(face: usize, u: f64, v: f64) -> DVec3 {
    let p = match face {
        0 => DVec3::new(1.0, v, -u),
        1 => DVec3::new(-1.0, v, u),
        2 => DVec3::new(u, 1.0, -v),
        3 => DVec3::new(u, -1.0, v),
        4 => DVec3::new(u, v, 1.0),
        5 => DVec3::new(-u, v, -1.0),
        _ => unreachable!("invalid cube face"),
    };
    p.normalize()
}

/// Convert cell index to (face, iu, iv).
#[inline]
pub(crate) fn cell_to_face_ij(cell: usize, res: usize) -> (usize, usize, usize) {
    let face = cell / (res * res);
    let rem = cell % (res * res);
    (face, rem % res, rem / res)
}

/// Unit vector at the center of a cell.
#[inline]
pub(crate) fn cell_center(cell: usize, res: usize) -> DVec3 {
    let (face, iu, iv) = cell_to_face_ij(cell, res);
    let u = st_to_uv((iu as f64 + 0.5) / res as f64);
    let v = st_to_uv((iv as f64 + 0.5) / res as f64);
    face_uv_to_3d(face, u, v)
}
