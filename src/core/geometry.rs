//! Vector and ellipsoid math shared by the geometry solvers.

/// Cross product of two 3-vectors.
pub fn cross3(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        -a[0] * b[2] + a[2] * b[0],
        a[0] * b[1] - a[1] * b[0],
    ]
}

/// Euclidean norm of a 3-vector.
pub fn norm3(a: [f64; 3]) -> f64 {
    (a[0] * a[0] + a[1] * a[1] + a[2] * a[2]).sqrt()
}

/// Convert geodetic latitude/longitude (degrees) and ellipsoidal height
/// (meters) to Earth-centered Cartesian coordinates.
///
/// `ra` is the equatorial radius, `f` the flattening (ra - rc) / ra.
pub fn plh_to_xyz(lat: f64, lon: f64, height: f64, ra: f64, f: f64) -> [f64; 3] {
    let lat_rad = lat.to_radians();
    let lon_rad = lon.to_radians();

    // prime-vertical radius of curvature
    let e2 = f * (2.0 - f);
    let n = ra / (1.0 - e2 * lat_rad.sin() * lat_rad.sin()).sqrt();

    [
        (n + height) * lat_rad.cos() * lon_rad.cos(),
        (n + height) * lat_rad.cos() * lon_rad.sin(),
        (n * (1.0 - e2) + height) * lat_rad.sin(),
    ]
}

/// Inverse of [`plh_to_xyz`]: Cartesian to geodetic latitude/longitude
/// (degrees) and ellipsoidal height (meters).
///
/// Iterative latitude solution; converges to well below a millimeter in a
/// handful of iterations for any realistic Earth ellipsoid.
pub fn xyz_to_plh(xyz: [f64; 3], ra: f64, f: f64) -> (f64, f64, f64) {
    let e2 = f * (2.0 - f);
    let p = (xyz[0] * xyz[0] + xyz[1] * xyz[1]).sqrt();
    let lon = xyz[1].atan2(xyz[0]);

    // start from the spherical latitude and iterate
    let mut lat = (xyz[2] / ((1.0 - e2) * p)).atan();
    let mut n = ra;
    for _ in 0..8 {
        n = ra / (1.0 - e2 * lat.sin() * lat.sin()).sqrt();
        lat = ((xyz[2] + e2 * n * lat.sin()) / p).atan();
    }
    let height = if lat.cos().abs() > 1e-12 {
        p / lat.cos() - n
    } else {
        xyz[2].abs() - n * (1.0 - e2)
    };

    (lat.to_degrees(), lon.to_degrees(), height)
}
