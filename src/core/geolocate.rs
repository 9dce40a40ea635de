//! Ground-to-sensor inverse geolocation.
//!
//! Maps geodetic ground points into range/azimuth pixel coordinates by
//! flying the interpolated orbit over the acquisition window and locating
//! the time of closest approach with a golden-section bracket search over
//! the pre-sampled orbit positions.

use ndarray::Array2;

use crate::core::geometry::plh_to_xyz;
use crate::core::interp::{InterpStatus, OrbitInterpolator};
use crate::types::{
    AcquisitionParams, Ellipsoid, GeoError, GeoResult, GroundPoint, OrbitData, SensorCoordinate,
    SensorFamily, SPEED_OF_LIGHT,
};

/// Golden-section bracket ratios.
const GOLDEN_R: f64 = 0.618_033_99;
const GOLDEN_C: f64 = 0.382;

/// Bracket width, in table indices, at which the search stops.
///
/// The search runs continuous bracket arithmetic over discrete sample
/// indices; the coarse tolerance is part of the calibrated behavior and
/// must not be tightened.
const BRACKET_TOL: i64 = 3;

/// Guard samples added before and after the acquisition window so that
/// off-scene target searches never run off the table.
const GUARD_SAMPLES: usize = 8000;

/// Smallest semi-axis/earth-radius accepted by the legacy elevation
/// correction; below it the correction is skipped entirely.
pub const MIN_VALID_RADIUS: f64 = 6_350_000.0;

/// Inverse geolocator for one acquisition.
///
/// Setup samples the orbit every 2/prf seconds across the padded window
/// into one contiguous table; each query is then a pure function of that
/// table, so points may be processed in any order.
pub struct Geolocator {
    /// Pre-sampled orbit: rows are time, x, y, z; one column per sample.
    orb_pos: Array2<f64>,
    /// Acquisition start epoch, seconds-of-year clock.
    t_start: f64,
    prf: f64,
    near_range: f64,
    /// Slant-range pixel spacing, meters.
    dr: f64,
    ellipsoid: Ellipsoid,
    flattening: f64,
    /// Resolved local earth radius (0 when never resolved).
    earth_radius: f64,
    vel: f64,
    radar_wavelength: f64,
    fd1: f64,
    rshift: f64,
    ashift: f64,
    chirp_ext: f64,
    sensor: SensorFamily,
    // output bounding box, pixels
    r_min: f64,
    r_max: f64,
    a_min: f64,
    a_max: f64,
    /// Legacy sanity threshold for the elevation correction; overridable,
    /// never derived.
    pub min_valid_radius: f64,
}

impl Geolocator {
    /// Build the dense orbit-position table for one acquisition.
    pub fn new(prm: &AcquisitionParams, orbit: &OrbitData) -> GeoResult<Self> {
        if prm.prf <= 0.0 {
            return Err(GeoError::InvalidParameter(format!(
                "prf must be positive, got {}",
                prm.prf
            )));
        }
        if prm.num_valid_az > prm.nrows {
            return Err(GeoError::InvalidParameter(format!(
                "num_valid_az {} exceeds nrows {}",
                prm.num_valid_az, prm.nrows
            )));
        }
        if prm.rng_samp_rate <= 0.0 {
            return Err(GeoError::InvalidParameter(format!(
                "range sampling rate must be positive, got {}",
                prm.rng_samp_rate
            )));
        }
        if prm.fd1 != 0.0 && prm.vel <= 0.0 {
            return Err(GeoError::InvalidParameter(
                "Doppler correction requires a resolved spacecraft velocity".to_string(),
            ));
        }

        let (t1, t2) = prm.acquisition_window();
        if t1 < orbit.start_time() || t2 > orbit.end_time() {
            log::warn!(
                "acquisition window [{:.3}, {:.3}] not bracketed by orbit table [{:.3}, {:.3}]",
                t1,
                t2,
                orbit.start_time(),
                orbit.end_time()
            );
        }

        let ts = 2.0 / prm.prf;
        let nrec = ((t2 - t1) / ts) as usize;
        let total = nrec + 2 * GUARD_SAMPLES;

        log::info!(
            "sampling orbit every {:.6} s: {} records + {} guard samples per side",
            ts,
            nrec,
            GUARD_SAMPLES
        );

        let interp = OrbitInterpolator::new(orbit)?;
        let mut orb_pos = Array2::<f64>::zeros((4, total));
        let mut extrapolated = 0usize;
        for i in 0..total {
            let time = t1 - GUARD_SAMPLES as f64 * ts + i as f64 * ts;
            let (p, status) = interp.position(time);
            if status == InterpStatus::OutOfRange {
                extrapolated += 1;
            }
            orb_pos[[0, i]] = time;
            orb_pos[[1, i]] = p[0];
            orb_pos[[2, i]] = p[1];
            orb_pos[[3, i]] = p[2];
        }
        if extrapolated > 0 {
            log::debug!(
                "{} of {} table samples extrapolated beyond the orbit records",
                extrapolated,
                total
            );
        }

        Ok(Self {
            orb_pos,
            t_start: t1,
            prf: prm.prf,
            near_range: prm.near_range,
            dr: 0.5 * SPEED_OF_LIGHT / prm.rng_samp_rate,
            ellipsoid: prm.ellipsoid,
            flattening: prm.ellipsoid.flattening(),
            earth_radius: prm.earth_radius.unwrap_or(0.0),
            vel: prm.vel,
            radar_wavelength: prm.radar_wavelength,
            fd1: prm.fd1,
            rshift: prm.rshift as f64 + prm.sub_int_r,
            ashift: prm.ashift as f64 + prm.sub_int_a,
            chirp_ext: prm.chirp_ext as f64,
            sensor: prm.sensor,
            r_min: -10.0,
            r_max: prm.num_rng_bins as f64 + 10.0,
            a_min: -20.0,
            a_max: (prm.num_patches * prm.num_valid_az) as f64 + 20.0,
            min_valid_radius: MIN_VALID_RADIUS,
        })
    }

    /// Map one ground point to sensor coordinates.
    ///
    /// Returns `None` for points whose pixel coordinates land outside the
    /// scene bounding box; off-scene points are dropped, not errors.
    pub fn geolocate(&self, point: &GroundPoint) -> Option<SensorCoordinate> {
        let target = plh_to_xyz(
            point.lat,
            point.lon,
            point.elevation,
            self.ellipsoid.equatorial_radius,
            self.flattening,
        );
        let lon = if point.lon > 180.0 {
            point.lon - 360.0
        } else {
            point.lon
        };

        // elevation relative to the resolved scene radius; skipped when any
        // radius fails the legacy sanity threshold
        let elevation = point.elevation + self.elevation_offset(point.lat);

        let (rng, tm) = self.closest_approach(target);

        let mut range_pixel = (rng - self.near_range) / self.dr - self.rshift + self.chirp_ext;
        let mut azimuth_pixel = self.prf * (tm - self.t_start) - self.ashift;

        // empirical bias from corner-reflector analysis
        if self.sensor == SensorFamily::Envisat {
            range_pixel += 8.4;
            azimuth_pixel += 4.0;
        }

        // range/azimuth correction for a non-zero Doppler centroid
        if self.fd1 != 0.0 {
            let rdd = (self.vel * self.vel) / rng;
            let daa = -0.5 * (self.radar_wavelength * self.fd1) / rdd;
            let drr = 0.5 * rdd * daa * daa / self.dr;
            range_pixel += drr;
            azimuth_pixel += self.prf * daa;
        }

        if range_pixel < self.r_min
            || range_pixel > self.r_max
            || azimuth_pixel < self.a_min
            || azimuth_pixel > self.a_max
        {
            return None;
        }

        Some(SensorCoordinate {
            range_pixel,
            azimuth_pixel,
            elevation,
            lon,
            lat: point.lat,
        })
    }

    /// Map a stream of ground points, preserving input order and silently
    /// dropping off-scene points.
    pub fn geolocate_all<'a, I>(&'a self, points: I) -> impl Iterator<Item = SensorCoordinate> + 'a
    where
        I: IntoIterator<Item = GroundPoint> + 'a,
    {
        points.into_iter().filter_map(move |p| self.geolocate(&p))
    }

    /// Difference between the local ellipsoid radius and the resolved scene
    /// radius, or zero when any radius fails the sanity threshold.
    fn elevation_offset(&self, lat: f64) -> f64 {
        let min = self.min_valid_radius;
        if self.ellipsoid.polar_radius > min
            && self.ellipsoid.equatorial_radius > min
            && self.earth_radius > min
        {
            self.ellipsoid.local_radius(lat.to_radians()) - self.earth_radius
        } else {
            0.0
        }
    }

    /// Distance from the target to the n-th pre-sampled orbit position.
    fn dist(&self, n: usize, target: [f64; 3]) -> f64 {
        let dx = target[0] - self.orb_pos[[1, n]];
        let dy = target[1] - self.orb_pos[[2, n]];
        let dz = target[2] - self.orb_pos[[3, n]];
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Minimum target-to-orbit distance and its table time.
    fn closest_approach(&self, target: [f64; 3]) -> (f64, f64) {
        let hi = (self.orb_pos.ncols() - 1) as i64;
        let mid = (GOLDEN_C * hi as f64) as i64; // initial interior point
        let (idx, rng) = golden_section_min(|n| self.dist(n as usize, target), 0, hi, mid);
        (rng, self.orb_pos[[0, idx as usize]])
    }
}

/// Golden-section minimization of `f` over the integer bracket [lo, hi].
///
/// Continuous bracket arithmetic truncated to integer indices at every
/// step; stops when the bracket narrows to [`BRACKET_TOL`] indices and
/// returns the better of the two interior points (ties go to the second,
/// by strict comparison).
fn golden_section_min<F: Fn(i64) -> f64>(f: F, lo: i64, hi: i64, mid: i64) -> (i64, f64) {
    let mut x0 = lo;
    let mut x3 = hi;
    let (mut x1, mut x2);
    if (hi - mid).abs() > (mid - lo).abs() {
        x1 = mid;
        x2 = mid + (GOLDEN_C * (hi - mid) as f64).abs() as i64;
    } else {
        // keep the shorter segment from x0 to x1
        x2 = mid;
        x1 = mid - (GOLDEN_C * (mid - lo) as f64).abs() as i64;
    }

    let mut f1 = f(x1);
    let mut f2 = f(x2);

    // the truncated ratios sum to slightly more than 1, so a fresh interior
    // point can land one index past the bracket end on very large tables;
    // it must stay inside [x0, x3]
    while x3 - x0 > BRACKET_TOL {
        if f2 < f1 {
            x0 = x1;
            x1 = x2;
            x2 = ((GOLDEN_R * x3 as f64 + GOLDEN_C * x1 as f64) as i64).min(x3);
            f1 = f2;
            f2 = f(x2);
        } else {
            x3 = x2;
            x2 = x1;
            x1 = ((GOLDEN_R * x0 as f64 + GOLDEN_C * x2 as f64) as i64).max(x0);
            f2 = f1;
            f1 = f(x1);
        }
    }

    if f1 < f2 {
        (x1, f1)
    } else {
        (x2, f2)
    }
}
