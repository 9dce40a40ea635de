//! Platform height, velocity and local earth radius from the orbit.
//!
//! Single-shot solver: interpolate the orbit around an epoch pair, derive
//! the line-of-sight point at near range, then fit the range history over a
//! short window to recover ground velocity and range rate.

use crate::core::fit::fit_quadratic;
use crate::core::geometry::{cross3, norm3};
use crate::types::{
    AcquisitionParams, Ellipsoid, GeoError, GeoResult, OrbitData, OrbitDirection,
};

/// Number of range-history samples fitted around the window center.
const RANGE_FIT_SAMPLES: usize = 100;

/// Half-width in seconds of the central-difference velocity estimate.
///
/// Much larger than the dense sample spacing, small against the scene
/// duration.
const VELOCITY_HALF_SPAN: f64 = 2.0;

/// Derived platform geometry at one epoch pair.
#[derive(Debug, Clone, Copy)]
pub struct HeightVelocity {
    /// Height above the local ellipsoid radius, meters.
    pub height: f64,
    /// Local earth radius under the sub-satellite point, meters.
    pub earth_radius: f64,
    /// Equivalent ground velocity, m/s.
    pub ground_velocity: f64,
    /// Geocentric platform speed, m/s.
    pub total_velocity: f64,
    /// Range rate at the near-range target, m/s.
    pub range_rate: f64,
    pub direction: OrbitDirection,
}

/// Compute platform height, local earth radius and velocities for the
/// window [t1, t2].
///
/// `t1 == t2` evaluates the geometry at a single epoch; passing the
/// acquisition start and stop spans the full scene.
pub fn compute_height_velocity(
    orbit: &OrbitData,
    ellipsoid: &Ellipsoid,
    prf: f64,
    near_range: f64,
    t1: f64,
    t2: f64,
) -> GeoResult<HeightVelocity> {
    if prf <= 0.0 {
        return Err(GeoError::InvalidParameter(format!("prf must be positive, got {}", prf)));
    }
    log::debug!("computing height/velocity over [{:.3}, {:.3}]", t1, t2);

    let ro = near_range;
    let t0 = (t1 + t2) / 2.0;

    // central-difference velocity around the window midpoint
    let (ps, _) = orbit.interpolate_position(t0)?;
    let (p1, _) = orbit.interpolate_position(t0 - VELOCITY_HALF_SPAN)?;
    let (p2, _) = orbit.interpolate_position(t0 + VELOCITY_HALF_SPAN)?;

    let rs = norm3(ps);

    let vx = (p2[0] - p1[0]) / (2.0 * VELOCITY_HALF_SPAN);
    let vy = (p2[1] - p1[1]) / (2.0 * VELOCITY_HALF_SPAN);
    let vz = (p2[2] - p1[2]) / (2.0 * VELOCITY_HALF_SPAN);
    let vs = norm3([vx, vy, vz]);

    let direction = if vz > 0.0 {
        OrbitDirection::Ascending
    } else {
        OrbitDirection::Descending
    };

    // latitude of the sub-satellite point (spherical approximation)
    let rlat = (ps[2] / rs).asin();
    let re = ellipsoid.local_radius(rlat);
    let height = rs - re;

    // unit radial and along-track vectors span the look plane
    let a = [ps[0] / rs, ps[1] / rs, ps[2] / rs];
    let b = [vx / vs, vy / vs, vz / vs];
    let c = cross3(a, b);

    // look angle from the law of cosines, then the line-of-sight point at
    // slant range ro
    let ct = (rs * rs + ro * ro - re * re) / (2.0 * rs * ro);
    let st = ct.acos().sin();
    let xe = ps[0] + ro * (-st * c[0] - ct * a[0]);
    let ye = ps[1] + ro * (-st * c[1] - ct * a[1]);
    let ze = ps[2] + ro * (-st * c[2] - ct * a[2]);

    // range history against the fixed target point over a short window
    let dt = 200.0 / prf;
    let mut time = Vec::with_capacity(RANGE_FIT_SAMPLES);
    let mut rng = Vec::with_capacity(RANGE_FIT_SAMPLES);
    for k in 0..RANGE_FIT_SAMPLES {
        let tk = dt * (k as f64 - RANGE_FIT_SAMPLES as f64 / 2.0);
        let (p, _) = orbit.interpolate_position(t0 + tk)?;
        let dx = xe - p[0];
        let dy = ye - p[1];
        let dz = ze - p[2];
        time.push(tk);
        rng.push((dx * dx + dy * dy + dz * dz).sqrt() - ro);
    }

    let coeff = fit_quadratic(&time, &rng)?;
    let range_rate = coeff[1];
    let ground_velocity = (ro * 2.0 * coeff[2]).sqrt();

    Ok(HeightVelocity {
        height,
        earth_radius: re,
        ground_velocity,
        total_velocity: vs,
        range_rate,
        direction,
    })
}

/// Refresh the orbit-derived geometry fields of the acquisition parameters.
///
/// Solves the geometry at the acquisition start, end and full span, then
/// resolves the earth radius: a configured override replaces the computed
/// center radius and all three heights are rebased by the same offset.
pub fn update_scene_geometry(prm: &mut AcquisitionParams, orbit: &OrbitData) -> GeoResult<()> {
    let (t1, t2) = prm.acquisition_window();
    log::info!("scene geometry refresh: window [{:.3}, {:.3}] s", t1, t2);

    let start = compute_height_velocity(orbit, &prm.ellipsoid, prm.prf, prm.near_range, t1, t1)?;
    let end = compute_height_velocity(orbit, &prm.ellipsoid, prm.prf, prm.near_range, t2, t2)?;
    let center = compute_height_velocity(orbit, &prm.ellipsoid, prm.prf, prm.near_range, t1, t2)?;

    let re = match prm.earth_radius {
        Some(re) if re > 0.0 => re,
        _ => center.earth_radius,
    };

    prm.vel = center.ground_velocity;
    prm.earth_radius = Some(re);
    prm.ht = center.height + center.earth_radius - re;
    prm.ht_start = start.height + start.earth_radius - re;
    prm.ht_end = end.height + end.earth_radius - re;
    prm.orbit_direction = Some(center.direction);

    log::info!(
        "SC_vel = {:.3} m/s, earth_radius = {:.3} m, SC_height = {:.3} m ({} - {}), orbdir = {}",
        prm.vel,
        re,
        prm.ht,
        prm.ht_start.round(),
        prm.ht_end.round(),
        center.direction
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::StateVector;
    use approx::assert_relative_eq;

    const EARTH_RADIUS: f64 = 6_371_000.0;

    /// Circular polar-ish orbit in the x-z plane at a known altitude.
    fn circular_orbit(altitude: f64, n: usize, dt: f64, t_mid: f64) -> OrbitData {
        let radius = EARTH_RADIUS + altitude;
        // circular orbital speed for an arbitrary but consistent rate
        let omega = 7_500.0 / radius; // rad/s, ~7.5 km/s platform speed
        let t0 = t_mid - dt * (n as f64 - 1.0) / 2.0;

        let state_vectors = (0..n)
            .map(|k| {
                let t = t0 + k as f64 * dt;
                let a = omega * (t - t_mid);
                StateVector {
                    time: t,
                    position: [radius * a.cos(), 0.0, radius * a.sin()],
                    velocity: [
                        -radius * omega * a.sin(),
                        0.0,
                        radius * omega * a.cos(),
                    ],
                }
            })
            .collect();

        OrbitData {
            state_vectors,
            year: 2008,
            epoch_start: t0,
            sample_interval: dt,
        }
    }

    fn spherical_ellipsoid() -> Ellipsoid {
        Ellipsoid {
            equatorial_radius: EARTH_RADIUS,
            polar_radius: EARTH_RADIUS,
        }
    }

    #[test]
    fn test_height_on_circular_orbit() {
        let altitude = 780_000.0;
        let t_mid = 40_000.0;
        let orbit = circular_orbit(altitude, 31, 10.0, t_mid);
        let ellipsoid = spherical_ellipsoid();

        let hv =
            compute_height_velocity(&orbit, &ellipsoid, 1700.0, 830_000.0, t_mid, t_mid).unwrap();

        assert_relative_eq!(hv.height, altitude, max_relative = 1e-6);
        assert_relative_eq!(hv.earth_radius, EARTH_RADIUS, max_relative = 1e-9);
        assert_relative_eq!(hv.total_velocity, 7_500.0, max_relative = 1e-4);
    }

    #[test]
    fn test_ground_velocity_foreshortening() {
        // over a sphere the ground-track velocity is vs * re / (re + h)
        let altitude = 780_000.0;
        let t_mid = 40_000.0;
        let orbit = circular_orbit(altitude, 31, 10.0, t_mid);
        let ellipsoid = spherical_ellipsoid();

        let hv =
            compute_height_velocity(&orbit, &ellipsoid, 1700.0, 830_000.0, t_mid, t_mid).unwrap();

        // the range-history curvature recovers the effective velocity
        // vs * sqrt(re / (re + h)), between the platform speed and the
        // ground-track speed vs * re / (re + h)
        let effective =
            hv.total_velocity * (EARTH_RADIUS / (EARTH_RADIUS + altitude)).sqrt();
        assert_relative_eq!(hv.ground_velocity, effective, max_relative = 1e-2);

        let ground_track = hv.total_velocity * EARTH_RADIUS / (EARTH_RADIUS + altitude);
        assert!(hv.ground_velocity > ground_track);
        assert!(hv.ground_velocity < hv.total_velocity);
    }

    #[test]
    fn test_orbit_direction_from_z_velocity() {
        let altitude = 780_000.0;
        let t_mid = 40_000.0;
        let orbit = circular_orbit(altitude, 31, 10.0, t_mid);
        let ellipsoid = spherical_ellipsoid();

        // ascending at the window midpoint (vz > 0 at a = 0)
        let hv =
            compute_height_velocity(&orbit, &ellipsoid, 1700.0, 830_000.0, t_mid, t_mid).unwrap();
        assert_eq!(hv.direction, OrbitDirection::Ascending);
    }

    #[test]
    fn test_earth_radius_override_rebases_heights() {
        let altitude = 780_000.0;
        let t_mid = 40_000.0;
        let orbit = circular_orbit(altitude, 201, 10.0, t_mid);

        let mut prm = AcquisitionParams {
            clock_start: (t_mid - 2.0) / crate::types::SECONDS_PER_DAY,
            prf: 1700.0,
            near_range: 830_000.0,
            nrows: 11_000,
            num_valid_az: 10_000,
            num_patches: 1,
            ellipsoid: spherical_ellipsoid(),
            ..Default::default()
        };

        let mut prm_override = prm.clone();
        prm_override.earth_radius = Some(EARTH_RADIUS - 1_000.0);

        update_scene_geometry(&mut prm, &orbit).unwrap();
        update_scene_geometry(&mut prm_override, &orbit).unwrap();

        // overriding the radius by -1 km raises every height by 1 km
        assert_relative_eq!(prm_override.ht - prm.ht, 1_000.0, epsilon = 1e-3);
        assert_relative_eq!(prm_override.ht_start - prm.ht_start, 1_000.0, epsilon = 1e-3);
        assert_relative_eq!(prm_override.ht_end - prm.ht_end, 1_000.0, epsilon = 1e-3);
        assert_eq!(prm_override.earth_radius, Some(EARTH_RADIUS - 1_000.0));
    }
}
