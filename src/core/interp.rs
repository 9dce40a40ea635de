//! Orbit trajectory interpolation from discrete state vectors.
//!
//! Six-point local Hermite interpolation: each axis is interpolated by the
//! polynomial matching both position and velocity at the window samples,
//! which keeps the trajectory C1-continuous across sample boundaries and
//! exact at the samples themselves.

use crate::types::{GeoError, GeoResult, OrbitData};

/// Number of state vectors in the interpolation window.
const WINDOW: usize = 6;

/// Quality of an interpolated lookup.
///
/// Never a hard failure: out-of-range queries return extrapolated values so
/// a long batch run degrades instead of aborting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterpStatus {
    /// Query time bracketed by the table and the window is centered on it.
    Centered,
    /// Window clamped to the table edge; samples are skewed to one side.
    OffCenter,
    /// Query time outside the table; output is an extrapolation.
    OutOfRange,
}

/// Prebuilt orbit interpolant: split per-axis sample arrays, built once and
/// queried many times.
///
/// For one-off lookups (setup-time geometry), [`OrbitData::interpolate_position`]
/// builds the same interpolant fresh per call; batch callers keep one
/// `OrbitInterpolator` alive for the whole run.
#[derive(Debug, Clone)]
pub struct OrbitInterpolator {
    times: Vec<f64>,
    pos: [Vec<f64>; 3],
    vel: [Vec<f64>; 3],
}

impl OrbitInterpolator {
    /// Split the state-vector table into per-axis arrays.
    pub fn new(orbit: &OrbitData) -> GeoResult<Self> {
        let n = orbit.len();
        if n < WINDOW {
            return Err(GeoError::InvalidParameter(format!(
                "orbit table has {} state vectors, interpolation needs at least {}",
                n, WINDOW
            )));
        }

        let mut times = Vec::with_capacity(n);
        let mut pos = [
            Vec::with_capacity(n),
            Vec::with_capacity(n),
            Vec::with_capacity(n),
        ];
        let mut vel = [
            Vec::with_capacity(n),
            Vec::with_capacity(n),
            Vec::with_capacity(n),
        ];

        for sv in &orbit.state_vectors {
            if let Some(&prev) = times.last() {
                if sv.time <= prev {
                    return Err(GeoError::InvalidParameter(format!(
                        "orbit state vector times not strictly increasing at t={}",
                        sv.time
                    )));
                }
            }
            times.push(sv.time);
            for axis in 0..3 {
                pos[axis].push(sv.position[axis]);
                vel[axis].push(sv.velocity[axis]);
            }
        }

        Ok(Self { times, pos, vel })
    }

    /// Interpolated position at `time`.
    pub fn position(&self, time: f64) -> ([f64; 3], InterpStatus) {
        let (start, status) = self.window(time);
        let mut p = [0.0; 3];
        for axis in 0..3 {
            p[axis] = hermite_eval(
                &self.times[start..start + WINDOW],
                &self.pos[axis][start..start + WINDOW],
                &self.vel[axis][start..start + WINDOW],
                time,
            );
        }
        (p, status)
    }

    /// Interpolated position and velocity at `time`.
    ///
    /// Velocity uses a Lagrange polynomial over the same window (no
    /// acceleration samples exist to feed a Hermite basis).
    pub fn state(&self, time: f64) -> ([f64; 3], [f64; 3], InterpStatus) {
        let (p, status) = self.position(time);
        let (start, _) = self.window(time);
        let mut v = [0.0; 3];
        for axis in 0..3 {
            v[axis] = lagrange_eval(
                &self.times[start..start + WINDOW],
                &self.vel[axis][start..start + WINDOW],
                time,
            );
        }
        (p, v, status)
    }

    /// Pick the interpolation window for a query time and classify it.
    fn window(&self, time: f64) -> (usize, InterpStatus) {
        let n = self.times.len();
        let out_of_range = time < self.times[0] || time > self.times[n - 1];

        // first sample at or past the query time
        let upper = self.times.partition_point(|&t| t < time);

        let mut clamped = false;
        let start = if upper < WINDOW / 2 {
            clamped = true;
            0
        } else if upper - WINDOW / 2 + WINDOW > n {
            clamped = true;
            n - WINDOW
        } else {
            upper - WINDOW / 2
        };

        let status = if out_of_range {
            InterpStatus::OutOfRange
        } else if clamped {
            InterpStatus::OffCenter
        } else {
            InterpStatus::Centered
        };
        (start, status)
    }
}

impl OrbitData {
    /// One-shot interpolated position: builds the per-axis interpolant
    /// fresh each call.
    ///
    /// Convenience path for the handful of setup-time geometry queries;
    /// batch callers should build an [`OrbitInterpolator`] once instead.
    pub fn interpolate_position(&self, time: f64) -> GeoResult<([f64; 3], InterpStatus)> {
        let interp = OrbitInterpolator::new(self)?;
        Ok(interp.position(time))
    }

    /// One-shot interpolated position and velocity.
    pub fn interpolate_state(&self, time: f64) -> GeoResult<([f64; 3], [f64; 3], InterpStatus)> {
        let interp = OrbitInterpolator::new(self)?;
        Ok(interp.state(time))
    }
}

/// Hermite interpolation of y(tp) given samples y_i and derivatives dy_i.
///
/// Exact at the samples and matches the supplied derivatives there.
fn hermite_eval(t: &[f64], y: &[f64], dy: &[f64], tp: f64) -> f64 {
    let n = t.len();
    let mut yp = 0.0;
    for j in 0..n {
        let mut hj = 1.0;
        let mut sj = 0.0;
        for i in 0..n {
            if i != j {
                hj *= (tp - t[i]) / (t[j] - t[i]);
                sj += 1.0 / (t[j] - t[i]);
            }
        }
        let f0 = 1.0 - 2.0 * (tp - t[j]) * sj;
        let f1 = tp - t[j];
        yp += (y[j] * f0 + dy[j] * f1) * hj * hj;
    }
    yp
}

/// Plain Lagrange interpolation of y(tp).
fn lagrange_eval(t: &[f64], y: &[f64], tp: f64) -> f64 {
    let n = t.len();
    let mut yp = 0.0;
    for j in 0..n {
        let mut lj = 1.0;
        for i in 0..n {
            if i != j {
                lj *= (tp - t[i]) / (t[j] - t[i]);
            }
        }
        yp += lj * y[j];
    }
    yp
}
