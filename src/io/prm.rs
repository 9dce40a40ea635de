//! Acquisition parameter-file reader.
//!
//! Parameter files are plain text, one `name = value` pair per line.
//! Unknown keys are ignored so files written by other processing stages
//! pass through untouched.

use crate::types::{AcquisitionParams, GeoError, GeoResult, SensorFamily};
use regex::Regex;
use std::fs;
use std::path::Path;

/// Parameter-file reader
pub struct PrmReader;

impl PrmReader {
    /// Read and validate a parameter file.
    pub fn read_file<P: AsRef<Path>>(path: P) -> GeoResult<AcquisitionParams> {
        log::info!("Reading parameter file: {}", path.as_ref().display());
        let content = fs::read_to_string(&path)?;
        Self::parse(&content)
    }

    /// Parse parameter text into acquisition parameters.
    pub fn parse(content: &str) -> GeoResult<AcquisitionParams> {
        // `name = value`, tolerant of surrounding whitespace
        let line_re = Regex::new(r"^\s*(\S+)\s*=\s*(\S+)").expect("static regex");

        let mut prm = AcquisitionParams::default();
        let mut sc_clock_start: Option<f64> = None;

        for line in content.lines() {
            let caps = match line_re.captures(line) {
                Some(caps) => caps,
                None => continue,
            };
            let key = caps.get(1).unwrap().as_str();
            let value = caps.get(2).unwrap().as_str();

            match key {
                "clock_start" => prm.clock_start = parse_f64(key, value)?,
                "SC_clock_start" => sc_clock_start = Some(parse_f64(key, value)?),
                "PRF" | "prf" => prm.prf = parse_f64(key, value)?,
                "near_range" => prm.near_range = parse_f64(key, value)?,
                "far_range" => prm.far_range = parse_f64(key, value)?,
                "rng_samp_rate" => prm.rng_samp_rate = parse_f64(key, value)?,
                "radar_wavelength" => prm.radar_wavelength = parse_f64(key, value)?,
                "fd1" => prm.fd1 = parse_f64(key, value)?,
                "fdd1" => prm.fdd1 = parse_f64(key, value)?,
                "fddd1" => prm.fddd1 = parse_f64(key, value)?,
                "num_rng_bins" => prm.num_rng_bins = parse_usize(key, value)?,
                "num_valid_az" => prm.num_valid_az = parse_usize(key, value)?,
                "num_patches" => prm.num_patches = parse_usize(key, value)?,
                "nrows" => prm.nrows = parse_usize(key, value)?,
                "rshift" => prm.rshift = parse_i64(key, value)?,
                "ashift" => prm.ashift = parse_i64(key, value)?,
                "sub_int_r" => prm.sub_int_r = parse_f64(key, value)?,
                "sub_int_a" => prm.sub_int_a = parse_f64(key, value)?,
                "chirp_ext" => prm.chirp_ext = parse_i64(key, value)?,
                "SC_identity" => prm.sensor = SensorFamily::from_code(parse_i64(key, value)?),
                "SC_vel" => prm.vel = parse_f64(key, value)?,
                "SC_height" => prm.ht = parse_f64(key, value)?,
                "SC_height_start" => prm.ht_start = parse_f64(key, value)?,
                "SC_height_end" => prm.ht_end = parse_f64(key, value)?,
                "earth_radius" => {
                    let re = parse_f64(key, value)?;
                    prm.earth_radius = (re > 0.0).then_some(re);
                }
                "equatorial_radius" => prm.ellipsoid.equatorial_radius = parse_f64(key, value)?,
                "polar_radius" => prm.ellipsoid.polar_radius = parse_f64(key, value)?,
                "led_file" => prm.led_file = Some(value.to_string()),
                _ => {}
            }
        }

        // the full-precision clock field wins; otherwise strip the year
        // thousands from the combined YYDDD.DDDD clock
        if prm.clock_start == 0.0 {
            if let Some(sc) = sc_clock_start {
                prm.clock_start = sc % 1000.0;
            }
        }

        Self::validate(&prm)?;
        Ok(prm)
    }

    fn validate(prm: &AcquisitionParams) -> GeoResult<()> {
        if prm.prf <= 0.0 {
            return Err(GeoError::InvalidParameter(format!(
                "PRF must be positive, got {}",
                prm.prf
            )));
        }
        if prm.num_valid_az > prm.nrows {
            return Err(GeoError::InvalidParameter(format!(
                "num_valid_az {} exceeds nrows {}",
                prm.num_valid_az, prm.nrows
            )));
        }
        if prm.ellipsoid.equatorial_radius <= 0.0 || prm.ellipsoid.polar_radius <= 0.0 {
            return Err(GeoError::InvalidParameter(
                "ellipsoid semi-axes must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_f64(key: &str, value: &str) -> GeoResult<f64> {
    value
        .parse::<f64>()
        .map_err(|_| GeoError::InvalidFormat(format!("bad value for {}: '{}'", key, value)))
}

fn parse_i64(key: &str, value: &str) -> GeoResult<i64> {
    value
        .parse::<i64>()
        .map_err(|_| GeoError::InvalidFormat(format!("bad value for {}: '{}'", key, value)))
}

fn parse_usize(key: &str, value: &str) -> GeoResult<usize> {
    value
        .parse::<usize>()
        .map_err(|_| GeoError::InvalidFormat(format!("bad value for {}: '{}'", key, value)))
}
