//! Orbit record (LED) reader.
//!
//! LED files are plain text. The header line carries the record count,
//! calendar year, day-of-year, seconds-of-day and sample spacing:
//!
//! ```text
//! nd iy id sec dsec
//! iy id sec x y z vx vy vz      (nd data lines)
//! ```
//!
//! Times are folded onto the continuous seconds-of-year clock
//! (86400 * day_of_year + seconds_of_day) used everywhere downstream.

use crate::types::{GeoError, GeoResult, OrbitData, StateVector, SECONDS_PER_DAY};
use chrono::NaiveDate;
use std::fs;
use std::path::Path;

/// Orbit record file reader
pub struct OrbitReader;

impl OrbitReader {
    /// Read an orbit record file.
    pub fn read_file<P: AsRef<Path>>(path: P) -> GeoResult<OrbitData> {
        log::info!("Reading orbit file: {}", path.as_ref().display());
        let content = fs::read_to_string(&path)?;
        Self::parse(&content)
    }

    /// Parse LED text records into an orbit table.
    pub fn parse(content: &str) -> GeoResult<OrbitData> {
        let mut lines = content.lines().filter(|l| !l.trim().is_empty());

        let header = lines
            .next()
            .ok_or_else(|| GeoError::InvalidFormat("empty orbit file".to_string()))?;
        let fields: Vec<&str> = header.split_whitespace().collect();
        if fields.len() < 5 {
            return Err(GeoError::InvalidFormat(format!(
                "orbit header needs 5 fields (nd iy id sec dsec), got {}",
                fields.len()
            )));
        }

        let nd: usize = parse_field(fields[0], "record count")?;
        let year: i32 = parse_field(fields[1], "year")?;
        let day: u32 = parse_field(fields[2], "day of year")?;
        let sec: f64 = parse_field(fields[3], "seconds of day")?;
        let dsec: f64 = parse_field(fields[4], "sample interval")?;

        if nd == 0 {
            return Err(GeoError::InvalidFormat("orbit file declares 0 records".to_string()));
        }
        if dsec <= 0.0 {
            return Err(GeoError::InvalidFormat(format!(
                "orbit sample interval must be positive, got {}",
                dsec
            )));
        }

        let epoch_start = SECONDS_PER_DAY * day as f64 + sec;

        let mut state_vectors = Vec::with_capacity(nd);
        for line in lines {
            let v: Vec<&str> = line.split_whitespace().collect();
            if v.len() < 9 {
                return Err(GeoError::InvalidFormat(format!(
                    "orbit record needs 9 fields, got {}: '{}'",
                    v.len(),
                    line.trim()
                )));
            }
            let rec_day: f64 = parse_field(v[1], "record day")?;
            let rec_sec: f64 = parse_field(v[2], "record seconds")?;
            state_vectors.push(StateVector {
                time: SECONDS_PER_DAY * rec_day + rec_sec,
                position: [
                    parse_field(v[3], "x")?,
                    parse_field(v[4], "y")?,
                    parse_field(v[5], "z")?,
                ],
                velocity: [
                    parse_field(v[6], "vx")?,
                    parse_field(v[7], "vy")?,
                    parse_field(v[8], "vz")?,
                ],
            });
        }

        if state_vectors.len() != nd {
            return Err(GeoError::InvalidFormat(format!(
                "orbit file declares {} records but contains {}",
                nd,
                state_vectors.len()
            )));
        }

        Self::check_spacing(&state_vectors, dsec)?;

        if let Some(date) = NaiveDate::from_yo_opt(year, day) {
            log::info!(
                "orbit: {} state vectors from {} ({:.1} s spacing, {:.1} s arc)",
                nd,
                date,
                dsec,
                state_vectors.last().map(|sv| sv.time - epoch_start).unwrap_or(0.0)
            );
        }

        Ok(OrbitData {
            state_vectors,
            year,
            epoch_start,
            sample_interval: dsec,
        })
    }

    /// Times must increase strictly; irregular spacing degrades the
    /// interpolation quietly, so it is only warned about.
    fn check_spacing(state_vectors: &[StateVector], dsec: f64) -> GeoResult<()> {
        let mut irregular = 0usize;
        for pair in state_vectors.windows(2) {
            let dt = pair[1].time - pair[0].time;
            if dt <= 0.0 {
                return Err(GeoError::InvalidFormat(format!(
                    "orbit record times not increasing at t={}",
                    pair[1].time
                )));
            }
            if (dt - dsec).abs() > 0.01 * dsec {
                irregular += 1;
            }
        }
        if irregular > 0 {
            log::warn!(
                "{} orbit intervals deviate from the declared {} s spacing",
                irregular,
                dsec
            );
        }
        Ok(())
    }
}

fn parse_field<T: std::str::FromStr>(value: &str, what: &str) -> GeoResult<T> {
    value
        .parse::<T>()
        .map_err(|_| GeoError::InvalidFormat(format!("bad orbit {}: '{}'", what, value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample_led(n: usize) -> String {
        let mut text = format!("{} 2008 290 43200.0 60.0\n", n);
        for k in 0..n {
            let sec = 43200.0 + 60.0 * k as f64;
            text.push_str(&format!(
                "2008 290 {:.3} {:.3} {:.3} {:.3} {:.3} {:.3} {:.3}\n",
                sec,
                7_000_000.0 + k as f64,
                1000.0 * k as f64,
                -2000.0 * k as f64,
                10.0,
                7000.0,
                -500.0
            ));
        }
        text
    }

    #[test]
    fn test_parse_round_numbers() {
        let orbit = OrbitReader::parse(&sample_led(8)).unwrap();
        assert_eq!(orbit.len(), 8);
        assert_eq!(orbit.year, 2008);
        assert_relative_eq!(orbit.epoch_start, 290.0 * 86400.0 + 43200.0);
        assert_relative_eq!(orbit.sample_interval, 60.0);
        assert_relative_eq!(orbit.start_time(), orbit.epoch_start);
        assert_relative_eq!(orbit.end_time(), orbit.epoch_start + 7.0 * 60.0);
        assert_relative_eq!(orbit.state_vectors[3].position[0], 7_000_003.0);
    }

    #[test]
    fn test_declared_count_mismatch() {
        let mut text = sample_led(8);
        text = text.replacen("8 2008", "9 2008", 1);
        assert!(matches!(
            OrbitReader::parse(&text),
            Err(GeoError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_truncated_record() {
        let text = "1 2008 290 43200.0 60.0\n2008 290 43200.0 1.0 2.0\n";
        assert!(matches!(
            OrbitReader::parse(text),
            Err(GeoError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_empty_file() {
        assert!(OrbitReader::parse("").is_err());
        assert!(OrbitReader::parse("\n\n").is_err());
    }

    #[test]
    fn test_non_increasing_times_rejected() {
        let text = "\
2 2008 290 43200.0 60.0
2008 290 43260.0 1.0 2.0 3.0 4.0 5.0 6.0
2008 290 43200.0 1.0 2.0 3.0 4.0 5.0 6.0
";
        assert!(matches!(
            OrbitReader::parse(text),
            Err(GeoError::InvalidFormat(_))
        ));
    }
}
