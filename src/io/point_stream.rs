//! Ground-point input stream and sensor-coordinate record writers.

use crate::types::{GroundPoint, SensorCoordinate};
use std::collections::VecDeque;
use std::io::{BufRead, Write};

/// Reader for the free-form `lon lat elevation` point stream.
///
/// Values are whitespace-separated tokens; line breaks are not
/// significant. The first token that fails to parse as a number ends the
/// stream — the end-of-stream semantics of the text interface, not an
/// error.
pub struct LltReader<R: BufRead> {
    input: R,
    tokens: VecDeque<String>,
    finished: bool,
}

impl<R: BufRead> LltReader<R> {
    pub fn new(input: R) -> Self {
        Self {
            input,
            tokens: VecDeque::new(),
            finished: false,
        }
    }

    fn next_token(&mut self) -> Option<String> {
        loop {
            if let Some(tok) = self.tokens.pop_front() {
                return Some(tok);
            }
            let mut line = String::new();
            match self.input.read_line(&mut line) {
                Ok(0) => return None,
                Ok(_) => {
                    self.tokens
                        .extend(line.split_whitespace().map(str::to_string));
                }
                Err(e) => {
                    log::warn!("point stream read error, stopping: {}", e);
                    return None;
                }
            }
        }
    }

    fn next_value(&mut self) -> Option<f64> {
        let tok = self.next_token()?;
        match tok.parse::<f64>() {
            Ok(v) => Some(v),
            Err(_) => {
                log::debug!("non-numeric token '{}' ends the point stream", tok);
                None
            }
        }
    }
}

impl<R: BufRead> Iterator for LltReader<R> {
    type Item = GroundPoint;

    fn next(&mut self) -> Option<GroundPoint> {
        if self.finished {
            return None;
        }
        let lon = self.next_value();
        let lat = lon.and_then(|_| self.next_value());
        let elevation = lat.and_then(|_| self.next_value());
        match (lon, lat, elevation) {
            (Some(lon), Some(lat), Some(elevation)) => Some(GroundPoint {
                lon,
                lat,
                elevation,
            }),
            _ => {
                self.finished = true;
                None
            }
        }
    }
}

/// Output record encoding.
///
/// The two binary modes write IEEE-754 values in the machine's native byte
/// order; no endianness normalization is performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Five space-separated decimal values per line.
    Ascii,
    /// Five consecutive f32 values per record.
    Float32,
    /// Five consecutive f64 values per record.
    Float64,
}

/// Writer for sensor-coordinate records in the selected encoding.
pub struct RecordWriter<W: Write> {
    output: W,
    format: OutputFormat,
}

impl<W: Write> RecordWriter<W> {
    pub fn new(output: W, format: OutputFormat) -> Self {
        Self { output, format }
    }

    /// Append one record: range, azimuth, elevation, lon, lat.
    pub fn write(&mut self, rec: &SensorCoordinate) -> std::io::Result<()> {
        let values = [
            rec.range_pixel,
            rec.azimuth_pixel,
            rec.elevation,
            rec.lon,
            rec.lat,
        ];
        match self.format {
            OutputFormat::Ascii => {
                writeln!(
                    self.output,
                    "{:.6} {:.6} {:.6} {:.6} {:.6} ",
                    values[0], values[1], values[2], values[3], values[4]
                )
            }
            OutputFormat::Float32 => {
                for v in values {
                    self.output.write_all(&(v as f32).to_ne_bytes())?;
                }
                Ok(())
            }
            OutputFormat::Float64 => {
                for v in values {
                    self.output.write_all(&v.to_ne_bytes())?;
                }
                Ok(())
            }
        }
    }

    pub fn flush(&mut self) -> std::io::Result<()> {
        self.output.flush()
    }

    /// Consume the writer and return the underlying sink.
    pub fn into_inner(self) -> W {
        self.output
    }
}
