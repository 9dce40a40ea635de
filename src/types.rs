use serde::{Deserialize, Serialize};

/// Speed of light used for slant-range scaling, in m/s.
///
/// Heritage SAR processor value; the range-pixel calibration constants
/// assume it, so it is not the CODATA figure.
pub const SPEED_OF_LIGHT: f64 = 299_792_456.0;

/// Seconds per day, for the continuous seconds-of-year clock.
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Orbit state vector: one time-tagged position/velocity sample.
///
/// `time` is on the continuous seconds-of-year clock
/// (86400 * day_of_year + seconds_of_day).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateVector {
    pub time: f64,
    pub position: [f64; 3], // [x, y, z] in meters, Earth-centered frame
    pub velocity: [f64; 3], // [vx, vy, vz] in m/s
}

/// Ordered table of orbit state vectors covering one acquisition.
///
/// Built once from the orbit record file, read-only afterward. Samples are
/// strictly increasing in time and nominally spaced by `sample_interval`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrbitData {
    pub state_vectors: Vec<StateVector>,
    /// Calendar year of the first sample (diagnostics only).
    pub year: i32,
    /// Epoch of the first sample, seconds-of-year clock.
    pub epoch_start: f64,
    /// Nominal spacing between samples in seconds.
    pub sample_interval: f64,
}

impl OrbitData {
    pub fn len(&self) -> usize {
        self.state_vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state_vectors.is_empty()
    }

    /// Time of the first sample.
    pub fn start_time(&self) -> f64 {
        self.state_vectors.first().map(|sv| sv.time).unwrap_or(0.0)
    }

    /// Time of the last sample.
    pub fn end_time(&self) -> f64 {
        self.state_vectors.last().map(|sv| sv.time).unwrap_or(0.0)
    }
}

/// Reference ellipsoid: equatorial and polar semi-axes in meters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Ellipsoid {
    pub equatorial_radius: f64,
    pub polar_radius: f64,
}

impl Default for Ellipsoid {
    fn default() -> Self {
        // WGS84 semi-axes
        Self {
            equatorial_radius: 6_378_137.0,
            polar_radius: 6_356_752.314,
        }
    }
}

impl Ellipsoid {
    /// Flattening f = (ra - rc) / ra.
    pub fn flattening(&self) -> f64 {
        (self.equatorial_radius - self.polar_radius) / self.equatorial_radius
    }

    /// Local earth radius at a given latitude (radians):
    /// re = 1 / sqrt(cos^2(lat)/ra^2 + sin^2(lat)/rc^2).
    pub fn local_radius(&self, latitude: f64) -> f64 {
        let ct = latitude.cos();
        let st = latitude.sin();
        let arg = (ct * ct) / (self.equatorial_radius * self.equatorial_radius)
            + (st * st) / (self.polar_radius * self.polar_radius);
        1.0 / arg.sqrt()
    }
}

/// Sensor family, selects empirical geolocation bias constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SensorFamily {
    Ers1,
    Ers2,
    Radarsat,
    Envisat,
    Alos,
    Unknown,
}

impl SensorFamily {
    /// Map the numeric identity code carried in parameter files.
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => SensorFamily::Ers1,
            2 => SensorFamily::Ers2,
            3 => SensorFamily::Radarsat,
            4 => SensorFamily::Envisat,
            5 => SensorFamily::Alos,
            _ => SensorFamily::Unknown,
        }
    }
}

/// Orbit direction, derived from the sign of the along-track z-velocity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrbitDirection {
    Ascending,
    Descending,
}

impl std::fmt::Display for OrbitDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrbitDirection::Ascending => write!(f, "A"),
            OrbitDirection::Descending => write!(f, "D"),
        }
    }
}

/// Acquisition timing, geometry and calibration parameters for one scene.
///
/// The subset of the processing parameter record that the geometry engine
/// consumes and updates. Field names follow the parameter-file vocabulary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcquisitionParams {
    /// Acquisition start clock, decimal day-of-year.
    pub clock_start: f64,
    /// Pulse repetition frequency in Hz.
    pub prf: f64,
    /// Slant range to the first/last range sample, meters.
    pub near_range: f64,
    pub far_range: f64,
    /// Range sampling rate in Hz.
    pub rng_samp_rate: f64,
    /// Radar wavelength in meters.
    pub radar_wavelength: f64,
    /// Doppler centroid polynomial coefficients in Hz (a zero fd1 disables
    /// the Doppler correction; the higher orders ride along for callers).
    pub fd1: f64,
    pub fdd1: f64,
    pub fddd1: f64,
    pub num_rng_bins: usize,
    pub num_valid_az: usize,
    pub num_patches: usize,
    pub nrows: usize,
    /// Integer range/azimuth alignment shifts, pixels.
    pub rshift: i64,
    pub ashift: i64,
    /// Sub-integer alignment shifts, pixels.
    pub sub_int_r: f64,
    pub sub_int_a: f64,
    /// Chirp extension, range pixels.
    pub chirp_ext: i64,
    pub sensor: SensorFamily,
    pub ellipsoid: Ellipsoid,
    /// Local earth radius override; `None` means derive from the orbit.
    pub earth_radius: Option<f64>,
    /// Orbit record file path, as named in the parameter file.
    pub led_file: Option<String>,

    // Fields filled by the scene-geometry refresh.
    /// Equivalent spacecraft ground velocity, m/s.
    pub vel: f64,
    /// Spacecraft height above the ellipsoid at scene center / start / end.
    pub ht: f64,
    pub ht_start: f64,
    pub ht_end: f64,
    pub orbit_direction: Option<OrbitDirection>,
}

impl Default for AcquisitionParams {
    fn default() -> Self {
        Self {
            clock_start: 0.0,
            prf: 0.0,
            near_range: 0.0,
            far_range: 0.0,
            rng_samp_rate: 0.0,
            radar_wavelength: 0.0,
            fd1: 0.0,
            fdd1: 0.0,
            fddd1: 0.0,
            num_rng_bins: 0,
            num_valid_az: 0,
            num_patches: 1,
            nrows: 0,
            rshift: 0,
            ashift: 0,
            sub_int_r: 0.0,
            sub_int_a: 0.0,
            chirp_ext: 0,
            sensor: SensorFamily::Unknown,
            ellipsoid: Ellipsoid::default(),
            earth_radius: None,
            led_file: None,
            vel: 0.0,
            ht: 0.0,
            ht_start: 0.0,
            ht_end: 0.0,
            orbit_direction: None,
        }
    }
}

impl AcquisitionParams {
    /// Acquisition start/stop epochs on the seconds-of-year clock.
    pub fn acquisition_window(&self) -> (f64, f64) {
        let t1 = SECONDS_PER_DAY * self.clock_start
            + (self.nrows as f64 - self.num_valid_az as f64) / (2.0 * self.prf);
        let t2 = t1 + self.num_patches as f64 * self.num_valid_az as f64 / self.prf;
        (t1, t2)
    }
}

/// Geodetic ground point: longitude/latitude in degrees, elevation in meters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GroundPoint {
    pub lon: f64,
    pub lat: f64,
    pub elevation: f64,
}

/// Sensor-coordinate record produced by the geolocator.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SensorCoordinate {
    pub range_pixel: f64,
    pub azimuth_pixel: f64,
    pub elevation: f64,
    pub lon: f64,
    pub lat: f64,
}

/// Error types for the geometry engine
#[derive(Debug, thiserror::Error)]
pub enum GeoError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Degenerate fit: {0}")]
    DegenerateFit(String),

    #[error("Processing error: {0}")]
    Processing(String),
}

/// Result type for geometry operations
pub type GeoResult<T> = Result<T, GeoError>;
