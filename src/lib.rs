//! sargeom: orbit interpolation and inverse geolocation for spaceborne SAR
//!
//! Given a satellite's time-tagged orbit state vectors and one acquisition's
//! timing/geometry parameters, this library derives the platform geometry
//! (velocity, local earth radius, height above the reference ellipsoid) and
//! maps geodetic ground points (lon, lat, elevation) into sensor coordinates
//! (range pixel, azimuth pixel) by finding the time of closest approach
//! along the interpolated orbit.

pub mod core;
pub mod io;
pub mod types;

// Re-export main types and functions for easier access
pub use types::{
    AcquisitionParams, Ellipsoid, GeoError, GeoResult, GroundPoint, OrbitData, OrbitDirection,
    SensorCoordinate, SensorFamily, StateVector,
};

pub use self::core::geolocate::Geolocator;
pub use self::core::height_velocity::{
    compute_height_velocity, update_scene_geometry, HeightVelocity,
};
pub use self::core::interp::{InterpStatus, OrbitInterpolator};
pub use io::{LltReader, OrbitReader, OutputFormat, PrmReader, RecordWriter};
