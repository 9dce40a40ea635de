//! Core orbit-geometry algorithms

pub mod fit;
pub mod geolocate;
pub mod geometry;
pub mod height_velocity;
pub mod interp;

// Re-export main types
pub use fit::fit_quadratic;
pub use geolocate::{Geolocator, MIN_VALID_RADIUS};
pub use geometry::{cross3, plh_to_xyz, xyz_to_plh};
pub use height_velocity::{compute_height_velocity, update_scene_geometry, HeightVelocity};
pub use interp::{InterpStatus, OrbitInterpolator};
