//! Readers and writers at the engine boundary

pub mod orbit;
pub mod point_stream;
pub mod prm;

pub use orbit::OrbitReader;
pub use point_stream::{LltReader, OutputFormat, RecordWriter};
pub use prm::PrmReader;
