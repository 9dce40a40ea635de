//! Project longitude/latitude/elevation points into SAR range/azimuth
//! coordinates.
//!
//! Reads the master image parameter file and its orbit records, flies the
//! satellite along the interpolated orbit and writes one sensor-coordinate
//! record per in-scene input point. Points stream from stdin, records to
//! stdout.

use anyhow::{bail, Context};
use clap::Parser;
use std::io::BufWriter;
use std::path::PathBuf;

use sargeom::io::{LltReader, OrbitReader, OutputFormat, PrmReader, RecordWriter};
use sargeom::{update_scene_geometry, Geolocator};

#[derive(Parser)]
#[command(name = "llt2rat")]
#[command(about = "Project lon/lat/elevation points into SAR range/azimuth coordinates")]
struct Cli {
    /// Master image parameter file (points to the orbit record file)
    prm: PathBuf,

    /// Orbit record file, overriding the led_file named in the PRM
    #[arg(long)]
    orbit: Option<PathBuf>,

    /// Write binary single-precision records instead of ASCII
    #[arg(long, conflicts_with = "bod")]
    bos: bool,

    /// Write binary double-precision records instead of ASCII
    #[arg(long)]
    bod: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let format = if cli.bos {
        OutputFormat::Float32
    } else if cli.bod {
        OutputFormat::Float64
    } else {
        OutputFormat::Ascii
    };

    let mut prm = PrmReader::read_file(&cli.prm)
        .with_context(|| format!("reading parameter file {}", cli.prm.display()))?;

    let orbit_path = match (&cli.orbit, &prm.led_file) {
        (Some(path), _) => path.clone(),
        (None, Some(led)) => PathBuf::from(led),
        (None, None) => bail!("no orbit file: PRM has no led_file and --orbit not given"),
    };
    let orbit = OrbitReader::read_file(&orbit_path)
        .with_context(|| format!("reading orbit file {}", orbit_path.display()))?;

    // fill velocity/earth-radius/height fields when the parameter file
    // does not carry them yet
    if prm.vel <= 0.0 || prm.earth_radius.is_none() {
        update_scene_geometry(&mut prm, &orbit).context("refreshing scene geometry")?;
    }

    let geolocator = Geolocator::new(&prm, &orbit).context("building geolocator")?;

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let reader = LltReader::new(stdin.lock());
    let mut writer = RecordWriter::new(BufWriter::new(stdout.lock()), format);

    let mut read = 0usize;
    let mut written = 0usize;
    for point in reader {
        read += 1;
        if let Some(rec) = geolocator.geolocate(&point) {
            writer.write(&rec).context("writing output record")?;
            written += 1;
        }
    }
    writer.flush()?;

    log::info!("{} points read, {} in scene", read, written);
    Ok(())
}
