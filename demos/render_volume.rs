#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
//! Render a volume in every mode without opening a window.
//!
//! Run with: cargo run --example render_volume [volume.vtk] [options.json]
//!
//! Without a volume argument a synthetic sphere is written to a temporary
//! file first. Outputs PNG files to out/.

use std::path::{Path, PathBuf};

use volray::*;

const WIDTH: u32 = 800;
const HEIGHT: u32 = 600;
const OUT_DIR: &str = "out";
const SIZE: u32 = 64;

/// Writes a big-endian `unsigned_short` volume holding a smooth sphere with
/// a denser shell.
fn write_sphere(path: &Path) -> std::io::Result<()> {
    let mut file = format!(
        "# vtk DataFile Version 3.0\n\
         synthetic sphere\n\
         BINARY\n\
         DATASET STRUCTURED_POINTS\n\
         DIMENSIONS {SIZE} {SIZE} {}\n\
         ORIGIN 0 0 0\n\
         SPACING 1 1 1.5\n\
         POINT_DATA {}\n\
         SCALARS density unsigned_short\n\
         LOOKUP_TABLE default\n",
        SIZE / 2,
        SIZE * SIZE * SIZE / 2,
    )
    .into_bytes();

    // Physical centre; z slices are 1.5 units apart.
    let centre = Vec3::new(SIZE as f32 / 2.0, SIZE as f32 / 2.0, SIZE as f32 * 0.375);
    for z in 0..SIZE / 2 {
        for y in 0..SIZE {
            for x in 0..SIZE {
                let p = Vec3::new(x as f32, y as f32, z as f32 * 1.5) - centre;
                let r = p.length() / (SIZE as f32 / 2.0);
                let core = (1.0 - r).max(0.0);
                let shell = (-((r - 0.7) * 12.0).powi(2)).exp();
                let value = (core * 20_000.0 + shell * 40_000.0).min(65_535.0) as u16;
                file.extend_from_slice(&value.to_be_bytes());
            }
        }
    }
    std::fs::write(path, file)
}

fn main() -> Result<()> {
    init_logging();

    let mut args = std::env::args().skip(1);
    let volume = match args.next() {
        Some(path) => PathBuf::from(path),
        None => {
            let path = std::env::temp_dir().join("volray-sphere.vtk");
            write_sphere(&path).map_err(|e| ViewerError::Format(FormatError::Io(e)))?;
            path
        }
    };
    let options = match args.next() {
        Some(path) => Options::load(path)?,
        None => Options::default(),
    };

    std::fs::create_dir_all(OUT_DIR).map_err(|e| ViewerError::Screenshot(e.into()))?;

    let mut viewer = Viewer::with_options(WIDTH, HEIGHT, &options)?;
    viewer.set_volume(&volume)?;
    let raw = read_volume(&volume)?;
    println!("{}", raw.summary());

    viewer.set_threshold_percent(40.0);
    viewer.set_background(Vec3::new(0.1, 0.1, 0.15));

    // Tilt the volume with a short drag.
    viewer.pointer_press(WIDTH as f32 / 2.0, HEIGHT as f32 / 2.0);
    viewer.pointer_move(WIDTH as f32 * 0.6, HEIGHT as f32 * 0.4, true);
    viewer.pointer_release(WIDTH as f32 * 0.6, HEIGHT as f32 * 0.4);

    for mode in RenderMode::ALL {
        viewer.set_mode(mode.name())?;
        let filename = format!(
            "{OUT_DIR}/{}.png",
            mode.name().to_lowercase().replace(' ', "_")
        );
        viewer.render_to_file(&filename)?;
        println!("wrote {filename}");
    }

    Ok(())
}
