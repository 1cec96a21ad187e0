use std::path::PathBuf;

use clap::Parser;
use nalgebra::Point3;
use wf3d_core::config::{DEFAULT_FIELD_OF_VIEW, DEFAULT_REFERENCE_POINT};
use wf3d_core::ViewConfig;

use crate::controls::{DragTracker, Keymap};
use crate::renderer::CellSize;

#[derive(Parser, Debug)]
#[command(name = "wf3d")]
#[command(about = "Interactive terminal wireframe viewer")]
pub struct CliArgs {
    /// STL model to load (a cube is shown when omitted)
    pub model: Option<PathBuf>,

    /// Reference (eye) point as X,Y,Z
    #[arg(long, value_parser = parse_point, default_value = "50,50,0")]
    pub reference: Point3<f64>,

    /// Perspective strength
    #[arg(long, default_value_t = DEFAULT_FIELD_OF_VIEW)]
    pub fov: f64,

    /// Device pixels per terminal column
    #[arg(long, default_value_t = 8.0)]
    pub cell_width: f64,

    /// Device pixels per terminal row
    #[arg(long, default_value_t = 16.0)]
    pub cell_height: f64,

    /// Device pixels per translate keypress
    #[arg(long, default_value_t = 20.0)]
    pub step: f64,

    /// Degrees per orbit keypress or drag step
    #[arg(long, default_value_t = 5.0)]
    pub orbit_step: f64,

    /// Do not draw the X/Y/Z axes
    #[arg(long)]
    pub no_axes: bool,
}

impl CliArgs {
    /// View configuration for a terminal of `cols` x `rows` cells
    pub fn view_config(&self, cols: u16, rows: u16) -> ViewConfig {
        ViewConfig::default()
            .with_reference_point(self.reference)
            .with_field_of_view(self.fov)
            .with_screen_center(self.cell_size().canvas_center(cols as usize, rows as usize))
    }

    pub fn cell_size(&self) -> CellSize {
        CellSize {
            width: self.cell_width,
            height: self.cell_height,
        }
    }

    pub fn keymap(&self) -> Keymap {
        Keymap {
            step: self.step,
            orbit_step: self.orbit_step,
        }
    }

    pub fn drag_tracker(&self) -> DragTracker {
        DragTracker::new(1, self.orbit_step)
    }
}

impl Default for CliArgs {
    fn default() -> Self {
        let [x, y, z] = DEFAULT_REFERENCE_POINT;
        Self {
            model: None,
            reference: Point3::new(x, y, z),
            fov: DEFAULT_FIELD_OF_VIEW,
            cell_width: 8.0,
            cell_height: 16.0,
            step: 20.0,
            orbit_step: 5.0,
            no_axes: false,
        }
    }
}

fn parse_point(text: &str) -> Result<Point3<f64>, String> {
    let parts: Vec<&str> = text.split(',').collect();
    if parts.len() != 3 {
        return Err("expected three comma-separated numbers, e.g. 50,50,0".to_string());
    }

    let mut coords = [0.0; 3];
    for (coord, part) in coords.iter_mut().zip(&parts) {
        *coord = part
            .trim()
            .parse()
            .map_err(|e| format!("invalid coordinate {:?}: {}", part, e))?;
    }
    Ok(Point3::from(coords))
}
