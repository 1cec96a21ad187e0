/// Construction parameters for a view
use nalgebra::{Point2, Point3};

use crate::basis::CameraBasis;
use crate::error::{ensure_finite, DegenerateInput};
use crate::projection::Perspective;

pub const DEFAULT_REFERENCE_POINT: [f64; 3] = [50.0, 50.0, 0.0];
pub const DEFAULT_FIELD_OF_VIEW: f64 = 1000.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewConfig {
    /// Eye point the camera basis is built from
    pub reference_point: Point3<f64>,
    /// Device coordinates scale and rotate pivot around
    pub screen_center: Point2<f64>,
    pub field_of_view: f64,
}

impl ViewConfig {
    /// Default camera, centered on a `width` x `height` device surface
    pub fn for_screen(width: u32, height: u32) -> Self {
        Self {
            screen_center: Point2::new(width as f64 / 2.0, height as f64 / 2.0),
            ..Self::default()
        }
    }

    pub fn with_reference_point(mut self, reference_point: Point3<f64>) -> Self {
        self.reference_point = reference_point;
        self
    }

    pub fn with_screen_center(mut self, screen_center: Point2<f64>) -> Self {
        self.screen_center = screen_center;
        self
    }

    pub fn with_field_of_view(mut self, field_of_view: f64) -> Self {
        self.field_of_view = field_of_view;
        self
    }

    pub fn validate(&self) -> Result<(), DegenerateInput> {
        ensure_finite("screen center", &[self.screen_center.x, self.screen_center.y])?;
        ensure_finite("reference point", self.reference_point.coords.as_slice())?;
        Perspective::new(self.field_of_view)?;
        CameraBasis::new(self.reference_point)?;
        Ok(())
    }
}

impl Default for ViewConfig {
    fn default() -> Self {
        let [x, y, z] = DEFAULT_REFERENCE_POINT;
        Self {
            reference_point: Point3::new(x, y, z),
            screen_center: Point2::new(400.0, 400.0),
            field_of_view: DEFAULT_FIELD_OF_VIEW,
        }
    }
}
