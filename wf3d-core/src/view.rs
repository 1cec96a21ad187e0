/// The view transformation state shared by every drawing call
use nalgebra::{Matrix4, Point2, Point3};
use tracing::{debug, trace, warn};

use crate::basis::CameraBasis;
use crate::config::ViewConfig;
use crate::error::{Result, ViewError};
use crate::geometry::VertexBatch;
use crate::orbit::Orbit;
use crate::projection::Perspective;
use crate::transform::{AffineOp, Pivot, TransformChain};

/// Forward and inverse transforms between model space and device space.
///
/// Screen operations (scale, rotate, translate) accumulate in a reversible
/// chain pivoted on the screen center. Orbits are absolute rotations rebuilt
/// from accumulated angles. The camera basis is fixed at construction.
///
/// Every operator validates its input first; a rejected call returns
/// [`ViewError::Degenerate`] and leaves the state untouched.
#[derive(Debug, Clone)]
pub struct ViewContext {
    chain: TransformChain,
    basis: CameraBasis,
    orbit: Orbit,
    perspective: Perspective,
}

impl ViewContext {
    pub fn new(config: ViewConfig) -> Result<Self> {
        config.validate()?;
        let view = Self {
            chain: TransformChain::new(Pivot::new(config.screen_center)),
            basis: CameraBasis::new(config.reference_point)?,
            orbit: Orbit::new(),
            perspective: Perspective::new(config.field_of_view)?,
        };
        debug!(?config, "created view context");
        Ok(view)
    }

    /// Scale by `a` along x and `b` along y about the screen center
    pub fn scale(&mut self, a: f64, b: f64) -> Result<()> {
        self.push(AffineOp::Scale { x: a, y: b })
    }

    /// Rotate by `degrees` about the screen center
    pub fn rotate(&mut self, degrees: f64) -> Result<()> {
        self.push(AffineOp::Rotate { degrees })
    }

    pub fn translate(&mut self, x: f64, y: f64) -> Result<()> {
        self.push(AffineOp::Translate { x, y })
    }

    fn push(&mut self, op: AffineOp) -> Result<()> {
        self.chain.push(op).map_err(|e| rejected(e.into()))
    }

    /// Undo the most recent scale, rotate or translate
    pub fn undo(&mut self) -> Result<AffineOp> {
        self.chain.undo().ok_or(ViewError::EmptyHistory)
    }

    /// Orbit about the world up axis by `degrees` relative to the last orbit
    pub fn h_orbit(&mut self, degrees: f64) -> Result<()> {
        self.orbit
            .rotate_horizontal(degrees)
            .map_err(|e| rejected(e.into()))
    }

    /// Tilt about the horizontal axis perpendicular to the view direction
    pub fn v_orbit(&mut self, degrees: f64) -> Result<()> {
        let reference = self.basis.reference();
        self.orbit
            .rotate_vertical(degrees, &reference)
            .map_err(|e| rejected(e.into()))
    }

    /// Change the field of view by `delta`
    pub fn adjust_fov(&mut self, delta: f64) -> Result<()> {
        self.perspective.adjust(delta).map_err(|e| rejected(e.into()))
    }

    /// Move the scale/rotate pivot, keeping every applied operation
    pub fn set_screen_center(&mut self, center: Point2<f64>) -> Result<()> {
        self.chain.recenter(center).map_err(|e| rejected(e.into()))
    }

    pub fn screen_center(&self) -> Point2<f64> {
        let offset = self.chain.pivot().from_origin.column(3);
        Point2::new(offset[0], offset[1])
    }

    /// Drop every screen operation and orbit rotation, keeping the screen
    /// centering. Orbit angles and the field of view are not reset.
    pub fn reset(&mut self) {
        self.chain.clear();
        self.orbit.reset_matrices();
        debug!("reset view transforms");
    }

    /// Perspective divide in place; see [`Perspective::project`]
    pub fn project(&self, batch: &mut VertexBatch) {
        self.perspective.project(batch);
    }

    /// Orbit, change basis, project, then apply the device chain
    pub fn model_to_device(&self, vertices: &VertexBatch) -> VertexBatch {
        trace!(columns = vertices.ncols(), "model to device");
        let mut device = self.orbit.h_matrix() * vertices;
        device = self.orbit.v_matrix() * device;
        device = self.basis.matrix() * device;
        self.project(&mut device);
        self.chain.to_device() * device
    }

    /// Re-express vertices in the camera basis.
    ///
    /// This only applies the change of basis; it does not undo orbit,
    /// projection or the device chain. Use [`ViewContext::unapply_affine`] to
    /// invert the screen operations.
    pub fn device_to_model(&self, vertices: &VertexBatch) -> VertexBatch {
        trace!(columns = vertices.ncols(), "device to model");
        self.basis.matrix() * vertices
    }

    /// Screen centering plus the scale/rotate/translate chain
    pub fn apply_affine(&self, vertices: &VertexBatch) -> VertexBatch {
        self.chain.to_device() * vertices
    }

    /// Exact inverse of [`ViewContext::apply_affine`]
    pub fn unapply_affine(&self, vertices: &VertexBatch) -> VertexBatch {
        self.chain.pivot().to_origin * (self.chain.to_model() * vertices)
    }

    pub fn to_device(&self) -> &Matrix4<f64> {
        self.chain.to_device()
    }

    pub fn to_model(&self) -> &Matrix4<f64> {
        self.chain.to_model()
    }

    pub fn change_basis(&self) -> &Matrix4<f64> {
        self.basis.matrix()
    }

    pub fn h_orbit_matrix(&self) -> &Matrix4<f64> {
        self.orbit.h_matrix()
    }

    pub fn v_orbit_matrix(&self) -> &Matrix4<f64> {
        self.orbit.v_matrix()
    }

    /// Accumulated (horizontal, vertical) orbit angles in radians
    pub fn orbit_angles(&self) -> (f64, f64) {
        self.orbit.angles()
    }

    pub fn field_of_view(&self) -> f64 {
        self.perspective.field_of_view()
    }

    pub fn reference_point(&self) -> Point3<f64> {
        self.basis.reference()
    }

    pub fn basis(&self) -> &CameraBasis {
        &self.basis
    }

    pub fn history(&self) -> &[AffineOp] {
        self.chain.history()
    }
}

fn rejected(err: ViewError) -> ViewError {
    warn!(%err, "rejected view operation");
    err
}
