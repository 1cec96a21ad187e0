/// Screen-space affine operations and the reversible transform chain
use nalgebra::{Matrix4, Point2, Vector3};
use tracing::debug;

use crate::error::{ensure_finite, DegenerateInput};

/// A single user-issued 2D operation in device space.
///
/// Every variant knows its own closed-form inverse, so the forward and
/// inverse chains can both be built from one record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AffineOp {
    Scale { x: f64, y: f64 },
    Rotate { degrees: f64 },
    Translate { x: f64, y: f64 },
}

impl AffineOp {
    pub fn validate(&self) -> Result<(), DegenerateInput> {
        match *self {
            AffineOp::Scale { x, y } => {
                ensure_finite("scale factor", &[x, y])?;
                // subnormal factors are non-zero but have no finite reciprocal
                if !(1.0 / x).is_finite() || !(1.0 / y).is_finite() {
                    return Err(DegenerateInput::ZeroScale { x, y });
                }
                Ok(())
            }
            AffineOp::Rotate { degrees } => ensure_finite("rotation angle", &[degrees]),
            AffineOp::Translate { x, y } => ensure_finite("translation", &[x, y]),
        }
    }

    /// The elementary matrix E. z and w rows stay identity.
    pub fn matrix(&self) -> Matrix4<f64> {
        match *self {
            AffineOp::Scale { x, y } => Transform::scale_matrix(x, y),
            AffineOp::Rotate { degrees } => Transform::rotation_matrix(degrees.to_radians()),
            AffineOp::Translate { x, y } => Transform::translation_matrix(x, y),
        }
    }

    /// Closed-form E⁻¹: reciprocal factors, negated angle, negated offset.
    pub fn inverse_matrix(&self) -> Matrix4<f64> {
        match *self {
            AffineOp::Scale { x, y } => Transform::scale_matrix(1.0 / x, 1.0 / y),
            AffineOp::Rotate { degrees } => Transform::rotation_matrix(-degrees.to_radians()),
            AffineOp::Translate { x, y } => Transform::translation_matrix(-x, -y),
        }
    }
}

/// Elementary homogeneous matrices for the screen plane
pub struct Transform;

impl Transform {
    /// Counter-clockwise rotation about the z axis
    pub fn rotation_matrix(theta: f64) -> Matrix4<f64> {
        let (s, c) = theta.sin_cos();
        let mut m = Matrix4::identity();
        m[(0, 0)] = c;
        m[(0, 1)] = -s;
        m[(1, 0)] = s;
        m[(1, 1)] = c;
        m
    }

    pub fn translation_matrix(x: f64, y: f64) -> Matrix4<f64> {
        Matrix4::new_translation(&Vector3::new(x, y, 0.0))
    }

    pub fn scale_matrix(x: f64, y: f64) -> Matrix4<f64> {
        Matrix4::new_nonuniform_scaling(&Vector3::new(x, y, 1.0))
    }
}

/// Moves the screen-center pivot to the world origin and back
#[derive(Debug, Clone, PartialEq)]
pub struct Pivot {
    pub to_origin: Matrix4<f64>,
    pub from_origin: Matrix4<f64>,
}

impl Pivot {
    pub fn new(center: Point2<f64>) -> Self {
        Self {
            to_origin: Transform::translation_matrix(-center.x, -center.y),
            from_origin: Transform::translation_matrix(center.x, center.y),
        }
    }

    /// `from_origin · m · to_origin`
    pub fn around(&self, m: &Matrix4<f64>) -> Matrix4<f64> {
        self.from_origin * m * self.to_origin
    }
}

/// Log of applied operations plus the two products derived from it.
///
/// `to_device` is the forward chain, starting from the screen-centering
/// translation. `to_model` is the inverse of the operation product only and
/// starts at identity, so `to_model · to_device == pivot.from_origin`.
#[derive(Debug, Clone)]
pub struct TransformChain {
    pivot: Pivot,
    ops: Vec<AffineOp>,
    to_device: Matrix4<f64>,
    to_model: Matrix4<f64>,
}

impl TransformChain {
    pub fn new(pivot: Pivot) -> Self {
        let to_device = pivot.from_origin;
        Self {
            pivot,
            ops: Vec::new(),
            to_device,
            to_model: Matrix4::identity(),
        }
    }

    /// Compose one operation into both chains: prepend on the forward side,
    /// append on the inverse side.
    ///
    /// Products that would overflow are rejected before anything is stored.
    pub fn push(&mut self, op: AffineOp) -> Result<(), DegenerateInput> {
        op.validate()?;
        let (to_device, to_model) = compose(&self.pivot, &op, &self.to_device, &self.to_model);
        ensure_finite_products(&to_device, &to_model)?;

        self.to_device = to_device;
        self.to_model = to_model;
        self.ops.push(op);
        debug!(?op, depth = self.ops.len(), "applied transform");
        Ok(())
    }

    /// Move the pivot to `center` and replay the log around it
    pub fn recenter(&mut self, center: Point2<f64>) -> Result<(), DegenerateInput> {
        ensure_finite("screen center", &[center.x, center.y])?;
        let pivot = Pivot::new(center);
        let (to_device, to_model) = products(&pivot, &self.ops);
        ensure_finite_products(&to_device, &to_model)?;

        self.pivot = pivot;
        self.to_device = to_device;
        self.to_model = to_model;
        debug!(x = center.x, y = center.y, "recentered transform chain");
        Ok(())
    }

    /// Drop the most recent operation, returning it.
    pub fn undo(&mut self) -> Option<AffineOp> {
        let op = self.ops.pop()?;
        self.rebuild();
        debug!(?op, depth = self.ops.len(), "undid transform");
        Some(op)
    }

    /// Forget every operation; only the screen centering remains.
    pub fn clear(&mut self) {
        self.ops.clear();
        self.rebuild();
    }

    /// Recompute both products from the log
    pub fn rebuild(&mut self) {
        let (to_device, to_model) = products(&self.pivot, &self.ops);
        self.to_device = to_device;
        self.to_model = to_model;
    }

    pub fn to_device(&self) -> &Matrix4<f64> {
        &self.to_device
    }

    pub fn to_model(&self) -> &Matrix4<f64> {
        &self.to_model
    }

    pub fn pivot(&self) -> &Pivot {
        &self.pivot
    }

    pub fn history(&self) -> &[AffineOp] {
        &self.ops
    }
}

fn compose(
    pivot: &Pivot,
    op: &AffineOp,
    to_device: &Matrix4<f64>,
    to_model: &Matrix4<f64>,
) -> (Matrix4<f64>, Matrix4<f64>) {
    (
        pivot.around(&op.matrix()) * to_device,
        to_model * pivot.around(&op.inverse_matrix()),
    )
}

/// Both products for `ops` applied in order around `pivot`
fn products(pivot: &Pivot, ops: &[AffineOp]) -> (Matrix4<f64>, Matrix4<f64>) {
    ops.iter().fold(
        (pivot.from_origin, Matrix4::identity()),
        |(device, model), op| compose(pivot, op, &device, &model),
    )
}

fn ensure_finite_products(
    to_device: &Matrix4<f64>,
    to_model: &Matrix4<f64>,
) -> Result<(), DegenerateInput> {
    ensure_finite("transform chain", to_device.as_slice())?;
    ensure_finite("transform chain", to_model.as_slice())
}
