/// Synthetic camera basis derived from the reference (eye) point
use nalgebra::{Matrix4, Point3, Vector3};

use crate::error::DegenerateInput;

/// World up vector V used to derive the camera frame
pub const WORLD_UP: Vector3<f64> = Vector3::new(0.0, 1.0, 0.0);

/// Lengths below this are treated as zero when normalizing
pub const DEGENERATE_LENGTH: f64 = 1e-12;

pub fn dot(a: &Vector3<f64>, b: &Vector3<f64>) -> f64 {
    a.dot(b)
}

pub fn cross(a: &Vector3<f64>, b: &Vector3<f64>) -> Vector3<f64> {
    a.cross(b)
}

pub fn magnitude(a: &Vector3<f64>) -> f64 {
    a.norm()
}

/// Unit vector along `a`, or `None` when `a` has (near) zero length
pub fn normalize(a: &Vector3<f64>) -> Option<Vector3<f64>> {
    let len = magnitude(a);
    if len.is_finite() && len > DEGENERATE_LENGTH {
        Some(a / len)
    } else {
        None
    }
}

/// Orthonormal (left, up, forward) frame centered on the reference point.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraBasis {
    reference: Point3<f64>,
    look_at: Point3<f64>,
    left: Vector3<f64>,
    up: Vector3<f64>,
    forward: Vector3<f64>,
    matrix: Matrix4<f64>,
}

impl CameraBasis {
    /// Build the look-at basis for eye point `p0`.
    ///
    /// N = p0 normalized, L = V × N normalized, M = N × L. The matrix rows
    /// are L, M, N and (0, 0, 0, 1) with translation column -(axis · p0).
    /// Fails when p0 lies on the up axis (V × N vanishes).
    pub fn new(reference: Point3<f64>) -> Result<Self, DegenerateInput> {
        let p0 = reference.coords;
        let degenerate = DegenerateInput::BasisAxis { reference };

        let forward = normalize(&p0).ok_or(degenerate)?;
        let left = normalize(&cross(&WORLD_UP, &p0)).ok_or(degenerate)?;
        let up = cross(&forward, &left);

        let mut matrix = Matrix4::identity();
        for (row, axis) in [left, up, forward].iter().enumerate() {
            matrix[(row, 0)] = axis.x;
            matrix[(row, 1)] = axis.y;
            matrix[(row, 2)] = axis.z;
            matrix[(row, 3)] = -dot(axis, &p0);
        }

        Ok(Self {
            reference,
            look_at: Point3::origin(),
            left,
            up,
            forward,
            matrix,
        })
    }

    pub fn reference(&self) -> Point3<f64> {
        self.reference
    }

    pub fn look_at(&self) -> Point3<f64> {
        self.look_at
    }

    pub fn left(&self) -> Vector3<f64> {
        self.left
    }

    pub fn up(&self) -> Vector3<f64> {
        self.up
    }

    pub fn forward(&self) -> Vector3<f64> {
        self.forward
    }

    pub fn matrix(&self) -> &Matrix4<f64> {
        &self.matrix
    }
}
