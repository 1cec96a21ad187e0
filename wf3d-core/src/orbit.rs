/// Horizontal and vertical orbit rotations around the viewed object
use nalgebra::{Matrix4, Point3, Vector3};
use tracing::debug;

use crate::basis::{cross, normalize, WORLD_UP};
use crate::error::{ensure_finite, DegenerateInput};

/// Rotation about the world y axis by `angle` radians
pub fn horizontal_orbit(angle: f64) -> Matrix4<f64> {
    let (s, c) = angle.sin_cos();
    let mut m = Matrix4::identity();
    m[(0, 0)] = c;
    m[(0, 2)] = s;
    m[(2, 0)] = -s;
    m[(2, 2)] = c;
    m
}

/// Axis for the vertical orbit: the reference point projected onto the
/// XZ plane, crossed with world up.
pub fn vertical_orbit_axis(reference: &Point3<f64>) -> Result<Vector3<f64>, DegenerateInput> {
    let horizontal = Vector3::new(reference.x, 0.0, reference.z);
    normalize(&cross(&horizontal, &WORLD_UP)).ok_or(DegenerateInput::OrbitAxis {
        reference: *reference,
    })
}

/// Rotation by `angle` radians about the vertical orbit axis of `reference`.
///
/// The axis always lies in the XZ plane, so a rotation about y carries it
/// onto +z. The result is `from_z · rotate_z · to_z` where `from_z` is the
/// transpose of `to_z`.
pub fn vertical_orbit(
    angle: f64,
    reference: &Point3<f64>,
) -> Result<Matrix4<f64>, DegenerateInput> {
    let axis = vertical_orbit_axis(reference)?;
    let (c, s) = (axis.z, axis.x);

    let mut to_z = Matrix4::identity();
    to_z[(0, 0)] = c;
    to_z[(0, 2)] = -s;
    to_z[(2, 0)] = s;
    to_z[(2, 2)] = c;
    let from_z = to_z.transpose();

    let (sin, cos) = angle.sin_cos();
    let mut rotate_z = Matrix4::identity();
    rotate_z[(0, 0)] = cos;
    rotate_z[(0, 1)] = -sin;
    rotate_z[(1, 0)] = sin;
    rotate_z[(1, 1)] = cos;

    Ok(from_z * rotate_z * to_z)
}

/// Accumulated orbit angles and the rotations rebuilt from them.
///
/// Each call adds a relative delta to the running angle and then replaces
/// the matrix wholesale, so repeated small steps never compound rounding.
#[derive(Debug, Clone, PartialEq)]
pub struct Orbit {
    horizontal: f64,
    vertical: f64,
    h_matrix: Matrix4<f64>,
    v_matrix: Matrix4<f64>,
}

impl Orbit {
    pub fn new() -> Self {
        Self {
            horizontal: 0.0,
            vertical: 0.0,
            h_matrix: Matrix4::identity(),
            v_matrix: Matrix4::identity(),
        }
    }

    pub fn rotate_horizontal(&mut self, degrees: f64) -> Result<(), DegenerateInput> {
        let total = accumulate(self.horizontal, degrees)?;
        self.h_matrix = horizontal_orbit(total);
        self.horizontal = total;
        debug!(degrees, total, "horizontal orbit");
        Ok(())
    }

    /// Leaves the angle untouched when the axis is degenerate.
    pub fn rotate_vertical(
        &mut self,
        degrees: f64,
        reference: &Point3<f64>,
    ) -> Result<(), DegenerateInput> {
        let total = accumulate(self.vertical, degrees)?;
        self.v_matrix = vertical_orbit(total, reference)?;
        self.vertical = total;
        debug!(degrees, total, "vertical orbit");
        Ok(())
    }

    /// Back to identity rotations; the accumulated angles are kept.
    pub fn reset_matrices(&mut self) {
        self.h_matrix = Matrix4::identity();
        self.v_matrix = Matrix4::identity();
    }

    /// (horizontal, vertical) in radians
    pub fn angles(&self) -> (f64, f64) {
        (self.horizontal, self.vertical)
    }

    pub fn h_matrix(&self) -> &Matrix4<f64> {
        &self.h_matrix
    }

    pub fn v_matrix(&self) -> &Matrix4<f64> {
        &self.v_matrix
    }
}

/// New running total in radians, refusing to overflow
fn accumulate(total: f64, degrees: f64) -> Result<f64, DegenerateInput> {
    ensure_finite("orbit angle", &[degrees])?;
    let next = total + degrees.to_radians();
    ensure_finite("accumulated orbit angle", &[next])?;
    Ok(next)
}

impl Default for Orbit {
    fn default() -> Self {
        Self::new()
    }
}
