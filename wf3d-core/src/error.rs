/// Error types for view transformations
use nalgebra::Point3;
use thiserror::Error;

/// Inputs that would drive the transform pipeline into NaN or infinity
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum DegenerateInput {
    #[error("scale factors must be non-zero (got {x}, {y})")]
    ZeroScale { x: f64, y: f64 },

    #[error("field of view must stay positive (requested {requested})")]
    FieldOfView { requested: f64 },

    #[error("reference point {reference} lies on the up axis, camera basis is undefined")]
    BasisAxis { reference: Point3<f64> },

    #[error("reference point {reference} has no horizontal component, no vertical orbit axis")]
    OrbitAxis { reference: Point3<f64> },

    #[error("{what} must be finite")]
    NonFinite { what: &'static str },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ViewError {
    #[error("degenerate input: {0}")]
    Degenerate(#[from] DegenerateInput),

    #[error("no transformation to undo")]
    EmptyHistory,
}

impl ViewError {
    pub fn is_degenerate(&self) -> bool {
        matches!(self, ViewError::Degenerate(_))
    }
}

pub type Result<T> = std::result::Result<T, ViewError>;

pub(crate) fn ensure_finite(
    what: &'static str,
    values: &[f64],
) -> std::result::Result<(), DegenerateInput> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(DegenerateInput::NonFinite { what })
    }
}
