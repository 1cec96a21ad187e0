/// Single-eye perspective divide
use tracing::debug;

use crate::error::{ensure_finite, DegenerateInput};
use crate::geometry::VertexBatch;

/// Smallest field of view the projection accepts
pub const MIN_FIELD_OF_VIEW: f64 = 1e-6;

/// Perspective strength `zf`.
///
/// x and y are scaled by `zf / (|z| + zf)`; depth is left alone so it stays
/// available to callers. Using `|z|` keeps points behind the reference plane
/// from flipping sign.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Perspective {
    zf: f64,
}

impl Perspective {
    pub fn new(zf: f64) -> Result<Self, DegenerateInput> {
        Self::check(zf)?;
        Ok(Self { zf })
    }

    fn check(zf: f64) -> Result<(), DegenerateInput> {
        ensure_finite("field of view", &[zf])?;
        if zf <= MIN_FIELD_OF_VIEW {
            return Err(DegenerateInput::FieldOfView { requested: zf });
        }
        Ok(())
    }

    pub fn field_of_view(&self) -> f64 {
        self.zf
    }

    /// Change `zf` by `delta`, refusing to collapse it to zero or below
    pub fn adjust(&mut self, delta: f64) -> Result<(), DegenerateInput> {
        ensure_finite("field of view change", &[delta])?;
        let zf = self.zf + delta;
        Self::check(zf)?;
        self.zf = zf;
        debug!(delta, zf, "adjusted field of view");
        Ok(())
    }

    /// Project every column of `batch` in place. Rows 2 and 3 are untouched.
    pub fn project(&self, batch: &mut VertexBatch) {
        for mut column in batch.column_iter_mut() {
            let factor = self.zf / (column[2].abs() + self.zf);
            column[0] *= factor;
            column[1] *= factor;
        }
    }
}
