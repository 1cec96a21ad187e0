/// WF3D Core Library - View transformations for a 3D wireframe editor
///
/// This library owns the forward and inverse transform chains between model
/// space and device space, the synthetic camera basis, orbit rotations and
/// the perspective divide, plus the STL loading and geometry types that feed
/// vertices into them.

pub mod basis;
pub mod config;
pub mod error;
pub mod geometry;
pub mod orbit;
pub mod projection;
pub mod stl;
pub mod transform;
pub mod view;

// Re-export commonly used types
pub use config::ViewConfig;
pub use error::{DegenerateInput, Result, ViewError};
pub use geometry::{batch_from_points, Mesh, Rgb, Triangle, VertexBatch};
pub use projection::Perspective;
pub use transform::AffineOp;
pub use view::ViewContext;
