//! GCS-Lite Geometry
//!
//! Transform models relating a local coordinate system to its base, using
//! nalgebra for the matrix work.

pub mod error;
pub mod local_transform;
pub mod transform;

// Re-export nalgebra types for convenience
pub use nalgebra::{Matrix3x4, Matrix4, Point3};

pub use error::{Error, Result};
pub use local_transform::LocalTransform;
pub use transform::{eq_eps, eq_one_eps, TransfoMatrix, TransfoModel, EQ_EPSILON};
