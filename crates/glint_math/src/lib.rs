//! Glint math - rays, intervals, bounding boxes and transforms.
//!
//! Thin layer over `glam`: the vector and matrix types come straight from glam,
//! this crate adds the ray tracing specific pieces on top.

// Re-export glam for convenience
pub use glam::*;

mod aabb;
mod interval;
mod ray;
mod transform;

pub use aabb::Aabb;
pub use interval::Interval;
pub use ray::{Ray, DEFAULT_T_MIN};
pub use transform::{Transformation, TransformError, TransformResult};
