//! Glint tracer - direct-lighting ray tracing core.
//!
//! Exact ray intersection for spheres, planes, triangles and BVH-accelerated
//! triangle meshes, a scene that dispatches rays over all of them, and a
//! single-bounce lighting integrator with hard shadows and Lambert, Phong and
//! Cook-Torrance reflectance.
//!
//! Presentation (windows, cameras, image output) is left to the caller: hand
//! the scene a [`Ray`] and get a [`HitRecord`] or a [`Color`] back.

pub mod brdf;
mod bvh;
mod hit;
mod integrator;
mod light;
mod material;
mod mesh;
mod plane;
mod scene;
mod sphere;
mod triangle;

pub use bvh::{Bvh, BvhNode, MAX_LEAF_TRIANGLES};
pub use hit::{HitRecord, Intersect, MaterialId};
pub use integrator::{color_to_rgba, max_to_one, LightingMode, ShadingConfig};
pub use light::{Light, LightKind, SHADOW_BIAS};
pub use material::{Color, Material};
pub use mesh::{compute_normals, MeshError, MeshResult, TriangleMesh};
pub use plane::Plane;
pub use scene::Scene;
pub use sphere::Sphere;
pub use triangle::{face_normal, CullMode, Triangle, CULL_EPSILON};

/// Re-export the math types from glint_math
pub use glint_math::{Aabb, Interval, Ray, Transformation, TransformError, TransformResult, Vec3};
