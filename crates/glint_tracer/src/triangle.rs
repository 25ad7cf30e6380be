//! Triangle primitive for ray tracing.
//!
//! Intersection solves `O + tD = v0 + u(v1 - v0) + v(v2 - v0)` with Cramer's
//! rule, written with cross and dot products (Möller-Trumbore).

use crate::hit::{HitRecord, Intersect, MaterialId};
use glint_math::{Aabb, Ray, Vec3};
use serde::{Deserialize, Serialize};

/// Tolerance on `dot(normal, -direction)` used by the cull test.
///
/// Also rejects rays grazing the triangle plane when culling is off.
pub const CULL_EPSILON: f32 = 0.001;

/// Below this the system determinant is treated as singular.
const DETERMINANT_EPSILON: f32 = 1e-12;

/// Which side of a triangle, if any, is ignored by intersection tests.
///
/// The front face is the side the normal points out of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CullMode {
    #[default]
    NoCulling,
    FrontFaceCulling,
    BackFaceCulling,
}

impl CullMode {
    /// True if a ray travelling along `direction` may hit a face with `normal`.
    #[inline]
    pub fn accepts(self, normal: Vec3, direction: Vec3) -> bool {
        let facing = normal.dot(-direction);
        match self {
            CullMode::FrontFaceCulling => facing <= -CULL_EPSILON,
            CullMode::BackFaceCulling => facing >= CULL_EPSILON,
            CullMode::NoCulling => facing.abs() >= CULL_EPSILON,
        }
    }
}

/// A single triangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub v0: Vec3,
    pub v1: Vec3,
    pub v2: Vec3,
    /// Unit face normal, zero for degenerate triangles
    pub normal: Vec3,
    pub cull_mode: CullMode,
    pub material: MaterialId,
}

impl Triangle {
    /// Create a triangle with counter-clockwise winding defining the normal.
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3, material: MaterialId) -> Self {
        let normal = face_normal(v0, v1, v2);
        Self::with_normal(v0, v1, v2, normal, material)
    }

    /// Create a triangle with a pre-computed normal.
    pub fn with_normal(v0: Vec3, v1: Vec3, v2: Vec3, normal: Vec3, material: MaterialId) -> Self {
        Self {
            v0,
            v1,
            v2,
            normal: normal.normalize_or_zero(),
            cull_mode: CullMode::default(),
            material,
        }
    }

    pub fn with_cull_mode(mut self, cull_mode: CullMode) -> Self {
        self.cull_mode = cull_mode;
        self
    }

    /// Same triangle with the winding (and therefore the normal) reversed.
    pub fn flipped(&self) -> Self {
        Self {
            v1: self.v2,
            v2: self.v1,
            normal: -self.normal,
            ..*self
        }
    }

    /// Solve for the hit parameter, or `None` if culled or outside.
    fn hit_distance(&self, ray: &Ray) -> Option<f32> {
        if !self.cull_mode.accepts(self.normal, ray.direction) {
            return None;
        }

        let b = ray.origin - self.v0;
        let e10 = self.v1 - self.v0;
        let e20 = self.v2 - self.v0;
        let neg_dir = -ray.direction;

        let cof_e = e10.cross(e20);
        let det = neg_dir.dot(cof_e);
        if det.abs() < DETERMINANT_EPSILON {
            return None;
        }
        let inv_det = 1.0 / det;

        let t = b.dot(cof_e) * inv_det;
        if !ray.interval().contains(t) {
            return None;
        }

        let u = neg_dir.dot(b.cross(e20)) * inv_det;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let v = neg_dir.dot(e10.cross(b)) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        Some(t)
    }
}

/// Unit normal of a counter-clockwise triangle, zero if it has no area.
pub fn face_normal(v0: Vec3, v1: Vec3, v2: Vec3) -> Vec3 {
    (v1 - v0).cross(v2 - v0).normalize_or_zero()
}

impl Intersect for Triangle {
    fn intersect(&self, ray: &Ray) -> Option<HitRecord> {
        let t = self.hit_distance(ray)?;
        Some(HitRecord::new(t, ray.at(t), self.normal, self.material))
    }

    fn intersects(&self, ray: &Ray) -> bool {
        self.hit_distance(ray).is_some()
    }

    fn bounding_box(&self) -> Aabb {
        Aabb::enclosing([self.v0, self.v1, self.v2]).padded(Aabb::PADDING)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Triangle in the XY plane at z = 1, normal pointing toward -Z (at the viewer).
    fn facing_viewer() -> Triangle {
        Triangle::new(
            Vec3::new(-1.0, -1.0, 1.0),
            Vec3::new(0.0, 1.0, 1.0),
            Vec3::new(1.0, -1.0, 1.0),
            MaterialId(2),
        )
    }

    fn toward_triangle() -> Ray {
        Ray::new(Vec3::ZERO, Vec3::Z)
    }

    #[test]
    fn test_triangle_hit() {
        let tri = facing_viewer();
        assert!((tri.normal - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-6);

        let rec = tri.intersect(&toward_triangle()).expect("ray should hit");
        assert!((rec.t - 1.0).abs() < 1e-5);
        assert!((rec.point - Vec3::new(0.0, 0.0, 1.0)).length() < 1e-5);
        assert_eq!(rec.material, MaterialId(2));
    }

    #[test]
    fn test_triangle_miss_outside() {
        let ray = Ray::new(Vec3::new(2.0, 0.0, 0.0), Vec3::Z);
        assert!(facing_viewer().intersect(&ray).is_none());

        let ray = Ray::new(Vec3::new(0.0, -1.5, 0.0), Vec3::Z);
        assert!(!facing_viewer().intersects(&ray));
    }

    #[test]
    fn test_triangle_behind_ray() {
        let ray = Ray::new(Vec3::ZERO, -Vec3::Z);
        assert!(facing_viewer().intersect(&ray).is_none());
    }

    #[test]
    fn test_no_culling_ignores_winding() {
        let tri = facing_viewer();
        let ray = toward_triangle();

        let front = tri.intersect(&ray).map(|h| h.t);
        let back = tri.flipped().intersect(&ray).map(|h| h.t);
        assert!(front.is_some());
        assert_eq!(front, back);
    }

    #[test]
    fn test_back_face_culling_flips_with_winding() {
        let tri = facing_viewer().with_cull_mode(CullMode::BackFaceCulling);
        let ray = toward_triangle();

        assert!(tri.intersects(&ray));
        assert!(!tri.flipped().intersects(&ray));
    }

    #[test]
    fn test_front_face_culling() {
        let tri = facing_viewer().with_cull_mode(CullMode::FrontFaceCulling);
        let ray = toward_triangle();

        assert!(!tri.intersects(&ray));
        assert!(tri.flipped().intersects(&ray));
    }

    #[test]
    fn test_grazing_ray_is_rejected() {
        let ray = Ray::new(Vec3::new(-5.0, 0.0, 1.0), Vec3::X);
        assert!(facing_viewer().intersect(&ray).is_none());
    }

    #[test]
    fn test_degenerate_triangle_never_hits() {
        let tri = Triangle::new(Vec3::ZERO, Vec3::X, Vec3::new(2.0, 0.0, 0.0), MaterialId::DEFAULT);
        assert_eq!(tri.normal, Vec3::ZERO);

        for mode in [CullMode::NoCulling, CullMode::BackFaceCulling, CullMode::FrontFaceCulling] {
            let tri = tri.with_cull_mode(mode);
            assert!(tri.intersect(&Ray::new(Vec3::new(0.5, 0.0, -1.0), Vec3::Z)).is_none());
        }
    }

    #[test]
    fn test_edge_hit_is_inclusive() {
        // Passes exactly through v0
        let ray = Ray::new(Vec3::new(-1.0, -1.0, 0.0), Vec3::Z);
        assert!(facing_viewer().intersects(&ray));
    }

    #[test]
    fn test_bounding_box_contains_vertices() {
        let tri = facing_viewer();
        let bbox = tri.bounding_box();
        for v in [tri.v0, tri.v1, tri.v2] {
            assert!(bbox.contains_box(&glint_math::Aabb::from_points(v, v)));
        }
    }
}
