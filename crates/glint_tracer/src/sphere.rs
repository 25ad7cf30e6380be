//! Sphere primitive for ray tracing.

use crate::hit::{HitRecord, Intersect, MaterialId};
use glint_math::{Aabb, Ray, Vec3};

/// A sphere primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
    pub material: MaterialId,
}

impl Sphere {
    /// Create a new sphere. Negative radii are clamped to zero, which makes the
    /// sphere a point that rays effectively never hit.
    pub fn new(center: Vec3, radius: f32, material: MaterialId) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
            material,
        }
    }

    /// Smallest root of `|O + tD - C|^2 = r^2` inside the ray range.
    fn nearest_root(&self, ray: &Ray) -> Option<f32> {
        let a = ray.direction.length_squared();
        if a < f32::EPSILON {
            return None;
        }

        let oc = self.center - ray.origin;
        let h = ray.direction.dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return None;
        }
        let sqrtd = discriminant.sqrt();

        let range = ray.interval();
        let near = (h - sqrtd) / a;
        if range.contains(near) {
            return Some(near);
        }
        let far = (h + sqrtd) / a;
        range.contains(far).then_some(far)
    }
}

impl Intersect for Sphere {
    fn intersect(&self, ray: &Ray) -> Option<HitRecord> {
        let t = self.nearest_root(ray)?;
        let point = ray.at(t);
        let normal = ((point - self.center) / self.radius).normalize_or_zero();
        Some(HitRecord::new(t, point, normal, self.material))
    }

    fn intersects(&self, ray: &Ray) -> bool {
        self.nearest_root(ray).is_some()
    }

    fn bounding_box(&self) -> Aabb {
        let rvec = Vec3::splat(self.radius);
        Aabb::from_points(self.center - rvec, self.center + rvec)
    }
}
