//! Infinite plane primitive.

use crate::hit::{HitRecord, Intersect, MaterialId};
use glint_math::{Aabb, Interval, Ray, Vec3};

/// An infinite plane through `origin` with unit `normal`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub origin: Vec3,
    pub normal: Vec3,
    pub material: MaterialId,
}

impl Plane {
    /// Create a plane. The normal is normalized; a zero normal gives a plane
    /// that nothing hits.
    pub fn new(origin: Vec3, normal: Vec3, material: MaterialId) -> Self {
        Self {
            origin,
            normal: normal.normalize_or_zero(),
            material,
        }
    }

    fn hit_distance(&self, ray: &Ray) -> Option<f32> {
        let denom = ray.direction.dot(self.normal);
        // Parallel (or degenerate) rays never hit
        if denom.abs() < f32::EPSILON {
            return None;
        }
        let t = (self.origin - ray.origin).dot(self.normal) / denom;
        ray.interval().surrounds(t).then_some(t)
    }
}

impl Intersect for Plane {
    fn intersect(&self, ray: &Ray) -> Option<HitRecord> {
        let t = self.hit_distance(ray)?;
        Some(HitRecord::new(t, ray.at(t), self.normal, self.material))
    }

    fn intersects(&self, ray: &Ray) -> bool {
        self.hit_distance(ray).is_some()
    }

    /// Planes are unbounded.
    fn bounding_box(&self) -> Aabb {
        Aabb::new(Interval::UNIVERSE, Interval::UNIVERSE, Interval::UNIVERSE)
    }
}
