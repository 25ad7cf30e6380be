//! Hit records and the intersection trait shared by every primitive.

use glint_math::{Aabb, Ray, Vec3};

/// Index of a material in the scene's material table.
///
/// Index 0 is always the scene's default material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MaterialId(pub u32);

impl MaterialId {
    pub const DEFAULT: MaterialId = MaterialId(0);

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl From<usize> for MaterialId {
    fn from(index: usize) -> Self {
        MaterialId(index as u32)
    }
}

/// Record of a ray-surface intersection.
///
/// Only references its material by index; the scene owns the material.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitRecord {
    /// Ray parameter of the intersection
    pub t: f32,
    /// World-space point of intersection
    pub point: Vec3,
    /// Unit surface normal (geometric, not flipped toward the ray)
    pub normal: Vec3,
    pub material: MaterialId,
}

impl HitRecord {
    pub fn new(t: f32, point: Vec3, normal: Vec3, material: MaterialId) -> Self {
        Self {
            t,
            point,
            normal,
            material,
        }
    }

    /// Keep whichever of `current` and `candidate` is closer.
    ///
    /// Ties keep the current record, so `t` never increases.
    #[inline]
    pub fn closer(current: Option<HitRecord>, candidate: Option<HitRecord>) -> Option<HitRecord> {
        match (current, candidate) {
            (Some(cur), Some(cand)) if cand.t < cur.t => Some(cand),
            (None, cand) => cand,
            (cur, _) => cur,
        }
    }
}

/// Something a ray can be tested against.
pub trait Intersect: Send + Sync {
    /// Nearest intersection within `[ray.t_min, ray.t_max]`.
    fn intersect(&self, ray: &Ray) -> Option<HitRecord>;

    /// Occlusion-only test. Implementations may stop at the first hit and
    /// skip computing hit details.
    fn intersects(&self, ray: &Ray) -> bool {
        self.intersect(ray).is_some()
    }

    /// World-space bounds.
    fn bounding_box(&self) -> Aabb;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit_at(t: f32) -> Option<HitRecord> {
        Some(HitRecord::new(t, Vec3::ZERO, Vec3::Y, MaterialId::DEFAULT))
    }

    #[test]
    fn test_closer_keeps_smallest_t() {
        assert_eq!(HitRecord::closer(hit_at(3.0), hit_at(2.0)).map(|h| h.t), Some(2.0));
        assert_eq!(HitRecord::closer(hit_at(2.0), hit_at(3.0)).map(|h| h.t), Some(2.0));
        assert_eq!(HitRecord::closer(None, hit_at(5.0)).map(|h| h.t), Some(5.0));
        assert_eq!(HitRecord::closer(hit_at(5.0), None).map(|h| h.t), Some(5.0));
        assert_eq!(HitRecord::closer(None, None), None);
    }

    #[test]
    fn test_material_id_index() {
        assert_eq!(MaterialId::DEFAULT.index(), 0);
        assert_eq!(MaterialId::from(7usize), MaterialId(7));
    }
}
