use crate::{Interval, Ray, Vec3};

/// Axis-aligned bounding box used for mesh bounds and BVH nodes.
///
/// Stored as one [`Interval`] per axis. An empty box has inverted intervals and
/// is never hit.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub x: Interval,
    pub y: Interval,
    pub z: Interval,
}

impl Aabb {
    pub const EMPTY: Aabb = Aabb {
        x: Interval::EMPTY,
        y: Interval::EMPTY,
        z: Interval::EMPTY,
    };

    /// Padding applied to boxes around geometry so flat (zero-thickness)
    /// boxes still pass the slab test.
    pub const PADDING: f32 = 1e-4;

    pub fn new(x: Interval, y: Interval, z: Interval) -> Self {
        Self { x, y, z }
    }

    /// Box spanned by two corner points, in any order.
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        Self::from_corners(a.min(b), a.max(b))
    }

    fn from_corners(min: Vec3, max: Vec3) -> Self {
        Self {
            x: Interval::new(min.x, max.x),
            y: Interval::new(min.y, max.y),
            z: Interval::new(min.z, max.z),
        }
    }

    /// Tightest box around a set of points. Empty input gives [`Aabb::EMPTY`].
    pub fn enclosing<I>(points: I) -> Self
    where
        I: IntoIterator<Item = Vec3>,
    {
        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        for p in points {
            min = min.min(p);
            max = max.max(p);
        }
        Self::from_corners(min, max)
    }

    /// Grow every axis by `delta` on both sides.
    ///
    /// Uniform padding keeps containment: if `a` is inside `b`, then
    /// `a.padded(d)` is inside `b.padded(d)`.
    pub fn padded(&self, delta: f32) -> Self {
        if self.is_empty() {
            return *self;
        }
        Self {
            x: self.x.expand(2.0 * delta),
            y: self.y.expand(2.0 * delta),
            z: self.z.expand(2.0 * delta),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty() || self.y.is_empty() || self.z.is_empty()
    }

    /// Minimum corner.
    pub fn min(&self) -> Vec3 {
        Vec3::new(self.x.min, self.y.min, self.z.min)
    }

    /// Maximum corner.
    pub fn max(&self) -> Vec3 {
        Vec3::new(self.x.max, self.y.max, self.z.max)
    }

    /// Get the interval for a specific axis (0=X, 1=Y, 2=Z).
    pub fn axis_interval(&self, n: usize) -> Interval {
        match n {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    /// Slab test over the ray's own parameter range.
    pub fn hit(&self, ray: &Ray) -> bool {
        self.hit_interval(ray, ray.interval())
    }

    /// Slab test restricted to `ray_t`.
    ///
    /// Works for unnormalized directions; zero direction components produce
    /// infinite slab distances which the min/max folding absorbs.
    pub fn hit_interval(&self, ray: &Ray, mut ray_t: Interval) -> bool {
        for axis in 0..3 {
            let slab = self.axis_interval(axis);
            let adinv = 1.0 / ray.direction[axis];
            let mut t0 = (slab.min - ray.origin[axis]) * adinv;
            let mut t1 = (slab.max - ray.origin[axis]) * adinv;
            if adinv < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }
            ray_t.min = t0.max(ray_t.min);
            ray_t.max = t1.min(ray_t.max);
            if ray_t.max < ray_t.min {
                return false;
            }
        }
        true
    }

    /// True if `other` lies entirely inside this box.
    pub fn contains_box(&self, other: &Aabb) -> bool {
        other.is_empty()
            || (self.x.min <= other.x.min
                && other.x.max <= self.x.max
                && self.y.min <= other.y.min
                && other.y.max <= self.y.max
                && self.z.min <= other.z.min
                && other.z.max <= self.z.max)
    }

    /// Index (0=X, 1=Y, 2=Z) of the axis with the longest extent.
    pub fn longest_axis(&self) -> usize {
        let x_size = self.x.size();
        let y_size = self.y.size();
        let z_size = self.z.size();

        if x_size > y_size && x_size > z_size {
            0
        } else if y_size > z_size {
            1
        } else {
            2
        }
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::EMPTY
    }
}
