use crate::{Interval, Vec3};

/// Default lower bound for ray parameters, keeps secondary rays off their
/// own surface.
pub const DEFAULT_T_MIN: f32 = 1e-4;

/// A ray with a valid parametric range `[t_min, t_max]`.
///
/// The direction is normalized on construction. A zero direction stays zero,
/// which every intersection routine treats as a miss.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
    pub t_min: f32,
    pub t_max: f32,
}

impl Ray {
    /// Create a ray covering `[DEFAULT_T_MIN, +inf]`.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self::with_range(origin, direction, DEFAULT_T_MIN, f32::INFINITY)
    }

    /// Create a ray with an explicit parameter range.
    pub fn with_range(origin: Vec3, direction: Vec3, t_min: f32, t_max: f32) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
            t_min,
            t_max,
        }
    }

    /// Build a ray without touching the direction.
    ///
    /// Used for object-space rays, whose direction carries the inverse scale of
    /// the transform so that `t` keeps its world-space meaning.
    pub fn unnormalized(origin: Vec3, direction: Vec3, t_min: f32, t_max: f32) -> Self {
        Self {
            origin,
            direction,
            t_min,
            t_max,
        }
    }

    /// Point along the ray at parameter t.
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// The valid parameter range as an [`Interval`].
    #[inline]
    pub fn interval(&self) -> Interval {
        Interval::new(self.t_min, self.t_max)
    }

    /// Same ray with `t_max` lowered to `t` if that is tighter.
    #[inline]
    pub fn clipped(&self, t: f32) -> Ray {
        Ray {
            t_max: self.t_max.min(t),
            ..*self
        }
    }

    /// True when the direction has no length.
    pub fn is_degenerate(&self) -> bool {
        self.direction.length_squared() < f32::EPSILON
    }
}

impl Default for Ray {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Vec3::Z)
    }
}
