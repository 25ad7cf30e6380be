//! Point and directional lights.

use crate::material::Color;
use glint_math::{Ray, Vec3};

/// Default start offset of shadow rays, keeps a surface from shadowing itself.
pub const SHADOW_BIAS: f32 = 0.01;

/// Squared distances below this make a point light coincide with the target.
const COINCIDENT_DISTANCE_SQUARED: f32 = 1e-12;

/// Where a light's rays come from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightKind {
    /// Emits in all directions from a position, falls off with distance squared
    Point { origin: Vec3 },
    /// Parallel rays travelling along `direction` (unit), no falloff
    Directional { direction: Vec3 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub kind: LightKind,
    pub color: Color,
    pub intensity: f32,
}

impl Light {
    pub fn point(origin: Vec3, color: Color, intensity: f32) -> Self {
        Self {
            kind: LightKind::Point { origin },
            color,
            intensity,
        }
    }

    /// Directional light shining along `direction`. A zero direction yields a
    /// light that never illuminates anything.
    pub fn directional(direction: Vec3, color: Color, intensity: f32) -> Self {
        Self {
            kind: LightKind::Directional {
                direction: direction.normalize_or_zero(),
            },
            color,
            intensity,
        }
    }

    /// Unit vector from `target` toward the light.
    pub fn direction_to_light(&self, target: Vec3) -> Vec3 {
        match self.kind {
            LightKind::Point { origin } => (origin - target).normalize_or_zero(),
            LightKind::Directional { direction } => -direction,
        }
    }

    /// Distance from `target` to the light, infinite for directional lights.
    pub fn distance(&self, target: Vec3) -> f32 {
        match self.kind {
            LightKind::Point { origin } => origin.distance(target),
            LightKind::Directional { .. } => f32::INFINITY,
        }
    }

    /// Radiance arriving at `target`, ignoring occlusion.
    pub fn radiance(&self, target: Vec3) -> Color {
        match self.kind {
            LightKind::Point { origin } => {
                let distance_squared = origin.distance_squared(target);
                if distance_squared < COINCIDENT_DISTANCE_SQUARED {
                    return Color::ZERO;
                }
                self.color * self.intensity / distance_squared
            }
            LightKind::Directional { .. } => self.color * self.intensity,
        }
    }

    /// Ray from `point` toward the light covering `[bias, distance]`.
    ///
    /// Any hit on this ray means the light is occluded.
    pub fn shadow_ray(&self, point: Vec3, bias: f32) -> Ray {
        Ray::with_range(
            point,
            self.direction_to_light(point),
            bias,
            self.distance(point),
        )
    }
}
