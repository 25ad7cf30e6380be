//! Direct lighting: shadow rays, lighting modes and batch tracing.

use crate::hit::HitRecord;
use crate::light::SHADOW_BIAS;
use crate::material::Color;
use crate::scene::Scene;
use glint_math::{Ray, Vec3};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which quantity [`Scene::shade`] accumulates over the visible lights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LightingMode {
    /// Sum of `max(0, N.L)` as grey
    ObservedArea,
    /// Incoming radiance, no cosine term
    Radiance,
    /// Material response only
    Brdf,
    /// BRDF times radiance times `N.L`
    #[default]
    Combined,
}

impl LightingMode {
    /// The next mode in display order, wrapping around.
    pub fn next(self) -> Self {
        match self {
            LightingMode::ObservedArea => LightingMode::Radiance,
            LightingMode::Radiance => LightingMode::Brdf,
            LightingMode::Brdf => LightingMode::Combined,
            LightingMode::Combined => LightingMode::ObservedArea,
        }
    }
}

impl fmt::Display for LightingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LightingMode::ObservedArea => "Observed Area",
            LightingMode::Radiance => "Radiance",
            LightingMode::Brdf => "BRDF",
            LightingMode::Combined => "Combined",
        };
        f.write_str(name)
    }
}

/// Shading configuration.
///
/// Missing fields take their defaults when deserialized.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadingConfig {
    /// Test shadow rays against the scene
    pub shadows_enabled: bool,
    pub lighting_mode: LightingMode,
    /// Start offset of shadow rays
    pub shadow_bias: f32,
    /// Color of rays that hit nothing
    pub background: Color,
}

impl Default for ShadingConfig {
    fn default() -> Self {
        Self {
            shadows_enabled: true,
            lighting_mode: LightingMode::Combined,
            shadow_bias: SHADOW_BIAS,
            background: Color::ZERO,
        }
    }
}

impl Scene {
    /// Outgoing color at `hit`, summed over every light that reaches it.
    ///
    /// `view_dir` is the direction of the ray that produced the hit.
    pub fn shade(&self, hit: &HitRecord, view_dir: Vec3, config: &ShadingConfig) -> Color {
        let material = self.material(hit.material);
        let mode = config.lighting_mode;

        self.lights().iter().fold(Color::ZERO, |color, light| {
            let light_dir = light.direction_to_light(hit.point);
            let cosine = hit.normal.dot(light_dir);

            let uses_cosine = matches!(mode, LightingMode::ObservedArea | LightingMode::Combined);
            if uses_cosine && cosine <= 0.0 {
                return color;
            }
            if config.shadows_enabled
                && self.any_hit(&light.shadow_ray(hit.point, config.shadow_bias))
            {
                return color;
            }

            color
                + match mode {
                    LightingMode::ObservedArea => Color::splat(cosine),
                    LightingMode::Radiance => light.radiance(hit.point),
                    LightingMode::Brdf => material.shade(hit, light_dir, view_dir),
                    LightingMode::Combined => {
                        material.shade(hit, light_dir, view_dir) * light.radiance(hit.point) * cosine
                    }
                }
        })
    }

    /// Color seen along `ray`, or `None` if it hits nothing.
    pub fn trace(&self, ray: &Ray, config: &ShadingConfig) -> Option<Color> {
        self.closest_hit(ray)
            .map(|hit| self.shade(&hit, ray.direction, config))
    }

    /// Trace independent rays in parallel. Misses take the background color.
    pub fn trace_batch(&self, rays: &[Ray], config: &ShadingConfig) -> Vec<Color> {
        rays.par_iter()
            .map(|ray| self.trace(ray, config).unwrap_or(config.background))
            .collect()
    }
}

/// Scale a color down so its largest channel is at most 1, keeping hue.
pub fn max_to_one(color: Color) -> Color {
    let max = color.max_element();
    if max > 1.0 {
        color / max
    } else {
        color
    }
}

/// Convert a linear color to 8-bit RGBA, clamping each channel to `[0, 1]`.
pub fn color_to_rgba(color: Color) -> [u8; 4] {
    let c = color.clamp(Color::ZERO, Color::ONE) * 255.0;
    [c.x.round() as u8, c.y.round() as u8, c.z.round() as u8, 255]
}
