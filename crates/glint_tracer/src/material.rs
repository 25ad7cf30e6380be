//! Surface materials.
//!
//! A material answers one question: how much light arriving from `light_dir`
//! leaves toward the viewer. The variants are a closed set, matched in
//! [`Material::shade`].

use crate::brdf;
use crate::hit::HitRecord;
use glint_math::Vec3;

/// Color type alias (linear RGB, channels may exceed 1)
pub type Color = Vec3;

/// Surface reflectance model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Material {
    /// Constant color, ignores lighting entirely
    SolidColor { color: Color },

    /// Ideal diffuse surface
    Lambert { albedo: Color, kd: f32 },

    /// Lambert diffuse plus a white Phong highlight
    LambertPhong {
        albedo: Color,
        kd: f32,
        ks: f32,
        exponent: f32,
    },

    /// Microfacet model: Fresnel-Schlick, GGX distribution, Smith geometry
    CookTorrance {
        albedo: Color,
        metal: bool,
        roughness: f32,
    },
}

impl Default for Material {
    /// Solid red, the fallback for unknown material ids.
    fn default() -> Self {
        Material::SolidColor {
            color: Color::new(1.0, 0.0, 0.0),
        }
    }
}

impl Material {
    pub fn solid_color(color: Color) -> Self {
        Material::SolidColor { color }
    }

    pub fn lambert(albedo: Color, kd: f32) -> Self {
        Material::Lambert { albedo, kd }
    }

    pub fn lambert_phong(albedo: Color, kd: f32, ks: f32, exponent: f32) -> Self {
        Material::LambertPhong {
            albedo,
            kd,
            ks,
            exponent,
        }
    }

    /// Cook-Torrance material. Roughness is clamped to `[0, 1]`.
    pub fn cook_torrance(albedo: Color, metal: bool, roughness: f32) -> Self {
        Material::CookTorrance {
            albedo,
            metal,
            roughness: roughness.clamp(0.0, 1.0),
        }
    }

    /// Reflected radiance fraction for one light.
    ///
    /// - `light_dir`: unit vector from the hit point toward the light
    /// - `view_dir`: unit direction of the camera ray that produced the hit
    ///
    /// Never negative; tone mapping is up to the caller.
    pub fn shade(&self, hit: &HitRecord, light_dir: Vec3, view_dir: Vec3) -> Color {
        match *self {
            Material::SolidColor { color } => color,
            Material::Lambert { albedo, kd } => brdf::lambert(kd, albedo),
            Material::LambertPhong {
                albedo,
                kd,
                ks,
                exponent,
            } => {
                brdf::lambert(kd, albedo) + brdf::phong(ks, exponent, light_dir, view_dir, hit.normal)
            }
            Material::CookTorrance {
                albedo,
                metal,
                roughness,
            } => cook_torrance(albedo, metal, roughness, hit.normal, light_dir, -view_dir),
        }
    }
}

fn cook_torrance(albedo: Color, metal: bool, roughness: f32, n: Vec3, l: Vec3, v: Vec3) -> Color {
    let f0 = if metal {
        albedo
    } else {
        Color::splat(brdf::DIELECTRIC_F0)
    };

    let h = (v + l).normalize_or_zero();
    let fresnel = brdf::fresnel_schlick(h, v, f0);

    let n_dot_v = n.dot(v);
    let n_dot_l = n.dot(l);
    let specular = if n_dot_v <= 0.0 || n_dot_l <= 0.0 || h == Vec3::ZERO {
        Color::ZERO
    } else {
        let d = brdf::normal_distribution_ggx(n, h, roughness);
        let g = brdf::geometry_smith(n, v, l, roughness);
        fresnel * (d * g / (4.0 * n_dot_v * n_dot_l))
    };

    let diffuse = if metal {
        Color::ZERO
    } else {
        brdf::lambert_rgb(Color::ONE - fresnel, albedo)
    };

    (diffuse + specular).max(Color::ZERO)
}
