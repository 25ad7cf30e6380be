//! Reflectance building blocks.
//!
//! All inputs are unit vectors. `l` points from the surface toward the light,
//! `v` from the surface toward the viewer, `n` is the surface normal and `h`
//! the normalized half vector between `l` and `v`.

use crate::material::Color;
use glint_math::Vec3;
use std::f32::consts::PI;

/// Schlick-GGX terms with a denominator below this are treated as fully
/// occluded.
pub const GEOMETRY_EPSILON: f32 = 0.01;

/// Base reflectivity used for every non-metal.
pub const DIELECTRIC_F0: f32 = 0.04;

/// Lambert diffuse: `cd * kd / pi`.
#[inline]
pub fn lambert(kd: f32, cd: Color) -> Color {
    cd * kd / PI
}

/// Lambert diffuse with a per-channel coefficient.
#[inline]
pub fn lambert_rgb(kd: Color, cd: Color) -> Color {
    cd * kd / PI
}

/// Phong specular lobe.
///
/// `view_dir` is the incoming camera direction (eye toward surface), so the
/// mirrored light direction is compared against `-view_dir`.
pub fn phong(ks: f32, exponent: f32, l: Vec3, view_dir: Vec3, n: Vec3) -> Color {
    let reflected = reflect(-l, n);
    let cosine = reflected.dot(-view_dir).max(0.0);
    Color::splat(ks * cosine.powf(exponent))
}

/// Fresnel term, Schlick's approximation.
pub fn fresnel_schlick(h: Vec3, v: Vec3, f0: Color) -> Color {
    let cosine = h.dot(v).clamp(0.0, 1.0);
    f0 + (Color::ONE - f0) * (1.0 - cosine).powi(5)
}

/// Trowbridge-Reitz GGX normal distribution, with `alpha = roughness^2`.
pub fn normal_distribution_ggx(n: Vec3, h: Vec3, roughness: f32) -> f32 {
    let alpha = roughness * roughness;
    let alpha2 = alpha * alpha;
    let n_dot_h2 = n.dot(h).clamp(0.0, 1.0).powi(2);
    // (N.H)^2 (alpha^2 - 1) + 1, arranged to stay exact at the peak
    let denom = (1.0 - n_dot_h2) + n_dot_h2 * alpha2;
    let denom = PI * denom * denom;
    // Only a perfect mirror (alpha = 0) at the peak reaches zero here
    if denom <= 0.0 || !denom.is_finite() {
        return 0.0;
    }
    alpha2 / denom
}

/// Schlick-GGX occlusion for a single direction, `k = (alpha + 1)^2 / 8`.
pub fn geometry_schlick_ggx(n: Vec3, v: Vec3, roughness: f32) -> f32 {
    let alpha = roughness * roughness;
    let k = (alpha + 1.0) * (alpha + 1.0) / 8.0;
    let n_dot_v = n.dot(v);
    let denom = n_dot_v * (1.0 - k) + k;
    if denom < GEOMETRY_EPSILON {
        return 0.0;
    }
    n_dot_v / denom
}

/// Smith masking-shadowing: product of the view and light Schlick-GGX terms.
pub fn geometry_smith(n: Vec3, v: Vec3, l: Vec3, roughness: f32) -> f32 {
    (geometry_schlick_ggx(n, v, roughness) * geometry_schlick_ggx(n, l, roughness)).max(0.0)
}

/// Mirror `v` about `n`.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}
