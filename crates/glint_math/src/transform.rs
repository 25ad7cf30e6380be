// Affine transforms with a cached inverse.
//
// Meshes keep their authored positions and move rays into object space, so
// every transform carries its inverse alongside. The inverses are built
// analytically per primitive transform instead of calling Mat4::inverse.

use glam::{Mat4, Vec3};
use thiserror::Error;

use crate::Ray;

/// Errors raised while building a transform.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransformError {
    #[error("scale factor on the {axis} axis is zero, the transform has no inverse")]
    ZeroScale { axis: char },

    #[error("scale factor on the {axis} axis is not finite: {value}")]
    NonFiniteScale { axis: char, value: f32 },
}

pub type TransformResult<T> = Result<T, TransformError>;

/// A forward matrix together with its inverse.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transformation {
    matrix: Mat4,
    inverse: Mat4,
}

impl Default for Transformation {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transformation {
    pub const IDENTITY: Transformation = Transformation {
        matrix: Mat4::IDENTITY,
        inverse: Mat4::IDENTITY,
    };

    fn from_parts(matrix: Mat4, inverse: Mat4) -> Self {
        Self { matrix, inverse }
    }

    pub fn translate(offset: Vec3) -> Self {
        Self::from_parts(Mat4::from_translation(offset), Mat4::from_translation(-offset))
    }

    /// Per-axis scale. Fails if any factor is zero or not finite.
    pub fn scale(factors: Vec3) -> TransformResult<Self> {
        for (axis, value) in ['x', 'y', 'z'].into_iter().zip(factors.to_array()) {
            if !value.is_finite() {
                return Err(TransformError::NonFiniteScale { axis, value });
            }
            if value == 0.0 {
                return Err(TransformError::ZeroScale { axis });
            }
        }
        Ok(Self::from_parts(
            Mat4::from_scale(factors),
            Mat4::from_scale(factors.recip()),
        ))
    }

    pub fn uniform_scale(factor: f32) -> TransformResult<Self> {
        Self::scale(Vec3::splat(factor))
    }

    /// Rotation around X by `angle` radians.
    pub fn rotate_x(angle: f32) -> Self {
        Self::rotation(Mat4::from_rotation_x(angle))
    }

    /// Rotation around Y by `angle` radians.
    pub fn rotate_y(angle: f32) -> Self {
        Self::rotation(Mat4::from_rotation_y(angle))
    }

    /// Rotation around Z by `angle` radians.
    pub fn rotate_z(angle: f32) -> Self {
        Self::rotation(Mat4::from_rotation_z(angle))
    }

    // Pure rotations are orthonormal: the inverse is the transpose.
    fn rotation(matrix: Mat4) -> Self {
        Self::from_parts(matrix, matrix.transpose())
    }

    /// Compose: the result applies `self` first, then `next`.
    ///
    /// `scale.append(&rotation).append(&translation)` scales, then rotates,
    /// then translates.
    pub fn append(&self, next: &Transformation) -> Transformation {
        Self::from_parts(next.matrix * self.matrix, self.inverse * next.inverse)
    }

    /// The inverse transformation (swaps the matrices).
    pub fn inverted(&self) -> Transformation {
        Self::from_parts(self.inverse, self.matrix)
    }

    pub fn matrix(&self) -> Mat4 {
        self.matrix
    }

    pub fn inverse_matrix(&self) -> Mat4 {
        self.inverse
    }

    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        self.matrix.transform_point3(p)
    }

    /// Transform a direction; translation does not apply.
    pub fn transform_vector(&self, v: Vec3) -> Vec3 {
        self.matrix.transform_vector3(v)
    }

    /// Transform a surface normal with the inverse transpose and renormalize.
    ///
    /// Returns zero for a zero normal.
    pub fn transform_normal(&self, n: Vec3) -> Vec3 {
        self.inverse
            .transpose()
            .transform_vector3(n)
            .normalize_or_zero()
    }

    pub fn inverse_transform_point(&self, p: Vec3) -> Vec3 {
        self.inverse.transform_point3(p)
    }

    pub fn inverse_transform_vector(&self, v: Vec3) -> Vec3 {
        self.inverse.transform_vector3(v)
    }

    /// Map a world-space ray into object space.
    ///
    /// The direction is not renormalized, so a parameter `t` names the same
    /// point in both spaces and the ray range carries over unchanged.
    pub fn inverse_transform_ray(&self, ray: &Ray) -> Ray {
        Ray::unnormalized(
            self.inverse_transform_point(ray.origin),
            self.inverse_transform_vector(ray.direction),
            ray.t_min,
            ray.t_max,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn assert_close(a: Vec3, b: Vec3) {
        assert!((a - b).length() < 1e-4, "{a:?} != {b:?}");
    }

    #[test]
    fn test_translate_point_and_vector() {
        let t = Transformation::translate(Vec3::new(10.0, 20.0, 30.0));

        assert_eq!(t.transform_point(Vec3::new(1.0, 2.0, 3.0)), Vec3::new(11.0, 22.0, 33.0));
        // Translation should NOT affect vectors
        assert_eq!(t.transform_vector(Vec3::X), Vec3::X);
    }

    #[test]
    fn test_rotate_y_inverse_is_transpose() {
        let r = Transformation::rotate_y(PI / 4.0);
        let product = r.matrix() * r.inverse_matrix();
        assert!(product.abs_diff_eq(Mat4::IDENTITY, 1e-5));
    }

    #[test]
    fn test_rotate_z_quarter_turn() {
        let r = Transformation::rotate_z(PI / 2.0);
        assert_close(r.transform_vector(Vec3::X), Vec3::Y);
    }

    #[test]
    fn test_zero_scale_is_rejected() {
        let err = Transformation::scale(Vec3::new(1.0, 0.0, 1.0)).unwrap_err();
        assert_eq!(err, TransformError::ZeroScale { axis: 'y' });

        assert!(matches!(
            Transformation::uniform_scale(f32::NAN),
            Err(TransformError::NonFiniteScale { axis: 'x', .. })
        ));
    }

    #[test]
    fn test_append_order_scale_then_rotate_then_translate() {
        let s = Transformation::uniform_scale(2.0).unwrap();
        let r = Transformation::rotate_z(PI / 2.0);
        let t = Transformation::translate(Vec3::new(0.0, 0.0, 5.0));
        let composed = s.append(&r).append(&t);

        // (1,0,0) -> scale (2,0,0) -> rotate (0,2,0) -> translate (0,2,5)
        assert_close(composed.transform_point(Vec3::X), Vec3::new(0.0, 2.0, 5.0));
    }

    #[test]
    fn test_append_round_trip() {
        let composed = Transformation::scale(Vec3::new(0.5, 2.0, 3.0))
            .unwrap()
            .append(&Transformation::rotate_x(0.7))
            .append(&Transformation::rotate_y(-1.3))
            .append(&Transformation::translate(Vec3::new(-4.0, 1.5, 9.0)));

        for p in [Vec3::ZERO, Vec3::new(1.0, -2.0, 3.0), Vec3::new(-7.5, 0.25, 100.0)] {
            assert_close(composed.inverse_transform_point(composed.transform_point(p)), p);
            assert_close(composed.inverse_transform_vector(composed.transform_vector(p)), p);
        }
        assert!((composed.matrix() * composed.inverse_matrix()).abs_diff_eq(Mat4::IDENTITY, 1e-4));
    }

    #[test]
    fn test_append_inverted_is_identity() {
        let composed = Transformation::uniform_scale(1.5)
            .unwrap()
            .append(&Transformation::rotate_y(0.4))
            .append(&Transformation::translate(Vec3::new(2.0, -1.0, 0.5)));
        let undone = composed.append(&composed.inverted());

        assert!(undone.matrix().abs_diff_eq(Mat4::IDENTITY, 1e-5));
        assert!(undone.inverse_matrix().abs_diff_eq(Mat4::IDENTITY, 1e-5));
        for p in [Vec3::new(1.0, 2.0, 3.0), Vec3::new(-0.5, 4.0, -2.0)] {
            assert_close(undone.transform_point(p), p);
            assert_close(composed.inverted().transform_point(composed.transform_point(p)), p);
        }
    }

    #[test]
    fn test_inverse_transform_ray_preserves_parameter() {
        let transform = Transformation::uniform_scale(2.0)
            .unwrap()
            .append(&Transformation::translate(Vec3::new(0.0, 3.0, 0.0)));
        let world = Ray::new(Vec3::new(1.0, 0.0, -4.0), Vec3::new(0.0, 0.5, 1.0));
        let local = transform.inverse_transform_ray(&world);

        for t in [0.0, 1.0, 7.5] {
            assert_close(transform.transform_point(local.at(t)), world.at(t));
        }
        assert_eq!(local.t_min, world.t_min);
    }

    #[test]
    fn test_transform_normal_non_uniform_scale() {
        // Normal of the plane x + y = 0 must stay perpendicular after stretching x.
        let s = Transformation::scale(Vec3::new(4.0, 1.0, 1.0)).unwrap();
        let tangent = s.transform_vector(Vec3::new(1.0, -1.0, 0.0));
        let normal = s.transform_normal(Vec3::new(1.0, 1.0, 0.0).normalize());

        assert!(tangent.dot(normal).abs() < 1e-5);
        assert!((normal.length() - 1.0).abs() < 1e-5);
        assert_eq!(s.transform_normal(Vec3::ZERO), Vec3::ZERO);
    }
}
