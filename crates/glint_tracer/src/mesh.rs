//! Triangle meshes with per-frame transforms and a BVH.
//!
//! A mesh keeps its authored positions and normals untouched. Transforms are
//! staged with the `set_*` methods and applied by [`TriangleMesh::commit_transforms`],
//! which rebuilds the world-space copies and bounds. The BVH is built once over
//! the authored positions and survives every transform change; queries move the
//! ray into object space for the box tests instead.

use crate::bvh::Bvh;
use crate::hit::{HitRecord, Intersect, MaterialId};
use crate::triangle::{CullMode, Triangle};
use glint_math::{Aabb, Ray, Transformation, TransformResult, Vec3};
use thiserror::Error;

/// Errors in authored mesh data, reported at construction time.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeshError {
    #[error("index buffer has {0} entries, expected a multiple of 3")]
    IndexCount(usize),

    #[error("triangle {triangle} references vertex {index}, but the mesh has {vertex_count} vertices")]
    IndexOutOfRange {
        triangle: usize,
        index: u32,
        vertex_count: usize,
    },

    #[error("expected one normal per triangle ({expected}), got {actual}")]
    NormalCount { expected: usize, actual: usize },
}

pub type MeshResult<T> = Result<T, MeshError>;

/// An indexed triangle mesh.
#[derive(Debug, Clone)]
pub struct TriangleMesh {
    positions: Vec<Vec3>,
    /// One unit normal per triangle, zero for degenerate triangles
    normals: Vec<Vec3>,
    indices: Vec<u32>,
    material: MaterialId,
    cull_mode: CullMode,

    scale: Transformation,
    rotation: Transformation,
    translation: Transformation,

    // Snapshot produced by commit_transforms()
    transform: Transformation,
    transformed_positions: Vec<Vec3>,
    transformed_normals: Vec<Vec3>,
    bounds: Aabb,

    bvh: Bvh,
}

impl TriangleMesh {
    /// Build a mesh, computing face normals from the winding.
    pub fn new(
        positions: Vec<Vec3>,
        indices: Vec<u32>,
        material: MaterialId,
        cull_mode: CullMode,
    ) -> MeshResult<Self> {
        validate_indices(&positions, &indices)?;
        let normals = compute_normals(&positions, &indices);
        Ok(Self::assemble(positions, normals, indices, material, cull_mode))
    }

    /// Build a mesh from parsed data that already carries per-triangle normals.
    pub fn with_normals(
        positions: Vec<Vec3>,
        indices: Vec<u32>,
        normals: Vec<Vec3>,
        material: MaterialId,
        cull_mode: CullMode,
    ) -> MeshResult<Self> {
        validate_indices(&positions, &indices)?;
        let expected = indices.len() / 3;
        if normals.len() != expected {
            return Err(MeshError::NormalCount {
                expected,
                actual: normals.len(),
            });
        }
        let normals = sanitize_normals(normals);
        Ok(Self::assemble(positions, normals, indices, material, cull_mode))
    }

    /// A mesh with no triangles, to be filled with [`TriangleMesh::append_triangle`].
    pub fn empty(material: MaterialId, cull_mode: CullMode) -> Self {
        Self::assemble(Vec::new(), Vec::new(), Vec::new(), material, cull_mode)
    }

    fn assemble(
        positions: Vec<Vec3>,
        normals: Vec<Vec3>,
        indices: Vec<u32>,
        material: MaterialId,
        cull_mode: CullMode,
    ) -> Self {
        let bvh = Bvh::build(&positions, &indices);
        let mut mesh = Self {
            positions,
            normals,
            indices,
            material,
            cull_mode,
            scale: Transformation::IDENTITY,
            rotation: Transformation::IDENTITY,
            translation: Transformation::IDENTITY,
            transform: Transformation::IDENTITY,
            transformed_positions: Vec::new(),
            transformed_normals: Vec::new(),
            bounds: Aabb::EMPTY,
            bvh,
        };
        mesh.commit_transforms();
        mesh
    }

    /// Add a standalone triangle (three new vertices).
    ///
    /// This changes topology, so the BVH is rebuilt and the current transforms
    /// are committed.
    pub fn append_triangle(&mut self, triangle: &Triangle) {
        let start = self.positions.len() as u32;
        self.positions.extend([triangle.v0, triangle.v1, triangle.v2]);
        self.indices.extend([start, start + 1, start + 2]);
        self.normals.extend(sanitize_normals(vec![triangle.normal]));

        self.bvh = Bvh::build(&self.positions, &self.indices);
        self.commit_transforms();
    }

    /// Stage a translation. Takes effect on the next commit.
    pub fn set_translation(&mut self, offset: Vec3) {
        self.translation = Transformation::translate(offset);
    }

    /// Stage a rotation around Y by `yaw` radians. Takes effect on the next commit.
    pub fn set_rotation_y(&mut self, yaw: f32) {
        self.rotation = Transformation::rotate_y(yaw);
    }

    /// Stage an arbitrary rotation. Takes effect on the next commit.
    pub fn set_rotation(&mut self, rotation: Transformation) {
        self.rotation = rotation;
    }

    /// Stage a per-axis scale. Takes effect on the next commit.
    pub fn set_scale(&mut self, factors: Vec3) -> TransformResult<()> {
        self.scale = Transformation::scale(factors)?;
        Ok(())
    }

    /// Apply the staged transforms: scale, then rotation, then translation.
    ///
    /// Recomputes world-space positions, normals and bounds. The BVH is left
    /// alone since topology did not change.
    pub fn commit_transforms(&mut self) {
        let transform = self.scale.append(&self.rotation).append(&self.translation);

        self.transformed_positions.clear();
        self.transformed_positions
            .extend(self.positions.iter().map(|&p| transform.transform_point(p)));

        self.transformed_normals.clear();
        self.transformed_normals
            .extend(self.normals.iter().map(|&n| transform.transform_normal(n)));

        self.bounds = if self.indices.is_empty() {
            Aabb::EMPTY
        } else {
            Aabb::enclosing(self.transformed_positions.iter().copied()).padded(Aabb::PADDING)
        };
        self.transform = transform;
    }

    /// World-space triangle `tri`, carrying the mesh material and cull mode.
    pub fn world_triangle(&self, tri: u32) -> Triangle {
        let base = tri as usize * 3;
        Triangle {
            v0: self.transformed_positions[self.indices[base] as usize],
            v1: self.transformed_positions[self.indices[base + 1] as usize],
            v2: self.transformed_positions[self.indices[base + 2] as usize],
            normal: self.transformed_normals[tri as usize],
            cull_mode: self.cull_mode,
            material: self.material,
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn transformed_positions(&self) -> &[Vec3] {
        &self.transformed_positions
    }

    pub fn transformed_normals(&self) -> &[Vec3] {
        &self.transformed_normals
    }

    /// The committed object-to-world transform.
    pub fn transform(&self) -> &Transformation {
        &self.transform
    }

    pub fn bvh(&self) -> &Bvh {
        &self.bvh
    }

    pub fn material(&self) -> MaterialId {
        self.material
    }

    pub fn set_material(&mut self, material: MaterialId) {
        self.material = material;
    }

    pub fn cull_mode(&self) -> CullMode {
        self.cull_mode
    }

    pub fn set_cull_mode(&mut self, cull_mode: CullMode) {
        self.cull_mode = cull_mode;
    }
}

impl Intersect for TriangleMesh {
    fn intersect(&self, ray: &Ray) -> Option<HitRecord> {
        if self.bvh.is_empty() || !self.bounds.hit(ray) {
            return None;
        }
        let local_ray = self.transform.inverse_transform_ray(ray);
        // Leaf triangles are already in world space: test them with the world ray
        self.bvh.closest_hit(&local_ray, |tri, limit| {
            self.world_triangle(tri).intersect(&ray.clipped(limit))
        })
    }

    fn intersects(&self, ray: &Ray) -> bool {
        if self.bvh.is_empty() || !self.bounds.hit(ray) {
            return false;
        }
        let local_ray = self.transform.inverse_transform_ray(ray);
        self.bvh
            .any_hit(&local_ray, |tri| self.world_triangle(tri).intersects(ray))
    }

    fn bounding_box(&self) -> Aabb {
        self.bounds
    }
}

fn validate_indices(positions: &[Vec3], indices: &[u32]) -> MeshResult<()> {
    if indices.len() % 3 != 0 {
        return Err(MeshError::IndexCount(indices.len()));
    }
    match indices
        .iter()
        .position(|&index| index as usize >= positions.len())
    {
        Some(slot) => Err(MeshError::IndexOutOfRange {
            triangle: slot / 3,
            index: indices[slot],
            vertex_count: positions.len(),
        }),
        None => Ok(()),
    }
}

/// Per-triangle normals: the normalized average of the three edge cross
/// products. Triangles without area get a zero normal.
pub fn compute_normals(positions: &[Vec3], indices: &[u32]) -> Vec<Vec3> {
    let mut degenerate = 0usize;
    let normals = indices
        .chunks_exact(3)
        .map(|face| {
            let p0 = positions[face[0] as usize];
            let p1 = positions[face[1] as usize];
            let p2 = positions[face[2] as usize];

            let n0 = (p1 - p0).cross(p2 - p0);
            let n1 = (p2 - p1).cross(p0 - p1);
            let n2 = (p0 - p2).cross(p1 - p2);
            let normal = ((n0 + n1 + n2) / 3.0).normalize_or_zero();
            if normal == Vec3::ZERO {
                degenerate += 1;
            }
            normal
        })
        .collect();

    if degenerate > 0 {
        log::warn!(
            "{} degenerate triangle(s) without a valid normal, they will never be hit",
            degenerate
        );
    }
    normals
}

/// Normalize authored normals, replacing NaN or zero-length ones with zero.
fn sanitize_normals(normals: Vec<Vec3>) -> Vec<Vec3> {
    let mut repaired = 0usize;
    let normals = normals
        .into_iter()
        .map(|n| {
            let unit = n.normalize_or_zero();
            if unit == Vec3::ZERO {
                repaired += 1;
            }
            unit
        })
        .collect();

    if repaired > 0 {
        log::warn!("Replaced {} invalid triangle normal(s) with zero", repaired);
    }
    normals
}
