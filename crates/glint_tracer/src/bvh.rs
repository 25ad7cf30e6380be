//! Bounding Volume Hierarchy over the triangles of one mesh.
//!
//! Nodes live in a flat arena. An internal node stores the index of its left
//! child; the right child is always the next slot. Leaves own an inclusive
//! range of the permuted `triangles` array, which holds triangle numbers
//! (triangle `n` uses indices `3n..3n+3`).
//!
//! The tree is built over the mesh's authored (untransformed) positions, so
//! queries must hand it an object-space ray.

use crate::hit::HitRecord;
use glint_math::{Aabb, Ray, Vec3};

/// Nodes with at most this many triangles are not split further.
pub const MAX_LEAF_TRIANGLES: usize = 2;

/// One node of the hierarchy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BvhNode {
    /// Object-space bounds of every triangle below this node
    pub bounds: Aabb,
    /// Arena index of the left child; the right child is `left_child + 1`
    pub left_child: u32,
    pub is_leaf: bool,
    /// Inclusive range into [`Bvh::triangles`]
    pub first_triangle: u32,
    pub last_triangle: u32,
}

impl BvhNode {
    fn new(first_triangle: usize, last_triangle: usize, bounds: Aabb) -> Self {
        Self {
            bounds,
            left_child: 0,
            is_leaf: false,
            first_triangle: first_triangle as u32,
            last_triangle: last_triangle as u32,
        }
    }

    pub fn triangle_count(&self) -> usize {
        (self.last_triangle - self.first_triangle) as usize + 1
    }

    pub fn right_child(&self) -> u32 {
        self.left_child + 1
    }
}

/// Binary BVH stored as an arena of nodes.
#[derive(Debug, Clone, Default)]
pub struct Bvh {
    nodes: Vec<BvhNode>,
    triangles: Vec<u32>,
}

impl Bvh {
    /// Build the hierarchy with midpoint splits on the longest axis.
    ///
    /// `indices` must hold valid triples into `positions`; the mesh validates
    /// that before building.
    pub fn build(positions: &[Vec3], indices: &[u32]) -> Self {
        let triangle_count = indices.len() / 3;
        if triangle_count == 0 {
            return Self::default();
        }

        let corners = |tri: u32| -> [Vec3; 3] {
            let base = tri as usize * 3;
            [
                positions[indices[base] as usize],
                positions[indices[base + 1] as usize],
                positions[indices[base + 2] as usize],
            ]
        };
        let centroids: Vec<Vec3> = (0..triangle_count as u32)
            .map(|tri| {
                let [a, b, c] = corners(tri);
                (a + b + c) / 3.0
            })
            .collect();

        let mut triangles: Vec<u32> = (0..triangle_count as u32).collect();
        let bounds_of = |triangles: &[u32]| -> Aabb {
            Aabb::enclosing(triangles.iter().flat_map(|&tri| corners(tri))).padded(Aabb::PADDING)
        };

        let mut nodes = Vec::with_capacity(2 * triangle_count - 1);
        nodes.push(BvhNode::new(0, triangle_count - 1, bounds_of(&triangles)));

        // Explicit work stack: degenerate inputs can make the tree very deep.
        let mut pending = vec![0usize];
        while let Some(idx) = pending.pop() {
            let node = nodes[idx];
            let count = node.triangle_count();
            if count <= MAX_LEAF_TRIANGLES {
                nodes[idx].is_leaf = true;
                continue;
            }

            let axis = node.bounds.longest_axis();
            let extent = node.bounds.axis_interval(axis);
            let split = extent.min + extent.size() * 0.5;

            // Two-pointer partition: [first, i) left of the split, [i, last] right
            let first = node.first_triangle as usize;
            let last = node.last_triangle as usize;
            let mut i = first;
            let mut end = last + 1;
            while i < end {
                if centroids[triangles[i] as usize][axis] < split {
                    i += 1;
                } else {
                    end -= 1;
                    triangles.swap(i, end);
                }
            }

            let left_count = i - first;
            if left_count == 0 || left_count == count {
                nodes[idx].is_leaf = true;
                continue;
            }

            let left = nodes.len();
            let left_node = BvhNode::new(first, i - 1, bounds_of(&triangles[first..i]));
            let right_node = BvhNode::new(i, last, bounds_of(&triangles[i..=last]));
            nodes.push(left_node);
            nodes.push(right_node);
            nodes[idx].left_child = left as u32;

            pending.push(left + 1);
            pending.push(left);
        }

        let bvh = Self { nodes, triangles };
        log::debug!(
            "Built BVH: {} triangles, {} nodes, {} leaves, depth {}",
            triangle_count,
            bvh.nodes.len(),
            bvh.nodes.iter().filter(|n| n.is_leaf).count(),
            bvh.depth()
        );
        bvh
    }

    pub fn nodes(&self) -> &[BvhNode] {
        &self.nodes
    }

    /// The permuted triangle numbers the leaves index into.
    pub fn triangles(&self) -> &[u32] {
        &self.triangles
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Object-space bounds of the whole tree.
    pub fn bounds(&self) -> Aabb {
        self.nodes.first().map_or(Aabb::EMPTY, |root| root.bounds)
    }

    /// Triangle numbers stored in a leaf.
    pub fn leaf_triangles(&self, node: &BvhNode) -> &[u32] {
        &self.triangles[node.first_triangle as usize..=node.last_triangle as usize]
    }

    /// Number of levels, 0 for an empty tree.
    pub fn depth(&self) -> usize {
        if self.nodes.is_empty() {
            return 0;
        }
        let mut deepest = 0;
        let mut pending = vec![(0usize, 1usize)];
        while let Some((idx, level)) = pending.pop() {
            deepest = deepest.max(level);
            let node = &self.nodes[idx];
            if !node.is_leaf {
                pending.push((node.left_child as usize, level + 1));
                pending.push((node.right_child() as usize, level + 1));
            }
        }
        deepest
    }

    /// Closest-hit traversal.
    ///
    /// `local_ray` is only used for the box tests. `hit_triangle` is called
    /// with a triangle number and the current closest distance and returns a
    /// hit strictly inside that limit, if any.
    pub fn closest_hit<F>(&self, local_ray: &Ray, mut hit_triangle: F) -> Option<HitRecord>
    where
        F: FnMut(u32, f32) -> Option<HitRecord>,
    {
        let mut closest = None;
        if !self.is_empty() {
            self.closest_in_node(0, local_ray, &mut hit_triangle, &mut closest);
        }
        closest
    }

    fn closest_in_node<F>(
        &self,
        idx: usize,
        local_ray: &Ray,
        hit_triangle: &mut F,
        closest: &mut Option<HitRecord>,
    ) where
        F: FnMut(u32, f32) -> Option<HitRecord>,
    {
        let node = &self.nodes[idx];
        let limit = closest.map_or(local_ray.t_max, |hit| hit.t);
        if !node.bounds.hit_interval(local_ray, local_ray.interval().clip_max(limit)) {
            return;
        }

        if node.is_leaf {
            for &tri in self.leaf_triangles(node) {
                let limit = closest.map_or(local_ray.t_max, |hit| hit.t);
                *closest = HitRecord::closer(*closest, hit_triangle(tri, limit));
            }
        } else {
            self.closest_in_node(node.left_child as usize, local_ray, hit_triangle, closest);
            self.closest_in_node(node.right_child() as usize, local_ray, hit_triangle, closest);
        }
    }

    /// Any-hit traversal, stops at the first triangle `hits_triangle` accepts.
    pub fn any_hit<F>(&self, local_ray: &Ray, mut hits_triangle: F) -> bool
    where
        F: FnMut(u32) -> bool,
    {
        !self.is_empty() && self.any_in_node(0, local_ray, &mut hits_triangle)
    }

    fn any_in_node<F>(&self, idx: usize, local_ray: &Ray, hits_triangle: &mut F) -> bool
    where
        F: FnMut(u32) -> bool,
    {
        let node = &self.nodes[idx];
        if !node.bounds.hit(local_ray) {
            return false;
        }

        if node.is_leaf {
            self.leaf_triangles(node).iter().any(|&tri| hits_triangle(tri))
        } else {
            self.any_in_node(node.left_child as usize, local_ray, hits_triangle)
                || self.any_in_node(node.right_child() as usize, local_ray, hits_triangle)
        }
    }
}
