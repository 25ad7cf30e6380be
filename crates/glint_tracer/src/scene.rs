//! Scene container and ray queries.
//!
//! The scene owns every primitive, material and light. Primitives refer to
//! materials by [`MaterialId`]; slot 0 always holds the default material.

use crate::hit::{HitRecord, Intersect, MaterialId};
use crate::light::Light;
use crate::material::{Color, Material};
use crate::mesh::TriangleMesh;
use crate::plane::Plane;
use crate::sphere::Sphere;
use crate::triangle::Triangle;
use glint_math::{Ray, Vec3};

/// Everything a ray can hit, plus the materials and lights used to shade it.
#[derive(Debug, Clone)]
pub struct Scene {
    spheres: Vec<Sphere>,
    planes: Vec<Plane>,
    triangles: Vec<Triangle>,
    meshes: Vec<TriangleMesh>,
    materials: Vec<Material>,
    lights: Vec<Light>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Empty scene holding only the default (solid red) material.
    pub fn new() -> Self {
        Self {
            spheres: Vec::new(),
            planes: Vec::new(),
            triangles: Vec::new(),
            meshes: Vec::new(),
            materials: vec![Material::default()],
            lights: Vec::new(),
        }
    }

    /// Register a material and return its id.
    pub fn add_material(&mut self, material: Material) -> MaterialId {
        self.materials.push(material);
        MaterialId::from(self.materials.len() - 1)
    }

    /// Material for `id`. Unknown ids fall back to the default material.
    pub fn material(&self, id: MaterialId) -> &Material {
        self.materials
            .get(id.index())
            .unwrap_or(&self.materials[MaterialId::DEFAULT.index()])
    }

    pub fn add_sphere(&mut self, center: Vec3, radius: f32, material: MaterialId) -> usize {
        self.spheres.push(Sphere::new(center, radius, material));
        self.spheres.len() - 1
    }

    pub fn add_plane(&mut self, origin: Vec3, normal: Vec3, material: MaterialId) -> usize {
        self.planes.push(Plane::new(origin, normal, material));
        self.planes.len() - 1
    }

    pub fn add_triangle(&mut self, triangle: Triangle) -> usize {
        self.triangles.push(triangle);
        self.triangles.len() - 1
    }

    /// Add a mesh and return its index for [`Scene::mesh_mut`].
    pub fn add_mesh(&mut self, mesh: TriangleMesh) -> usize {
        log::debug!(
            "Added mesh {} with {} triangles, {} BVH nodes",
            self.meshes.len(),
            mesh.triangle_count(),
            mesh.bvh().nodes().len()
        );
        self.meshes.push(mesh);
        self.meshes.len() - 1
    }

    /// Mutable access to a mesh, e.g. to stage and commit new transforms.
    pub fn mesh_mut(&mut self, index: usize) -> Option<&mut TriangleMesh> {
        self.meshes.get_mut(index)
    }

    pub fn add_light(&mut self, light: Light) -> usize {
        self.lights.push(light);
        self.lights.len() - 1
    }

    pub fn add_point_light(&mut self, origin: Vec3, intensity: f32, color: Color) -> usize {
        self.add_light(Light::point(origin, color, intensity))
    }

    pub fn add_directional_light(&mut self, direction: Vec3, intensity: f32, color: Color) -> usize {
        self.add_light(Light::directional(direction, color, intensity))
    }

    /// Apply the staged transforms of every mesh.
    pub fn commit_transforms(&mut self) {
        for mesh in &mut self.meshes {
            mesh.commit_transforms();
        }
    }

    pub fn spheres(&self) -> &[Sphere] {
        &self.spheres
    }

    pub fn planes(&self) -> &[Plane] {
        &self.planes
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn meshes(&self) -> &[TriangleMesh] {
        &self.meshes
    }

    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    /// Log the scene contents at info level.
    pub fn log_summary(&self) {
        let mesh_triangles: usize = self.meshes.iter().map(|m| m.triangle_count()).sum();
        log::info!(
            "Scene: {} spheres, {} planes, {} triangles, {} meshes ({} triangles), {} materials, {} lights",
            self.spheres.len(),
            self.planes.len(),
            self.triangles.len(),
            self.meshes.len(),
            mesh_triangles,
            self.materials.len(),
            self.lights.len()
        );
    }

    fn primitives(&self) -> impl Iterator<Item = &dyn Intersect> {
        self.spheres
            .iter()
            .map(|s| s as &dyn Intersect)
            .chain(self.planes.iter().map(|p| p as &dyn Intersect))
            .chain(self.triangles.iter().map(|t| t as &dyn Intersect))
            .chain(self.meshes.iter().map(|m| m as &dyn Intersect))
    }

    /// Nearest hit over every primitive.
    ///
    /// Each primitive is tested against the ray clipped to the best hit so far.
    pub fn closest_hit(&self, ray: &Ray) -> Option<HitRecord> {
        if ray.is_degenerate() {
            return None;
        }
        self.primitives().fold(None, |closest, object| {
            let clipped = match closest {
                Some(hit) => ray.clipped(hit.t),
                None => *ray,
            };
            HitRecord::closer(closest, object.intersect(&clipped))
        })
    }

    /// True if anything lies on the ray, stopping at the first positive test.
    pub fn any_hit(&self, ray: &Ray) -> bool {
        !ray.is_degenerate() && self.primitives().any(|object| object.intersects(ray))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::triangle::CullMode;

    fn cube_mesh(material: MaterialId) -> TriangleMesh {
        let positions = vec![
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(1.0, -1.0, -1.0),
            Vec3::new(1.0, 1.0, -1.0),
            Vec3::new(-1.0, 1.0, -1.0),
            Vec3::new(-1.0, -1.0, 1.0),
            Vec3::new(1.0, -1.0, 1.0),
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(-1.0, 1.0, 1.0),
        ];
        #[rustfmt::skip]
        let indices = vec![
            0, 2, 1, 0, 3, 2, // -Z
            4, 5, 6, 4, 6, 7, // +Z
            0, 4, 7, 0, 7, 3, // -X
            1, 2, 6, 1, 6, 5, // +X
            0, 1, 5, 0, 5, 4, // -Y
            3, 7, 6, 3, 6, 2, // +Y
        ];
        TriangleMesh::new(positions, indices, material, CullMode::NoCulling).expect("valid cube")
    }

    fn sample_scene() -> Scene {
        let mut scene = Scene::new();
        let blue = scene.add_material(Material::solid_color(Color::new(0.0, 0.0, 1.0)));
        let grey = scene.add_material(Material::lambert(Color::splat(0.5), 1.0));
        scene.add_sphere(Vec3::new(0.0, 1.0, 0.0), 1.0, blue);
        scene.add_plane(Vec3::ZERO, Vec3::Y, grey);
        let mesh = scene.add_mesh(cube_mesh(grey));
        let cube = scene.mesh_mut(mesh).expect("mesh exists");
        cube.set_translation(Vec3::new(4.0, 1.0, 0.0));
        cube.commit_transforms();
        scene.add_triangle(ledge());
        scene.add_point_light(Vec3::new(0.0, 5.0, -5.0), 70.0, Color::ONE);
        scene
    }

    /// Back-face culled triangle floating at y = 3, facing up.
    fn ledge() -> Triangle {
        Triangle::new(
            Vec3::new(-4.5, 3.0, -1.0),
            Vec3::new(-3.5, 3.0, 1.0),
            Vec3::new(-2.5, 3.0, -1.0),
            MaterialId::DEFAULT,
        )
        .with_cull_mode(CullMode::BackFaceCulling)
    }

    #[test]
    fn test_default_material() {
        let scene = Scene::new();
        assert_eq!(scene.materials().len(), 1);
        assert_eq!(
            *scene.material(MaterialId::DEFAULT),
            Material::solid_color(Color::new(1.0, 0.0, 0.0))
        );
        // Unknown ids fall back to slot 0
        assert_eq!(*scene.material(MaterialId(42)), Material::default());
    }

    #[test]
    fn test_add_returns_indices() {
        let mut scene = Scene::new();
        let a = scene.add_material(Material::lambert(Color::ONE, 1.0));
        let b = scene.add_material(Material::lambert(Color::ONE, 0.5));
        assert_eq!((a, b), (MaterialId(1), MaterialId(2)));
        assert_eq!(scene.add_sphere(Vec3::ZERO, 1.0, a), 0);
        assert_eq!(scene.add_sphere(Vec3::ONE, 1.0, b), 1);
        assert_eq!(scene.add_directional_light(-Vec3::Y, 1.0, Color::ONE), 0);
        assert!(scene.mesh_mut(0).is_none());
    }

    #[test]
    fn test_closest_hit_picks_nearest() {
        let scene = sample_scene();

        // Straight down onto the sphere, which sits on the plane
        let ray = Ray::new(Vec3::new(0.0, 10.0, 0.0), -Vec3::Y);
        let hit = scene.closest_hit(&ray).expect("sphere below");
        assert!((hit.t - 8.0).abs() < 1e-4);
        assert_eq!(hit.material, MaterialId(1));

        // Next to the sphere: the plane
        let ray = Ray::new(Vec3::new(-2.0, 10.0, 0.0), -Vec3::Y);
        let hit = scene.closest_hit(&ray).expect("plane below");
        assert!((hit.t - 10.0).abs() < 1e-4);
        assert_eq!(hit.material, MaterialId(2));

        // Onto the translated cube's top face at y = 2
        let ray = Ray::new(Vec3::new(4.0, 10.0, 0.0), -Vec3::Y);
        let hit = scene.closest_hit(&ray).expect("cube below");
        assert!((hit.t - 8.0).abs() < 1e-4);
    }

    #[test]
    fn test_closest_hit_within_range_and_any_hit_agrees() {
        let scene = sample_scene();
        let rays = [
            Ray::new(Vec3::new(0.0, 1.0, -10.0), Vec3::Z),
            Ray::new(Vec3::new(4.0, 1.0, -10.0), Vec3::Z),
            Ray::new(Vec3::new(0.0, 10.0, 0.0), Vec3::new(0.3, -1.0, 0.1)),
            Ray::with_range(Vec3::new(0.0, 10.0, 0.0), -Vec3::Y, 0.0, 5.0),
            Ray::new(Vec3::new(0.0, 10.0, 0.0), Vec3::Y),
            Ray::new(Vec3::new(-3.5, 10.0, 0.0), -Vec3::Y),
            Ray::new(Vec3::new(-3.5, 1.0, 0.0), Vec3::Y),
            Ray::new(Vec3::new(-3.5, 3.0, -6.0), Vec3::Z),
        ];
        for ray in rays {
            let hit = scene.closest_hit(&ray);
            assert_eq!(hit.is_some(), scene.any_hit(&ray), "{ray:?}");
            if let Some(hit) = hit {
                assert!(ray.interval().contains(hit.t));
            }
        }
    }

    #[test]
    fn test_standalone_triangle_in_scene() {
        let scene = sample_scene();
        assert_eq!(scene.triangles().len(), 1);
        assert!((scene.triangles()[0].normal - Vec3::Y).length() < 1e-6);

        // From above the triangle sits in front of the plane
        let down = Ray::new(Vec3::new(-3.5, 10.0, 0.0), -Vec3::Y);
        let hit = scene.closest_hit(&down).expect("triangle below");
        assert!((hit.t - 7.0).abs() < 1e-4);
        assert_eq!(hit.material, MaterialId::DEFAULT);
        assert!(scene.any_hit(&down));

        // Short ray that stops above the triangle only reaches nothing
        let short = Ray::with_range(Vec3::new(-3.5, 10.0, 0.0), -Vec3::Y, 0.0, 6.5);
        assert!(scene.closest_hit(&short).is_none());
        assert!(!scene.any_hit(&short));

        // From below the back face is culled and nothing else is above
        let up = Ray::new(Vec3::new(-3.5, 1.0, 0.0), Vec3::Y);
        assert!(scene.closest_hit(&up).is_none());
        assert!(!scene.any_hit(&up));
    }

    #[test]
    fn test_miss_and_degenerate_ray() {
        let scene = sample_scene();
        assert!(scene.closest_hit(&Ray::new(Vec3::new(0.0, 10.0, 0.0), Vec3::Y)).is_none());
        let degenerate = Ray::new(Vec3::new(0.0, 10.0, 0.0), Vec3::ZERO);
        assert!(scene.closest_hit(&degenerate).is_none());
        assert!(!scene.any_hit(&degenerate));
    }

    #[test]
    fn test_commit_transforms_moves_meshes() {
        let mut scene = sample_scene();
        let ray = Ray::new(Vec3::new(4.0, 10.0, 0.0), -Vec3::Y);
        let before = scene.closest_hit(&ray).expect("cube").t;

        if let Some(cube) = scene.mesh_mut(0) {
            cube.set_translation(Vec3::new(4.0, 3.0, 0.0));
        }
        scene.commit_transforms();
        let after = scene.closest_hit(&ray).expect("cube").t;
        assert!((before - after - 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_scene_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Scene>();
    }
}
