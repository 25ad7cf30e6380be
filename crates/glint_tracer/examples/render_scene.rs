//! Direct lighting example.
//!
//! Renders Cook-Torrance spheres and a rotated cube inside a Lambert box and
//! saves the result as a PNG.
//!
//! Usage: `render_scene [output.png] [shading.json]`

use anyhow::{Context, Result};
use glint_tracer::{
    color_to_rgba, max_to_one, Color, CullMode, Material, MaterialId, Ray, Scene, ShadingConfig,
    TriangleMesh, Vec3,
};
use std::time::Instant;

const WIDTH: u32 = 640;
const HEIGHT: u32 = 480;
const FOV_DEGREES: f32 = 45.0;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let output = args.next().unwrap_or_else(|| "render_scene.png".to_string());
    let config: ShadingConfig = match args.next() {
        Some(path) => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read shading config {}", path))?;
            serde_json::from_str(&text)
                .with_context(|| format!("Failed to parse shading config {}", path))?
        }
        None => ShadingConfig::default(),
    };
    log::info!(
        "Lighting mode: {}, shadows: {}",
        config.lighting_mode,
        config.shadows_enabled
    );

    let start = Instant::now();
    let scene = build_scene()?;
    scene.log_summary();
    log::info!("Scene built in {:?}", start.elapsed());

    let rays = camera_rays(Vec3::new(0.0, 3.0, -9.0), FOV_DEGREES);

    let start = Instant::now();
    let colors = scene.trace_batch(&rays, &config);
    log::info!("Rendered {}x{} in {:?}", WIDTH, HEIGHT, start.elapsed());

    let pixels: Vec<u8> = colors
        .into_iter()
        .flat_map(|color| color_to_rgba(max_to_one(color)))
        .collect();
    let image = image::RgbaImage::from_raw(WIDTH, HEIGHT, pixels)
        .context("Pixel buffer does not match the image size")?;
    image
        .save(&output)
        .with_context(|| format!("Failed to save {}", output))?;
    log::info!("Saved to {}", output);

    Ok(())
}

fn build_scene() -> Result<Scene> {
    let mut scene = Scene::new();

    let rough_metal = scene.add_material(Material::cook_torrance(Color::new(0.972, 0.960, 0.915), true, 1.0));
    let medium_metal = scene.add_material(Material::cook_torrance(Color::new(0.972, 0.960, 0.915), true, 0.6));
    let smooth_metal = scene.add_material(Material::cook_torrance(Color::new(0.972, 0.960, 0.915), true, 0.1));
    let rough_plastic = scene.add_material(Material::cook_torrance(Color::splat(0.75), false, 1.0));
    let medium_plastic = scene.add_material(Material::cook_torrance(Color::splat(0.75), false, 0.6));
    let smooth_plastic = scene.add_material(Material::cook_torrance(Color::splat(0.75), false, 0.1));
    let walls = scene.add_material(Material::lambert(Color::new(0.49, 0.57, 0.57), 1.0));
    let glossy = scene.add_material(Material::lambert_phong(Color::new(0.2, 0.3, 0.9), 0.5, 0.5, 15.0));

    scene.add_plane(Vec3::new(0.0, 0.0, 10.0), Vec3::new(0.0, 0.0, -1.0), walls);
    scene.add_plane(Vec3::new(0.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0), walls);
    scene.add_plane(Vec3::new(0.0, 10.0, 0.0), Vec3::new(0.0, -1.0, 0.0), walls);
    scene.add_plane(Vec3::new(5.0, 0.0, 0.0), Vec3::new(-1.0, 0.0, 0.0), walls);
    scene.add_plane(Vec3::new(-5.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0), walls);

    scene.add_sphere(Vec3::new(-1.75, 1.0, 0.0), 0.75, rough_metal);
    scene.add_sphere(Vec3::new(0.0, 1.0, 0.0), 0.75, medium_metal);
    scene.add_sphere(Vec3::new(1.75, 1.0, 0.0), 0.75, smooth_metal);
    scene.add_sphere(Vec3::new(-1.75, 3.0, 0.0), 0.75, rough_plastic);
    scene.add_sphere(Vec3::new(0.0, 3.0, 0.0), 0.75, medium_plastic);
    scene.add_sphere(Vec3::new(1.75, 3.0, 0.0), 0.75, smooth_plastic);

    let mut cube = unit_cube(glossy)?;
    cube.set_scale(Vec3::splat(0.6))?;
    cube.set_rotation_y(45f32.to_radians());
    cube.set_translation(Vec3::new(0.0, 5.0, 2.0));
    cube.commit_transforms();
    scene.add_mesh(cube);

    scene.add_point_light(Vec3::new(0.0, 5.0, 5.0), 50.0, Color::new(1.0, 0.61, 0.45));
    scene.add_point_light(Vec3::new(-2.5, 5.0, -5.0), 70.0, Color::new(1.0, 0.8, 0.45));
    scene.add_point_light(Vec3::new(2.5, 2.5, -5.0), 50.0, Color::new(0.34, 0.47, 0.68));

    Ok(scene)
}

fn unit_cube(material: MaterialId) -> Result<TriangleMesh> {
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
        0, 2, 1, 0, 3, 2,
        4, 5, 6, 4, 6, 7,
        0, 4, 7, 0, 7, 3,
        1, 2, 6, 1, 6, 5,
        0, 1, 5, 0, 5, 4,
        3, 7, 6, 3, 6, 2,
    ];
    TriangleMesh::new(positions, indices, material, CullMode::BackFaceCulling)
        .context("Failed to build cube mesh")
}

/// One ray per pixel through a pinhole camera looking down +Z.
fn camera_rays(origin: Vec3, fov_degrees: f32) -> Vec<Ray> {
    let aspect = WIDTH as f32 / HEIGHT as f32;
    let fov = (fov_degrees.to_radians() / 2.0).tan();

    (0..HEIGHT)
        .flat_map(|py| (0..WIDTH).map(move |px| (px, py)))
        .map(|(px, py)| {
            let x = (2.0 * (px as f32 + 0.5) / WIDTH as f32 - 1.0) * aspect * fov;
            let y = (1.0 - 2.0 * (py as f32 + 0.5) / HEIGHT as f32) * fov;
            Ray::new(origin, Vec3::new(x, y, 1.0))
        })
        .collect()
}
