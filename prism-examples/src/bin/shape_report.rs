use anyhow::{Result, ensure};
use clap::{Parser, ValueEnum};
use glam::Vec3;
use prism_geometry::shapes::{bezier_tube, cornell_room, cube, cylinder, sphere};
use prism_geometry::{BezierCurve, MeshDescription};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Shape {
    Cube,
    Cornell,
    Cylinder,
    Sphere,
    Tube,
    All,
}

/// Generates procedural meshes and reports their sizes.
#[derive(Parser, Debug)]
#[command(name = "shape_report", version)]
struct Args {
    /// Shape to generate.
    #[arg(long, default_value = "all", value_enum)]
    shape: Shape,

    /// Segments around each ring.
    #[arg(long, default_value = "32")]
    segments: u32,

    /// Latitude bands of the sphere.
    #[arg(long, default_value = "16")]
    rings: u32,

    /// Curve samples along the tube.
    #[arg(long, default_value = "24")]
    resolution: u32,
}

fn generate(shape: Shape, args: &Args) -> Vec<(&'static str, MeshDescription)> {
    let white = Vec3::ONE;
    match shape {
        Shape::Cube => vec![("cube", cube(1.0, 1.0, 1.0, white))],
        Shape::Cornell => vec![("cornell", cornell_room(2.0, 2.0, 2.0))],
        Shape::Cylinder => vec![("cylinder", cylinder(0.5, 1.0, args.segments, white))],
        Shape::Sphere => vec![("sphere", sphere(0.5, args.rings, args.segments, white))],
        Shape::Tube => {
            let curve = BezierCurve::new(vec![
                Vec3::new(-1.0, 0.0, 0.0),
                Vec3::new(-0.5, 1.0, 0.5),
                Vec3::new(0.5, -1.0, -0.5),
                Vec3::new(1.0, 0.0, 0.0),
            ]);
            vec![("tube", bezier_tube(&curve, Vec3::Y, 0.1, args.resolution, args.segments, white))]
        }
        Shape::All => [Shape::Cube, Shape::Cornell, Shape::Cylinder, Shape::Sphere, Shape::Tube]
            .into_iter()
            .flat_map(|shape| generate(shape, args))
            .collect(),
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    ensure!(args.segments >= 3, "--segments must be at least 3");
    ensure!(args.rings >= 2, "--rings must be at least 2");
    ensure!(args.resolution >= 1, "--resolution must be at least 1");

    for (name, mesh) in generate(args.shape, &args) {
        let valid = mesh.validate();
        let (min, max) = mesh.bounds().unwrap_or((Vec3::ZERO, Vec3::ZERO));
        log::info!(
            "{:>9}: {:>6} vertices, {:>6} indices, {:>6} triangles, bounds {:?}..{:?}, {}",
            name,
            mesh.vertex_count(),
            mesh.index_count(),
            mesh.triangle_count(),
            min,
            max,
            match &valid {
                Ok(()) => "valid".to_string(),
                Err(e) => e.to_string(),
            }
        );
        valid?;
    }
    Ok(())
}
