use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use vexray::bench::{
    render_mesh, transform_mesh, Camera, ColorRgb, FrameBuffer, Material, Mesh, PrimitiveTopology,
    RasterSettings, Texture, Vertex,
};
use vexray::math::{Vec2, Vec3};

const BUFFER_WIDTH: u32 = 800;
const BUFFER_HEIGHT: u32 = 600;

fn triangle_mesh(scale: f32) -> Mesh {
    let vertices = vec![
        Vertex::new(
            Vec3::new(-scale, -scale, 0.0),
            Vec2::new(0.0, 0.0),
            Vec3::UNIT_Z,
            Vec3::UNIT_X,
        ),
        Vertex::new(
            Vec3::new(scale, -scale, 0.0),
            Vec2::new(1.0, 0.0),
            Vec3::UNIT_Z,
            Vec3::UNIT_X,
        ),
        Vertex::new(
            Vec3::new(0.0, scale, 0.0),
            Vec2::new(0.5, 1.0),
            Vec3::UNIT_Z,
            Vec3::UNIT_X,
        ),
    ];
    Mesh::new(vertices, vec![0, 1, 2], PrimitiveTopology::TriangleList)
}

fn grid_mesh(rows: u32, cols: u32) -> Mesh {
    let mut vertices = Vec::new();
    let mut indices = Vec::new();
    for row in 0..rows {
        for col in 0..cols {
            let x = col as f32 * 0.3 - (cols as f32 * 0.15);
            let y = row as f32 * 0.2 - (rows as f32 * 0.1);
            vertices.push(Vertex::new(
                Vec3::new(x, y, 0.0),
                Vec2::new(col as f32 / cols as f32, row as f32 / rows as f32),
                Vec3::UNIT_Z,
                Vec3::UNIT_X,
            ));
        }
    }
    for row in 0..rows - 1 {
        for col in 0..cols - 1 {
            let i0 = row * cols + col;
            let i1 = i0 + 1;
            let i2 = i0 + cols;
            let i3 = i2 + 1;
            indices.extend_from_slice(&[i0, i1, i2, i1, i3, i2]);
        }
    }
    Mesh::new(vertices, indices, PrimitiveTopology::TriangleList)
}

fn render_once(mesh: &mut Mesh, camera: &Camera, material: &Material, fb: &mut FrameBuffer) {
    transform_mesh(mesh, camera, BUFFER_WIDTH as f32, BUFFER_HEIGHT as f32);
    render_mesh(mesh, material, &RasterSettings::default(), fb);
}

fn benchmark_single_triangle(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_triangle");

    let camera = Camera::new(Vec3::new(0.0, 0.0, -5.0), BUFFER_WIDTH as f32 / BUFFER_HEIGHT as f32);
    let diffuse = Texture::solid(ColorRgb::new(0.8, 0.2, 0.2));
    let normal = Texture::solid(ColorRgb::new(0.5, 0.5, 1.0));
    let gloss = Texture::solid(ColorRgb::splat(0.5));
    let specular = Texture::solid(ColorRgb::splat(0.5));
    let material = Material {
        diffuse: &diffuse,
        normal: &normal,
        gloss: &gloss,
        specular: &specular,
    };

    for (name, scale) in [("small", 0.3f32), ("medium", 1.0), ("large", 3.0)] {
        group.bench_with_input(BenchmarkId::new("edge_function", name), &scale, |b, &scale| {
            let mut mesh = triangle_mesh(scale);
            let mut fb = FrameBuffer::new(BUFFER_WIDTH, BUFFER_HEIGHT);
            b.iter(|| {
                fb.clear();
                render_once(black_box(&mut mesh), &camera, &material, &mut fb);
            });
        });
    }

    group.finish();
}

fn benchmark_many_triangles(c: &mut Criterion) {
    let mut group = c.benchmark_group("many_triangles");

    let camera = Camera::new(Vec3::new(0.0, 0.0, -5.0), BUFFER_WIDTH as f32 / BUFFER_HEIGHT as f32);
    let diffuse = Texture::solid(ColorRgb::new(0.8, 0.2, 0.2));
    let normal = Texture::solid(ColorRgb::new(0.5, 0.5, 1.0));
    let gloss = Texture::solid(ColorRgb::splat(0.5));
    let specular = Texture::solid(ColorRgb::splat(0.5));
    let material = Material {
        diffuse: &diffuse,
        normal: &normal,
        gloss: &gloss,
        specular: &specular,
    };

    group.bench_function("edge_function_grid", |b| {
        let mut mesh = grid_mesh(20, 20);
        let mut fb = FrameBuffer::new(BUFFER_WIDTH, BUFFER_HEIGHT);
        b.iter(|| {
            fb.clear();
            render_once(black_box(&mut mesh), &camera, &material, &mut fb);
        });
    });

    group.finish();
}

criterion_group!(benches, benchmark_single_triangle, benchmark_many_triangles);
criterion_main!(benches);
