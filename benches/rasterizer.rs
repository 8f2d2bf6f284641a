use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use trifill::bench::{draw_screen_triangle, FlatShader, TextureShader};
use trifill::{ColumnClip, FrameBuffer, IndexedTexture, Vertex};

const BUFFER_WIDTH: usize = 800;
const BUFFER_HEIGHT: usize = 600;

fn create_buffer() -> Vec<u8> {
    vec![0u8; BUFFER_WIDTH * BUFFER_HEIGHT]
}

fn screen_vertex(x: f32, y: f32, u: f32, v: f32) -> Vertex {
    Vertex::with_uv(x, y, 0.0, u, v)
}

fn small_triangle() -> [Vertex; 3] {
    [
        screen_vertex(100.0, 100.0, 0.0, 0.0),
        screen_vertex(110.0, 120.0, 0.0, 1.0),
        screen_vertex(120.0, 100.0, 1.0, 0.0),
    ]
}

fn medium_triangle() -> [Vertex; 3] {
    [
        screen_vertex(100.0, 100.0, 0.0, 0.0),
        screen_vertex(200.0, 300.0, 0.0, 1.0),
        screen_vertex(300.0, 100.0, 1.0, 0.0),
    ]
}

fn large_triangle() -> [Vertex; 3] {
    [
        screen_vertex(50.0, 50.0, 0.0, 0.0),
        screen_vertex(400.0, 550.0, 0.0, 1.0),
        screen_vertex(750.0, 100.0, 1.0, 0.0),
    ]
}

fn benchmark_fill(c: &mut Criterion) {
    let mut group = c.benchmark_group("fill");

    let cliptop = vec![0i16; BUFFER_WIDTH];
    let clipbottom = vec![BUFFER_HEIGHT as i16; BUFFER_WIDTH];
    let shader = FlatShader::new(7);

    for (name, tri) in [
        ("small", small_triangle()),
        ("medium", medium_triangle()),
        ("large", large_triangle()),
    ] {
        group.bench_with_input(BenchmarkId::from_parameter(name), &tri, |b, tri| {
            let mut buffer = create_buffer();
            b.iter(|| {
                let mut fb = FrameBuffer::new(&mut buffer, BUFFER_WIDTH);
                let clip = ColumnClip::new(0, BUFFER_WIDTH as i32 - 1, &cliptop, &clipbottom);
                let [v1, v2, v3] = *black_box(tri);
                draw_screen_triangle(&mut fb, &clip, &v1, &v2, &v3, &shader);
            });
        });
    }

    group.finish();
}

fn benchmark_textured_draw(c: &mut Criterion) {
    let mut group = c.benchmark_group("textured_draw");

    let cliptop = vec![0i16; BUFFER_WIDTH];
    let clipbottom = vec![BUFFER_HEIGHT as i16; BUFFER_WIDTH];
    let texture = IndexedTexture::from_fn(64, 64, |u, v| ((u ^ v) & 0xFF) as u8);
    let shader = TextureShader::new(&texture);

    for (name, tri) in [
        ("small", small_triangle()),
        ("medium", medium_triangle()),
        ("large", large_triangle()),
    ] {
        group.bench_with_input(BenchmarkId::from_parameter(name), &tri, |b, tri| {
            let mut buffer = create_buffer();
            b.iter(|| {
                let mut fb = FrameBuffer::new(&mut buffer, BUFFER_WIDTH);
                let clip = ColumnClip::new(0, BUFFER_WIDTH as i32 - 1, &cliptop, &clipbottom);
                let [v1, v2, v3] = *black_box(tri);
                draw_screen_triangle(&mut fb, &clip, &v1, &v2, &v3, &shader);
            });
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_fill, benchmark_textured_draw);
criterion_main!(benches);
