use std::f32::consts::PI;
use std::time::{Duration, Instant};

use trifill::math::{Mat4, Vec3};
use trifill::view::ViewParams;
use trifill::window::{Window, WindowEvent};
use trifill::{ColumnClip, FrameBuffer, IndexedTexture, TriangleRenderer, Vertex};

const WIDTH: u32 = 640;
const HEIGHT: u32 = 400;
const FLOOR_Z: f32 = -20.0;
const CEIL_Z: f32 = 20.0;

/// 64-shade ramps: gray, rust, moss, slate.
fn build_palette() -> [u32; 256] {
    let mut palette = [0u32; 256];
    let ramps = [(1.0, 1.0, 1.0), (1.0, 0.5, 0.3), (0.4, 0.9, 0.4), (0.5, 0.6, 1.0)];
    for (ramp, &(r, g, b)) in ramps.iter().enumerate() {
        for shade in 0..64 {
            let level = shade as f32 / 63.0 * 255.0;
            let (r, g, b) = ((level * r) as u32, (level * g) as u32, (level * b) as u32);
            palette[ramp * 64 + shade] = 0xFF00_0000 | (r << 16) | (g << 8) | b;
        }
    }
    palette
}

fn checker_texture(ramp: u8) -> IndexedTexture {
    IndexedTexture::from_fn(64, 64, |u, v| {
        let cell = ((u / 8) + (v / 8)) % 2;
        let shade = if cell == 0 { 20 } else { 55 };
        ramp * 64 + shade
    })
}

fn brick_texture(ramp: u8) -> IndexedTexture {
    IndexedTexture::from_fn(64, 64, |u, v| {
        let row = v / 16;
        let offset = if row % 2 == 0 { 0 } else { 8 };
        let mortar = v % 16 == 0 || (u + offset) % 16 == 0;
        let shade = if mortar { 12 } else { 40 + ((u * 7 + v * 13) % 9) as u8 };
        ramp * 64 + shade
    })
}

/// Two triangles for the wall between footprint corners `a` and `b`,
/// spanning `FLOOR_Z..CEIL_Z`, with u along the footprint and v down.
fn wall(a: (f32, f32), b: (f32, f32)) -> [Vertex; 6] {
    let v0 = Vertex::with_uv(a.0, a.1, FLOOR_Z, 0.0, 1.0);
    let v1 = Vertex::with_uv(a.0, a.1, CEIL_Z, 0.0, 0.0);
    let v2 = Vertex::with_uv(b.0, b.1, CEIL_Z, 1.0, 0.0);
    let v3 = Vertex::with_uv(b.0, b.1, FLOOR_Z, 1.0, 1.0);
    [v0, v1, v2, v0, v2, v3]
}

/// Walls around a square footprint of half-size `half`. Corners wind
/// counterclockwise for an outward-facing box, clockwise for a room seen
/// from the inside.
fn walls(half: f32, inward: bool) -> Vec<Vertex> {
    let mut corners = [
        (-half, -half),
        (half, -half),
        (half, half),
        (-half, half),
    ];
    if inward {
        corners.reverse();
    }
    let mut vertices = Vec::new();
    for i in 0..4 {
        vertices.extend_from_slice(&wall(corners[i], corners[(i + 1) % 4]));
    }
    vertices
}

fn floor_quad(half: f32) -> [Vertex; 6] {
    let v0 = Vertex::new(-half, -half, FLOOR_Z, 1.0);
    let v1 = Vertex::new(-half, half, FLOOR_Z, 1.0);
    let v2 = Vertex::new(half, half, FLOOR_Z, 1.0);
    let v3 = Vertex::new(half, -half, FLOOR_Z, 1.0);
    [v0, v1, v2, v0, v2, v3]
}

fn main() -> Result<(), String> {
    let mut window = Window::new("Trifill", WIDTH, HEIGHT)?;
    let palette = build_palette();

    let room = walls(96.0, true);
    let pillar = walls(16.0, false);
    let floor = floor_quad(96.0);
    let room_texture = brick_texture(1);
    let pillar_texture = checker_texture(3);

    let mut frame = vec![0u8; (WIDTH * HEIGHT) as usize];
    let cliptop = vec![0i16; WIDTH as usize];
    let clipbottom = vec![HEIGHT as i16; WIDTH as usize];

    let start = Instant::now();
    loop {
        if window.poll_events() == WindowEvent::Quit {
            break;
        }

        // Orbit between the pillar and the room walls, facing the center.
        let t = start.elapsed().as_secs_f32() * 0.4;
        let pos = Vec3::new(48.0 * t.cos(), 48.0 * t.sin(), 0.0);
        let view = ViewParams::from_angle(pos, t + PI, WIDTH, HEIGHT);

        frame.fill(0);
        {
            let fb = FrameBuffer::new(&mut frame, WIDTH as usize);
            let clip = ColumnClip::new(0, WIDTH as i32 - 1, &cliptop, &clipbottom);
            let mut renderer = TriangleRenderer::new(&view, fb, clip);
            renderer.fill(&Mat4::identity(), &floor, true, 2 * 64 + 24);
            renderer.draw(&Mat4::identity(), &room, true, &room_texture);
            let spin = Mat4::rotation(t * 0.7, 0.0, 0.0, 1.0);
            renderer.draw(&spin, &pillar, true, &pillar_texture);
        }

        window.present(&frame, WIDTH as usize, &palette)?;
        std::thread::sleep(Duration::from_millis(16));
    }

    Ok(())
}
