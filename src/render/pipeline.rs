//! The per-triangle drawing pipeline.
//!
//! [`TriangleRenderer`] carries everything one batch of triangles needs: the
//! frame's view parameters, the destination framebuffer view, and the
//! per-column clip windows. Each input triangle runs through the vertex
//! stage (object -> world -> clip space), homogeneous clipping, perspective
//! divide and viewport mapping, and is finally fan-triangulated and handed
//! to the block rasterizer.

use super::framebuffer::{ColumnClip, FrameBuffer};
use super::rasterizer::{draw_screen_triangle, FlatShader, PixelShader, TextureShader};
use crate::clipper::ClippedPolygon;
use crate::math::Mat4;
use crate::texture::Texture;
use crate::vertex::Vertex;
use crate::view::ViewParams;

/// Draws batches of triangles into an 8-bit framebuffer.
///
/// The renderer borrows its target and clip windows for the duration of a
/// batch; it allocates nothing and mutates only framebuffer bytes the clip
/// windows admit. Degenerate and fully clipped triangles simply draw no
/// pixels.
pub struct TriangleRenderer<'a> {
    view: &'a ViewParams,
    fb: FrameBuffer<'a>,
    clip: ColumnClip<'a>,
}

impl<'a> TriangleRenderer<'a> {
    pub fn new(view: &'a ViewParams, fb: FrameBuffer<'a>, clip: ColumnClip<'a>) -> Self {
        Self { view, fb, clip }
    }

    /// Draw textured triangles.
    ///
    /// `vertices.len()` must be a multiple of 3; each consecutive triple is
    /// one triangle, with texture coordinates in varying slots 0 and 1.
    /// `ccw` selects the fan winding after clipping.
    pub fn draw<T: Texture + ?Sized>(
        &mut self,
        object_to_world: &Mat4,
        vertices: &[Vertex],
        ccw: bool,
        texture: &T,
    ) {
        let shader = TextureShader::new(texture);
        self.draw_any(object_to_world, vertices, ccw, &shader);
    }

    /// Draw flat-colored triangles.
    pub fn fill(&mut self, object_to_world: &Mat4, vertices: &[Vertex], ccw: bool, color: u8) {
        self.draw_any(object_to_world, vertices, ccw, &FlatShader::new(color));
    }

    fn draw_any<S: PixelShader>(
        &mut self,
        object_to_world: &Mat4,
        vertices: &[Vertex],
        ccw: bool,
        shader: &S,
    ) {
        debug_assert_eq!(vertices.len() % 3, 0, "vertex count must be a multiple of 3");

        for tri in vertices.chunks_exact(3) {
            // Vertex stage: object -> world -> clip space.
            let clip_verts =
                [tri[0], tri[1], tri[2]].map(|v| self.view.world_to_clip(*object_to_world * v));

            // Cull and clip, generating additional vertices as needed.
            let mut poly =
                ClippedPolygon::from_triangle(&clip_verts[0], &clip_verts[1], &clip_verts[2]);

            // Perspective divide and viewport map, in place.
            for v in poly.vertices_mut() {
                *v = self.view.clip_to_screen(*v);
            }

            // Fan-triangulate the clipped polygon. The two windings fan
            // from opposite ends so the rasterizer always receives
            // positively oriented screen triangles for front faces.
            let verts = poly.vertices();
            let n = verts.len();
            if n < 3 {
                continue;
            }
            if ccw {
                for i in (2..=n).rev() {
                    draw_screen_triangle(
                        &mut self.fb,
                        &self.clip,
                        &verts[n - 1],
                        &verts[i - 1],
                        &verts[i - 2],
                        shader,
                    );
                }
            } else {
                for i in 2..n {
                    draw_screen_triangle(
                        &mut self.fb,
                        &self.clip,
                        &verts[0],
                        &verts[i - 1],
                        &verts[i],
                        shader,
                    );
                }
            }
        }
    }
}
