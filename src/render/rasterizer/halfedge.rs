//! Half-edge block rasterization of screen-space triangles.
//!
//! One triangle is scanned in 8x8 pixel blocks. Vertex positions snap to
//! 28.4 fixed point and each triangle edge becomes a signed plane equation
//! (half-edge function) whose sign at a pixel tells which side of the edge
//! the pixel lies on; a pixel is covered when it is strictly inside all
//! three. Evaluating the three functions only at the four corners of each
//! block classifies the whole block at once:
//!
//! - all corners outside one edge: the block is skipped entirely
//! - all corners inside every edge (and no column clipping applies): the
//!   block is filled without any per-pixel tests
//! - otherwise the per-pixel test runs, stepping the edge functions
//!   incrementally across the block
//!
//! Shared edges never paint twice: a one-subunit bias on "top-left" edges
//! breaks ties so adjacent triangles with consistent winding each own
//! exactly the pixels on their side (top-left fill convention).
//!
//! Texture coordinates are perspective-correct: the quantities varying/w and
//! 1/w are linear in screen space, so their plane equations are evaluated
//! exactly at the block corners and the quotient is interpolated affinely
//! inside the block - full perspective quality at 8-pixel granularity
//! without a per-pixel divide.
//!
//! Edge deltas and half-edge accumulators are 64-bit: products of 28.4
//! coordinates exceed 32 bits for large screen triangles.
//!
//! # References
//!
//! - Juan Pineda, "A Parallel Algorithm for Polygon Rasterization" (1988)
//! - Nicolas Capens, "Advanced Rasterization",
//!   <https://web.archive.org/web/20120625103536/http://devmaster.net/forums/topic/1145-advanced-rasterization/>

use super::shader::PixelShader;
use crate::render::framebuffer::{ColumnClip, FrameBuffer};
use crate::vertex::{Vertex, NUM_VARYINGS};

/// Block size of the traversal. Must be a power of two.
const BLOCK: i32 = 8;

/// Rasterize one screen-space triangle through a pixel shader.
///
/// The triangle must be positively oriented (all three half-edge functions
/// positive inside); the triangle pipeline's fan stage guarantees that.
/// Writes are restricted to the per-column windows of `clip`; a degenerate
/// or fully clipped triangle writes nothing.
pub fn draw_screen_triangle<S: PixelShader>(
    fb: &mut FrameBuffer<'_>,
    clip: &ColumnClip<'_>,
    v1: &Vertex,
    v2: &Vertex,
    v3: &Vertex,
    shader: &S,
) {
    // 28.4 fixed-point coordinates
    let x1 = (16.0 * v1.x).round() as i32;
    let x2 = (16.0 * v2.x).round() as i32;
    let x3 = (16.0 * v3.x).round() as i32;

    let y1 = (16.0 * v1.y).round() as i32;
    let y2 = (16.0 * v2.y).round() as i32;
    let y3 = (16.0 * v3.y).round() as i32;

    // Deltas, widened so the half-edge constants cannot overflow
    let dx12 = x1 as i64 - x2 as i64;
    let dx23 = x2 as i64 - x3 as i64;
    let dx31 = x3 as i64 - x1 as i64;

    let dy12 = y1 as i64 - y2 as i64;
    let dy23 = y2 as i64 - y3 as i64;
    let dy31 = y3 as i64 - y1 as i64;

    // Fixed-point deltas
    let fdx12 = dx12 << 4;
    let fdx23 = dx23 << 4;
    let fdx31 = dx31 << 4;

    let fdy12 = dy12 << 4;
    let fdy23 = dy23 << 4;
    let fdy31 = dy31 << 4;

    // Bounding rectangle, intersected with the clip span
    let (clipymin, clipymax) = clip.y_extent();
    let minx = ((x1.min(x2).min(x3) as i64 + 0xF) >> 4).max(clip.left as i64);
    let maxx = ((x1.max(x2).max(x3) as i64 + 0xF) >> 4).min(clip.right as i64);
    let miny = ((y1.min(y2).min(y3) as i64 + 0xF) >> 4).max(clipymin as i64);
    let maxy = ((y1.max(y2).max(y3) as i64 + 0xF) >> 4).min(clipymax as i64 - 1);
    if minx >= maxx || miny >= maxy {
        return;
    }

    // Start in the corner of an 8x8 block
    let minx = (minx as i32) & !(BLOCK - 1);
    let miny = (miny as i32) & !(BLOCK - 1);
    let maxx = maxx as i32;
    let maxy = maxy as i32;

    // Half-edge constants
    let mut c1 = dy12 * x1 as i64 - dx12 * y1 as i64;
    let mut c2 = dy23 * x2 as i64 - dx23 * y2 as i64;
    let mut c3 = dy31 * x3 as i64 - dx31 * y3 as i64;

    // Correct for the top-left fill convention
    if dy12 < 0 || (dy12 == 0 && dx12 > 0) {
        c1 += 1;
    }
    if dy23 < 0 || (dy23 == 0 && dx23 > 0) {
        c2 += 1;
    }
    if dy31 < 0 || (dy31 == 0 && dx31 > 0) {
        c3 += 1;
    }

    let grads = if S::NEEDS_VARYINGS {
        Gradients::of_triangle(v1, v2, v3, minx, miny)
    } else {
        Gradients::default()
    };

    let height = fb.height();

    // Loop through blocks
    for y in (miny..maxy).step_by(BLOCK as usize) {
        for x in (minx..maxx).step_by(BLOCK as usize) {
            // Corners of the block
            let bx0 = (x as i64) << 4;
            let bx1 = ((x + BLOCK - 1) as i64) << 4;
            let by0 = (y as i64) << 4;
            let by1 = ((y + BLOCK - 1) as i64) << 4;

            // Evaluate the half-edge functions at all four corners
            let a = corner_mask(c1, dx12, dy12, bx0, bx1, by0, by1);
            let b = corner_mask(c2, dx23, dy23, bx0, bx1, by0, by1);
            let c = corner_mask(c3, dx31, dy31, bx0, bx1, by0, by1);

            // Skip the block when it is fully outside an edge
            if a == 0x0 || b == 0x0 || c == 0x0 {
                continue;
            }

            // Count columns whose clip window doesn't fully contain the
            // block's rows. The tests short-circuit before indexing columns
            // outside the clip span.
            let mut clipcount = 0;
            for ix in x..x + BLOCK {
                let outside = clip.left > ix
                    || clip.right < ix
                    || clip.top[ix as usize] as i32 > y
                    || (clip.bottom[ix as usize] as i32) <= y + BLOCK - 1;
                clipcount += outside as i32;
            }

            // Perspective-correct varyings at the block corners
            let corners = if S::NEEDS_VARYINGS {
                grads.at_block((x - minx) as f32 + 0.5, (y - miny) as f32 + 0.5)
            } else {
                BlockCorners::default()
            };

            // Accept the whole block when totally covered
            if a == 0xF && b == 0xF && c == 0xF && clipcount == 0 {
                for iy in 0..BLOCK {
                    let (mut varying, step) = if S::NEEDS_VARYINGS {
                        corners.row(iy)
                    } else {
                        ([0.0; NUM_VARYINGS], [0.0; NUM_VARYINGS])
                    };

                    let row = fb.row_mut(y + iy);
                    for ix in x..x + BLOCK {
                        row[ix as usize] = shader.shade(&varying);

                        if S::NEEDS_VARYINGS {
                            for i in 0..NUM_VARYINGS {
                                varying[i] += step[i];
                            }
                        }
                    }
                }
            } else {
                // Partially covered block
                let mut cy1 = c1 + dx12 * by0 - dy12 * bx0;
                let mut cy2 = c2 + dx23 * by0 - dy23 * bx0;
                let mut cy3 = c3 + dx31 * by0 - dy31 * bx0;

                for iy in 0..BLOCK {
                    let mut cx1 = cy1;
                    let mut cx2 = cy2;
                    let mut cx3 = cy3;

                    let (mut varying, step) = if S::NEEDS_VARYINGS {
                        corners.row(iy)
                    } else {
                        ([0.0; NUM_VARYINGS], [0.0; NUM_VARYINGS])
                    };

                    let py = y + iy;
                    // The block may hang below every clip window; rows past
                    // the target are never admitted, so skip them outright.
                    if py < height {
                        let row = fb.row_mut(py);
                        for ix in x..x + BLOCK {
                            if cx1 > 0 && cx2 > 0 && cx3 > 0 && clip.admits(ix, py) {
                                row[ix as usize] = shader.shade(&varying);
                            }

                            if S::NEEDS_VARYINGS {
                                for i in 0..NUM_VARYINGS {
                                    varying[i] += step[i];
                                }
                            }

                            cx1 -= fdy12;
                            cx2 -= fdy23;
                            cx3 -= fdy31;
                        }
                    }

                    cy1 += fdx12;
                    cy2 += fdx23;
                    cy3 += fdx31;
                }
            }
        }
    }
}

/// Signs of one half-edge function at the four corners of a block, packed
/// as a 4-bit mask: 0x0 = fully outside, 0xF = fully inside.
#[inline]
fn corner_mask(c: i64, dx: i64, dy: i64, x0: i64, x1: i64, y0: i64, y1: i64) -> u32 {
    let m00 = (c + dx * y0 - dy * x0 > 0) as u32;
    let m10 = (c + dx * y0 - dy * x1 > 0) as u32;
    let m01 = (c + dx * y1 - dy * x0 > 0) as u32;
    let m11 = (c + dx * y1 - dy * x1 > 0) as u32;
    m00 | (m10 << 1) | (m01 << 2) | (m11 << 3)
}

/// Screen-space x gradient of a per-vertex quantity over the triangle plane.
fn grad_x(v1: &Vertex, v2: &Vertex, v3: &Vertex, c1: f32, c2: f32, c3: f32) -> f32 {
    let top = (c2 - c3) * (v1.y - v3.y) - (c1 - c3) * (v2.y - v3.y);
    let bottom = (v2.x - v3.x) * (v1.y - v3.y) - (v1.x - v3.x) * (v2.y - v3.y);
    top / bottom
}

/// Screen-space y gradient of a per-vertex quantity over the triangle plane.
fn grad_y(v1: &Vertex, v2: &Vertex, v3: &Vertex, c1: f32, c2: f32, c3: f32) -> f32 {
    let top = (c2 - c3) * (v1.x - v3.x) - (c1 - c3) * (v2.x - v3.x);
    let bottom = -((v2.x - v3.x) * (v1.y - v3.y) - (v1.x - v3.x) * (v2.y - v3.y));
    top / bottom
}

/// Plane equations of 1/w and of each varying/w, anchored at the aligned
/// bounding-box origin. Evaluating them at block corners gives values that
/// are exact there and linear in between.
#[derive(Default)]
struct Gradients {
    w_x: f32,
    w_y: f32,
    w_start: f32,
    varying_x: [f32; NUM_VARYINGS],
    varying_y: [f32; NUM_VARYINGS],
    varying_start: [f32; NUM_VARYINGS],
}

impl Gradients {
    /// `v1..v3` are screen-space vertices whose `w` holds 1/w_clip; the
    /// perspective-ready quantity for each varying is `varying * w`.
    fn of_triangle(v1: &Vertex, v2: &Vertex, v3: &Vertex, minx: i32, miny: i32) -> Self {
        let w_x = grad_x(v1, v2, v3, v1.w, v2.w, v3.w);
        let w_y = grad_y(v1, v2, v3, v1.w, v2.w, v3.w);
        let mut g = Gradients {
            w_x,
            w_y,
            w_start: v1.w + w_x * (minx as f32 - v1.x) + w_y * (miny as f32 - v1.y),
            ..Default::default()
        };
        for i in 0..NUM_VARYINGS {
            let c1 = v1.varying[i] * v1.w;
            let c2 = v2.varying[i] * v2.w;
            let c3 = v3.varying[i] * v3.w;
            g.varying_x[i] = grad_x(v1, v2, v3, c1, c2, c3);
            g.varying_y[i] = grad_y(v1, v2, v3, c1, c2, c3);
            g.varying_start[i] = c1
                + g.varying_x[i] * (minx as f32 - v1.x)
                + g.varying_y[i] * (miny as f32 - v1.y);
        }
        g
    }

    /// Perspective-divided varyings at the four corners of the block whose
    /// top-left pixel center sits at (offx0, offy0) from the box origin.
    fn at_block(&self, offx0: f32, offy0: f32) -> BlockCorners {
        let offx1 = offx0 + BLOCK as f32;
        let offy1 = offy0 + BLOCK as f32;
        let rcp_w_tl = 1.0 / (self.w_start + offx0 * self.w_x + offy0 * self.w_y);
        let rcp_w_tr = 1.0 / (self.w_start + offx1 * self.w_x + offy0 * self.w_y);
        let rcp_w_bl = 1.0 / (self.w_start + offx0 * self.w_x + offy1 * self.w_y);
        let rcp_w_br = 1.0 / (self.w_start + offx1 * self.w_x + offy1 * self.w_y);

        let mut corners = BlockCorners::default();
        for i in 0..NUM_VARYINGS {
            let x0 = offx0 * self.varying_x[i];
            let x1 = offx1 * self.varying_x[i];
            let y0 = offy0 * self.varying_y[i];
            let y1 = offy1 * self.varying_y[i];
            let tl = (self.varying_start[i] + x0 + y0) * rcp_w_tl;
            let tr = (self.varying_start[i] + x1 + y0) * rcp_w_tr;
            let bl = (self.varying_start[i] + x0 + y1) * rcp_w_bl;
            let br = (self.varying_start[i] + x1 + y1) * rcp_w_br;
            corners.tl[i] = tl;
            corners.tr[i] = tr;
            corners.left_step[i] = (bl - tl) * (1.0 / BLOCK as f32);
            corners.right_step[i] = (br - tr) * (1.0 / BLOCK as f32);
        }
        corners
    }
}

/// Varyings at a block's top corners plus the per-row steps down its left
/// and right edges. Rows interpolate between the two edges.
#[derive(Default)]
struct BlockCorners {
    tl: [f32; NUM_VARYINGS],
    tr: [f32; NUM_VARYINGS],
    left_step: [f32; NUM_VARYINGS],
    right_step: [f32; NUM_VARYINGS],
}

impl BlockCorners {
    /// Varyings at the left edge of row `iy` and the per-pixel step across.
    #[inline]
    fn row(&self, iy: i32) -> ([f32; NUM_VARYINGS], [f32; NUM_VARYINGS]) {
        let fy = iy as f32;
        let mut varying = [0.0; NUM_VARYINGS];
        let mut step = [0.0; NUM_VARYINGS];
        for i in 0..NUM_VARYINGS {
            varying[i] = self.tl[i] + self.left_step[i] * fy;
            step[i] =
                (self.tr[i] + self.right_step[i] * fy - varying[i]) * (1.0 / BLOCK as f32);
        }
        (varying, step)
    }
}
