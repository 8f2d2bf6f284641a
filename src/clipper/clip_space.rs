//! Clip-space clipping against the homogeneous clip cube.
//!
//! Clipping occurs after projection (in homogeneous clip space), before the
//! perspective divide. The clip volume is defined by:
//!
//! ```text
//! -w <= x <= w
//! -w <= y <= w
//! -w <= z <= w
//! ```
//!
//! Rather than re-clipping a growing polygon once per plane, each triangle
//! edge is clipped against all six planes as a parametric interval
//! `[t1, t2] ⊆ [0, 1]`: every plane shrinks the interval, and an edge whose
//! interval empties is dropped whole. Each surviving edge then contributes
//! at most two vertices, so a clipped triangle never exceeds six — which
//! lets the output live in a fixed-size buffer with no heap allocation.
//!
//! Varyings interpolate linearly in clip space (pre-divide). That is the
//! correct operation because perspective correction happens later in the
//! rasterizer, via the interpolated 1/w.

use crate::vertex::Vertex;

/// Maximum vertex count of a clipped triangle: three edges, two emissions
/// each.
pub const MAX_CLIPPED_VERTICES: usize = 6;

/// The 6 planes of the canonical clip-space cube.
///
/// Each plane is defined implicitly by a linear inequality on (x, y, z, w).
/// The signed distance is positive when inside the clip volume.
#[derive(Clone, Copy, Debug)]
pub enum ClipPlane {
    /// Left plane: x >= -w
    Left,
    /// Right plane: x <= w
    Right,
    /// Bottom plane: y >= -w
    Bottom,
    /// Top plane: y <= w
    Top,
    /// Near plane: z >= -w
    Near,
    /// Far plane: z <= w
    Far,
}

impl ClipPlane {
    /// All six planes, in the order they are tested.
    pub const ALL: [ClipPlane; 6] = [
        ClipPlane::Left,
        ClipPlane::Right,
        ClipPlane::Bottom,
        ClipPlane::Top,
        ClipPlane::Near,
        ClipPlane::Far,
    ];

    /// Returns the signed distance from a vertex to this plane.
    /// Positive = inside the clip volume, Negative = outside.
    #[inline]
    pub fn signed_distance(&self, v: &Vertex) -> f32 {
        match self {
            Self::Left => v.w + v.x,   // x >= -w  =>  w + x >= 0
            Self::Right => v.w - v.x,  // x <= w   =>  w - x >= 0
            Self::Bottom => v.w + v.y, // y >= -w  =>  w + y >= 0
            Self::Top => v.w - v.y,    // y <= w   =>  w - y >= 0
            Self::Near => v.w + v.z,   // z >= -w  =>  w + z >= 0
            Self::Far => v.w - v.z,    // z <= w   =>  w - z >= 0
        }
    }
}

/// Shrink the surviving interval `[t1, t2]` of an edge by one half-space.
///
/// `d1` and `d2` are the signed plane distances at the edge's endpoints
/// (t = 0 and t = 1). Returns true when the currently-surviving segment lies
/// entirely outside, in which case the interval is meaningless.
fn shrink_interval(d1: f32, d2: f32, t1: &mut f32, t2: &mut f32) -> bool {
    let da = d1 * (1.0 - *t1) + d2 * *t1;
    let db = d1 * (1.0 - *t2) + d2 * *t2;
    if da < 0.0 && db < 0.0 {
        return true;
    }

    if da < 0.0 {
        *t1 = (-d1 / (d2 - d1)).max(*t1);
    }

    if db < 0.0 {
        *t2 = (1.0 + d2 / (d1 - d2)).min(*t2);
    }

    false
}

/// An ordered convex polygon produced by clipping one triangle.
///
/// Holds at most [`MAX_CLIPPED_VERTICES`] vertices inline; the triangle
/// pipeline maps them to screen space in place and fan-triangulates them.
#[derive(Clone, Copy)]
pub struct ClippedPolygon {
    vertices: [Vertex; MAX_CLIPPED_VERTICES],
    len: usize,
}

impl ClippedPolygon {
    /// Clip a triangle against all six planes of the clip cube.
    ///
    /// The result may be empty if the triangle was entirely outside the clip
    /// volume. Every emitted vertex satisfies `-w <= x, y, z <= w` (within
    /// floating-point tolerance).
    pub fn from_triangle(v1: &Vertex, v2: &Vertex, v3: &Vertex) -> Self {
        let mut poly = Self {
            vertices: [Vertex::default(); MAX_CLIPPED_VERTICES],
            len: 0,
        };
        poly.clip_edge(v1, v2);
        poly.clip_edge(v2, v3);
        poly.clip_edge(v3, v1);
        poly
    }

    /// Clip one directed edge and append its surviving vertices.
    ///
    /// When `t1` stays at 0 the start vertex is emitted verbatim, preserving
    /// exact input where no plane intersects. The vertex at `t2 == 1` is
    /// omitted; the next edge's start emission covers it.
    fn clip_edge(&mut self, a: &Vertex, b: &Vertex) {
        let mut t1 = 0.0f32;
        let mut t2 = 1.0f32;

        for plane in ClipPlane::ALL {
            let d1 = plane.signed_distance(a);
            let d2 = plane.signed_distance(b);
            if shrink_interval(d1, d2, &mut t1, &mut t2) {
                return;
            }
        }

        if t1 == 0.0 {
            self.push(*a);
        } else {
            self.push(a.lerp(b, t1));
        }

        if t2 != 1.0 {
            self.push(a.lerp(b, t2));
        }
    }

    #[inline]
    fn push(&mut self, v: Vertex) {
        debug_assert!(self.len < MAX_CLIPPED_VERTICES);
        self.vertices[self.len] = v;
        self.len += 1;
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices[..self.len]
    }

    pub fn vertices_mut(&mut self) -> &mut [Vertex] {
        &mut self.vertices[..self.len]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn assert_in_clip_volume(v: &Vertex) {
        let eps = 1e-4 * v.w.abs().max(1.0);
        assert!(v.x.abs() <= v.w + eps, "x out of volume: {:?}", v);
        assert!(v.y.abs() <= v.w + eps, "y out of volume: {:?}", v);
        assert!(v.z.abs() <= v.w + eps, "z out of volume: {:?}", v);
    }

    #[test]
    fn fully_inside_triangle_passes_through_verbatim() {
        let v1 = Vertex::with_uv(0.0, 0.0, 0.0, 0.0, 0.0);
        let v2 = Vertex::with_uv(0.5, 0.25, 0.0, 1.0, 0.0);
        let v3 = Vertex::with_uv(-0.25, 0.5, 0.5, 0.0, 1.0);
        let poly = ClippedPolygon::from_triangle(&v1, &v2, &v3);
        assert_eq!(poly.vertices(), &[v1, v2, v3]);
    }

    #[test]
    fn fully_outside_triangle_is_culled() {
        // Entirely beyond the right plane: x > w for every point.
        let v1 = Vertex::new(2.0, 0.0, 0.0, 1.0);
        let v2 = Vertex::new(3.0, 0.5, 0.0, 1.0);
        let v3 = Vertex::new(2.5, -0.5, 0.0, 1.0);
        let poly = ClippedPolygon::from_triangle(&v1, &v2, &v3);
        assert!(poly.is_empty());
    }

    #[test]
    fn near_plane_split_yields_quad_on_the_plane() {
        // One vertex behind the near plane (z < -w); the other two inside.
        let v1 = Vertex::new(0.0, 0.0, 0.0, 1.0);
        let v2 = Vertex::new(0.5, 0.0, 0.0, 1.0);
        let v3 = Vertex::new(0.0, 0.0, -2.0, 1.0);
        let poly = ClippedPolygon::from_triangle(&v1, &v2, &v3);

        assert_eq!(poly.len(), 4);
        for v in poly.vertices() {
            assert_in_clip_volume(v);
        }

        // The two new vertices sit exactly on z = -w.
        let on_plane: Vec<_> = poly
            .vertices()
            .iter()
            .filter(|v| (v.z + v.w).abs() < 1e-5)
            .collect();
        assert_eq!(on_plane.len(), 2);
    }

    #[test]
    fn varyings_interpolate_linearly_at_the_crossing() {
        // Edge from u=0 at z=0 to u=1 at z=-2 crosses z=-w at t=0.5.
        let v1 = Vertex::with_uv(0.0, 0.0, 0.0, 0.0, 0.0);
        let v2 = Vertex::with_uv(0.5, 0.0, 0.0, 0.0, 0.0);
        let v3 = Vertex::with_uv(0.0, 0.0, -2.0, 1.0, 0.0);
        let poly = ClippedPolygon::from_triangle(&v1, &v2, &v3);

        let crossing = poly
            .vertices()
            .iter()
            .find(|v| (v.z + v.w).abs() < 1e-5 && v.varying[0] > 0.0)
            .expect("crossing vertex with interpolated u");
        assert_relative_eq!(crossing.varying[0], 0.5, epsilon = 1e-5);
    }

    #[test]
    fn every_output_vertex_lies_inside_the_volume() {
        // A wide triangle poking out of the left and right planes at once.
        let v1 = Vertex::new(-4.0, 0.0, 0.0, 1.0);
        let v2 = Vertex::new(4.0, 0.5, 0.0, 1.0);
        let v3 = Vertex::new(0.0, 0.5, 0.5, 1.0);
        let poly = ClippedPolygon::from_triangle(&v1, &v2, &v3);

        // Both crossing edges split; one vertex survives verbatim.
        assert_eq!(poly.len(), 5);
        for v in poly.vertices() {
            assert_in_clip_volume(v);
        }
    }
}
