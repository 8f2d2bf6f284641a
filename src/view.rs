//! Per-frame view and viewport state.
//!
//! The [`ViewParams`] struct is the single source of truth for the transform
//! from world space into clip space and from normalized device coordinates
//! onto the screen. The surrounding renderer computes one per frame and
//! passes it explicitly; nothing in the pipeline reads process-wide state.

use crate::math::Vec3;
use crate::vertex::Vertex;

/// Near plane distance of the fixed world-to-clip projection.
pub const NEAR: f32 = 5.0;
/// Far plane distance of the fixed world-to-clip projection.
pub const FAR: f32 = 65536.0;

/// View position, view-angle trig, and viewport mapping for one frame.
///
/// `view_sin`/`view_cos` are the sine and cosine of the view yaw;
/// `view_tan_cos`/`view_tan_sin` are the same pair scaled by the focal
/// tangent (equal to the unscaled pair at a 90 degree field of view).
/// `inv_z_to_scale` is the vertical viewport scale; it equals `center_x`
/// when pixels are square.
#[derive(Debug, Clone, Copy)]
pub struct ViewParams {
    pub pos: Vec3,
    pub view_sin: f32,
    pub view_cos: f32,
    pub view_tan_cos: f32,
    pub view_tan_sin: f32,
    pub center_x: f32,
    pub center_y: f32,
    pub inv_z_to_scale: f32,
}

impl ViewParams {
    /// Build view parameters for a camera at `pos` with yaw `angle`, looking
    /// along `(cos(angle), sin(angle))` in the XY plane, rendering to a
    /// `width` x `height` viewport with square pixels and a 90 degree field
    /// of view.
    pub fn from_angle(pos: Vec3, angle: f32, width: u32, height: u32) -> Self {
        let (sin, cos) = angle.sin_cos();
        let center_x = width as f32 * 0.5;
        Self {
            pos,
            view_sin: sin,
            view_cos: cos,
            view_tan_cos: cos,
            view_tan_sin: sin,
            center_x,
            center_y: height as f32 * 0.5,
            inv_z_to_scale: center_x,
        }
    }

    /// Transform a world-space vertex into clip space.
    ///
    /// The camera looks along the view angle in the XY plane; world Z is
    /// vertical. Depth is the distance along the view direction, and the
    /// asymmetric 0.5 scales on x and y set the clip-cube extents the
    /// rasterizer's fill convention depends on.
    pub fn world_to_clip(&self, v: Vertex) -> Vertex {
        let tr_x = v.x - self.pos.x;
        let tr_y = v.y - self.pos.y;
        let tr_z = v.z - self.pos.z;
        let tx = tr_x * self.view_sin - tr_y * self.view_cos;
        let tz = tr_x * self.view_tan_cos + tr_y * self.view_tan_sin;
        Vertex {
            x: tx * 0.5,
            y: tr_z * 0.5,
            z: -tz * (FAR + NEAR) / (NEAR - FAR) + 2.0 * FAR * NEAR / (NEAR - FAR),
            w: tz,
            varying: v.varying,
        }
    }

    /// Perspective-divide a clip-space vertex and map it to the viewport.
    ///
    /// Afterwards `w` holds 1/w_clip, which the rasterizer interpolates for
    /// perspective correction.
    pub fn clip_to_screen(&self, mut v: Vertex) -> Vertex {
        v.w = 1.0 / v.w;
        v.x *= v.w;
        v.y *= v.w;
        v.z *= v.w;
        v.x = self.center_x + v.x * 2.0 * self.center_x;
        v.y = self.center_y - v.y * 2.0 * self.inv_z_to_scale;
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn depth_is_distance_along_view_direction() {
        // Looking along +y: a point 20 ahead has w = 20.
        let view = ViewParams::from_angle(Vec3::ZERO, FRAC_PI_2, 64, 64);
        let clip = view.world_to_clip(Vertex::new(0.0, 20.0, 0.0, 1.0));
        assert_relative_eq!(clip.w, 20.0, epsilon = 1e-4);
        assert_relative_eq!(clip.x, 0.0, epsilon = 1e-4);
    }

    #[test]
    fn screen_mapping_centers_the_axis_point() {
        let view = ViewParams::from_angle(Vec3::ZERO, FRAC_PI_2, 64, 64);
        let clip = view.world_to_clip(Vertex::new(0.0, 20.0, 0.0, 1.0));
        let screen = view.clip_to_screen(clip);
        assert_relative_eq!(screen.x, 32.0, epsilon = 1e-3);
        assert_relative_eq!(screen.y, 32.0, epsilon = 1e-3);
        assert_relative_eq!(screen.w, 1.0 / 20.0, epsilon = 1e-6);
    }

    #[test]
    fn lateral_offset_moves_across_the_screen() {
        let view = ViewParams::from_angle(Vec3::ZERO, FRAC_PI_2, 64, 64);
        let right = view.clip_to_screen(view.world_to_clip(Vertex::new(8.0, 20.0, 0.0, 1.0)));
        let left = view.clip_to_screen(view.world_to_clip(Vertex::new(-8.0, 20.0, 0.0, 1.0)));
        assert!(right.x > 32.0);
        assert!(left.x < 32.0);
        assert_relative_eq!(right.x - 32.0, 32.0 - left.x, epsilon = 1e-3);
    }
}
