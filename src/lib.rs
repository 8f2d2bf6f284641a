//! A software triangle rasterizer for 8-bit indexed-color framebuffers.
//!
//! This crate is the drawing core of a classic 2.5D-style renderer: it
//! transforms triangles from object space to the screen, clips them against
//! the view frustum in homogeneous clip space, and rasterizes them with a
//! 28.4 fixed-point half-edge scan over 8x8 pixel blocks - textured with
//! perspective correction, or flat-filled with a single color index.
//!
//! The surrounding renderer owns the framebuffer, the per-column occlusion
//! windows, and the view state; all of it is passed in as borrowed views,
//! and the core allocates nothing while drawing.
//!
//! # Quick Start
//!
//! ```ignore
//! use trifill::prelude::*;
//!
//! let view = ViewParams::from_angle(Vec3::ZERO, angle, width, height);
//! let fb = FrameBuffer::new(&mut pixels, pitch);
//! let clip = ColumnClip::new(0, width as i32 - 1, &cliptop, &clipbottom);
//! let mut renderer = TriangleRenderer::new(&view, fb, clip);
//! renderer.draw(&Mat4::identity(), &wall_vertices, true, &wall_texture);
//! renderer.fill(&Mat4::identity(), &floor_vertices, true, floor_color);
//! ```

// Public API - exposed to library consumers
pub mod clipper;
pub mod math;
pub mod render;
pub mod texture;
pub mod vertex;
pub mod view;

// Demo presentation layer; needs SDL2 at build time.
#[cfg(feature = "demo")]
pub mod window;

// Re-export commonly needed types at crate root for convenience
pub use render::{ColumnClip, FrameBuffer, TriangleRenderer};
pub use texture::{IndexedTexture, Texture};
pub use vertex::{Vertex, NUM_VARYINGS};

/// Prelude module for convenient imports.
///
/// # Example
/// ```ignore
/// use trifill::prelude::*;
/// ```
pub mod prelude {
    pub use crate::math::{Mat4, Vec3};
    pub use crate::render::{ColumnClip, FrameBuffer, TriangleRenderer};
    pub use crate::texture::{IndexedTexture, Texture};
    pub use crate::vertex::{Vertex, NUM_VARYINGS};
    pub use crate::view::ViewParams;
}

/// Module exposing internals for benchmarking. Not part of the stable API.
pub mod bench {
    pub use crate::render::rasterizer::{
        draw_screen_triangle, FlatShader, PixelShader, TextureShader,
    };
}
