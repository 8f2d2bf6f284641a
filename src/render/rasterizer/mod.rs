//! Screen-space triangle rasterization.
//!
//! The traversal in [`halfedge`] handles coverage and clipping; the shaders
//! in [`shader`] decide the color of each covered pixel. The traversal is
//! generic over the shader, so the textured and flat paths are separate
//! monomorphizations of one body.

pub mod halfedge;
pub mod shader;

pub use halfedge::draw_screen_triangle;
pub use shader::{FlatShader, PixelShader, TextureShader};
