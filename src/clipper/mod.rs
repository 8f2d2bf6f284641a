//! Polygon clipping against the homogeneous clip cube.
//!
//! Clipping happens after projection (in clip space), before the perspective
//! divide, which keeps the planes fixed regardless of projection parameters.

pub mod clip_space;

pub use clip_space::{ClipPlane, ClippedPolygon, MAX_CLIPPED_VERTICES};
