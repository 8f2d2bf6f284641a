//! Pixel shaders for triangle rasterization.
//!
//! The rasterizer handles coverage: fixed-point edge setup, block traversal,
//! and per-column clipping. The shader turns the interpolated varyings of
//! one covered pixel into a color index. Keeping the two apart lets a single
//! traversal body serve both the textured and the flat path; the rasterizer
//! is generic over the shader, so each specialization is monomorphized and
//! the inner loops stay branch-free.

use crate::texture::Texture;
use crate::vertex::NUM_VARYINGS;

/// Per-pixel shading for the block rasterizer.
///
/// `NEEDS_VARYINGS` tells the rasterizer whether this shader reads the
/// varying array at all. When false, the traversal skips every gradient,
/// 1/w, and interpolation step - the flat path degenerates to pure coverage.
pub trait PixelShader {
    const NEEDS_VARYINGS: bool;

    /// Compute the color index for a pixel given its interpolated varyings.
    fn shade(&self, varying: &[f32; NUM_VARYINGS]) -> u8;
}

/// Writes a constant color index for every covered pixel.
pub struct FlatShader {
    color: u8,
}

impl FlatShader {
    pub fn new(color: u8) -> Self {
        Self { color }
    }
}

impl PixelShader for FlatShader {
    const NEEDS_VARYINGS: bool = false;

    #[inline]
    fn shade(&self, _varying: &[f32; NUM_VARYINGS]) -> u8 {
        self.color
    }
}

/// Samples a column-major indexed texture at the interpolated (u, v).
///
/// Coordinates wrap: the fractional part of u (as a 32-bit fixed-point
/// fraction) is multiplied by the texture width with a 0.16 x 16 multiply,
/// so tiling works for any texture size, powers of two or not.
pub struct TextureShader<'a> {
    pixels: &'a [u8],
    width: u32,
    height: u32,
}

impl<'a> TextureShader<'a> {
    pub fn new<T: Texture + ?Sized>(texture: &'a T) -> Self {
        let (width, height) = (texture.width(), texture.height());
        let pixels = texture.pixels();
        debug_assert!(width > 0 && height > 0, "empty texture");
        debug_assert_eq!(pixels.len(), (width * height) as usize);
        Self {
            pixels,
            width,
            height,
        }
    }
}

impl PixelShader for TextureShader<'_> {
    const NEEDS_VARYINGS: bool = true;

    #[inline]
    fn shade(&self, varying: &[f32; NUM_VARYINGS]) -> u8 {
        let u = varying[0];
        let v = varying[1];
        // Wrapping 32-bit fraction of the coordinate, then a 0.16 multiply
        // by the texel count selects the column/row.
        let ufrac = ((u - u.floor()) * 4294967296.0) as u64 as u32;
        let vfrac = ((v - v.floor()) * 4294967296.0) as u64 as u32;
        let upos = ((ufrac >> 16) * self.width) >> 16;
        let vpos = ((vfrac >> 16) * self.height) >> 16;
        self.pixels[(upos * self.height + vpos) as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::texture::IndexedTexture;

    fn shade_at(shader: &TextureShader<'_>, u: f32, v: f32) -> u8 {
        let mut varying = [0.0f32; NUM_VARYINGS];
        varying[0] = u;
        varying[1] = v;
        shader.shade(&varying)
    }

    #[test]
    fn samples_column_major() {
        let tex = IndexedTexture::from_fn(4, 4, |u, v| (u * 16 + v) as u8);
        let shader = TextureShader::new(&tex);
        assert_eq!(shade_at(&shader, 0.0, 0.0), 0);
        assert_eq!(shade_at(&shader, 0.26, 0.51), 16 + 2);
        assert_eq!(shade_at(&shader, 0.76, 0.76), 48 + 3);
    }

    #[test]
    fn coordinates_wrap() {
        let tex = IndexedTexture::from_fn(4, 4, |u, v| (u * 16 + v) as u8);
        let shader = TextureShader::new(&tex);
        assert_eq!(shade_at(&shader, 1.26, -0.49), shade_at(&shader, 0.26, 0.51));
    }

    #[test]
    fn non_power_of_two_sizes_stay_in_range() {
        let tex = IndexedTexture::from_fn(5, 3, |u, v| (u * 3 + v) as u8);
        let shader = TextureShader::new(&tex);
        // Just below 1.0 must select the last column/row, never run past.
        assert_eq!(shade_at(&shader, 0.9999, 0.9999), 4 * 3 + 2);
    }

    #[test]
    fn flat_shader_ignores_varyings() {
        let shader = FlatShader::new(7);
        assert_eq!(shader.shade(&[123.0; NUM_VARYINGS]), 7);
    }
}
