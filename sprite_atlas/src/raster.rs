// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pixel sources for cache misses.

use alloc::vec;
use alloc::vec::Vec;

use crate::atlas::GlyphPalette;

/// Identifier of a sprite image.
pub type ImageId = u32;

/// Identifier of a remap palette in the palette lookup texture.
pub type PaletteId = u32;

/// A rasterized image: one palette index byte per pixel, row-major.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Bitmap {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// `width * height` palette indices, tightly packed.
    pub pixels: Vec<u8>,
}

impl Bitmap {
    /// Creates a transparent (index 0) bitmap.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize],
        }
    }

    /// Wraps existing pixel data.
    ///
    /// # Panics
    ///
    /// Panics if `pixels` does not hold exactly `width * height` bytes.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        assert_eq!(
            pixels.len(),
            width as usize * height as usize,
            "bitmap of {width}x{height} needs one byte per pixel"
        );
        Self {
            width,
            height,
            pixels,
        }
    }
}

/// Renders sprites and glyphs into [`Bitmap`]s on a cache miss.
///
/// The cache treats every call as synchronous and side-effect free: the same
/// inputs must produce the same pixels, since results are memoized until
/// the image is invalidated.
pub trait Rasterizer {
    /// Renders the sprite `image` with its own colours.
    fn rasterize_image(&mut self, image: ImageId) -> Bitmap;

    /// Renders the sprite `image` as a text glyph, substituting the colour ramp
    /// in `palette`.
    fn rasterize_glyph(&mut self, image: ImageId, palette: &GlyphPalette) -> Bitmap;

    /// Returns the 256-entry index remap table for `palette`, if one exists.
    ///
    /// Queried once per palette row when the palette lookup texture is built.
    fn palette_remap(&mut self, palette: PaletteId) -> Option<[u8; 256]> {
        let _ = palette;
        None
    }
}
