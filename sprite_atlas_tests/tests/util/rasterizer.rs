// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A [`Rasterizer`] producing solid, recognisable bitmaps.

use std::collections::HashMap;

use sprite_atlas::{Bitmap, GlyphPalette, ImageId, PaletteId, Rasterizer};

/// Renders every image as a solid block.
///
/// Image pixels hold [`FakeRasterizer::image_fill`] and glyph pixels hold the
/// first entry of their palette, so tests can tell uploads apart.
#[derive(Debug, Default)]
pub(crate) struct FakeRasterizer {
    sizes: HashMap<ImageId, (u32, u32)>,
    remaps: HashMap<PaletteId, [u8; 256]>,
    pub(crate) image_calls: Vec<ImageId>,
    pub(crate) glyph_calls: Vec<(ImageId, GlyphPalette)>,
}

impl FakeRasterizer {
    /// Sets the size `image` rasterizes to. Unknown images are 16 × 16.
    pub(crate) fn set_size(&mut self, image: ImageId, width: u32, height: u32) {
        self.sizes.insert(image, (width, height));
    }

    pub(crate) fn with_size(mut self, image: ImageId, width: u32, height: u32) -> Self {
        self.set_size(image, width, height);
        self
    }

    pub(crate) fn with_remap(mut self, palette: PaletteId, remap: [u8; 256]) -> Self {
        self.remaps.insert(palette, remap);
        self
    }

    pub(crate) fn image_fill(image: ImageId) -> u8 {
        (image % 250) as u8 + 1
    }

    fn size(&self, image: ImageId) -> (u32, u32) {
        self.sizes.get(&image).copied().unwrap_or((16, 16))
    }
}

impl Rasterizer for FakeRasterizer {
    fn rasterize_image(&mut self, image: ImageId) -> Bitmap {
        self.image_calls.push(image);
        let (width, height) = self.size(image);
        Bitmap::from_pixels(
            width,
            height,
            vec![Self::image_fill(image); (width * height) as usize],
        )
    }

    fn rasterize_glyph(&mut self, image: ImageId, palette: &GlyphPalette) -> Bitmap {
        self.glyph_calls.push((image, *palette));
        let (width, height) = self.size(image);
        Bitmap::from_pixels(width, height, vec![palette.0[0]; (width * height) as usize])
    }

    fn palette_remap(&mut self, palette: PaletteId) -> Option<[u8; 256]> {
        self.remaps.get(&palette).copied()
    }
}
