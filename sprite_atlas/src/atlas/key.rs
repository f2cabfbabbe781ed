// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Glyph cache key.

use crate::raster::ImageId;

/// Number of palette entries substituted when a glyph is drawn.
pub const GLYPH_PALETTE_LEN: usize = 8;

/// The colour ramp a text glyph is drawn with.
///
/// Glyph sprites are drawn with a small run of palette entries replaced by the
/// text colours; this holds those replacement indices. Identity is by value:
/// two palettes built separately with the same entries are the same palette.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct GlyphPalette(pub [u8; GLYPH_PALETTE_LEN]);

impl GlyphPalette {
    /// Packs the ramp into a single integer, first entry in the low byte.
    #[inline]
    pub fn packed(&self) -> u64 {
        u64::from_le_bytes(self.0)
    }
}

impl From<[u8; GLYPH_PALETTE_LEN]> for GlyphPalette {
    fn from(entries: [u8; GLYPH_PALETTE_LEN]) -> Self {
        Self(entries)
    }
}

/// Unique identifier for a cached glyph bitmap.
///
/// A glyph is a sprite drawn with a particular [`GlyphPalette`], so the same
/// sprite drawn in two colours is two cache entries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GlyphKey {
    /// The sprite being drawn.
    pub image: ImageId,
    /// The colours it is drawn with.
    pub palette: GlyphPalette,
}

impl GlyphKey {
    /// Creates a new key.
    #[inline]
    pub fn new(image: ImageId, palette: GlyphPalette) -> Self {
        Self { image, palette }
    }
}
