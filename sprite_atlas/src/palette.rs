// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout of the palette lookup texture.
//!
//! The palette lookup texture is a square single channel texture. Each row is
//! an index remap table: sampling row `y` at column `i` gives the palette index
//! that `i` is replaced with under palette `y`. Row 0 is the identity remap.

use alloc::vec::Vec;

use crate::raster::{PaletteId, Rasterizer};

/// Width and height of the palette lookup texture.
pub const PALETTE_TEXTURE_SIZE: u32 = 256;

/// The last palette placed directly after the identity row.
///
/// The rows following it are reserved, so later palettes are shifted down.
pub const WATER_PALETTE: PaletteId = 32;

/// Rows reserved after [`WATER_PALETTE`].
const RESERVED_ROWS: u32 = 4;

/// Returns the row of the palette lookup texture holding `palette`.
///
/// Ids too large for any row saturate at `u32::MAX`.
#[inline]
pub fn palette_to_row_offset(palette: PaletteId) -> u32 {
    if palette > WATER_PALETTE {
        palette.saturating_add(1 + RESERVED_ROWS)
    } else {
        palette + 1
    }
}

/// Builds the rows of the palette lookup texture.
///
/// Every palette whose row fits in the texture is requested from `rasterizer`;
/// rows without a remap keep the identity mapping.
#[expect(
    clippy::cast_possible_truncation,
    reason = "identity row indices are below 256"
)]
pub(crate) fn build_palette_rows<R: Rasterizer>(rasterizer: &mut R) -> Vec<[u8; 256]> {
    let identity: [u8; 256] = core::array::from_fn(|i| i as u8);
    let mut rows = alloc::vec![identity; PALETTE_TEXTURE_SIZE as usize];

    for palette in 0.. {
        let row = palette_to_row_offset(palette);
        if row >= PALETTE_TEXTURE_SIZE {
            break;
        }
        if let Some(remap) = rasterizer.palette_remap(palette) {
            rows[row as usize] = remap;
        }
    }
    rows
}
