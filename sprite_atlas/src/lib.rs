// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sprite Atlas packs many small sprites and palette-coloured glyphs into the
//! layers of a single GPU texture array.
//!
//! The crate is split in two layers:
//!
//! - [`Atlas`] is a slab allocator for one layer of the array. Every slot in an
//!   atlas is the same power-of-two square, so allocation is a pop from a free
//!   list and freeing never fragments.
//! - [`TextureCache`] owns the atlases, the shared texture array and the palette
//!   lookup texture. It memoizes image and glyph locations, picks the atlas of
//!   the right size class for each miss, and grows the texture array when
//!   every suitable atlas is full.
//!
//! The GPU and the sprite rasterizer are reached through the [`GpuDevice`] and
//! [`Rasterizer`] traits, so the cache can be driven by any graphics API (or by
//! a fake device in tests).
//!
//! ## Features
//!
//! - `std` (enabled by default): Enables the `std` support of `log` and `foldhash`.

// LINEBENDER LINT SET - lib.rs - v3
// See https://linebender.org/wiki/canonical-lints/
// These lints shouldn't apply to examples or tests.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
// These lints shouldn't apply to examples.
#![warn(clippy::print_stdout, clippy::print_stderr)]
// Targeting e.g. 32-bit means structs containing usize can give false positives for 64-bit.
#![cfg_attr(target_pointer_width = "64", warn(clippy::trivially_copy_pass_by_ref))]
// END LINEBENDER LINT SET
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

pub mod atlas;
pub mod device;
mod error;
mod impl_bytemuck;
pub mod palette;
pub mod raster;

pub use atlas::{
    Atlas, CachedTextureInfo, GlyphKey, GlyphPalette, MAX_ATLAS_SIZE, SMALLEST_SLOT,
    TextureCache, TextureCacheConfig, TextureCacheStats, image_size_order,
};
pub use device::{DeviceError, GpuDevice, GpuResource};
pub use error::{Error, ErrorKind};
pub use palette::palette_to_row_offset;
pub use raster::{Bitmap, ImageId, PaletteId, Rasterizer};
