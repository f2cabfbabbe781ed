// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Slot atlases and the texture cache built on them.
//!
//! This module provides:
//! - [`Atlas`], a slab allocator handing out equally sized square slots from
//!   one layer of the texture array
//! - [`image_size_order`], the size class function deciding which atlas an
//!   image belongs in
//! - [`TextureCache`], which memoizes image and glyph locations and grows the
//!   texture array on demand

mod cache;
mod key;
mod location;
mod slab;

pub use cache::{MAX_ATLAS_SIZE, TextureCache, TextureCacheConfig, TextureCacheStats};
pub use key::{GLYPH_PALETTE_LEN, GlyphKey, GlyphPalette};
pub use location::CachedTextureInfo;
pub use slab::{Atlas, SMALLEST_SLOT, image_size_order};
