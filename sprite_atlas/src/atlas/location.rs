// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Resolved location of a cached image.

/// Where a cached image lives in the texture array.
///
/// Produced once when the image is loaded and never mutated; invalidating the
/// image and loading it again yields a fresh value. Locations stay valid when
/// the texture array grows, since growth preserves layer indices.
#[derive(Clone, Copy, Debug, PartialEq)]
#[repr(C)]
pub struct CachedTextureInfo {
    /// Layer of the texture array holding the image.
    pub layer: u32,
    /// Slot within the layer's atlas.
    pub slot: u32,
    /// Pixel bounds of the image as `[left, top, right, bottom]`.
    ///
    /// The image is anchored at the slot's top left corner, so the bounds can
    /// be smaller than the slot.
    pub bounds: [u32; 4],
    /// `bounds` divided by the layer dimensions, as texture coordinates.
    pub normalized_bounds: [f32; 4],
    /// Texel-space `[x, y, width, height]` of the image, for shaders that fetch
    /// raw palette indices when recolouring.
    pub computed_bounds: [f32; 4],
}

impl CachedTextureInfo {
    /// Width of the image in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.bounds[2] - self.bounds[0]
    }

    /// Height of the image in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.bounds[3] - self.bounds[1]
    }
}
