// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fixed-size slot allocation within one atlas layer.

use alloc::vec::Vec;
use core::fmt::{Debug, Formatter};

use super::location::CachedTextureInfo;

/// Pixel size of the smallest slot. Must be a power of two.
pub const SMALLEST_SLOT: u32 = 32;

/// Returns the size class of an image: the base-2 logarithm of the smallest
/// power-of-two slot, at least [`SMALLEST_SLOT`] wide, that can hold it.
///
/// Every image whose larger side is at most [`SMALLEST_SLOT`] shares the same
/// order.
#[inline]
pub fn image_size_order(width: u32, height: u32) -> u32 {
    let size = width.max(height).max(SMALLEST_SLOT);
    match size.checked_next_power_of_two() {
        Some(slot) => slot.trailing_zeros(),
        // Larger than 2^31: the next power of two is 2^32.
        None => u32::BITS,
    }
}

/// A slab allocator for one layer of the texture array.
///
/// The layer is cut into a grid of equally sized square slots. Since all slots
/// have the same size, any free slot serves any request and freeing a slot
/// cannot fragment the layer.
pub struct Atlas {
    /// Layer of the texture array backing this atlas.
    layer: u32,
    /// Width and height of each slot, a power of two.
    slot_size: u32,
    atlas_width: u32,
    atlas_height: u32,
    cols: u32,
    rows: u32,
    free_slots: Vec<u32>,
}

impl Atlas {
    /// Creates an atlas with no slots. Call [`Atlas::initialise`] before use.
    ///
    /// # Panics
    ///
    /// Panics if `slot_size` is not a power of two.
    pub fn new(layer: u32, slot_size: u32) -> Self {
        assert!(
            slot_size.is_power_of_two(),
            "slot size {slot_size} is not a power of two"
        );
        Self {
            layer,
            slot_size,
            atlas_width: 0,
            atlas_height: 0,
            cols: 0,
            rows: 0,
            free_slots: Vec::new(),
        }
    }

    /// Partitions a `width` × `height` layer into slots and marks them all free.
    pub fn initialise(&mut self, width: u32, height: u32) {
        self.atlas_width = width;
        self.atlas_height = height;

        self.cols = width / self.slot_size;
        self.rows = height / self.slot_size;

        let count = self.cols * self.rows;
        self.free_slots.clear();
        self.free_slots.extend(0..count);
    }

    /// Takes a free slot for an image of the given size.
    ///
    /// The returned bounds cover only the image, anchored at the slot's top
    /// left corner.
    ///
    /// # Panics
    ///
    /// Panics if the atlas has no free slot. Callers check
    /// [`Atlas::free_slot_count`] first.
    pub fn allocate(&mut self, actual_width: u32, actual_height: u32) -> CachedTextureInfo {
        debug_assert!(
            actual_width <= self.slot_size && actual_height <= self.slot_size,
            "{actual_width}x{actual_height} image does not fit a {} slot",
            self.slot_size
        );
        let Some(slot) = self.free_slots.pop() else {
            panic!("allocated from full atlas on layer {}", self.layer);
        };

        let bounds = self.slot_coordinates(slot, actual_width, actual_height);
        log::trace!("atlas {}: slot {slot} -> {bounds:?}", self.layer);

        CachedTextureInfo {
            layer: self.layer,
            slot,
            bounds,
            normalized_bounds: self.normalize_coordinates(bounds),
            computed_bounds: [
                bounds[0] as f32,
                bounds[1] as f32,
                actual_width as f32,
                actual_height as f32,
            ],
        }
    }

    /// Returns the slot of `info` to the free list.
    ///
    /// # Panics
    ///
    /// Panics if `info` was allocated from a different layer.
    pub fn free(&mut self, info: &CachedTextureInfo) {
        assert_eq!(
            info.layer, self.layer,
            "freed a location from layer {} into atlas on layer {}",
            info.layer, self.layer
        );
        debug_assert!(
            !self.free_slots.contains(&info.slot),
            "slot {} freed twice",
            info.slot
        );
        self.free_slots.push(info.slot);
    }

    /// Whether an image of this size belongs to this atlas's size class.
    ///
    /// Only an exact match is suitable, so that images are never placed in
    /// slots larger than they need.
    pub fn is_image_suitable(&self, actual_width: u32, actual_height: u32) -> bool {
        image_size_order(actual_width, actual_height) == self.order()
    }

    /// Number of unallocated slots.
    pub fn free_slot_count(&self) -> usize {
        self.free_slots.len()
    }

    /// Total number of slots in the layer.
    pub fn slot_count(&self) -> usize {
        (self.cols * self.rows) as usize
    }

    /// Layer of the texture array backing this atlas.
    pub fn layer(&self) -> u32 {
        self.layer
    }

    /// Width and height of each slot.
    pub fn slot_size(&self) -> u32 {
        self.slot_size
    }

    /// The size class served by this atlas, see [`image_size_order`].
    pub fn order(&self) -> u32 {
        self.slot_size.trailing_zeros()
    }

    fn slot_coordinates(&self, slot: u32, actual_width: u32, actual_height: u32) -> [u32; 4] {
        let row = slot / self.cols;
        let col = slot % self.cols;

        let left = self.slot_size * col;
        let top = self.slot_size * row;
        [left, top, left + actual_width, top + actual_height]
    }

    fn normalize_coordinates(&self, coords: [u32; 4]) -> [f32; 4] {
        let width = self.atlas_width as f32;
        let height = self.atlas_height as f32;
        [
            coords[0] as f32 / width,
            coords[1] as f32 / height,
            coords[2] as f32 / width,
            coords[3] as f32 / height,
        ]
    }
}

impl Debug for Atlas {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Atlas")
            .field("layer", &self.layer)
            .field("slot_size", &self.slot_size)
            .field("cols", &self.cols)
            .field("rows", &self.rows)
            .field("free_slots", &self.free_slots.len())
            .finish_non_exhaustive()
    }
}
