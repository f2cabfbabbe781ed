// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Image and glyph cache over a shared texture array.

use alloc::vec::Vec;
use core::fmt::{Debug, Formatter};
use foldhash::fast::FixedState;
use hashbrown::HashMap;

use super::key::{GlyphKey, GlyphPalette};
use super::location::CachedTextureInfo;
use super::slab::{Atlas, image_size_order};
use crate::device::{GpuDevice, GpuResource};
use crate::error::Error;
use crate::palette::{PALETTE_TEXTURE_SIZE, build_palette_rows};
use crate::raster::{Bitmap, ImageId, Rasterizer};

/// Maximum width and height of an atlas layer.
///
/// This is the granularity at which texture memory is added: a 2048 × 2048
/// single channel layer takes 4 MiB.
pub const MAX_ATLAS_SIZE: u32 = 2048;

type FastHashMap<K, V> = HashMap<K, V, FixedState>;

/// Tunables for a [`TextureCache`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextureCacheConfig {
    /// Width and height of each atlas layer, before capping to the device's
    /// maximum texture size.
    pub max_atlas_size: u32,
    /// Minimum number of layers added each time the texture array grows.
    pub layer_growth: u32,
}

impl Default for TextureCacheConfig {
    fn default() -> Self {
        Self {
            max_atlas_size: MAX_ATLAS_SIZE,
            layer_growth: 1,
        }
    }
}

/// Snapshot of a [`TextureCache`]'s occupancy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextureCacheStats {
    /// Number of atlases (one per used layer).
    pub atlases: usize,
    /// Number of layers in the texture array.
    pub layers: u32,
    /// Number of cached images.
    pub images: usize,
    /// Number of cached glyphs.
    pub glyphs: usize,
    /// Lookups answered from the cache since the last `clear_stats()`.
    pub hits: u64,
    /// Lookups that had to rasterize since the last `clear_stats()`.
    pub misses: u64,
}

/// Resolves images and glyphs to locations in a shared texture array.
///
/// Images are memoized by [`ImageId`] and glyphs by [`GlyphKey`]; the two maps
/// are independent, so invalidating an image leaves its glyphs cached. On a
/// miss the image is rasterized, placed in an [`Atlas`] of its size class and
/// uploaded. When every suitable atlas is full a new one is opened on a fresh
/// layer, growing the texture array if it has no unused layer left.
///
/// GPU resources are created lazily on the first load and released on
/// [`TextureCache::release`] or drop.
pub struct TextureCache<D: GpuDevice, R: Rasterizer> {
    device: D,
    rasterizer: R,
    config: TextureCacheConfig,
    initialised: bool,
    /// Width and height of every layer.
    atlas_dimension: u32,
    /// Layer count the device supports.
    layer_limit: u32,
    atlases_texture: Option<GpuResource<D::TextureArray>>,
    layer_count: u32,
    /// Indexed by layer.
    atlases: Vec<Atlas>,
    image_entries: FastHashMap<ImageId, CachedTextureInfo>,
    glyph_entries: FastHashMap<GlyphKey, CachedTextureInfo>,
    palette_texture: Option<GpuResource<D::Texture>>,
    cache_hits: u64,
    cache_misses: u64,
}

impl<D: GpuDevice, R: Rasterizer> TextureCache<D, R> {
    /// Creates an empty cache with the default configuration.
    pub fn new(device: D, rasterizer: R) -> Self {
        Self::with_config(device, rasterizer, TextureCacheConfig::default())
    }

    /// Creates an empty cache.
    pub fn with_config(device: D, rasterizer: R, config: TextureCacheConfig) -> Self {
        Self {
            device,
            rasterizer,
            config,
            initialised: false,
            atlas_dimension: 0,
            layer_limit: 0,
            atlases_texture: None,
            layer_count: 0,
            atlases: Vec::new(),
            image_entries: HashMap::with_hasher(FixedState::default()),
            glyph_entries: HashMap::with_hasher(FixedState::default()),
            palette_texture: None,
            cache_hits: 0,
            cache_misses: 0,
        }
    }

    /// Reads the device limits and creates the palette lookup texture.
    ///
    /// Called by the first load; calling it earlier lets the renderer bind the
    /// palette texture before anything is drawn. Does nothing if already done.
    pub fn initialise(&mut self) -> Result<(), Error> {
        if self.initialised {
            return Ok(());
        }

        self.atlas_dimension = self
            .config
            .max_atlas_size
            .min(self.device.max_texture_size());
        self.layer_limit = self.device.max_array_layers();

        let rows = build_palette_rows(&mut self.rasterizer);
        let texture = self
            .device
            .create_texture(
                PALETTE_TEXTURE_SIZE,
                PALETTE_TEXTURE_SIZE,
                bytemuck::cast_slice(&rows),
            )
            .map_err(|err| Error::from_device(err, None))?;
        self.palette_texture = Some(GpuResource::new(texture));
        self.initialised = true;

        log::debug!(
            "texture cache initialised: {0}x{0} layers, at most {1}",
            self.atlas_dimension,
            self.layer_limit
        );
        Ok(())
    }

    /// Returns the location of `image`, rasterizing and uploading it on a miss.
    pub fn get_or_load_image_texture(
        &mut self,
        image: ImageId,
    ) -> Result<CachedTextureInfo, Error> {
        if let Some(info) = self.image_entries.get(&image) {
            self.cache_hits += 1;
            return Ok(*info);
        }

        self.cache_misses += 1;
        let info = self.load_image_texture(image)?;
        self.image_entries.insert(image, info);
        Ok(info)
    }

    /// Returns the location of `image` drawn with `palette`, rasterizing and
    /// uploading it on a miss.
    pub fn get_or_load_glyph_texture(
        &mut self,
        image: ImageId,
        palette: &GlyphPalette,
    ) -> Result<CachedTextureInfo, Error> {
        let key = GlyphKey::new(image, *palette);
        if let Some(info) = self.glyph_entries.get(&key) {
            self.cache_hits += 1;
            return Ok(*info);
        }

        self.cache_misses += 1;
        let info = self.load_glyph_texture(image, palette)?;
        self.glyph_entries.insert(key, info);
        Ok(info)
    }

    /// Drops the cached copy of `image` so the next lookup rasterizes it again.
    ///
    /// Glyphs drawn from the same sprite are not affected. Unknown images are
    /// ignored.
    pub fn invalidate_image(&mut self, image: ImageId) {
        if let Some(info) = self.image_entries.remove(&image) {
            log::trace!("invalidated image {image} at layer {} slot {}", info.layer, info.slot);
            self.atlases[info.layer as usize].free(&info);
        }
    }

    /// Drops every cached image and glyph, keeping the GPU resources.
    pub fn clear(&mut self) {
        let atlases = &mut self.atlases;
        for (_, info) in self.image_entries.drain() {
            atlases[info.layer as usize].free(&info);
        }
        for (_, info) in self.glyph_entries.drain() {
            atlases[info.layer as usize].free(&info);
        }
    }

    /// Releases all GPU resources and forgets every cached entry.
    ///
    /// Used at shutdown and when the device context is lost. The cache is left
    /// uninitialised; the next load creates fresh resources.
    pub fn release(&mut self) {
        let device = &mut self.device;
        if let Some(array) = self.atlases_texture.take() {
            array.release(|raw| device.destroy_texture_array(raw));
        }
        if let Some(texture) = self.palette_texture.take() {
            texture.release(|raw| device.destroy_texture(raw));
        }

        self.atlases.clear();
        self.image_entries.clear();
        self.glyph_entries.clear();
        self.layer_count = 0;
        self.initialised = false;
    }

    /// The texture array holding every atlas, once the first image is loaded.
    pub fn atlases_texture(&self) -> Option<&D::TextureArray> {
        self.atlases_texture.as_ref().map(GpuResource::raw)
    }

    /// The palette lookup texture, once the cache is initialised.
    pub fn palette_texture(&self) -> Option<&D::Texture> {
        self.palette_texture.as_ref().map(GpuResource::raw)
    }

    /// Number of layers in the texture array.
    #[inline]
    pub fn layer_count(&self) -> u32 {
        self.layer_count
    }

    /// Width and height of each layer, or 0 before initialisation.
    #[inline]
    pub fn atlas_dimension(&self) -> u32 {
        self.atlas_dimension
    }

    /// Current occupancy and hit statistics.
    pub fn stats(&self) -> TextureCacheStats {
        TextureCacheStats {
            atlases: self.atlases.len(),
            layers: self.layer_count,
            images: self.image_entries.len(),
            glyphs: self.glyph_entries.len(),
            hits: self.cache_hits,
            misses: self.cache_misses,
        }
    }

    /// Clear cache hit/miss statistics without clearing the cache itself.
    pub fn clear_stats(&mut self) {
        self.cache_hits = 0;
        self.cache_misses = 0;
    }

    /// The device the cache uploads to.
    pub fn device(&self) -> &D {
        &self.device
    }

    /// Mutable access to the device, e.g. to issue draws between loads.
    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    /// The rasterizer serving cache misses.
    pub fn rasterizer(&self) -> &R {
        &self.rasterizer
    }

    /// Mutable access to the rasterizer.
    ///
    /// Changing what an already cached image rasterizes to has no effect
    /// until that image is invalidated.
    pub fn rasterizer_mut(&mut self) -> &mut R {
        &mut self.rasterizer
    }

    fn load_image_texture(&mut self, image: ImageId) -> Result<CachedTextureInfo, Error> {
        self.initialise()?;
        let bitmap = self.rasterizer.rasterize_image(image);
        self.store(&bitmap)
    }

    fn load_glyph_texture(
        &mut self,
        image: ImageId,
        palette: &GlyphPalette,
    ) -> Result<CachedTextureInfo, Error> {
        self.initialise()?;
        let bitmap = self.rasterizer.rasterize_glyph(image, palette);
        self.store(&bitmap)
    }

    /// Allocates a slot for `bitmap` and uploads its pixels there.
    fn store(&mut self, bitmap: &Bitmap) -> Result<CachedTextureInfo, Error> {
        let info = self.allocate_image(bitmap.width, bitmap.height)?;
        if bitmap.width > 0 && bitmap.height > 0 {
            debug_assert!(
                self.atlases_texture.is_some(),
                "allocated layer {} without a texture array",
                info.layer
            );
            if let Some(array) = &self.atlases_texture {
                self.device.upload_region(
                    array.raw(),
                    info.layer,
                    info.bounds[0],
                    info.bounds[1],
                    bitmap.width,
                    bitmap.height,
                    &bitmap.pixels,
                );
            }
        }
        Ok(info)
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "atlas count is bounded by the device layer limit, a u32"
    )]
    fn allocate_image(&mut self, width: u32, height: u32) -> Result<CachedTextureInfo, Error> {
        let order = image_size_order(width, height);
        let slot_size = match 1_u32.checked_shl(order) {
            Some(size) if size <= self.atlas_dimension => size,
            _ => return Err(Error::image_too_large(width, height)),
        };

        if let Some(atlas) = self
            .atlases
            .iter_mut()
            .find(|atlas| atlas.free_slot_count() > 0 && atlas.is_image_suitable(width, height))
        {
            return Ok(atlas.allocate(width, height));
        }

        let layer = self.atlases.len() as u32;
        if layer >= self.layer_count {
            self.enlarge_atlases_texture(layer + 1 - self.layer_count)
                .map_err(|err| err.with_image_size(width, height))?;
        }

        let mut atlas = Atlas::new(layer, slot_size);
        atlas.initialise(self.atlas_dimension, self.atlas_dimension);
        log::debug!(
            "opened atlas on layer {layer} with {} slots of {slot_size}px",
            atlas.slot_count()
        );

        let info = atlas.allocate(width, height);
        self.atlases.push(atlas);
        Ok(info)
    }

    /// Grows the texture array by at least `new_layers` layers.
    ///
    /// A new array is created, every layer in use is copied across at the same
    /// index and the old array is destroyed. Layer indices and slot geometry
    /// are unchanged, so every cached location stays valid. On failure the
    /// old array is kept untouched.
    fn enlarge_atlases_texture(&mut self, new_layers: u32) -> Result<(), Error> {
        let required = self.layer_count.saturating_add(new_layers);
        if required > self.layer_limit {
            log::warn!(
                "texture array needs {required} layers but the device allows {}",
                self.layer_limit
            );
            return Err(Error::resource_exhausted(required));
        }
        let target = self
            .layer_count
            .saturating_add(new_layers.max(self.config.layer_growth))
            .min(self.layer_limit);

        let new_array = self
            .device
            .create_texture_array(self.atlas_dimension, target)
            .map_err(|err| {
                log::warn!("failed to create texture array with {target} layers: {err:?}");
                Error::from_device(err, Some(target))
            })?;

        if let Some(old_array) = self.atlases_texture.take() {
            for atlas in &self.atlases {
                self.device.copy_array_layer(
                    old_array.raw(),
                    &new_array,
                    atlas.layer(),
                    self.atlas_dimension,
                );
            }
            let device = &mut self.device;
            old_array.release(|raw| device.destroy_texture_array(raw));
        }

        log::debug!(
            "grew texture array from {} to {target} layers",
            self.layer_count
        );
        self.atlases_texture = Some(GpuResource::new(new_array));
        self.layer_count = target;
        Ok(())
    }
}

impl<D: GpuDevice, R: Rasterizer> Drop for TextureCache<D, R> {
    fn drop(&mut self) {
        self.release();
    }
}

impl<D: GpuDevice, R: Rasterizer> Debug for TextureCache<D, R> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TextureCache")
            .field("initialised", &self.initialised)
            .field("atlas_dimension", &self.atlas_dimension)
            .field("layer_count", &self.layer_count)
            .field("atlases", &self.atlases)
            .field("image_entries", &self.image_entries.len())
            .field("glyph_entries", &self.glyph_entries.len())
            .finish_non_exhaustive()
    }
}
