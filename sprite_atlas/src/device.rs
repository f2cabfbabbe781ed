// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The GPU surface consumed by the texture cache.
//!
//! The cache never talks to a graphics API directly. Instead it drives a
//! [`GpuDevice`], which creates and destroys the layered texture array and the
//! palette lookup texture, and copies pixels into them. Handles returned by the
//! device are wrapped in a [`GpuResource`] so that each one has exactly one
//! owner and is released exactly once.

/// Failure reported by a [`GpuDevice`] when creating a resource.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DeviceError {
    /// The device could not allocate memory for the resource.
    OutOfMemory,
    /// The device context was lost.
    Lost,
}

/// A graphics device able to host a layered texture array.
///
/// All atlas pixel data is single channel: one byte per pixel holding a
/// palette index. Layers are square, `size` × `size` pixels.
pub trait GpuDevice {
    /// Handle to a layered 2D texture array.
    type TextureArray;

    /// Handle to a plain 2D texture.
    type Texture;

    /// Largest width and height a texture may have.
    fn max_texture_size(&self) -> u32;

    /// Largest number of layers a texture array may have.
    fn max_array_layers(&self) -> u32;

    /// Creates a texture array of `layers` square layers, each `size` pixels wide.
    ///
    /// The contents of the new array are undefined.
    fn create_texture_array(
        &mut self,
        size: u32,
        layers: u32,
    ) -> Result<Self::TextureArray, DeviceError>;

    /// Copies the whole of `layer` from `src` into the same layer of `dst`.
    fn copy_array_layer(
        &mut self,
        src: &Self::TextureArray,
        dst: &Self::TextureArray,
        layer: u32,
        size: u32,
    );

    /// Writes a `width` × `height` block of pixels into `layer` at `(x, y)`.
    ///
    /// `pixels` is tightly packed, row-major, one byte per pixel.
    fn upload_region(
        &mut self,
        array: &Self::TextureArray,
        layer: u32,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        pixels: &[u8],
    );

    /// Destroys a texture array.
    fn destroy_texture_array(&mut self, array: Self::TextureArray);

    /// Creates a `width` × `height` single channel texture filled with `pixels`.
    fn create_texture(
        &mut self,
        width: u32,
        height: u32,
        pixels: &[u8],
    ) -> Result<Self::Texture, DeviceError>;

    /// Destroys a texture.
    fn destroy_texture(&mut self, texture: Self::Texture);
}

/// Owning wrapper around a raw device handle.
///
/// The wrapper is move-only: it cannot be cloned, so a handle cannot be
/// destroyed twice by accident. The only way to get the raw handle back by
/// value is [`GpuResource::release`], which consumes the wrapper. Dropping a
/// wrapper that was never released logs a warning, since the handle leaks.
#[derive(Debug)]
#[must_use = "GPU resources must be released through their device"]
pub struct GpuResource<T> {
    /// Always `Some` until `release` takes it.
    raw: Option<T>,
}

impl<T> GpuResource<T> {
    /// Takes ownership of a raw handle.
    pub fn new(raw: T) -> Self {
        Self { raw: Some(raw) }
    }

    /// Borrows the raw handle, e.g. for binding.
    pub fn raw(&self) -> &T {
        self.raw
            .as_ref()
            .expect("handle is only taken by `release`, which consumes the wrapper")
    }

    /// Hands the raw handle to `destroy`, consuming the wrapper.
    pub fn release(mut self, destroy: impl FnOnce(T)) {
        if let Some(raw) = self.raw.take() {
            destroy(raw);
        }
    }
}

impl<T> Drop for GpuResource<T> {
    fn drop(&mut self) {
        if self.raw.is_some() {
            log::warn!(
                "GPU resource {} dropped without being released",
                core::any::type_name::<T>()
            );
        }
    }
}
