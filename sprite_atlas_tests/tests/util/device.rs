// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! An in-memory [`GpuDevice`] that records every call.

use std::cell::{Ref, RefCell, RefMut};
use std::collections::HashMap;
use std::rc::Rc;

use sprite_atlas::{DeviceError, GpuDevice};

/// A raw handle. Deliberately not `Clone`, like a real GPU handle wrapper.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Handle(pub(crate) u32);

/// CPU copy of a texture array.
#[derive(Debug, Clone)]
pub(crate) struct FakeArray {
    pub(crate) size: u32,
    pub(crate) layers: Vec<Vec<u8>>,
}

impl FakeArray {
    pub(crate) fn pixel(&self, layer: u32, x: u32, y: u32) -> u8 {
        self.layers[layer as usize][(y * self.size + x) as usize]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Upload {
    pub(crate) array: u32,
    pub(crate) layer: u32,
    pub(crate) x: u32,
    pub(crate) y: u32,
    pub(crate) width: u32,
    pub(crate) height: u32,
}

#[derive(Debug)]
pub(crate) struct DeviceState {
    pub(crate) max_texture_size: u32,
    pub(crate) max_array_layers: u32,
    /// Error returned by the next `create_texture_array` call.
    pub(crate) fail_next_array: Option<DeviceError>,
    /// Error returned by every `create_texture` call.
    pub(crate) fail_textures: Option<DeviceError>,
    pub(crate) arrays: HashMap<u32, FakeArray>,
    pub(crate) textures: HashMap<u32, (u32, u32, Vec<u8>)>,
    pub(crate) arrays_created: Vec<(u32, u32)>,
    pub(crate) arrays_destroyed: Vec<u32>,
    pub(crate) textures_destroyed: Vec<u32>,
    pub(crate) uploads: Vec<Upload>,
    /// `(src, dst, layer)` for every layer copy.
    pub(crate) layer_copies: Vec<(u32, u32, u32)>,
    next_handle: u32,
}

impl Default for DeviceState {
    fn default() -> Self {
        Self {
            max_texture_size: 8192,
            max_array_layers: 256,
            fail_next_array: None,
            fail_textures: None,
            arrays: HashMap::new(),
            textures: HashMap::new(),
            arrays_created: Vec::new(),
            arrays_destroyed: Vec::new(),
            textures_destroyed: Vec::new(),
            uploads: Vec::new(),
            layer_copies: Vec::new(),
            next_handle: 1,
        }
    }
}

impl DeviceState {
    fn handle(&mut self) -> u32 {
        let handle = self.next_handle;
        self.next_handle += 1;
        handle
    }

    /// The single live texture array.
    pub(crate) fn live_array(&self) -> &FakeArray {
        assert_eq!(self.arrays.len(), 1, "expected exactly one live array");
        self.arrays.values().next().unwrap()
    }
}

/// Cloning shares the recorded state, so a test can keep a clone to inspect
/// the device after handing the original to a cache.
#[derive(Debug, Clone, Default)]
pub(crate) struct FakeDevice {
    state: Rc<RefCell<DeviceState>>,
}

impl FakeDevice {
    pub(crate) fn with_limits(max_texture_size: u32, max_array_layers: u32) -> Self {
        let device = Self::default();
        {
            let mut state = device.state_mut();
            state.max_texture_size = max_texture_size;
            state.max_array_layers = max_array_layers;
        }
        device
    }

    pub(crate) fn state(&self) -> Ref<'_, DeviceState> {
        self.state.borrow()
    }

    pub(crate) fn state_mut(&self) -> RefMut<'_, DeviceState> {
        self.state.borrow_mut()
    }
}

impl GpuDevice for FakeDevice {
    type TextureArray = Handle;
    type Texture = Handle;

    fn max_texture_size(&self) -> u32 {
        self.state().max_texture_size
    }

    fn max_array_layers(&self) -> u32 {
        self.state().max_array_layers
    }

    fn create_texture_array(&mut self, size: u32, layers: u32) -> Result<Handle, DeviceError> {
        let mut state = self.state_mut();
        if let Some(err) = state.fail_next_array.take() {
            return Err(err);
        }
        assert!(layers > 0, "texture arrays need at least one layer");
        let handle = state.handle();
        state.arrays.insert(
            handle,
            FakeArray {
                size,
                // Fresh arrays are filled with garbage so missed copies show up.
                layers: vec![vec![0xEE; (size * size) as usize]; layers as usize],
            },
        );
        state.arrays_created.push((size, layers));
        Ok(Handle(handle))
    }

    fn copy_array_layer(&mut self, src: &Handle, dst: &Handle, layer: u32, size: u32) {
        let mut state = self.state_mut();
        let pixels = {
            let src_array = &state.arrays[&src.0];
            assert_eq!(src_array.size, size, "layer size mismatch");
            src_array.layers[layer as usize].clone()
        };
        let dst_array = state.arrays.get_mut(&dst.0).unwrap();
        dst_array.layers[layer as usize] = pixels;
        state.layer_copies.push((src.0, dst.0, layer));
    }

    fn upload_region(
        &mut self,
        array: &Handle,
        layer: u32,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        pixels: &[u8],
    ) {
        let mut state = self.state_mut();
        assert_eq!(pixels.len(), (width * height) as usize, "short upload");
        let target = state.arrays.get_mut(&array.0).expect("upload to dead array");
        let size = target.size;
        assert!(x + width <= size && y + height <= size, "upload out of bounds");
        let dst = &mut target.layers[layer as usize];
        for row in 0..height {
            let src = &pixels[(row * width) as usize..((row + 1) * width) as usize];
            let start = ((y + row) * size + x) as usize;
            dst[start..start + width as usize].copy_from_slice(src);
        }
        state.uploads.push(Upload {
            array: array.0,
            layer,
            x,
            y,
            width,
            height,
        });
    }

    fn destroy_texture_array(&mut self, array: Handle) {
        let mut state = self.state_mut();
        assert!(
            state.arrays.remove(&array.0).is_some(),
            "array {} destroyed twice",
            array.0
        );
        state.arrays_destroyed.push(array.0);
    }

    fn create_texture(
        &mut self,
        width: u32,
        height: u32,
        pixels: &[u8],
    ) -> Result<Handle, DeviceError> {
        let mut state = self.state_mut();
        if let Some(err) = state.fail_textures {
            return Err(err);
        }
        assert_eq!(pixels.len(), (width * height) as usize, "short texture data");
        let handle = state.handle();
        state
            .textures
            .insert(handle, (width, height, pixels.to_vec()));
        Ok(Handle(handle))
    }

    fn destroy_texture(&mut self, texture: Handle) {
        let mut state = self.state_mut();
        assert!(
            state.textures.remove(&texture.0).is_some(),
            "texture {} destroyed twice",
            texture.0
        );
        state.textures_destroyed.push(texture.0);
    }
}
