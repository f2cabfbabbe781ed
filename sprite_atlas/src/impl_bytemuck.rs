// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `bytemuck` trait impls, so locations can be copied into instance buffers.

#![allow(
    unsafe_code,
    reason = "The `bytemuck` marker traits are `unsafe` and require `unsafe impl`."
)]

use crate::CachedTextureInfo;
use bytemuck::{Pod, Zeroable};

// Safety: The struct is `repr(C)`, made only of 4-byte `u32` and `f32` fields
// and arrays of them, so it has no padding and every bit pattern is valid.
unsafe impl Zeroable for CachedTextureInfo {}

// Safety: See above. The struct is also `Copy` and `'static`.
unsafe impl Pod for CachedTextureInfo {}
