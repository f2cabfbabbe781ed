// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::device::DeviceError;

/// Error returned when the texture cache cannot place an image.
///
/// Carries a non-exhaustive [`ErrorKind`] plus the context of the failed
/// request. Cache misses are never errors; these only surface when the GPU
/// cannot provide the storage a load needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    /// The non-exhaustive category describing this error.
    kind: ErrorKind,

    /// Width and height of the image that was being placed, if known.
    image_size: Option<(u32, u32)>,

    /// Layer count the texture array would have needed, for growth failures.
    requested_layers: Option<u32>,
}

impl Error {
    /// The machine-readable category for this error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Width and height of the image that could not be placed, if known.
    pub fn image_size(&self) -> Option<(u32, u32)> {
        self.image_size
    }

    /// Number of layers the texture array would have grown to.
    pub fn requested_layers(&self) -> Option<u32> {
        self.requested_layers
    }

    pub(crate) fn resource_exhausted(requested_layers: u32) -> Self {
        Self {
            kind: ErrorKind::ResourceExhausted,
            image_size: None,
            requested_layers: Some(requested_layers),
        }
    }

    pub(crate) fn image_too_large(width: u32, height: u32) -> Self {
        Self {
            kind: ErrorKind::ImageTooLarge,
            image_size: Some((width, height)),
            requested_layers: None,
        }
    }

    pub(crate) fn from_device(err: DeviceError, requested_layers: Option<u32>) -> Self {
        let kind = match err {
            DeviceError::OutOfMemory => ErrorKind::ResourceExhausted,
            DeviceError::Lost => ErrorKind::DeviceLost,
        };
        Self {
            kind,
            image_size: None,
            requested_layers,
        }
    }

    pub(crate) fn with_image_size(mut self, width: u32, height: u32) -> Self {
        self.image_size = Some((width, height));
        self
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.kind {
            ErrorKind::ResourceExhausted => {
                if let Some(layers) = self.requested_layers {
                    write!(f, "texture array could not grow to {layers} layers")?;
                } else {
                    write!(f, "GPU resources exhausted")?;
                }
            }
            ErrorKind::ImageTooLarge => write!(f, "image does not fit in an atlas layer")?,
            ErrorKind::DeviceLost => write!(f, "GPU device was lost")?,
        }
        if let Some((width, height)) = self.image_size {
            write!(f, " (image {width}x{height})")?;
        }
        Ok(())
    }
}

impl core::error::Error for Error {}

/// The non-exhaustive category of an error.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The texture array could not grow, either because the device ran out
    /// of memory or because it already holds the maximum number of layers.
    ResourceExhausted,

    /// The image needs a slot larger than an atlas layer.
    ImageTooLarge,

    /// The device was lost while creating a resource.
    DeviceLost,
}
