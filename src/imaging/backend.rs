//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait is the codec boundary. It exposes the five
//! primitives (decode, create-canvas, fill, resample-copy, encode) that the
//! processor composes into resizes and thumbnails.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate. Tests swap in a recording mock that can fail any single primitive.

use super::calculations::Placement;
use super::params::{EncodeOptions, ImageKind, Resampling};
use crate::color::Color;
use image::{DynamicImage, RgbaImage};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Trait for image processing backends.
///
/// Every primitive reports failure through [`BackendError`]; the processor
/// maps each failure to the typed error of the step that called it.
pub trait ImageBackend {
    /// Decode the file at `path` with the codec for `kind`.
    fn decode(&self, path: &Path, kind: ImageKind) -> Result<DynamicImage, BackendError>;

    /// Allocate a blank true-color canvas.
    fn create_canvas(&self, width: u32, height: u32) -> Result<RgbaImage, BackendError>;

    /// Paint every pixel of `canvas` with `color`.
    fn fill(&self, canvas: &mut RgbaImage, color: Color) -> Result<(), BackendError>;

    /// Scale the whole of `source` to the placement's size and composite it
    /// onto `canvas` at the placement's offset, clipping what falls outside.
    fn resample_copy(
        &self,
        canvas: &mut RgbaImage,
        source: &DynamicImage,
        placement: Placement,
        filter: Resampling,
    ) -> Result<(), BackendError>;

    /// Encode `image` as `kind`.
    fn encode(
        &self,
        image: &DynamicImage,
        kind: ImageKind,
        options: EncodeOptions,
    ) -> Result<Vec<u8>, BackendError>;
}
