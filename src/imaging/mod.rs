//! Image processing primitives built on the `image` crate.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image::ImageReader` (JPEG, GIF, PNG) |
//! | **Resample-copy** | `imageops::resize` + `imageops::overlay` |
//! | **Encode** | `JpegEncoder`, `PngEncoder`, GIF via `write_to` |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Policies, alignments, formats and encoder settings
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]

pub mod backend;
mod calculations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, ImageBackend};
pub use calculations::{
    Placement, calculate_resize_dimensions, calculate_thumbnail_fit,
    calculate_thumbnail_placement, horizontal_offset, vertical_offset,
};
pub use params::{
    BaseSide, EncodeOptions, HorizontalAlign, ImageKind, PngFilter, Resampling, VerticalAlign,
};
pub use rust_backend::RustBackend;
