//! # Thumbforge
//!
//! Proportional image resizing and fixed-canvas thumbnails for JPEG, GIF and
//! PNG sources. Load a source into an [`ImageProcessor`], ask it for a resized
//! copy or a thumbnail, then either save the result to disk or stream it into
//! an HTTP response.
//!
//! ```no_run
//! use thumbforge::{
//!     BufferedResponse, EncodeOptions, HorizontalAlign, ImageKind, ImageProcessor, VerticalAlign,
//! };
//!
//! let processor = ImageProcessor::open("photo.png")?;
//! let thumb = processor.make_thumbnail(
//!     160,
//!     120,
//!     "#eee",
//!     HorizontalAlign::Center,
//!     VerticalAlign::Top,
//! )?;
//!
//! let mut response = BufferedResponse::new();
//! processor.output(&thumb, ImageKind::Png, EncodeOptions::with_quality(9), &mut response)?;
//! # Ok::<(), thumbforge::ProcessError>(())
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`processor`] | [`ImageProcessor`]: construction, resize, thumbnail, save, output |
//! | [`imaging`] | Dimension math, parameter types, and the codec backend |
//! | [`color`] | Background color parsing (`#RRGGBB`, `#RGB`, `[r, g, b]`) |
//! | [`naming`] | Source name extraction and output filename templates |
//! | [`output`] | Response sinks: buffered (`http::Response`) and CGI-style |
//! | [`config`] | `thumbforge.toml` loading and validation for the CLI |
//! | [`error`] | [`ProcessError`] and the display-template formatter |
//!
//! # Resize Policies
//!
//! [`BaseSide`] decides which requested side is honored when the aspect ratio
//! of the request differs from the source. Derived sides are truncated, so a
//! 300×200 source resized to width 100 becomes 100×66.
//!
//! # Backends
//!
//! All pixel work goes through the [`ImageBackend`] trait. [`RustBackend`] is
//! the `image` crate implementation; a processor can be built over any other
//! backend with the `*_with` constructors.

pub mod color;
pub mod config;
pub mod error;
pub mod imaging;
pub mod naming;
pub mod output;
pub mod processor;

pub use color::{Color, ColorSpec};
pub use error::{ProcessError, Result};
pub use imaging::{
    BaseSide, EncodeOptions, HorizontalAlign, ImageBackend, ImageKind, PngFilter, Resampling,
    RustBackend, VerticalAlign,
};
pub use output::{BufferedResponse, CgiResponse, ResponseSink};
pub use processor::{ImageProcessor, ThumbnailRequest, Upload};

#[cfg(test)]
pub(crate) mod test_helpers;
