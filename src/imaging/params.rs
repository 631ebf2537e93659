//! Parameter types for image operations.
//!
//! These types describe *what* to do, not *how* to do it. They are shared by
//! the pure [`calculations`](super::calculations), the
//! [`backend`](super::backend) that does the pixel work, and the config file.
//!
//! ## Types
//!
//! - [`BaseSide`]: which side stays fixed when resizing proportionally.
//! - [`HorizontalAlign`] / [`VerticalAlign`]: thumbnail placement on its canvas.
//! - [`Resampling`]: filter used when scaling.
//! - [`ImageKind`]: the closed set of formats read and written (JPEG, GIF, PNG).
//! - [`PngFilter`] / [`EncodeOptions`]: encoder settings.

use crate::error::ProcessError;
use image::ImageFormat;
use image::imageops::FilterType;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Resize policy: which side of the request is honored exactly.
///
/// - `None`: the result is exactly the requested width and height
/// - `Width`: width is fixed, height follows the source aspect ratio
/// - `Height`: height is fixed, width follows the source aspect ratio
/// - `Big`: the side matching the larger source side is fixed
/// - `Small`: the side matching the smaller source side is fixed
/// - `Restricted`: height controls the result, except for square sources
///   requested narrower than tall
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BaseSide {
    None,
    Width,
    Height,
    #[default]
    Big,
    Small,
    Restricted,
}

impl FromStr for BaseSide {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "width" => Ok(Self::Width),
            "height" => Ok(Self::Height),
            "big" => Ok(Self::Big),
            "small" => Ok(Self::Small),
            "restricted" => Ok(Self::Restricted),
            other => Err(format!("unknown base side '{other}'")),
        }
    }
}

/// Horizontal placement of a thumbnail on its canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HorizontalAlign {
    Left,
    #[default]
    Center,
    Right,
}

impl HorizontalAlign {
    /// Lenient lookup: anything other than `center` or `right` pins to the left edge.
    pub fn from_name(name: &str) -> Self {
        match name {
            "center" => Self::Center,
            "right" => Self::Right,
            _ => Self::Left,
        }
    }
}

/// Vertical placement of a thumbnail on its canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlign {
    Top,
    #[default]
    Center,
    Bottom,
}

impl VerticalAlign {
    /// Lenient lookup: anything other than `center` or `bottom` pins to the top edge.
    pub fn from_name(name: &str) -> Self {
        match name {
            "center" => Self::Center,
            "bottom" => Self::Bottom,
            _ => Self::Top,
        }
    }
}

/// Resampling filter used when scaling the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Resampling {
    Nearest,
    Triangle,
    CatmullRom,
    Gaussian,
    #[default]
    Lanczos3,
}

impl Resampling {
    pub fn filter_type(self) -> FilterType {
        match self {
            Self::Nearest => FilterType::Nearest,
            Self::Triangle => FilterType::Triangle,
            Self::CatmullRom => FilterType::CatmullRom,
            Self::Gaussian => FilterType::Gaussian,
            Self::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

/// Image formats the processor reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageKind {
    #[serde(alias = "jpg")]
    Jpeg,
    Gif,
    Png,
}

impl ImageKind {
    /// Match a file extension (`jpg`, `jpeg`, `gif`, `png`), ignoring case.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "gif" => Some(Self::Gif),
            "png" => Some(Self::Png),
            _ => None,
        }
    }

    /// Match a MIME type as reported by browsers, including the legacy
    /// `image/pjpeg` and `image/x-png` aliases.
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime.to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/pjpeg" | "image/jpg" => Some(Self::Jpeg),
            "image/gif" => Some(Self::Gif),
            "image/png" | "image/x-png" => Some(Self::Png),
            _ => None,
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Gif => "image/gif",
            Self::Png => "image/png",
        }
    }

    /// Extension appended to file names that lack one.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Gif => "gif",
            Self::Png => "png",
        }
    }

    pub fn image_format(self) -> ImageFormat {
        match self {
            Self::Jpeg => ImageFormat::Jpeg,
            Self::Gif => ImageFormat::Gif,
            Self::Png => ImageFormat::Png,
        }
    }

    /// Short name used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            Self::Jpeg => "jpeg",
            Self::Gif => "gif",
            Self::Png => "png",
        }
    }
}

impl fmt::Display for ImageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ImageKind {
    type Err = ProcessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_extension(s).ok_or_else(|| ProcessError::UnsupportedOutputFormat(s.to_string()))
    }
}

/// Row filter applied by the PNG encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PngFilter {
    #[default]
    None,
    Sub,
    Up,
    Avg,
    Paeth,
    Adaptive,
}

impl FromStr for PngFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "sub" => Ok(Self::Sub),
            "up" => Ok(Self::Up),
            "avg" => Ok(Self::Avg),
            "paeth" => Ok(Self::Paeth),
            "adaptive" => Ok(Self::Adaptive),
            other => Err(format!("unknown png filter '{other}'")),
        }
    }
}

/// Encoder settings shared by `save` and `output`.
///
/// `quality` is read per format:
/// - JPEG: 0 (worst) to 100 (best); 0 is encoded as 1, the encoder's floor
/// - PNG: compression level 0 (none) to 9 (best)
/// - GIF: ignored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EncodeOptions {
    pub quality: u8,
    pub png_filter: PngFilter,
}

impl EncodeOptions {
    pub fn with_quality(quality: u8) -> Self {
        Self {
            quality,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_side_defaults_to_big() {
        assert_eq!(BaseSide::default(), BaseSide::Big);
    }

    #[test]
    fn base_side_parses_case_insensitively() {
        assert_eq!("Restricted".parse::<BaseSide>(), Ok(BaseSide::Restricted));
        assert!("diagonal".parse::<BaseSide>().is_err());
    }

    #[test]
    fn unknown_alignment_pins_to_origin() {
        assert_eq!(HorizontalAlign::from_name("middle"), HorizontalAlign::Left);
        assert_eq!(VerticalAlign::from_name(""), VerticalAlign::Top);
        assert_eq!(HorizontalAlign::from_name("right"), HorizontalAlign::Right);
        assert_eq!(VerticalAlign::from_name("center"), VerticalAlign::Center);
    }

    #[test]
    fn image_kind_from_extension_ignores_case() {
        assert_eq!(ImageKind::from_extension("JPG"), Some(ImageKind::Jpeg));
        assert_eq!(ImageKind::from_extension("jpeg"), Some(ImageKind::Jpeg));
        assert_eq!(ImageKind::from_extension("Png"), Some(ImageKind::Png));
        assert_eq!(ImageKind::from_extension("webp"), None);
    }

    #[test]
    fn image_kind_accepts_legacy_mime_aliases() {
        assert_eq!(ImageKind::from_mime("image/pjpeg"), Some(ImageKind::Jpeg));
        assert_eq!(ImageKind::from_mime("image/x-png"), Some(ImageKind::Png));
        assert_eq!(ImageKind::from_mime("image/gif"), Some(ImageKind::Gif));
        assert_eq!(ImageKind::from_mime("image/tiff"), None);
    }

    #[test]
    fn image_kind_from_str_rejects_unknown_formats() {
        assert_eq!("jpg".parse::<ImageKind>().unwrap(), ImageKind::Jpeg);
        let err = "bmp".parse::<ImageKind>().unwrap_err();
        assert!(matches!(err, ProcessError::UnsupportedOutputFormat(f) if f == "bmp"));
    }

    #[test]
    fn jpeg_extension_is_jpg() {
        assert_eq!(ImageKind::Jpeg.extension(), "jpg");
        assert_eq!(ImageKind::Jpeg.mime_type(), "image/jpeg");
    }

    #[test]
    fn encode_options_default_to_zero_quality_and_no_filter() {
        let opts = EncodeOptions::default();
        assert_eq!(opts.quality, 0);
        assert_eq!(opts.png_filter, PngFilter::None);
    }
}
