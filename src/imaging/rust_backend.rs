//! Pure Rust image processing backend.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, GIF, PNG) | `image::ImageReader` with the format pinned by extension |
//! | Create canvas | `image::RgbaImage::new` |
//! | Resample-copy | `image::imageops::resize` + `image::imageops::overlay` |
//!
//! Both the canvas and the scaled copy are capped at [`MAX_CANVAS_PIXELS`].
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` |
//! | Encode → PNG | `image::codecs::png::PngEncoder` (compression + row filter) |
//! | Encode → GIF | `DynamicImage::write_to` with `ImageFormat::Gif` |

use super::backend::{BackendError, ImageBackend};
use super::calculations::Placement;
use super::params::{EncodeOptions, ImageKind, PngFilter, Resampling};
use crate::color::Color;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType as PngFilterType, PngEncoder};
use image::{DynamicImage, ImageFormat, ImageReader, RgbaImage, imageops};
use std::io::Cursor;
use std::path::Path;

/// Largest canvas or scaled copy the backend will allocate, in pixels (1 GiB of RGBA).
pub const MAX_CANVAS_PIXELS: u64 = 1 << 28;

/// Pure Rust backend using the `image` crate.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Map a 0–9 compression level onto the encoder's presets.
fn png_compression(level: u8) -> CompressionType {
    match level {
        0..=3 => CompressionType::Fast,
        4..=6 => CompressionType::Default,
        _ => CompressionType::Best,
    }
}

fn png_filter(filter: PngFilter) -> PngFilterType {
    match filter {
        PngFilter::None => PngFilterType::NoFilter,
        PngFilter::Sub => PngFilterType::Sub,
        PngFilter::Up => PngFilterType::Up,
        PngFilter::Avg => PngFilterType::Avg,
        PngFilter::Paeth => PngFilterType::Paeth,
        PngFilter::Adaptive => PngFilterType::Adaptive,
    }
}

fn encode_jpeg(image: &DynamicImage, quality: u8) -> image::ImageResult<Vec<u8>> {
    let mut buffer = Vec::new();
    // JPEG has no alpha channel; transparent pixels flatten to their RGB value
    let rgb = DynamicImage::ImageRgb8(image.to_rgb8());
    let encoder = JpegEncoder::new_with_quality(&mut buffer, quality.clamp(1, 100));
    rgb.write_with_encoder(encoder)?;
    Ok(buffer)
}

fn encode_png(image: &DynamicImage, options: EncodeOptions) -> image::ImageResult<Vec<u8>> {
    let mut buffer = Vec::new();
    let encoder = PngEncoder::new_with_quality(
        &mut buffer,
        png_compression(options.quality),
        png_filter(options.png_filter),
    );
    match image {
        // The PNG encoder has no float color types
        DynamicImage::ImageRgb32F(_) | DynamicImage::ImageRgba32F(_) => {
            DynamicImage::ImageRgba8(image.to_rgba8()).write_with_encoder(encoder)?
        }
        _ => image.write_with_encoder(encoder)?,
    }
    Ok(buffer)
}

fn encode_gif(image: &DynamicImage) -> image::ImageResult<Vec<u8>> {
    let mut buffer = Cursor::new(Vec::new());
    match image {
        DynamicImage::ImageRgb8(_) | DynamicImage::ImageRgba8(_) => {
            image.write_to(&mut buffer, ImageFormat::Gif)?
        }
        // The GIF encoder only takes 8-bit RGB(A)
        _ => DynamicImage::ImageRgba8(image.to_rgba8()).write_to(&mut buffer, ImageFormat::Gif)?,
    }
    Ok(buffer.into_inner())
}

impl ImageBackend for RustBackend {
    fn decode(&self, path: &Path, kind: ImageKind) -> Result<DynamicImage, BackendError> {
        let mut reader = ImageReader::open(path)?;
        reader.set_format(kind.image_format());
        reader.decode().map_err(|e| {
            BackendError::ProcessingFailed(format!("Failed to decode {}: {}", path.display(), e))
        })
    }

    fn create_canvas(&self, width: u32, height: u32) -> Result<RgbaImage, BackendError> {
        let pixels = u64::from(width) * u64::from(height);
        if pixels == 0 {
            return Err(BackendError::ProcessingFailed(
                "canvas sides must be non-zero".into(),
            ));
        }
        if pixels > MAX_CANVAS_PIXELS {
            return Err(BackendError::ProcessingFailed(format!(
                "canvas of {pixels} pixels exceeds the {MAX_CANVAS_PIXELS} pixel limit"
            )));
        }
        Ok(RgbaImage::new(width, height))
    }

    fn fill(&self, canvas: &mut RgbaImage, color: Color) -> Result<(), BackendError> {
        let rgba = color.to_rgba();
        for pixel in canvas.pixels_mut() {
            *pixel = rgba;
        }
        Ok(())
    }

    fn resample_copy(
        &self,
        canvas: &mut RgbaImage,
        source: &DynamicImage,
        placement: Placement,
        filter: Resampling,
    ) -> Result<(), BackendError> {
        if placement.width == 0 || placement.height == 0 {
            return Err(BackendError::ProcessingFailed(format!(
                "cannot scale to {}x{}",
                placement.width, placement.height
            )));
        }
        let pixels = u64::from(placement.width) * u64::from(placement.height);
        if pixels > MAX_CANVAS_PIXELS {
            return Err(BackendError::ProcessingFailed(format!(
                "scaled copy of {}x{} exceeds the {MAX_CANVAS_PIXELS} pixel limit",
                placement.width, placement.height
            )));
        }
        let scaled = imageops::resize(
            source,
            placement.width,
            placement.height,
            filter.filter_type(),
        );
        imageops::overlay(canvas, &scaled, placement.x, placement.y);
        Ok(())
    }

    fn encode(
        &self,
        image: &DynamicImage,
        kind: ImageKind,
        options: EncodeOptions,
    ) -> Result<Vec<u8>, BackendError> {
        match kind {
            ImageKind::Jpeg => encode_jpeg(image, options.quality),
            ImageKind::Png => encode_png(image, options),
            ImageKind::Gif => encode_gif(image),
        }
        .map_err(|e| BackendError::ProcessingFailed(format!("{kind} encode failed: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{create_test_jpeg, gradient_image};
    use image::{GenericImageView, Rgba};

    #[test]
    fn decode_synthetic_jpeg() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("test.jpg");
        create_test_jpeg(&path, 200, 150);

        let image = RustBackend::new().decode(&path, ImageKind::Jpeg).unwrap();
        assert_eq!(image.dimensions(), (200, 150));
    }

    #[test]
    fn decode_nonexistent_file_is_io_error() {
        let result = RustBackend::new().decode(Path::new("/nonexistent/image.jpg"), ImageKind::Jpeg);
        assert!(matches!(result, Err(BackendError::Io(_))));
    }

    #[test]
    fn decode_with_wrong_codec_fails() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("test.png");
        create_test_jpeg(&path, 20, 20);

        let result = RustBackend::new().decode(&path, ImageKind::Png);
        assert!(matches!(result, Err(BackendError::ProcessingFailed(_))));
    }

    #[test]
    fn canvas_rejects_zero_and_huge_sizes() {
        let backend = RustBackend::new();
        assert!(backend.create_canvas(0, 10).is_err());
        assert!(backend.create_canvas(10, 0).is_err());
        assert!(backend.create_canvas(u32::MAX, u32::MAX).is_err());
        assert_eq!(backend.create_canvas(3, 2).unwrap().dimensions(), (3, 2));
    }

    #[test]
    fn fill_paints_every_pixel_opaque() {
        let backend = RustBackend::new();
        let mut canvas = backend.create_canvas(4, 3).unwrap();
        backend.fill(&mut canvas, Color::new(9, 8, 7)).unwrap();
        assert!(canvas.pixels().all(|p| *p == Rgba([9, 8, 7, 255])));
    }

    #[test]
    fn resample_copy_leaves_background_outside_placement() {
        let backend = RustBackend::new();
        let mut canvas = backend.create_canvas(10, 10).unwrap();
        backend.fill(&mut canvas, Color::WHITE).unwrap();

        let red = DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
            40,
            20,
            image::Rgb([255, 0, 0]),
        ));
        let placement = Placement {
            x: 0,
            y: 2,
            width: 10,
            height: 5,
        };
        backend
            .resample_copy(&mut canvas, &red, placement, Resampling::Nearest)
            .unwrap();

        assert_eq!(*canvas.get_pixel(5, 0), Rgba([255, 255, 255, 255]));
        assert_eq!(*canvas.get_pixel(5, 4), Rgba([255, 0, 0, 255]));
        assert_eq!(*canvas.get_pixel(5, 9), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn resample_copy_clips_negative_offsets() {
        let backend = RustBackend::new();
        let mut canvas = backend.create_canvas(10, 5).unwrap();
        let placement = Placement {
            x: 0,
            y: -2,
            width: 10,
            height: 10,
        };
        backend
            .resample_copy(&mut canvas, &gradient_image(20, 20), placement, Resampling::Triangle)
            .unwrap();
        assert_eq!(canvas.dimensions(), (10, 5));
    }

    #[test]
    fn resample_copy_rejects_empty_placement() {
        let backend = RustBackend::new();
        let mut canvas = backend.create_canvas(10, 10).unwrap();
        let result = backend.resample_copy(
            &mut canvas,
            &gradient_image(4, 4),
            Placement::at_origin(10, 0),
            Resampling::Lanczos3,
        );
        assert!(result.is_err());
    }

    #[test]
    fn resample_copy_rejects_oversized_copy() {
        let backend = RustBackend::new();
        let mut canvas = backend.create_canvas(1, 100_000).unwrap();
        // A 1x2 source fitted to a 1x100000 canvas
        let placement = Placement {
            x: -24_999,
            y: 0,
            width: 50_000,
            height: 100_000,
        };
        let result =
            backend.resample_copy(&mut canvas, &gradient_image(1, 2), placement, Resampling::Nearest);
        assert!(matches!(result, Err(BackendError::ProcessingFailed(m)) if m.contains("pixel limit")));
    }

    #[test]
    fn encode_accepts_gray_and_16_bit_images() {
        let backend = RustBackend::new();
        let gray = DynamicImage::ImageLuma8(image::GrayImage::from_pixel(10, 10, image::Luma([90])));
        let rgb16 = DynamicImage::ImageRgb16(image::ImageBuffer::from_pixel(
            12,
            6,
            image::Rgb([1000u16, 20000, 65535]),
        ));
        let gray_alpha16 = DynamicImage::ImageLumaA16(image::ImageBuffer::from_pixel(
            5,
            7,
            image::LumaA([30000u16, 65535]),
        ));

        for source in [&gray, &rgb16, &gray_alpha16] {
            for kind in [ImageKind::Jpeg, ImageKind::Png, ImageKind::Gif] {
                let bytes = backend
                    .encode(source, kind, EncodeOptions::with_quality(80))
                    .unwrap_or_else(|e| panic!("{kind} from {:?}: {e}", source.color()));
                let decoded =
                    image::load_from_memory_with_format(&bytes, kind.image_format()).unwrap();
                assert_eq!(decoded.dimensions(), source.dimensions(), "{kind}");
            }
        }
    }

    #[test]
    fn encode_then_decode_keeps_dimensions() {
        let backend = RustBackend::new();
        let tmp = tempfile::TempDir::new().unwrap();
        let source = gradient_image(37, 21);

        for kind in [ImageKind::Jpeg, ImageKind::Png, ImageKind::Gif] {
            let bytes = backend
                .encode(&source, kind, EncodeOptions::with_quality(80))
                .unwrap();
            let path = tmp.path().join(format!("roundtrip.{}", kind.extension()));
            std::fs::write(&path, bytes).unwrap();

            let decoded = backend.decode(&path, kind).unwrap();
            assert_eq!(decoded.dimensions(), (37, 21), "{kind} round trip");
        }
    }

    #[test]
    fn jpeg_encode_accepts_zero_quality_and_alpha() {
        let rgba = DynamicImage::ImageRgba8(RgbaImage::new(8, 8));
        let bytes = RustBackend::new()
            .encode(&rgba, ImageKind::Jpeg, EncodeOptions::default())
            .unwrap();
        assert!(bytes.starts_with(&[0xFF, 0xD8]));
    }

    #[test]
    fn png_encode_honors_every_filter() {
        let backend = RustBackend::new();
        for png_filter in [
            PngFilter::None,
            PngFilter::Sub,
            PngFilter::Up,
            PngFilter::Avg,
            PngFilter::Paeth,
            PngFilter::Adaptive,
        ] {
            let bytes = backend
                .encode(
                    &gradient_image(16, 16),
                    ImageKind::Png,
                    EncodeOptions {
                        quality: 9,
                        png_filter,
                    },
                )
                .unwrap();
            assert!(bytes.starts_with(b"\x89PNG"));
        }
    }

    #[test]
    fn compression_levels_bucket_into_presets() {
        assert!(matches!(png_compression(0), CompressionType::Fast));
        assert!(matches!(png_compression(5), CompressionType::Default));
        assert!(matches!(png_compression(9), CompressionType::Best));
    }
}
