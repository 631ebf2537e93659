//! The image processor.
//!
//! An [`ImageProcessor`] owns one decoded source image and produces resized
//! copies and thumbnails from it. Results are independent images owned by the
//! caller; the processor itself is never modified by `resize` or
//! `make_thumbnail`.
//!
//! ```no_run
//! use thumbforge::{BaseSide, EncodeOptions, ImageKind, ImageProcessor};
//!
//! let mut processor = ImageProcessor::open("uploads/photo.jpg")?;
//! processor.base_side = BaseSide::Width;
//! let resized = processor.resize(800, 0)?;
//! processor.save(&resized, "public/%base%_800", ImageKind::Jpeg, EncodeOptions::with_quality(85))?;
//! # Ok::<(), thumbforge::ProcessError>(())
//! ```

use crate::color::{Color, ColorSpec};
use crate::error::{ProcessError, Result};
use crate::imaging::{
    BaseSide, EncodeOptions, HorizontalAlign, ImageBackend, ImageKind, Placement, Resampling,
    RustBackend, VerticalAlign, calculate_resize_dimensions, calculate_thumbnail_placement,
};
use crate::naming::{parse_source_path, resolve_output_filename};
use crate::output::{CONTENT_TYPE, ResponseSink};
use image::{DynamicImage, GenericImageView, RgbaImage};
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A file received through an HTTP upload.
///
/// The name and MIME type are the ones declared by the client and are
/// recorded verbatim; the temporary file is left in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub temp_path: PathBuf,
    pub file_name: String,
    pub mime_type: String,
}

/// Everything needed to render a thumbnail, for the combined helpers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThumbnailRequest {
    pub width: u32,
    pub height: u32,
    pub background: ColorSpec,
    pub horizontal_align: HorizontalAlign,
    pub vertical_align: VerticalAlign,
}

impl ThumbnailRequest {
    /// A centered thumbnail on the given background.
    pub fn new(width: u32, height: u32, background: impl Into<ColorSpec>) -> Self {
        Self {
            width,
            height,
            background: background.into(),
            horizontal_align: HorizontalAlign::default(),
            vertical_align: VerticalAlign::default(),
        }
    }

    pub fn aligned(mut self, horizontal: HorizontalAlign, vertical: VerticalAlign) -> Self {
        self.horizontal_align = horizontal;
        self.vertical_align = vertical;
        self
    }
}

/// Resizes and thumbnails one source image.
pub struct ImageProcessor<B: ImageBackend = RustBackend> {
    image: DynamicImage,
    name: String,
    mime_type: String,
    width: u32,
    height: u32,
    /// Which requested side `resize` keeps exactly.
    pub base_side: BaseSide,
    /// Return the source untouched when asked to enlarge it on both sides.
    pub reduce_only: bool,
    pub filter: Resampling,
    backend: B,
}

impl ImageProcessor<RustBackend> {
    /// Decode an image file, choosing the codec from its extension.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(path, RustBackend::new())
    }

    /// Decode an uploaded file, choosing the codec from its declared MIME type.
    pub fn from_upload(upload: &Upload) -> Result<Self> {
        Self::from_upload_with(upload, RustBackend::new())
    }

    /// Adopt an already decoded image. Name and type are left empty.
    pub fn from_image(image: DynamicImage) -> Result<Self> {
        Self::from_image_with(image, RustBackend::new())
    }
}

impl<B: ImageBackend> ImageProcessor<B> {
    pub fn open_with(path: impl AsRef<Path>, backend: B) -> Result<Self> {
        let path = path.as_ref();
        let source = parse_source_path(path)
            .ok_or_else(|| ProcessError::UnsupportedFormat(path.display().to_string()))?;
        let image = decode(&backend, path, source.kind)?;
        Self::build(image, source.name, source.mime_type, backend)
    }

    pub fn from_upload_with(upload: &Upload, backend: B) -> Result<Self> {
        let kind = ImageKind::from_mime(&upload.mime_type)
            .ok_or_else(|| ProcessError::UnsupportedFormat(upload.mime_type.clone()))?;
        let image = decode(&backend, &upload.temp_path, kind)?;
        Self::build(
            image,
            upload.file_name.clone(),
            upload.mime_type.clone(),
            backend,
        )
    }

    pub fn from_image_with(image: DynamicImage, backend: B) -> Result<Self> {
        Self::build(image, String::new(), String::new(), backend)
    }

    fn build(image: DynamicImage, name: String, mime_type: String, backend: B) -> Result<Self> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(ProcessError::InvalidInput(format!(
                "source image is {width}x{height}"
            )));
        }
        debug!(%name, %mime_type, width, height, "source image ready");
        Ok(Self {
            image,
            name,
            mime_type,
            width,
            height,
            base_side: BaseSide::default(),
            reduce_only: false,
            filter: Resampling::default(),
            backend,
        })
    }

    pub fn with_base_side(mut self, base_side: BaseSide) -> Self {
        self.base_side = base_side;
        self
    }

    pub fn with_reduce_only(mut self, reduce_only: bool) -> Self {
        self.reduce_only = reduce_only;
        self
    }

    pub fn with_filter(mut self, filter: Resampling) -> Self {
        self.filter = filter;
        self
    }

    /// Source name; empty for adopted images.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Source MIME type; empty for adopted images.
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Release the processor, keeping the source image.
    pub fn into_image(self) -> DynamicImage {
        self.image
    }

    /// Produce a resized copy according to [`base_side`](Self::base_side).
    ///
    /// With [`reduce_only`](Self::reduce_only) set and both requested sides
    /// larger than the source, the source itself is returned as
    /// `Cow::Borrowed` and nothing is allocated.
    pub fn resize(&self, width: u32, height: u32) -> Result<Cow<'_, DynamicImage>> {
        if self.reduce_only && width > self.width && height > self.height {
            debug!(width, height, "reduce-only: keeping source as is");
            return Ok(Cow::Borrowed(&self.image));
        }

        let (new_width, new_height) =
            calculate_resize_dimensions(self.dimensions(), (width, height), self.base_side);
        debug!(
            base_side = ?self.base_side,
            requested = ?(width, height),
            computed = ?(new_width, new_height),
            "resizing"
        );

        let mut canvas = self.allocate_canvas(new_width, new_height)?;
        self.backend
            .resample_copy(
                &mut canvas,
                &self.image,
                Placement::at_origin(new_width, new_height),
                self.filter,
            )
            .map_err(|e| ProcessError::Resample(e.to_string()))?;
        Ok(Cow::Owned(DynamicImage::ImageRgba8(canvas)))
    }

    /// Render the source, scaled to fit, onto a `width`×`height` canvas
    /// painted with `background`.
    pub fn make_thumbnail(
        &self,
        width: u32,
        height: u32,
        background: impl Into<ColorSpec>,
        horizontal_align: HorizontalAlign,
        vertical_align: VerticalAlign,
    ) -> Result<DynamicImage> {
        let placement = calculate_thumbnail_placement(
            self.dimensions(),
            (width, height),
            horizontal_align,
            vertical_align,
        );

        let mut canvas = self.allocate_canvas(width, height)?;
        let color = self.resolve_color(background)?;
        debug!(%color, ?placement, "composing thumbnail");

        self.backend
            .fill(&mut canvas, color)
            .map_err(|e| ProcessError::Fill(e.to_string()))?;
        self.backend
            .resample_copy(&mut canvas, &self.image, placement, self.filter)
            .map_err(|e| ProcessError::Resample(e.to_string()))?;
        Ok(DynamicImage::ImageRgba8(canvas))
    }

    /// [`make_thumbnail`](Self::make_thumbnail) with the copy centered.
    pub fn make_centered_thumbnail(
        &self,
        width: u32,
        height: u32,
        background: impl Into<ColorSpec>,
    ) -> Result<DynamicImage> {
        self.make_thumbnail(
            width,
            height,
            background,
            HorizontalAlign::Center,
            VerticalAlign::Center,
        )
    }

    /// Parse a background color.
    ///
    /// Canvases are true-color, so any RGB triple is accepted as is.
    pub fn resolve_color(&self, spec: impl Into<ColorSpec>) -> Result<Color> {
        Color::parse(spec)
    }

    /// Encode `image` and write it to the file named by `template`.
    ///
    /// Returns the path written, after `%base%` substitution and extension
    /// completion (see [`naming`](crate::naming)).
    pub fn save(
        &self,
        image: &DynamicImage,
        template: &str,
        kind: ImageKind,
        options: EncodeOptions,
    ) -> Result<PathBuf> {
        let path = resolve_output_filename(template, &self.name, kind);
        let target = path.display().to_string();
        let bytes = self.encode(image, kind, options, &target)?;
        std::fs::write(&path, bytes).map_err(|e| ProcessError::Encode {
            target: target.clone(),
            reason: e.to_string(),
        })?;
        debug!(path = %target, %kind, "saved image");
        Ok(path)
    }

    /// Encode `image` and send it to `sink` behind a `Content-Type` header.
    ///
    /// Encoding happens before the header is set, so a failed encode leaves
    /// the sink untouched.
    pub fn output<S: ResponseSink + ?Sized>(
        &self,
        image: &DynamicImage,
        kind: ImageKind,
        options: EncodeOptions,
        sink: &mut S,
    ) -> Result<()> {
        let bytes = self.encode(image, kind, options, kind.name())?;
        let sink_failed = |e: std::io::Error| ProcessError::Encode {
            target: kind.name().to_string(),
            reason: e.to_string(),
        };
        sink.set_header(CONTENT_TYPE, kind.mime_type())
            .map_err(sink_failed)?;
        sink.write_body(&bytes).map_err(sink_failed)?;
        debug!(content_type = kind.mime_type(), bytes = bytes.len(), "image sent");
        Ok(())
    }

    pub fn resize_and_save(
        &self,
        width: u32,
        height: u32,
        template: &str,
        kind: ImageKind,
        options: EncodeOptions,
    ) -> Result<PathBuf> {
        let resized = self.resize(width, height)?;
        self.save(&resized, template, kind, options)
    }

    pub fn resize_and_output<S: ResponseSink + ?Sized>(
        &self,
        width: u32,
        height: u32,
        kind: ImageKind,
        options: EncodeOptions,
        sink: &mut S,
    ) -> Result<()> {
        let resized = self.resize(width, height)?;
        self.output(&resized, kind, options, sink)
    }

    pub fn thumbnail_and_save(
        &self,
        request: &ThumbnailRequest,
        template: &str,
        kind: ImageKind,
        options: EncodeOptions,
    ) -> Result<PathBuf> {
        let thumbnail = self.render(request)?;
        self.save(&thumbnail, template, kind, options)
    }

    pub fn thumbnail_and_output<S: ResponseSink + ?Sized>(
        &self,
        request: &ThumbnailRequest,
        kind: ImageKind,
        options: EncodeOptions,
        sink: &mut S,
    ) -> Result<()> {
        let thumbnail = self.render(request)?;
        self.output(&thumbnail, kind, options, sink)
    }

    fn render(&self, request: &ThumbnailRequest) -> Result<DynamicImage> {
        self.make_thumbnail(
            request.width,
            request.height,
            &request.background,
            request.horizontal_align,
            request.vertical_align,
        )
    }

    fn allocate_canvas(&self, width: u32, height: u32) -> Result<RgbaImage> {
        self.backend
            .create_canvas(width, height)
            .map_err(|e| ProcessError::CanvasAllocation {
                width,
                height,
                reason: e.to_string(),
            })
    }

    fn encode(
        &self,
        image: &DynamicImage,
        kind: ImageKind,
        options: EncodeOptions,
        target: &str,
    ) -> Result<Vec<u8>> {
        self.backend
            .encode(image, kind, options)
            .map_err(|e| ProcessError::Encode {
                target: target.to_string(),
                reason: e.to_string(),
            })
    }
}

fn decode<B: ImageBackend>(backend: &B, path: &Path, kind: ImageKind) -> Result<DynamicImage> {
    debug!(path = %path.display(), %kind, "decoding source");
    backend
        .decode(path, kind)
        .map_err(|e| ProcessError::Decode {
            kind: kind.name(),
            path: path.display().to_string(),
            reason: e.to_string(),
        })
}
