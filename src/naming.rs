//! File name handling for sources and outputs.
//!
//! ## Sources
//!
//! A source path must end in one of the recognized image extensions
//! (`jpg`, `jpeg`, `gif`, `png`, any case). The part of the file name before
//! that extension becomes the source's *name*:
//! - `uploads/Holiday.JPG` → name `Holiday`, kind JPEG, type `image/jpg`
//! - `photo.tar.png` → name `photo.tar`, kind PNG
//!
//! ## Outputs
//!
//! Output file names are templates. `%base%` is replaced with the source
//! name, and the canonical extension for the output kind is appended unless
//! the template's last path segment already ends in a recognized extension.
//! Only the template is inspected, never the substituted name:
//! - `out_%base%` + `photo` + JPEG → `out_photo.jpg`
//! - `thumbs/%base%.PNG` + `photo` + PNG → `thumbs/photo.PNG`
//! - `thumb_%base%` + `holiday.jpg` + PNG → `thumb_holiday.jpg.png`

use crate::imaging::ImageKind;
use std::path::{Path, PathBuf};

/// Token replaced with the source name in output templates.
pub const BASE_TOKEN: &str = "%base%";

/// Name and format parsed from a source path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceName {
    /// File name without the image extension.
    pub name: String,
    pub kind: ImageKind,
    /// `image/` followed by the lowercased extension, as found on disk.
    pub mime_type: String,
}

/// Parse a source path, or `None` if it doesn't end in a recognized extension.
pub fn parse_source_path(path: &Path) -> Option<SourceName> {
    let ext = path.extension()?.to_str()?;
    let kind = ImageKind::from_extension(ext)?;
    let name = path.file_stem()?.to_str()?;
    Some(SourceName {
        name: name.to_string(),
        kind,
        mime_type: format!("image/{}", ext.to_ascii_lowercase()),
    })
}

fn has_image_extension(filename: &str) -> bool {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| ImageKind::from_extension(e).is_some())
}

/// Expand an output template into a concrete path.
pub fn resolve_output_filename(template: &str, base: &str, kind: ImageKind) -> PathBuf {
    let keeps_extension = has_image_extension(template);
    let filename = template.replace(BASE_TOKEN, base);
    if keeps_extension {
        PathBuf::from(filename)
    } else {
        PathBuf::from(format!("{filename}.{}", kind.extension()))
    }
}
