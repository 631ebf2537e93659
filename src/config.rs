//! CLI configuration.
//!
//! Handles loading, validating, and merging `thumbforge.toml`. Stock defaults
//! are overridden by whatever the user file sets; command-line flags override
//! both.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! base_side = "big"          # none | width | height | big | small | restricted
//! reduce_only = false        # never enlarge a source on both sides
//! filter = "lanczos3"        # nearest | triangle | catmull-rom | gaussian | lanczos3
//!
//! [thumbnail]
//! background = "#ffffff"     # "#RRGGBB", "#RGB" or [r, g, b]
//! horizontal_align = "center"  # left | center | right
//! vertical_align = "center"    # top | center | bottom
//!
//! [output]
//! format = "jpeg"            # jpeg | jpg | gif | png
//! jpeg_quality = 85          # 0-100
//! png_compression = 6        # 0-9
//! png_filter = "none"        # none | sub | up | avg | paeth | adaptive
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::color::{Color, ColorSpec};
use crate::imaging::{
    BaseSide, EncodeOptions, HorizontalAlign, ImageKind, PngFilter, Resampling, VerticalAlign,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Processor configuration loaded from `thumbforge.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessorConfig {
    /// Resize policy applied by `resize`.
    pub base_side: BaseSide,
    /// Skip resizing when both requested sides exceed the source.
    pub reduce_only: bool,
    /// Resampling filter.
    pub filter: Resampling,
    /// Thumbnail canvas settings.
    pub thumbnail: ThumbnailConfig,
    /// Encoder settings.
    pub output: OutputConfig,
}

impl ProcessorConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.output.jpeg_quality > 100 {
            return Err(ConfigError::Validation(
                "output.jpeg_quality must be 0-100".into(),
            ));
        }
        if self.output.png_compression > 9 {
            return Err(ConfigError::Validation(
                "output.png_compression must be 0-9".into(),
            ));
        }
        self.thumbnail.background_color()?;
        Ok(())
    }
}

/// Thumbnail canvas settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThumbnailConfig {
    /// Canvas color around the scaled image.
    pub background: ColorSpec,
    pub horizontal_align: HorizontalAlign,
    pub vertical_align: VerticalAlign,
}

impl ThumbnailConfig {
    pub fn background_color(&self) -> Result<Color, ConfigError> {
        self.background
            .resolve()
            .map_err(|e| ConfigError::Validation(format!("thumbnail.background: {e}")))
    }
}

impl Default for ThumbnailConfig {
    fn default() -> Self {
        Self {
            background: Color::WHITE.into(),
            horizontal_align: HorizontalAlign::Center,
            vertical_align: VerticalAlign::Center,
        }
    }
}

/// Encoder settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Output format when none is given on the command line.
    pub format: ImageKind,
    /// JPEG quality (0 = worst, 100 = best).
    pub jpeg_quality: u8,
    /// PNG compression level (0 = none, 9 = best).
    pub png_compression: u8,
    pub png_filter: PngFilter,
}

impl OutputConfig {
    /// Encoder options for `kind`, picking the matching quality knob.
    pub fn encode_options(&self, kind: ImageKind) -> EncodeOptions {
        let quality = match kind {
            ImageKind::Jpeg => self.jpeg_quality,
            ImageKind::Png => self.png_compression,
            ImageKind::Gif => 0,
        };
        EncodeOptions {
            quality,
            png_filter: self.png_filter,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: ImageKind::Jpeg,
            jpeg_quality: 85,
            png_compression: 6,
            png_filter: PngFilter::None,
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged onto.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(ProcessorConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Merge an optional overlay onto the stock defaults, then deserialize and validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<ProcessorConfig, ConfigError> {
    let base = stock_defaults_value();
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: ProcessorConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from a TOML file, or the stock defaults when `path` is `None`.
pub fn load_config(path: Option<&Path>) -> Result<ProcessorConfig, ConfigError> {
    let overlay = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            Some(toml::from_str::<toml::Value>(&content)?)
        }
        None => None,
    };
    resolve_config(overlay)
}

/// Returns a fully-commented stock `thumbforge.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Thumbforge Configuration
# ========================
# All options are optional. Values shown are the defaults.

# Which requested side `resize` honors exactly:
#   none       - exactly the requested width and height
#   width      - width fixed, height follows the aspect ratio
#   height     - height fixed, width follows the aspect ratio
#   big        - the side matching the larger source side is fixed
#   small      - the side matching the smaller source side is fixed
#   restricted - height drives the width
base_side = "big"

# Leave the source untouched when both requested sides are larger than it.
reduce_only = false

# Resampling filter: nearest, triangle, catmull-rom, gaussian, lanczos3
filter = "lanczos3"

[thumbnail]
# Canvas color: "#RRGGBB", "#RGB" or [r, g, b]
background = "#ffffff"
# left, center or right
horizontal_align = "center"
# top, center or bottom
vertical_align = "center"

[output]
# jpeg, gif or png
format = "jpeg"
# JPEG quality, 0 (worst) to 100 (best)
jpeg_quality = 85
# PNG compression level, 0 (none) to 9 (best)
png_compression = 6
# PNG row filter: none, sub, up, avg, paeth, adaptive
png_filter = "none"
"##
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(toml_src: &str) -> Result<ProcessorConfig, ConfigError> {
        resolve_config(Some(toml::from_str(toml_src).unwrap()))
    }

    #[test]
    fn defaults_are_valid() {
        let config = resolve_config(None).unwrap();
        assert_eq!(config, ProcessorConfig::default());
        assert_eq!(config.base_side, BaseSide::Big);
        assert_eq!(config.thumbnail.background_color().unwrap(), Color::WHITE);
        assert_eq!(config.output.format, ImageKind::Jpeg);
    }

    #[test]
    fn stock_toml_matches_defaults() {
        let config = parse(stock_config_toml()).unwrap();
        assert_eq!(config, ProcessorConfig::default());
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let config = parse(
            r#"
            reduce_only = true
            [thumbnail]
            background = [0, 0, 0]
            "#,
        )
        .unwrap();

        assert!(config.reduce_only);
        assert_eq!(config.thumbnail.background_color().unwrap(), Color::BLACK);
        assert_eq!(config.thumbnail.horizontal_align, HorizontalAlign::Center);
        assert_eq!(config.output, OutputConfig::default());
    }

    #[test]
    fn jpg_alias_selects_jpeg() {
        let config = parse("[output]\nformat = \"jpg\"").unwrap();
        assert_eq!(config.output.format, ImageKind::Jpeg);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(matches!(
            parse("[output]\nqualty = 5"),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn out_of_range_values_fail_validation() {
        assert!(matches!(
            parse("[output]\njpeg_quality = 101"),
            Err(ConfigError::Validation(_))
        ));
        assert!(matches!(
            parse("[output]\npng_compression = 10"),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn bad_background_fails_validation() {
        let err = parse("[thumbnail]\nbackground = \"#12\"").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(m) if m.contains("thumbnail.background")));
    }

    #[test]
    fn encode_options_pick_quality_per_format() {
        let output = OutputConfig {
            png_filter: PngFilter::Paeth,
            ..OutputConfig::default()
        };
        assert_eq!(output.encode_options(ImageKind::Jpeg).quality, 85);
        assert_eq!(output.encode_options(ImageKind::Png).quality, 6);
        assert_eq!(output.encode_options(ImageKind::Gif).quality, 0);
        assert_eq!(
            output.encode_options(ImageKind::Png).png_filter,
            PngFilter::Paeth
        );
    }

    #[test]
    fn merge_toml_overrides_nested_keys_only() {
        let base: toml::Value = toml::from_str("a = 1\n[t]\nx = 1\ny = 2").unwrap();
        let overlay: toml::Value = toml::from_str("[t]\ny = 3").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["a"].as_integer(), Some(1));
        assert_eq!(merged["t"]["x"].as_integer(), Some(1));
        assert_eq!(merged["t"]["y"].as_integer(), Some(3));
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("thumbforge.toml");
        fs::write(&path, "base_side = \"width\"").unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.base_side, BaseSide::Width);
    }

    #[test]
    fn load_config_missing_file_is_io_error() {
        let result = load_config(Some(Path::new("/nonexistent/thumbforge.toml")));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
