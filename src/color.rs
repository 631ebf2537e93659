//! Background color parsing.
//!
//! A color can be given as `#RRGGBB`, as the short form `#RGB` (each digit is
//! doubled, so `#ABC` means `#AABBCC`), or as three integer components. The
//! [`ColorSpec`] enum covers both input shapes and deserializes from either a
//! TOML string or a TOML array.

use crate::error::{ProcessError, Result};
use image::Rgba;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An opaque RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Color {
    pub const WHITE: Color = Color::new(255, 255, 255);
    pub const BLACK: Color = Color::new(0, 0, 0);

    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Parse any accepted color shape.
    ///
    /// ```
    /// use thumbforge::Color;
    /// assert_eq!(Color::parse("#FFF").unwrap(), Color::WHITE);
    /// assert_eq!(Color::parse([10u8, 20, 30]).unwrap(), Color::new(10, 20, 30));
    /// assert!(Color::parse("bogus").is_err());
    /// ```
    pub fn parse(spec: impl Into<ColorSpec>) -> Result<Self> {
        spec.into().resolve()
    }

    pub fn to_rgba(self) -> Rgba<u8> {
        Rgba([self.red, self.green, self.blue, u8::MAX])
    }

    fn from_hex(hex: &str) -> Result<Self> {
        let wrong = || ProcessError::InvalidColorFormat(hex.to_string());
        let digits = hex.strip_prefix('#').ok_or_else(wrong)?;
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(wrong());
        }

        let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| wrong());
        match digits.len() {
            6 => Ok(Self::new(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            )),
            3 => {
                let doubled = |i: usize| channel(digits[i..=i].repeat(2).as_str());
                Ok(Self::new(doubled(0)?, doubled(1)?, doubled(2)?))
            }
            _ => Err(wrong()),
        }
    }

    fn from_components(components: &[i64]) -> Result<Self> {
        let wrong = || ProcessError::InvalidColorFormat(format!("{components:?}"));
        let [r, g, b] = components else {
            return Err(wrong());
        };
        let channel = |v: i64| u8::try_from(v).map_err(|_| wrong());
        Ok(Self::new(channel(*r)?, channel(*g)?, channel(*b)?))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.red, self.green, self.blue)
    }
}

/// Unvalidated color input, as written by a caller or a config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorSpec {
    Hex(String),
    Components(Vec<i64>),
}

impl ColorSpec {
    pub fn resolve(&self) -> Result<Color> {
        match self {
            Self::Hex(hex) => Color::from_hex(hex),
            Self::Components(components) => Color::from_components(components),
        }
    }
}

impl From<&str> for ColorSpec {
    fn from(hex: &str) -> Self {
        Self::Hex(hex.to_string())
    }
}

impl From<String> for ColorSpec {
    fn from(hex: String) -> Self {
        Self::Hex(hex)
    }
}

impl From<&String> for ColorSpec {
    fn from(hex: &String) -> Self {
        Self::Hex(hex.clone())
    }
}

impl From<[u8; 3]> for ColorSpec {
    fn from(rgb: [u8; 3]) -> Self {
        Self::Components(rgb.iter().map(|&c| i64::from(c)).collect())
    }
}

impl From<&[i64]> for ColorSpec {
    fn from(components: &[i64]) -> Self {
        Self::Components(components.to_vec())
    }
}

impl From<Vec<i64>> for ColorSpec {
    fn from(components: Vec<i64>) -> Self {
        Self::Components(components)
    }
}

impl From<&ColorSpec> for ColorSpec {
    fn from(spec: &ColorSpec) -> Self {
        spec.clone()
    }
}

impl From<Color> for ColorSpec {
    fn from(color: Color) -> Self {
        Self::Hex(color.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_and_long_hex_agree() {
        let short = Color::parse("#FFF").unwrap();
        let long = Color::parse("#FFFFFF").unwrap();
        assert_eq!(short, long);
        assert_eq!(short, Color::new(255, 255, 255));
    }

    #[test]
    fn short_hex_doubles_each_digit() {
        assert_eq!(Color::parse("#A1c").unwrap(), Color::new(0xAA, 0x11, 0xCC));
    }

    #[test]
    fn long_hex_reads_each_byte() {
        assert_eq!(Color::parse("#0a8Bff").unwrap(), Color::new(10, 139, 255));
    }

    #[test]
    fn components_are_taken_verbatim() {
        assert_eq!(Color::parse([10u8, 20, 30]).unwrap(), Color::new(10, 20, 30));
        assert_eq!(
            Color::parse(vec![0_i64, 128, 255]).unwrap(),
            Color::new(0, 128, 255)
        );
    }

    #[test]
    fn rejects_malformed_strings() {
        for bad in ["bogus", "FFFFFF", "#FFFF", "#GGGGGG", "#+1+1+1", "#", ""] {
            let err = Color::parse(bad).unwrap_err();
            assert!(
                matches!(err, ProcessError::InvalidColorFormat(_)),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_wrong_component_count() {
        assert!(Color::parse(vec![1_i64, 2]).is_err());
        assert!(Color::parse(vec![1_i64, 2, 3, 4]).is_err());
    }

    #[test]
    fn rejects_out_of_range_components() {
        assert!(Color::parse(vec![256_i64, 0, 0]).is_err());
        assert!(Color::parse(vec![0_i64, -1, 0]).is_err());
    }

    #[test]
    fn display_round_trips_through_parse() {
        let color = Color::new(1, 2, 254);
        assert_eq!(color.to_string(), "#0102fe");
        assert_eq!(Color::parse(color).unwrap(), color);
    }

    #[test]
    fn rgba_is_opaque() {
        assert_eq!(Color::new(1, 2, 3).to_rgba(), Rgba([1, 2, 3, 255]));
    }

    #[test]
    fn spec_deserializes_from_string_or_array() {
        #[derive(Deserialize)]
        struct Doc {
            a: ColorSpec,
            b: ColorSpec,
        }
        let doc: Doc = toml::from_str("a = \"#abc\"\nb = [1, 2, 3]").unwrap();
        assert_eq!(doc.a, ColorSpec::Hex("#abc".into()));
        assert_eq!(doc.b, ColorSpec::Components(vec![1, 2, 3]));
    }
}
