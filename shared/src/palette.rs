//! Colour palette for the dial, stored as "#RRGGBB" strings in the config

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaletteError {
    #[error("Colour must look like #RRGGBB, got {0:?}")]
    Malformed(String),
}

/// An opaque sRGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Rgb {
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }
}

impl FromStr for Rgb {
    type Err = PaletteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || PaletteError::Malformed(s.to_string());
        let hex = s.strip_prefix('#').ok_or_else(malformed)?;
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(malformed());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| malformed());
        Ok(Rgb::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl TryFrom<String> for Rgb {
    type Error = PaletteError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(rgb: Rgb) -> Self {
        rgb.to_string()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.red, self.green, self.blue)
    }
}

/// Colours the dial is drawn with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub background: Rgb,
    pub tick_default: Rgb,
    pub tick_highlight: Rgb,
    pub arc_twilight: Rgb,
    pub arc_golden_hour: Rgb,
    pub arc_daylight: Rgb,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Rgb::new(0x15, 0x17, 0x19),
            tick_default: Rgb::new(0x3A, 0x3E, 0x42),
            tick_highlight: Rgb::new(0xFF, 0xD8, 0x8A),
            arc_twilight: Rgb::new(0x4A, 0x5D, 0x8C),
            arc_golden_hour: Rgb::new(0xFF, 0x47, 0x00),
            arc_daylight: Rgb::new(0xFF, 0xD8, 0x8A),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!("#FF4700".parse::<Rgb>().unwrap(), Rgb::new(255, 71, 0));
        assert_eq!("#ff4700".parse::<Rgb>().unwrap(), Rgb::new(255, 71, 0));
        assert_eq!(Rgb::new(21, 23, 25).to_string(), "#151719");
    }

    #[test]
    fn test_reject_malformed() {
        for bad in ["FF4700", "#FF47", "#GG4700", "#FF47000", "#ÿÿÿ"] {
            assert!(bad.parse::<Rgb>().is_err(), "{bad} should not parse");
        }
    }

    #[test]
    fn test_partial_palette_uses_defaults() {
        let palette: Palette = crate::parse_config("arc_daylight = \"#FFFFFF\"\n").unwrap();
        assert_eq!(palette.arc_daylight, Rgb::new(255, 255, 255));
        assert_eq!(palette.background, Palette::default().background);
    }

    #[test]
    fn test_bad_colour_fails_config() {
        let result: Result<Palette, _> = crate::parse_config("background = \"black\"\n");
        assert!(result.is_err());
    }
}
