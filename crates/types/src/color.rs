use serde::{Serialize, Serializer};

use crate::ValueParseError;

/// A color packed as `0xRRGGBBAA`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color(pub u32);

impl Color {
    pub const WHITE: Color = Color(0xFFFF_FFFF);
    pub const TRANSPARENT: Color = Color(0);

    pub fn from_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self(u32::from_be_bytes([r, g, b, a]))
    }

    pub fn packed(self) -> u32 {
        self.0
    }

    pub fn alpha(self) -> u8 {
        (self.0 & 0xFF) as u8
    }

    /// Strict hex parse: `RRGGBB` or `RRGGBBAA`, with an optional `#` or `0x` prefix.
    pub fn parse_hex(s: &str) -> Result<Color, ValueParseError> {
        let trimmed = s.trim();
        let hex = trimmed
            .strip_prefix('#')
            .or_else(|| trimmed.strip_prefix("0x"))
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);

        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ValueParseError::InvalidColor(s.to_string()));
        }

        match hex.len() {
            6 => u32::from_str_radix(hex, 16)
                .map(|rgb| Color((rgb << 8) | 0xFF))
                .map_err(|_| ValueParseError::InvalidColor(s.to_string())),
            8 => u32::from_str_radix(hex, 16)
                .map(Color)
                .map_err(|_| ValueParseError::InvalidColor(s.to_string())),
            _ => Err(ValueParseError::InvalidColor(s.to_string())),
        }
    }

    /// Lenient parse used for theme documents: anything that is not a valid
    /// hex color becomes fully transparent black.
    pub fn parse_lenient(s: &str) -> Color {
        Self::parse_hex(s).unwrap_or(Color::TRANSPARENT)
    }

    pub fn to_hex(self) -> String {
        format!("{:08X}", self.0)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}
