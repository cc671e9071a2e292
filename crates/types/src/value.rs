use serde::Serialize;
use std::fmt;

use crate::color::Color;
use crate::geometry::{parse_bool, parse_float_prefix, parse_pair, parse_rect};

/// The declared type of a property in an element schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PropertyKind {
    NormalizedPair,
    NormalizedRect,
    Path,
    String,
    Color,
    Float,
    Boolean,
}

impl PropertyKind {
    pub fn name(self) -> &'static str {
        match self {
            PropertyKind::NormalizedPair => "pair",
            PropertyKind::NormalizedRect => "rect",
            PropertyKind::Path => "path",
            PropertyKind::String => "string",
            PropertyKind::Color => "color",
            PropertyKind::Float => "float",
            PropertyKind::Boolean => "boolean",
        }
    }

    /// Converts already-expanded text into a value of this kind.
    ///
    /// Paths are returned as plain strings; resolving them against the
    /// filesystem is the caller's business.
    pub fn parse(self, text: &str) -> PropertyValue {
        match self {
            PropertyKind::NormalizedPair => {
                let (x, y) = parse_pair(text);
                PropertyValue::Pair(x, y)
            }
            PropertyKind::NormalizedRect => {
                let (x, y, z, w) = parse_rect(text);
                PropertyValue::Rect(x, y, z, w)
            }
            PropertyKind::Path | PropertyKind::String => PropertyValue::Str(text.to_string()),
            PropertyKind::Color => PropertyValue::Color(Color::parse_lenient(text)),
            PropertyKind::Float => PropertyValue::Float(parse_float_prefix(text)),
            PropertyKind::Boolean => PropertyValue::Bool(parse_bool(text)),
        }
    }
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A resolved property value. The variant always matches the kind the
/// owning element's schema declares for the property.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Pair(f32, f32),
    Rect(f32, f32, f32, f32),
    Str(String),
    Color(Color),
    Float(f32),
    Bool(bool),
}

impl PropertyValue {
    pub fn as_pair(&self) -> Option<(f32, f32)> {
        match self {
            PropertyValue::Pair(x, y) => Some((*x, *y)),
            _ => None,
        }
    }

    pub fn as_rect(&self) -> Option<(f32, f32, f32, f32)> {
        match self {
            PropertyValue::Rect(x, y, z, w) => Some((*x, *y, *z, *w)),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_color(&self) -> Option<Color> {
        match self {
            PropertyValue::Color(c) => Some(*c),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f32> {
        match self {
            PropertyValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        PropertyValue::Str(s.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        PropertyValue::Str(s)
    }
}

impl From<Color> for PropertyValue {
    fn from(c: Color) -> Self {
        PropertyValue::Color(c)
    }
}

impl From<f32> for PropertyValue {
    fn from(v: f32) -> Self {
        PropertyValue::Float(v)
    }
}

impl From<bool> for PropertyValue {
    fn from(b: bool) -> Self {
        PropertyValue::Bool(b)
    }
}
