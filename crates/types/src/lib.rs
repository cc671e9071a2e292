pub mod color;
pub mod geometry;
pub mod value;

pub use color::Color;
pub use geometry::{parse_bool, parse_float_prefix, parse_pair, parse_rect};
pub use value::{PropertyKind, PropertyValue};

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValueParseError {
    #[error("Invalid color value: '{0}'")]
    InvalidColor(String),
}
