//! # vista
//!
//! Resolves layered XML themes into an immutable model a front end can
//! query while it runs, and republishes that model when the host context
//! changes.
//!
//! ```ignore
//! use vista::{EngineBuilder, ThemeContext};
//!
//! let engine = EngineBuilder::new()
//!     .with_theme_file("/themes/default/theme.xml")
//!     .with_context(ThemeContext::new("snes").with_language("fr_FR"))
//!     .build()?;
//!
//! let model = engine.model();
//! let title = model.get_element("basic", "logoText", "text");
//! ```

mod builder;
mod engine;
pub mod error;

pub use builder::EngineBuilder;
pub use engine::ThemeEngine;
pub use error::EngineError;

pub use vista_resource::{FilesystemResourceResolver, InMemoryResourceResolver};
pub use vista_theme::{
    DocumentSource, ExtraFilter, ExtraKind, MenuTheme, OverlayOptions, ThemeContext, ThemeElement, ThemeError,
    ThemeModel, ThemeParser, ThemeView, VariantOverrides,
};
pub use vista_traits::ResourceResolver;
pub use vista_types::{Color, PropertyKind, PropertyValue};
