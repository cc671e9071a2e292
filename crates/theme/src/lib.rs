//! Theme resolution for the vista front end.
//!
//! A theme is a tree of XML documents: a root `theme.xml` that includes
//! further files, declares variables, switchable variants ("subsets") and
//! per-view element declarations. [`ThemeParser`] folds all of it into a
//! [`ThemeModel`] for one host context (system, region, language, screen,
//! user variant choices). The model answers every lookup the UI makes
//! afterwards without touching the documents again.

pub mod context;
pub mod element;
pub mod error;
pub mod filter;
pub mod include;
pub mod loader;
pub mod menu;
pub mod model;
pub mod parser;
pub mod schema;
pub mod storyboard;
pub mod subset;
pub mod variables;
pub mod view;
pub mod xml;

pub use context::{ThemeContext, VariantOverrides};
pub use element::{ExtraFilter, ExtraKind, ThemeElement};
pub use error::{LoadError, ThemeError};
pub use include::merge_include;
pub use loader::{CURRENT_FORMAT_VERSION, DocumentSource, MINIMUM_FORMAT_VERSION};
pub use menu::MenuTheme;
pub use model::ThemeModel;
pub use parser::{MAX_INCLUDE_DEPTH, OverlayOptions, ThemeParser};
pub use storyboard::{Animation, EasingMode, Storyboard};
pub use subset::{Variant, VariantCatalog};
pub use variables::{Variables, expand};
pub use view::ThemeView;
pub use xml::XmlNode;

pub use vista_types::{Color, PropertyKind, PropertyValue};
