//! Views: named collections of elements, optionally custom and inheriting.

use indexmap::IndexMap;
use serde::Serialize;

use crate::element::ThemeElement;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ThemeView {
    pub name: String,
    /// Empty when never declared; see [`ThemeView::display_name`].
    pub display_name: String,
    /// Elements in first-declaration order.
    pub elements: IndexMap<String, ThemeElement>,
    pub is_custom: bool,
    /// Deepest ancestor of a custom view.
    pub base_type: Option<String>,
    /// Every ancestor applied so far, nearest first. Never contains `name`.
    pub base_chain: Vec<String>,
    pub extra_transition: Option<String>,
    pub extra_transition_direction: Option<String>,
    pub extra_transition_speed: Option<f32>,
}

impl ThemeView {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Declared display name, or the view name.
    pub fn display_name(&self) -> &str {
        if self.display_name.is_empty() {
            &self.name
        } else {
            &self.display_name
        }
    }

    pub fn element(&self, name: &str) -> Option<&ThemeElement> {
        self.elements.get(name)
    }

    pub fn element_names(&self) -> impl Iterator<Item = &str> {
        self.elements.keys().map(String::as_str)
    }

    /// `true` when `kind` is this view's base type or any of its ancestors.
    pub fn is_of_type(&self, kind: &str) -> bool {
        self.base_type.as_deref() == Some(kind) || self.base_chain.iter().any(|b| b == kind)
    }
}
