//! Resolved elements and their typed property access.

use indexmap::IndexMap;
use serde::Serialize;
use std::ops::BitOr;
use vista_types::{Color, PropertyValue};

use crate::storyboard::Storyboard;

/// Storyboard events that run when a view becomes active.
pub const ACTIVATION_EVENTS: &[&str] = &["activate", "activateNext", "activatePrev"];

/// Whether an element is a free-standing decoration ("extra") and where it
/// came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ExtraKind {
    #[default]
    None,
    /// `extra="true"` or an automatically extra type.
    Dynamic,
    /// `extra="static"`.
    Static,
    /// Declared by a per-game overlay.
    PerGame,
    /// Template child of a list-like element.
    ItemTemplate,
}

impl ExtraKind {
    pub fn is_extra(self) -> bool {
        self != ExtraKind::None
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ThemeElement {
    /// Element type, the tag it was declared with.
    pub kind: String,
    pub extra: ExtraKind,
    pub properties: IndexMap<String, PropertyValue>,
    pub storyboards: IndexMap<String, Storyboard>,
    /// Nested elements in declaration order, keyed by name (or tag).
    pub children: Vec<(String, ThemeElement)>,
}

impl ThemeElement {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..Self::default()
        }
    }

    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }

    pub fn has(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    pub fn pair(&self, name: &str) -> Option<(f32, f32)> {
        self.get(name)?.as_pair()
    }

    pub fn rect(&self, name: &str) -> Option<(f32, f32, f32, f32)> {
        self.get(name)?.as_rect()
    }

    pub fn string(&self, name: &str) -> Option<&str> {
        self.get(name)?.as_str()
    }

    pub fn color(&self, name: &str) -> Option<Color> {
        self.get(name)?.as_color()
    }

    pub fn float(&self, name: &str) -> Option<f32> {
        self.get(name)?.as_float()
    }

    pub fn bool(&self, name: &str) -> Option<bool> {
        self.get(name)?.as_bool()
    }

    /// Data-binding expression recorded for `name`, such as `{game:name}`.
    pub fn binding(&self, name: &str) -> Option<&str> {
        self.string(&format!("{}_binding", name))
    }

    pub fn storyboard(&self, event: &str) -> Option<&Storyboard> {
        self.storyboards.get(event)
    }

    pub fn has_activation_storyboard(&self) -> bool {
        ACTIVATION_EVENTS.iter().any(|e| self.storyboards.contains_key(*e))
    }

    pub fn child(&self, name: &str) -> Option<&ThemeElement> {
        self.children.iter().find(|(n, _)| n == name).map(|(_, e)| e)
    }
}

/// Selects which extras a view query returns. Flags combine with `|`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExtraFilter {
    pub with_activation: bool,
    pub without_activation: bool,
    pub per_game: bool,
}

impl ExtraFilter {
    pub const ALL: ExtraFilter = ExtraFilter {
        with_activation: true,
        without_activation: true,
        per_game: true,
    };
    pub const WITH_ACTIVATION: ExtraFilter = ExtraFilter {
        with_activation: true,
        without_activation: false,
        per_game: false,
    };
    pub const WITHOUT_ACTIVATION: ExtraFilter = ExtraFilter {
        with_activation: false,
        without_activation: true,
        per_game: false,
    };
    pub const PER_GAME: ExtraFilter = ExtraFilter {
        with_activation: false,
        without_activation: false,
        per_game: true,
    };

    pub fn matches(&self, element: &ThemeElement) -> bool {
        if !element.extra.is_extra() {
            return false;
        }
        let activation = element.has_activation_storyboard();
        (self.with_activation && activation)
            || (self.without_activation && !activation)
            || (self.per_game && element.extra == ExtraKind::PerGame)
    }
}

impl BitOr for ExtraFilter {
    type Output = ExtraFilter;

    fn bitor(self, rhs: ExtraFilter) -> ExtraFilter {
        ExtraFilter {
            with_activation: self.with_activation || rhs.with_activation,
            without_activation: self.without_activation || rhs.without_activation,
            per_game: self.per_game || rhs.per_game,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storyboard(event: &str) -> Storyboard {
        Storyboard {
            event: event.to_string(),
            repeat: 1,
            repeat_at: 0,
            animations: Vec::new(),
        }
    }

    #[test]
    fn typed_getters_reject_mismatched_kinds() {
        let mut el = ThemeElement::new("text");
        el.properties.insert("color".into(), PropertyValue::Color(Color(0x112233FF)));
        el.properties.insert("pos".into(), PropertyValue::Pair(0.1, 0.2));
        el.properties.insert("text_binding".into(), PropertyValue::Str("{game:name}".into()));

        assert_eq!(el.color("color"), Some(Color(0x112233FF)));
        assert_eq!(el.float("color"), None);
        assert_eq!(el.pair("pos"), Some((0.1, 0.2)));
        assert_eq!(el.rect("pos"), None);
        assert_eq!(el.binding("text"), Some("{game:name}"));
        assert!(el.has("pos"));
        assert!(!el.has("size"));
    }

    #[test]
    fn filter_by_activation_and_per_game() {
        let mut animated = ThemeElement::new("image");
        animated.extra = ExtraKind::Dynamic;
        animated.storyboards.insert("activateNext".into(), storyboard("activateNext"));

        let mut still = ThemeElement::new("image");
        still.extra = ExtraKind::PerGame;

        let plain = ThemeElement::new("image");

        assert!(ExtraFilter::ALL.matches(&animated));
        assert!(!ExtraFilter::ALL.matches(&plain));
        assert!(ExtraFilter::WITH_ACTIVATION.matches(&animated));
        assert!(!ExtraFilter::WITH_ACTIVATION.matches(&still));
        assert!(ExtraFilter::PER_GAME.matches(&still));

        let combined = ExtraFilter::WITH_ACTIVATION | ExtraFilter::PER_GAME;
        assert!(combined.matches(&animated));
        assert!(combined.matches(&still));
    }
}
