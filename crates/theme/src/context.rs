//! Caller-supplied environment for a resolution pass.

use indexmap::IndexMap;
use std::collections::HashMap;

/// Groups whose global override has a dedicated field.
const DEDICATED_GROUPS: &[&str] = &["colorset", "iconset", "menu", "systemview", "gamelistview"];

/// Variant choices made by the user.
///
/// Per-scope overrides are keyed `"<scope>.<group>"` (for example
/// `"snes.colorset"`) and win over global ones. Global overrides for the
/// five well-known groups live in dedicated fields; any other group uses
/// the `global` map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariantOverrides {
    pub scoped: HashMap<String, String>,
    pub global: HashMap<String, String>,
    pub colorset: Option<String>,
    pub iconset: Option<String>,
    pub menu: Option<String>,
    pub systemview: Option<String>,
    pub gamelistview: Option<String>,
}

impl VariantOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scoped(mut self, scope: &str, group: &str, value: impl Into<String>) -> Self {
        self.scoped.insert(format!("{}.{}", scope, group), value.into());
        self
    }

    /// Sets a global override, routing the well-known groups to their fields.
    pub fn with_global(mut self, group: &str, value: impl Into<String>) -> Self {
        let value = Some(value.into());
        match group {
            "colorset" => self.colorset = value,
            "iconset" => self.iconset = value,
            "menu" => self.menu = value,
            "systemview" => self.systemview = value,
            "gamelistview" => self.gamelistview = value,
            _ => {
                if let Some(value) = value {
                    self.global.insert(group.to_string(), value);
                }
            }
        }
        self
    }

    pub fn scoped(&self, scope: &str, group: &str) -> Option<&str> {
        self.scoped
            .get(&format!("{}.{}", scope, group))
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    pub fn global(&self, group: &str) -> Option<&str> {
        let dedicated = match group {
            "colorset" => &self.colorset,
            "iconset" => &self.iconset,
            "menu" => &self.menu,
            "systemview" => &self.systemview,
            "gamelistview" => &self.gamelistview,
            _ => return self.global.get(group).map(String::as_str).filter(|v| !v.is_empty()),
        };
        dedicated.as_deref().filter(|v| !v.is_empty())
    }

    pub fn is_dedicated(group: &str) -> bool {
        DEDICATED_GROUPS.contains(&group)
    }
}

/// Everything a pass needs to know about the host.
#[derive(Debug, Clone, PartialEq)]
pub struct ThemeContext {
    /// Theme folder of the current system; also the variant scope.
    pub system: String,
    pub region: String,
    /// Full language tag such as `fr_FR`.
    pub language_tag: String,
    pub tiny_screen: bool,
    pub screen_width: u32,
    pub screen_height: u32,
    pub help_prompts: bool,
    pub arch: Option<String>,
    pub overrides: VariantOverrides,
    /// Seeded as-is into the variable environment (`system.name`, ...).
    pub variables: IndexMap<String, String>,
    /// Seeded as `settings.<name>`.
    pub settings: IndexMap<String, String>,
}

impl Default for ThemeContext {
    fn default() -> Self {
        Self {
            system: String::new(),
            region: "eu".to_string(),
            language_tag: "en".to_string(),
            tiny_screen: false,
            screen_width: 1280,
            screen_height: 720,
            help_prompts: true,
            arch: None,
            overrides: VariantOverrides::default(),
            variables: IndexMap::new(),
            settings: IndexMap::new(),
        }
    }
}

impl ThemeContext {
    pub fn new(system: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            ..Self::default()
        }
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        let region = region.into().to_lowercase();
        self.region = if region.is_empty() { "eu".to_string() } else { region };
        self
    }

    pub fn with_language(mut self, tag: impl Into<String>) -> Self {
        let tag = tag.into();
        self.language_tag = if tag.is_empty() { "en".to_string() } else { tag };
        self
    }

    pub fn with_screen(mut self, width: u32, height: u32) -> Self {
        self.screen_width = width;
        self.screen_height = height;
        self
    }

    pub fn with_tiny_screen(mut self, tiny: bool) -> Self {
        self.tiny_screen = tiny;
        self
    }

    pub fn with_help_prompts(mut self, visible: bool) -> Self {
        self.help_prompts = visible;
        self
    }

    pub fn with_arch(mut self, arch: impl Into<String>) -> Self {
        self.arch = Some(arch.into());
        self
    }

    pub fn with_overrides(mut self, overrides: VariantOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn with_variable(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }

    pub fn with_setting(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.settings.insert(name.into(), value.into());
        self
    }

    /// Lower-cased two-letter language code (`fr` for `fr_FR`).
    pub fn language(&self) -> String {
        let lang = self.language_tag.split('_').next().unwrap_or("");
        if lang.is_empty() {
            "en".to_string()
        } else {
            lang.to_lowercase()
        }
    }

    /// Lower-cased full tag (`fr_fr`).
    pub fn language_and_region(&self) -> String {
        self.language_tag.to_lowercase()
    }

    pub fn vertical_screen(&self) -> bool {
        self.screen_height > self.screen_width
    }
}
