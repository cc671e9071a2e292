//! Named variants ("subsets") and their selection.
//!
//! Any node carrying `subset="group" name="value"` declares a variant of
//! `group`. Declarations are recorded in the [`VariantCatalog`] regardless of
//! whether the node ends up selected; the [`VariantSelector`] decides which
//! single value of each group is active for the pass.

use serde::Serialize;
use std::collections::HashMap;

use crate::context::VariantOverrides;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Variant {
    pub group: String,
    pub value: String,
    pub display_name: String,
    pub group_display_name: String,
    pub applies_to: Vec<String>,
}

impl Variant {
    pub fn new(group: impl Into<String>, value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            group: group.into(),
            display_name: value.clone(),
            value,
            group_display_name: String::new(),
            applies_to: Vec::new(),
        }
    }
}

/// Append-only list of declared variants, deduplicated by (group, value).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct VariantCatalog {
    variants: Vec<Variant>,
}

impl VariantCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `variant` unless its (group, value) is already known.
    /// Returns `true` when it was added.
    pub fn record(&mut self, variant: Variant) -> bool {
        if self.contains(&variant.group, &variant.value) {
            return false;
        }
        self.variants.push(variant);
        true
    }

    pub fn contains(&self, group: &str, value: &str) -> bool {
        self.variants.iter().any(|v| v.group == group && v.value == value)
    }

    /// First value ever declared for `group`.
    pub fn first_value(&self, group: &str) -> Option<&str> {
        self.variants
            .iter()
            .find(|v| v.group == group)
            .map(|v| v.value.as_str())
    }

    pub fn variants_of(&self, group: &str) -> Vec<&Variant> {
        self.variants.iter().filter(|v| v.group == group).collect()
    }

    /// Distinct groups in declaration order. With `scope`, only groups having
    /// at least one variant whose `applies_to` names the scope.
    pub fn groups(&self, scope: Option<&str>) -> Vec<String> {
        let mut groups: Vec<String> = Vec::new();
        for variant in &self.variants {
            if groups.contains(&variant.group) {
                continue;
            }
            let applies = match scope {
                None | Some("") => true,
                Some(scope) => variant.applies_to.iter().any(|a| a == scope),
            };
            if applies {
                groups.push(variant.group.clone());
            }
        }
        groups
    }

    pub fn iter(&self) -> impl Iterator<Item = &Variant> {
        self.variants.iter()
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }
}

/// Per-pass selection state.
#[derive(Debug, Clone, Default)]
pub struct VariantSelector {
    scope: String,
    overrides: VariantOverrides,
    catalog: VariantCatalog,
    selected: HashMap<String, String>,
}

impl VariantSelector {
    pub fn new(scope: impl Into<String>, overrides: VariantOverrides) -> Self {
        Self {
            scope: scope.into(),
            overrides,
            catalog: VariantCatalog::new(),
            selected: HashMap::new(),
        }
    }

    /// Resumes selection on top of an earlier pass.
    pub fn resume(
        scope: impl Into<String>,
        overrides: VariantOverrides,
        catalog: VariantCatalog,
        selected: HashMap<String, String>,
    ) -> Self {
        Self {
            scope: scope.into(),
            overrides,
            catalog,
            selected,
        }
    }

    pub fn catalog(&self) -> &VariantCatalog {
        &self.catalog
    }

    pub fn catalog_mut(&mut self) -> &mut VariantCatalog {
        &mut self.catalog
    }

    pub fn selections(&self) -> &HashMap<String, String> {
        &self.selected
    }

    pub fn into_parts(self) -> (VariantCatalog, HashMap<String, String>) {
        (self.catalog, self.selected)
    }

    /// Decides whether `value` is the active variant of `group`.
    ///
    /// A per-scope override is authoritative, then a global override. With
    /// no override the first value declared for the group wins, and only
    /// while no other value has been selected. The decision is remembered.
    pub fn is_selected(&mut self, group: &str, value: &str) -> bool {
        let selected = if let Some(scoped) = self.overrides.scoped(&self.scope, group) {
            scoped == value
        } else if let Some(global) = self.overrides.global(group) {
            global == value
        } else {
            let first = self.catalog.first_value(group) == Some(value);
            let free = self.selected.get(group).is_none_or(|current| current == value);
            first && free
        };

        if selected {
            self.selected.insert(group.to_string(), value.to_string());
        }
        selected
    }

    /// The value `ifSubset` tests against: scoped override, global override,
    /// remembered selection, then the first declared value.
    pub fn current_selection(&self, group: &str) -> Option<String> {
        self.overrides
            .scoped(&self.scope, group)
            .or_else(|| self.overrides.global(group))
            .or_else(|| self.selected.get(group).map(String::as_str))
            .or_else(|| self.catalog.first_value(group))
            .map(str::to_string)
    }
}
