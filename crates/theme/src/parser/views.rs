//! `<view>`, `<customView>` and `<feature>` handling.

use log::{debug, warn};
use std::mem;

use super::Pass;
use crate::schema::{SUPPORTED_FEATURES, element_properties, is_supported_view};
use crate::view::ThemeView;
use crate::xml::XmlNode;

const NAME_DELIMITERS: &[char] = &[' ', '\t', '\r', '\n', ','];

pub(super) fn split_names(names: &str) -> impl Iterator<Item = &str> {
    names.split(NAME_DELIMITERS).filter(|n| !n.is_empty())
}

impl Pass<'_> {
    /// `<view name="basic, detailed">`. Custom views based on a named view
    /// receive the same elements.
    pub(super) fn parse_view_element(&mut self, node: &XmlNode) {
        let Some(names) = node.attr("name") else {
            warn!("View missing \"name\" attribute!");
            return;
        };

        for key in split_names(names) {
            if !is_supported_view(key) {
                debug!("Ignoring unknown view \"{}\"", key);
                continue;
            }
            self.views.entry(key.to_string()).or_insert_with(|| ThemeView::new(key));
            self.apply_view(node, key);

            let derived: Vec<String> = self
                .views
                .values()
                .filter(|v| v.is_custom && v.base_type.as_deref() == Some(key))
                .map(|v| v.name.clone())
                .collect();
            for name in derived {
                self.apply_view(node, &name);
            }
        }
    }

    pub(super) fn parse_custom_view(&mut self, node: &XmlNode) {
        let Some(name) = node.attr("name") else {
            return;
        };
        if !self.allows(node) {
            return;
        }
        let inherits = node.attr_or_empty("inherits").trim();

        if name.contains(',') && inherits.is_empty() {
            for key in name.split(',').map(str::trim) {
                if !self.views.contains_key(key) {
                    continue;
                }
                if let Some(display_name) = node.attr("displayName") {
                    let display_name = self.expand(display_name);
                    if let Some(view) = self.views.get_mut(key) {
                        view.display_name = display_name;
                    }
                }
                self.apply_view(node, key);
            }
            return;
        }

        let key = name.trim();
        let display_name = node.attr("displayName").map(|d| self.expand(d));
        let view = self.views.entry(key.to_string()).or_insert_with(|| ThemeView::new(key));
        match display_name {
            Some(display_name) => view.display_name = display_name,
            None if view.display_name.is_empty() => view.display_name = key.to_string(),
            None => {}
        }
        view.is_custom = true;

        if !inherits.is_empty() {
            self.inherit(key, inherits);
        }
        self.apply_view(node, key);
    }

    /// Copies the elements of `base` and of its own ancestors into the
    /// custom view `key`, deepest ancestor first.
    fn inherit(&mut self, key: &str, base: &str) {
        let mut chain: Vec<String> = Vec::new();
        let mut next = Some(base.to_string());

        while let Some(name) = next.take() {
            if name == key || chain.contains(&name) {
                let mut cycle = vec![key.to_string()];
                cycle.extend(chain.iter().cloned());
                cycle.push(name);
                warn!("Custom view \"{}\" has an inheritance cycle: {}", key, cycle.join(" -> "));
                break;
            }
            let Some(base_view) = self.views.get(&name) else {
                warn!("Custom view \"{}\" inherits unknown view \"{}\"", key, name);
                break;
            };
            if self.views.get(key).is_some_and(|v| v.base_chain.contains(&name)) {
                debug!("Custom view \"{}\" already inherits \"{}\"", key, name);
                break;
            }
            next = base_view.base_type.clone();
            chain.push(name);
        }

        let inherited: Vec<_> = chain
            .iter()
            .rev()
            .filter_map(|name| self.views.get(name))
            .flat_map(|v| v.elements.iter().map(|(k, e)| (k.clone(), e.clone())))
            .collect();

        let Some(view) = self.views.get_mut(key) else {
            return;
        };
        if let Some(deepest) = chain.last() {
            view.base_type = Some(deepest.clone());
        }
        view.base_chain.extend(chain);
        for (name, element) in inherited {
            view.elements.insert(name, element);
        }
    }

    /// Runs `node` against the view `key`, which must already exist.
    pub(super) fn apply_view(&mut self, node: &XmlNode, key: &str) {
        let Some(slot) = self.views.get_mut(key) else {
            return;
        };
        let mut view = mem::take(slot);
        self.parse_view(node, &mut view);
        if let Some(slot) = self.views.get_mut(key) {
            *slot = view;
        }
    }

    fn parse_view(&mut self, node: &XmlNode, view: &mut ThemeView) {
        if !self.allows(node) {
            return;
        }

        if let Some(transition) = node.attr("extraTransition") {
            view.extra_transition = Some(transition.to_string());
        }
        if let Some(speed) = node.attr("extraTransitionSpeed") {
            view.extra_transition_speed = Some(vista_types::parse_float_prefix(speed));
        }
        if let Some(direction) = node.attr("extraTransitionDirection") {
            view.extra_transition_direction = Some(direction.to_string());
        }

        for child in &node.children {
            let Some(names) = child.attr("name") else {
                warn!("Element of type \"{}\" missing \"name\" attribute!", child.tag);
                continue;
            };
            let Some(table) = element_properties(&child.tag) else {
                warn!("Unknown element of type \"{}\"!", child.tag);
                continue;
            };
            if !self.allows(child) {
                continue;
            }

            for key in split_names(names) {
                view.elements.entry(key.to_string()).or_default();
                let Some(slot) = view.elements.get_mut(key) else {
                    continue;
                };
                let mut element = mem::take(slot);
                self.parse_element(child, node, table, &mut element, view);
                if let Some(slot) = view.elements.get_mut(key) {
                    *slot = element;
                }
            }
        }
    }

    pub(super) fn parse_feature(&mut self, node: &XmlNode) {
        let Some(supported) = node.attr("supported") else {
            warn!("Feature missing \"supported\" attribute!");
            return;
        };
        if !self.allows(node) {
            return;
        }
        if supported == "manufacturer" && self.variables.get("system.manufacturer").is_none_or(str::is_empty) {
            return;
        }
        if SUPPORTED_FEATURES.contains(&supported) {
            for view in node.children_named("view") {
                self.parse_view_element(view);
            }
        }
    }
}
