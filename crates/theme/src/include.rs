//! Helpers for pulling other documents into a pass.

use crate::xml::XmlNode;

/// Folder names tried when a `$system` substitution does not exist.
pub const SYSTEM_FOLDER_ALIASES: &[(&str, &str)] = &[
    ("sg-1000", "sg1000"),
    ("msx", "msx1"),
    ("atarilynx", "lynx"),
    ("atarijaguar", "jaguar"),
    ("gameandwatch", "gw"),
    ("amiga", "amiga600"),
    ("amiga500", "amiga600"),
    ("auto-favorites", "favorites"),
    ("thomson", "to8"),
    ("prboom", "doom"),
];

/// Merges the `child_tag` children of `incoming` into `target`.
///
/// With a non-empty `key_attribute`, the first existing child of the same
/// tag whose key matches is removed before the copy is appended, so the
/// incoming definition replaces it. With an empty key every incoming child
/// is appended.
pub fn merge_include(target: &mut XmlNode, incoming: &XmlNode, child_tag: &str, key_attribute: &str) {
    for child in incoming.children_named(child_tag) {
        if !key_attribute.is_empty() {
            let key = child.attr_or_empty(key_attribute);
            if let Some(pos) = target
                .children
                .iter()
                .position(|c| c.tag == child_tag && c.attr_or_empty(key_attribute) == key)
            {
                target.children.remove(pos);
            }
        }
        target.children.push(child.clone());
    }
}

pub fn system_folder_alias(folder: &str) -> Option<&'static str> {
    SYSTEM_FOLDER_ALIASES
        .iter()
        .find(|(from, _)| *from == folder)
        .map(|(_, to)| *to)
}

/// Values substituted for the bare `$` placeholders.
#[derive(Debug, Clone, Copy)]
pub struct SystemPlaceholders<'a> {
    pub country: &'a str,
    pub language: &'a str,
    pub system: &'a str,
}

impl SystemPlaceholders<'_> {
    /// Replaces the first `$country`, `$language` and `$system`.
    ///
    /// When the `$system` substitution yields a path for which `exists`
    /// is false and the folder has a known alias, the alias is used instead.
    pub fn resolve(&self, path: &str, exists: impl Fn(&str) -> bool) -> String {
        if !path.contains('$') {
            return path.to_string();
        }

        let partial = path
            .replacen("$country", self.country, 1)
            .replacen("$language", self.language, 1);

        if !partial.contains("$system") {
            return partial;
        }

        let substituted = partial.replacen("$system", self.system, 1);
        if exists(&substituted) {
            return substituted;
        }
        match system_folder_alias(self.system) {
            Some(alias) => partial.replacen("$system", alias, 1),
            None => substituted,
        }
    }
}

/// `true` for paths carrying a bare `$` placeholder rather than `${...}`.
pub fn has_system_placeholder(path: &str) -> bool {
    path.contains('$') && !path.contains("${")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feature(name: &str, value: &str) -> XmlNode {
        XmlNode::new("feature").with_attr("name", name).with_text(value)
    }

    #[test]
    fn merge_replaces_matching_key() {
        let mut target = XmlNode::new("features").with_child(feature("cores", "a")).with_child(feature("shaders", "s"));
        let incoming = XmlNode::new("features").with_child(feature("cores", "b"));

        merge_include(&mut target, &incoming, "feature", "name");

        let names: Vec<_> = target.children.iter().map(|c| (c.attr_or_empty("name"), c.text())).collect();
        assert_eq!(names, vec![("shaders", "s"), ("cores", "b")]);
    }

    #[test]
    fn merge_without_key_appends() {
        let mut target = XmlNode::new("features").with_child(feature("cores", "a"));
        let incoming = XmlNode::new("features")
            .with_child(feature("cores", "b"))
            .with_child(XmlNode::new("other"));

        merge_include(&mut target, &incoming, "feature", "");

        assert_eq!(target.children.len(), 2);
        assert_eq!(target.children[1].text(), "b");
    }

    #[test]
    fn placeholders_substitute_once() {
        let ph = SystemPlaceholders { country: "eu", language: "fr", system: "snes" };
        assert_eq!(ph.resolve("./$system/$language/$country.png", |_| true), "./snes/fr/eu.png");
        assert_eq!(ph.resolve("./plain.png", |_| false), "./plain.png");
    }

    #[test]
    fn missing_system_folder_uses_alias() {
        let ph = SystemPlaceholders { country: "eu", language: "en", system: "msx" };
        assert_eq!(ph.resolve("./$system/theme.xml", |p| p == "./msx1/theme.xml"), "./msx1/theme.xml");

        let ph = SystemPlaceholders { country: "eu", language: "en", system: "snes" };
        assert_eq!(ph.resolve("./$system/theme.xml", |_| false), "./snes/theme.xml");
    }

    #[test]
    fn bare_placeholder_detection() {
        assert!(has_system_placeholder("./$system/theme.xml"));
        assert!(!has_system_placeholder("./${dir}/theme.xml"));
        assert!(!has_system_placeholder("./theme.xml"));
        assert_eq!(system_folder_alias("amiga500"), Some("amiga600"));
    }
}
