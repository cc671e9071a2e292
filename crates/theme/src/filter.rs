//! Environment predicates that gate document nodes.
//!
//! All predicates present on a node must hold; absent predicates pass.

use log::error;
use vista_expr::eval_str;

use crate::context::ThemeContext;
use crate::subset::{Variant, VariantSelector};
use crate::variables::Variables;
use crate::xml::XmlNode;

/// Attributes consumed by the filter evaluator rather than by the node.
pub const FILTER_ATTRIBUTES: &[&str] = &[
    "region",
    "lang",
    "if",
    "tinyScreen",
    "verticalScreen",
    "ifHelpPrompts",
    "ifCheevos",
    "ifArch",
    "ifNotArch",
    "ifSubset",
];

const LIST_DELIMITERS: &[char] = &[' ', '\t', '\r', '\n', ','];

pub struct FilterEvaluator<'a> {
    context: &'a ThemeContext,
    variables: &'a Variables,
    selector: &'a mut VariantSelector,
}

impl<'a> FilterEvaluator<'a> {
    pub fn new(context: &'a ThemeContext, variables: &'a Variables, selector: &'a mut VariantSelector) -> Self {
        Self {
            context,
            variables,
            selector,
        }
    }

    pub fn allows(&mut self, node: &XmlNode) -> bool {
        self.region_matches(node)
            && self.language_matches(node)
            && self.condition_holds(node)
            && flag_matches(node.attr("tinyScreen"), self.context.tiny_screen)
            && flag_matches(node.attr("verticalScreen"), self.context.vertical_screen())
            && flag_matches(node.attr("ifHelpPrompts"), self.context.help_prompts)
            && flag_matches(node.attr("ifCheevos"), self.variables.get("system.cheevos") == Some("true"))
            && self.arch_matches(node)
            && self.subsets_match(node)
    }

    /// Region values are also recorded as variants of the `region` group.
    fn region_matches(&mut self, node: &XmlNode) -> bool {
        let Some(attr) = node.attr("region") else {
            return true;
        };
        let regions = attr.to_lowercase();
        if regions.is_empty() || regions == "default" {
            return true;
        }

        let mut variant = Variant::new("region", regions.clone());
        variant.group_display_name = "region".to_string();
        self.selector.catalog_mut().record(variant);

        split_list(&regions, LIST_DELIMITERS).any(|r| r.eq_ignore_ascii_case(&self.context.region))
    }

    fn language_matches(&self, node: &XmlNode) -> bool {
        let Some(attr) = node.attr("lang") else {
            return true;
        };
        let langs = attr.to_lowercase();
        if langs.is_empty() || langs == "default" {
            return true;
        }

        let language = self.context.language();
        let full = self.context.language_and_region();
        split_list(&langs, LIST_DELIMITERS).any(|l| l == language || l == full)
    }

    fn condition_holds(&self, node: &XmlNode) -> bool {
        let condition = node.attr_or_empty("if");
        if condition.is_empty() {
            return true;
        }
        match eval_str(condition, self.variables) {
            Ok(value) => value.is_truthy(),
            Err(e) => {
                error!("if \"{}\" expression is invalid : {}", condition, e);
                false
            }
        }
    }

    fn arch_matches(&self, node: &XmlNode) -> bool {
        let Some(arch) = self.context.arch.as_deref().filter(|a| !a.is_empty()) else {
            return true;
        };

        if let Some(list) = node.attr("ifArch") {
            let list = list.trim().to_lowercase();
            if !split_list(&list, &[',', '|']).any(|a| a == arch) {
                return false;
            }
        }
        if let Some(list) = node.attr("ifNotArch") {
            let list = list.trim().to_lowercase();
            if split_list(&list, &[',', '|']).any(|a| a == arch) {
                return false;
            }
        }
        true
    }

    /// `ifSubset="group:v1|v2, other:x"`. Every clause must hold; a clause
    /// whose group has no selection at all is skipped.
    fn subsets_match(&self, node: &XmlNode) -> bool {
        let Some(attr) = node.attr("ifSubset") else {
            return true;
        };

        for clause in attr.split(',').map(str::trim).filter(|c| !c.is_empty()) {
            let Some((group, values)) = clause.split_once(':') else {
                continue;
            };
            let Some(current) = self.selector.current_selection(group.trim()) else {
                continue;
            };
            if !values.trim().split('|').any(|v| v.trim() == current) {
                return false;
            }
        }
        true
    }
}

/// `"true"` requires the flag, `"false"` requires its absence, anything
/// else passes.
fn flag_matches(attr: Option<&str>, flag: bool) -> bool {
    match attr {
        Some("true") => flag,
        Some("false") => !flag,
        _ => true,
    }
}

fn split_list<'s>(s: &'s str, delimiters: &'s [char]) -> impl Iterator<Item = &'s str> + 's {
    s.split(delimiters).filter(|part| !part.is_empty())
}
