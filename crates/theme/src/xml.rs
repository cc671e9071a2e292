//! Owned, mutable XML element tree built from `roxmltree`.
//!
//! `roxmltree` documents borrow their input and are read-only. Theme
//! resolution needs to rewrite attributes (`<subset>` blocks stamp their
//! includes) and splice children (`merge_include`), so every document is
//! copied into this tree once after parsing.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct XmlNode {
    pub tag: String,
    attributes: Vec<(String, String)>,
    pub children: Vec<XmlNode>,
    text: String,
}

impl XmlNode {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    /// Parses `input` and returns its root element.
    pub fn parse(input: &str) -> Result<XmlNode, roxmltree::Error> {
        let doc = roxmltree::Document::parse(input)?;
        Ok(XmlNode::from_roxmltree(doc.root_element()))
    }

    fn from_roxmltree(node: roxmltree::Node<'_, '_>) -> XmlNode {
        let mut out = XmlNode::new(node.tag_name().name());
        out.attributes = node
            .attributes()
            .map(|a| (a.name().to_string(), a.value().to_string()))
            .collect();

        for child in node.children() {
            if child.is_element() {
                out.children.push(XmlNode::from_roxmltree(child));
            } else if child.is_text() && out.text.is_empty() {
                // Only the first text run counts, as in most XML DOMs.
                if let Some(text) = child.text() {
                    out.text = text.trim().to_string();
                }
            }
        }
        out
    }

    /// Trimmed text content of the first text run.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn with_child(mut self, child: XmlNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Attribute value, or `""` when absent.
    pub fn attr_or_empty(&self, name: &str) -> &str {
        self.attr(name).unwrap_or("")
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => *v = value,
            None => self.attributes.push((name.to_string(), value)),
        }
    }

    pub fn remove_attr(&mut self, name: &str) {
        self.attributes.retain(|(k, _)| k != name);
    }

    pub fn child(&self, tag: &str) -> Option<&XmlNode> {
        self.children.iter().find(|c| c.tag == tag)
    }

    pub fn children_named<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a XmlNode> + 'a {
        self.children.iter().filter(move |c| c.tag == tag)
    }

    /// `true` when the node has neither child elements nor text.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty() && self.text.is_empty()
    }
}

impl fmt::Display for XmlNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.tag)?;
        for (k, v) in &self.attributes {
            write!(f, " {}=\"{}\"", k, v)?;
        }
        write!(f, ">")
    }
}
