//! Owned XML document tree
//!
//! The libxml2 document is converted into this tree right after parsing and
//! freed, so everything downstream of the parser is plain safe Rust. Names are
//! kept exactly as they appeared in the source; comparisons go through
//! [`crate::normalize::names_match`].

use crate::normalize::names_match;

/// A parsed document with its root element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlDocument {
    pub root: XmlElement,
}

impl XmlDocument {
    pub fn new(root: XmlElement) -> Self {
        Self { root }
    }
}

/// Child node of an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlNode {
    Element(XmlElement),
    Text(String),
}

/// An attribute with its raw (possibly prefixed) name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlAttribute {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct XmlElement {
    pub name: String,
    pub attributes: Vec<XmlAttribute>,
    pub children: Vec<XmlNode>,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push(XmlAttribute {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.children.push(XmlNode::Element(child));
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(XmlNode::Text(text.into()));
        self
    }

    /// Whether this element's name matches `canonical` after normalization.
    pub fn is_named(&self, canonical: &str) -> bool {
        names_match(&self.name, canonical)
    }

    /// First attribute whose normalized name matches `canonical`.
    pub fn attribute(&self, canonical: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attr| names_match(&attr.name, canonical))
            .map(|attr| attr.value.as_str())
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|node| match node {
            XmlNode::Element(element) => Some(element),
            XmlNode::Text(_) => None,
        })
    }

    /// First direct child element whose normalized name matches `canonical`.
    pub fn first_child_named(&self, canonical: &str) -> Option<&XmlElement> {
        self.child_elements().find(|child| child.is_named(canonical))
    }

    /// Concatenated direct text children, untrimmed.
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|node| match node {
                XmlNode::Text(text) => Some(text.as_str()),
                XmlNode::Element(_) => None,
            })
            .collect()
    }

    /// Pre-order iterator over this element and all descendant elements.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }
}

/// Depth-first, document-order iterator returned by [`XmlElement::descendants`].
pub struct Descendants<'a> {
    stack: Vec<&'a XmlElement>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a XmlElement;

    fn next(&mut self) -> Option<Self::Item> {
        let element = self.stack.pop()?;
        let children: Vec<&XmlElement> = element.child_elements().collect();
        self.stack.extend(children.into_iter().rev());
        Some(element)
    }
}
