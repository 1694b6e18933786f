//! Generic ordered element tree
//!
//! Provides [`Element`], the node type every entity loads from and saves to.
//! Attributes are unique by name; children keep document order and may be
//! nested elements or plain text.

use crate::date::ArbDate;
use crate::error::TreeError;
use crate::version::SchemaVersion;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Named node with string attributes and ordered children
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Element {
    name: String,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    attributes: IndexMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    children: Vec<Node>,
}

/// Child of an [`Element`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Node {
    /// Nested element
    Element(Element),
    /// Text payload
    Text(String),
}

impl Node {
    /// Borrow as element, if this is one
    #[inline]
    #[must_use]
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(e) => Some(e),
            Self::Text(_) => None,
        }
    }
}

/// Outcome of a typed attribute read
#[derive(Debug, Clone, PartialEq)]
pub enum AttrLookup<T> {
    /// Present and parsed
    Found(T),
    /// Not present on the element
    NotFound,
    /// Present but not parseable as the requested type
    Invalid(String),
}

impl<T> AttrLookup<T> {
    /// Parsed value, discarding the failure reason
    #[inline]
    pub fn found(self) -> Option<T> {
        match self {
            Self::Found(v) => Some(v),
            Self::NotFound | Self::Invalid(_) => None,
        }
    }

    /// Check if the attribute was present and valid
    #[inline]
    #[must_use]
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

/// Types readable from an attribute string
pub trait FromAttr: Sized {
    /// Parse raw attribute text
    fn from_attr(raw: &str) -> Option<Self>;
}

/// Types writable as an attribute string
pub trait ToAttr {
    /// Render as attribute text
    fn to_attr(&self) -> String;
}

impl FromAttr for String {
    fn from_attr(raw: &str) -> Option<Self> {
        Some(raw.to_string())
    }
}

impl ToAttr for String {
    fn to_attr(&self) -> String {
        self.clone()
    }
}

impl ToAttr for str {
    fn to_attr(&self) -> String {
        self.to_string()
    }
}

impl<T: ToAttr + ?Sized> ToAttr for &T {
    fn to_attr(&self) -> String {
        (**self).to_attr()
    }
}

// Booleans are stored as y/n.
impl FromAttr for bool {
    fn from_attr(raw: &str) -> Option<Self> {
        match raw {
            "y" | "Y" => Some(true),
            "n" | "N" => Some(false),
            _ => None,
        }
    }
}

impl ToAttr for bool {
    fn to_attr(&self) -> String {
        let text = if *self { "y" } else { "n" };
        text.to_string()
    }
}

macro_rules! numeric_attr {
    ($($ty:ty),*) => {
        $(
            impl FromAttr for $ty {
                fn from_attr(raw: &str) -> Option<Self> {
                    raw.trim().parse().ok()
                }
            }

            impl ToAttr for $ty {
                fn to_attr(&self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

numeric_attr!(i16, i32, u16, u32, usize, f64);

impl FromAttr for ArbDate {
    fn from_attr(raw: &str) -> Option<Self> {
        raw.parse().ok()
    }
}

impl ToAttr for ArbDate {
    fn to_attr(&self) -> String {
        self.to_string()
    }
}

impl FromAttr for SchemaVersion {
    fn from_attr(raw: &str) -> Option<Self> {
        raw.parse().ok()
    }
}

impl ToAttr for SchemaVersion {
    fn to_attr(&self) -> String {
        self.to_string()
    }
}

impl Element {
    /// Create element with no attributes or children
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: IndexMap::new(),
            children: Vec::new(),
        }
    }

    /// Element name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Check the element name, failing with [`TreeError::UnexpectedElement`]
    ///
    /// # Errors
    /// Returns an error when the name differs from `expected`.
    pub fn expect_name(&self, expected: &str) -> Result<(), TreeError> {
        if self.name == expected {
            Ok(())
        } else {
            Err(TreeError::UnexpectedElement {
                expected: expected.to_string(),
                found: self.name.clone(),
            })
        }
    }

    // ----- attributes -----

    /// Raw attribute text
    #[inline]
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Check if attribute is present
    #[inline]
    #[must_use]
    pub fn has_attr(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    /// Typed attribute read
    #[must_use]
    pub fn get_attr<T: FromAttr>(&self, name: &str) -> AttrLookup<T> {
        match self.attributes.get(name) {
            None => AttrLookup::NotFound,
            Some(raw) => match T::from_attr(raw) {
                Some(v) => AttrLookup::Found(v),
                None => AttrLookup::Invalid(raw.clone()),
            },
        }
    }

    /// Required typed attribute
    ///
    /// # Errors
    /// Missing or unparseable attributes are structural load errors.
    pub fn require<T: FromAttr>(&self, name: &str) -> Result<T, TreeError> {
        match self.get_attr(name) {
            AttrLookup::Found(v) => Ok(v),
            AttrLookup::NotFound => Err(TreeError::MissingAttribute {
                element: self.name.clone(),
                attribute: name.to_string(),
            }),
            AttrLookup::Invalid(value) => Err(self.invalid(name, value)),
        }
    }

    /// Optional typed attribute; absence is not an error
    ///
    /// # Errors
    /// Returns an error only if the attribute is present but unparseable.
    pub fn optional<T: FromAttr>(&self, name: &str) -> Result<Option<T>, TreeError> {
        match self.get_attr(name) {
            AttrLookup::Found(v) => Ok(Some(v)),
            AttrLookup::NotFound => Ok(None),
            AttrLookup::Invalid(value) => Err(self.invalid(name, value)),
        }
    }

    fn invalid(&self, attribute: &str, value: String) -> TreeError {
        TreeError::InvalidAttribute {
            element: self.name.clone(),
            attribute: attribute.to_string(),
            value,
        }
    }

    /// Set an attribute, replacing any existing value
    pub fn add_attr(&mut self, name: impl Into<String>, value: impl ToAttr) -> &mut Self {
        self.attributes.insert(name.into(), value.to_attr());
        self
    }

    /// Remove an attribute, keeping the order of the rest
    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        self.attributes.shift_remove(name)
    }

    /// Iterate attributes in insertion order
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    // ----- children -----

    /// Number of child nodes (elements and text)
    #[inline]
    #[must_use]
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Nth child node
    #[inline]
    #[must_use]
    pub fn child(&self, index: usize) -> Option<&Node> {
        self.children.get(index)
    }

    /// All child nodes
    #[inline]
    #[must_use]
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Child elements in order, skipping text
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// Mutable child elements in order
    pub fn elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.children.iter_mut().filter_map(|n| match n {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        })
    }

    /// Child elements with the given name
    pub fn elements_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.elements().filter(move |e| e.name == name)
    }

    /// First child element with the given name
    #[must_use]
    pub fn first_named(&self, name: &str) -> Option<&Element> {
        self.elements().find(|e| e.name == name)
    }

    /// Append a new empty child element and return it
    pub fn add_child(&mut self, name: impl Into<String>) -> &mut Element {
        self.push_child(Element::new(name))
    }

    /// Append an existing element and return it
    pub fn push_child(&mut self, element: Element) -> &mut Element {
        self.children.push(Node::Element(element));
        match self.children.last_mut() {
            Some(Node::Element(e)) => e,
            _ => unreachable!("element was just pushed"),
        }
    }

    /// Append a child element that carries only text
    pub fn add_text_child(&mut self, name: impl Into<String>, text: &str) -> &mut Element {
        let child = self.add_child(name);
        child.set_text(text);
        child
    }

    /// Remove and return all child elements with the given name
    pub fn take_elements_named(&mut self, name: &str) -> Vec<Element> {
        let mut taken = Vec::new();
        let mut kept = Vec::with_capacity(self.children.len());
        for node in self.children.drain(..) {
            match node {
                Node::Element(e) if e.name == name => taken.push(e),
                other => kept.push(other),
            }
        }
        self.children = kept;
        taken
    }

    // ----- text -----

    /// Concatenated text payload
    #[must_use]
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|n| match n {
                Node::Text(t) => Some(t.as_str()),
                Node::Element(_) => None,
            })
            .collect()
    }

    /// Replace the text payload; an empty value clears it
    pub fn set_text(&mut self, value: &str) {
        self.children.retain(|n| !matches!(n, Node::Text(_)));
        if !value.is_empty() {
            self.children.push(Node::Text(value.to_string()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_attributes() {
        let mut e = Element::new("Scoring");
        e.add_attr("dropFractions", true)
            .add_attr("timeFault", 2.5)
            .add_attr("OpeningPts", 7_i16)
            .add_attr("ValidFrom", ArbDate::from_ymd(2020, 1, 2).unwrap())
            .add_attr("Division", "Open");

        assert_eq!(e.attr("dropFractions"), Some("y"));
        assert_eq!(e.get_attr::<bool>("dropFractions"), AttrLookup::Found(true));
        assert_eq!(e.get_attr::<f64>("timeFault"), AttrLookup::Found(2.5));
        assert_eq!(e.get_attr::<i16>("OpeningPts"), AttrLookup::Found(7));
        assert_eq!(e.attr("ValidFrom"), Some("2020-01-02"));
        assert_eq!(e.get_attr::<String>("Missing"), AttrLookup::NotFound);
        assert!(matches!(
            e.get_attr::<i16>("Division"),
            AttrLookup::Invalid(v) if v == "Open"
        ));
    }

    #[test]
    fn require_reports_element_and_attribute() {
        let e = Element::new("Venue");
        let err = e.require::<String>("Name").unwrap_err();
        assert_eq!(
            err,
            TreeError::MissingAttribute {
                element: "Venue".into(),
                attribute: "Name".into()
            }
        );
        assert!(e.optional::<String>("Name").unwrap().is_none());
    }

    #[test]
    fn attributes_are_unique_by_name() {
        let mut e = Element::new("X");
        e.add_attr("a", "1").add_attr("a", "2");
        assert_eq!(e.attributes().count(), 1);
        assert_eq!(e.attr("a"), Some("2"));
    }

    #[test]
    fn children_keep_order_and_text() {
        let mut root = Element::new("Venue");
        root.add_text_child("Desc", "Some text");
        root.add_child("Division").add_attr("Name", "Open");
        root.add_child("Division").add_attr("Name", "Novice");

        assert_eq!(root.child_count(), 3);
        let names: Vec<_> = root
            .elements_named("Division")
            .filter_map(|d| d.attr("Name"))
            .collect();
        assert_eq!(names, ["Open", "Novice"]);
        assert_eq!(root.first_named("Desc").unwrap().text(), "Some text");
    }

    #[test]
    fn take_elements_preserves_remaining_order() {
        let mut root = Element::new("Venue");
        root.add_child("A");
        root.add_child("FaultType");
        root.add_child("B");
        let taken = root.take_elements_named("FaultType");
        assert_eq!(taken.len(), 1);
        let rest: Vec<_> = root.elements().map(Element::name).collect();
        assert_eq!(rest, ["A", "B"]);
    }

    #[test]
    fn set_text_replaces_payload() {
        let mut e = Element::new("Desc");
        e.set_text("one");
        e.set_text("two");
        assert_eq!(e.text(), "two");
        e.set_text("");
        assert_eq!(e.child_count(), 0);
    }

    #[test]
    fn serde_snapshot() {
        let mut root = Element::new("Configuration");
        root.add_attr("version", SchemaVersion::new(15, 0));
        root.add_child("FaultType").add_attr("Name", "Refusal");
        let json = serde_json::to_string(&root).unwrap();
        let back: Element = serde_json::from_str(&json).unwrap();
        assert_eq!(back, root);
    }
}
