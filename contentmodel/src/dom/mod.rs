//! Source tree and selection coordinates
//!
//! The model builder reads a [`SourceNode`] tree: elements carrying a tag,
//! attributes, an inline [`Style`] and children, plus text leaves. The tree is
//! plain owned data so that any host representation (an HTML DOM, a test
//! fixture, the output of the serializer) can be converted into it.
//!
//! Locations inside the tree are [`Position`]s: a path of child indices from
//! the root plus an offset. When the path ends at an element the offset is a
//! child index (the boundary before that child, or after the last child when
//! it equals the child count). When the path ends at a text leaf the offset
//! counts characters.

pub mod css;

pub use css::Style;

use crate::error::FormatError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceNode {
    Element(Element),
    Text(String),
}

impl SourceNode {
    pub fn text(content: impl Into<String>) -> Self {
        SourceNode::Text(content.into())
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            SourceNode::Element(element) => Some(element),
            SourceNode::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            SourceNode::Text(text) => Some(text),
            SourceNode::Element(_) => None,
        }
    }

    pub fn children(&self) -> &[SourceNode] {
        match self {
            SourceNode::Element(element) => &element.children,
            SourceNode::Text(_) => &[],
        }
    }

    /// Follow a child-index path from this node.
    pub fn node_at(&self, path: &[usize]) -> Option<&SourceNode> {
        path.iter()
            .try_fold(self, |node, &index| node.children().get(index))
    }

    /// Concatenated text of every leaf below this node.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }
}

fn collect_text(node: &SourceNode, out: &mut String) {
    match node {
        SourceNode::Text(text) => out.push_str(text),
        SourceNode::Element(element) => {
            for child in &element.children {
                collect_text(child, out);
            }
        }
    }
}

impl From<Element> for SourceNode {
    fn from(element: Element) -> Self {
        SourceNode::Element(element)
    }
}

impl From<&str> for SourceNode {
    fn from(text: &str) -> Self {
        SourceNode::Text(text.to_string())
    }
}

/// An element of the source tree.
///
/// `attributes` never contains `style`; inline style lives in `style`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub tag: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<(String, String)>,
    #[serde(default, skip_serializing_if = "Style::is_empty")]
    pub style: Style,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SourceNode>,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Element {
            tag: tag.to_ascii_lowercase(),
            ..Default::default()
        }
    }

    pub fn with_attribute(mut self, name: &str, value: &str) -> Self {
        self.set_attribute(name, value);
        self
    }

    pub fn with_style(mut self, css: &str) -> Self {
        self.style = Style::parse(css);
        self
    }

    pub fn with_child(mut self, child: impl Into<SourceNode>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn with_text(self, text: &str) -> Self {
        self.with_child(SourceNode::text(text))
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    /// Set an attribute. `style` is parsed into [`Element::style`].
    pub fn set_attribute(&mut self, name: &str, value: &str) {
        let name = name.to_ascii_lowercase();
        if name == "style" {
            self.style = Style::parse(value);
            return;
        }
        match self.attributes.iter_mut().find(|(key, _)| *key == name) {
            Some(slot) => slot.1 = value.to_string(),
            None => self.attributes.push((name, value.to_string())),
        }
    }

    /// Copy of this element without its children.
    pub fn shell(&self) -> Element {
        Element {
            tag: self.tag.clone(),
            attributes: self.attributes.clone(),
            style: self.style.clone(),
            children: Vec::new(),
        }
    }
}

/// A boundary in the source (or produced) tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub path: Vec<usize>,
    pub offset: usize,
}

impl Position {
    pub fn new(path: Vec<usize>, offset: usize) -> Self {
        Position { path, offset }
    }

    pub fn matches(&self, path: &[usize], offset: usize) -> bool {
        self.offset == offset && self.path == path
    }
}

/// Document order: a container boundary sorts before everything inside the
/// child it precedes.
impl Ord for Position {
    fn cmp(&self, other: &Self) -> Ordering {
        let left = self.path.iter().chain(std::iter::once(&self.offset));
        let right = other.path.iter().chain(std::iter::once(&other.offset));
        left.cmp(right)
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = self
            .path
            .iter()
            .map(|index| index.to_string())
            .collect::<Vec<_>>()
            .join("/");
        write!(f, "{path}:{}", self.offset)
    }
}

impl FromStr for Position {
    type Err = FormatError;

    /// Parses `PATH:OFFSET`, where PATH is `/`-separated child indices and may
    /// be empty (`:3` is the boundary before the root's fourth child).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || FormatError::InvalidPosition(s.to_string());
        let (path, offset) = s.trim().split_once(':').ok_or_else(invalid)?;
        let offset = offset.parse::<usize>().map_err(|_| invalid())?;
        let path = if path.is_empty() {
            Vec::new()
        } else {
            path.split('/')
                .map(|part| part.parse::<usize>().map_err(|_| invalid()))
                .collect::<Result<Vec<_>, _>>()?
        };
        Ok(Position { path, offset })
    }
}

/// A single selection range, always stored in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub start: Position,
    pub end: Position,
}

impl Selection {
    pub fn new(a: Position, b: Position) -> Self {
        if b < a {
            Selection { start: b, end: a }
        } else {
            Selection { start: a, end: b }
        }
    }

    pub fn collapsed(at: Position) -> Self {
        Selection {
            start: at.clone(),
            end: at,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.start, self.end)
    }
}
