//! HTML parsing (HTML → source tree)
//!
//! The document is parsed with html5ever into an rcdom tree, and the `body`
//! element is converted into a [`SourceNode`]. Comments, doctypes and
//! processing instructions are dropped.

use crate::dom::{Element, SourceNode};
use crate::error::FormatError;
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom};

/// Parse an HTML document or fragment. The returned root is the `body`
/// element, so positions address body children from the top.
pub fn parse_html(html: &str) -> Result<SourceNode, FormatError> {
    let dom = parse_document(RcDom::default(), Default::default())
        .from_utf8()
        .read_from(&mut html.as_bytes())
        .map_err(|e| FormatError::ParseError(format!("HTML parsing failed: {e}")))?;

    let body = find_element(&dom.document, "body")
        .ok_or_else(|| FormatError::ParseError("Document has no body".to_string()))?;

    convert_node(&body)
        .ok_or_else(|| FormatError::ParseError("Body is not an element".to_string()))
}

fn find_element(node: &Handle, tag: &str) -> Option<Handle> {
    if let NodeData::Element { name, .. } = &node.data {
        if name.local.as_ref() == tag {
            return Some(node.clone());
        }
    }
    node.children
        .borrow()
        .iter()
        .find_map(|child| find_element(child, tag))
}

fn convert_node(node: &Handle) -> Option<SourceNode> {
    match &node.data {
        NodeData::Element { name, attrs, .. } => {
            let mut element = Element::new(name.local.as_ref());
            for attr in attrs.borrow().iter() {
                element.set_attribute(attr.name.local.as_ref(), &attr.value);
            }
            element.children = node
                .children
                .borrow()
                .iter()
                .filter_map(convert_node)
                .collect();
            Some(SourceNode::Element(element))
        }
        NodeData::Text { contents } => Some(SourceNode::Text(contents.borrow().to_string())),
        _ => None,
    }
}
