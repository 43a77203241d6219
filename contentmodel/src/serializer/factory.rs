//! Output tree construction primitives

use crate::dom::{Element, SourceNode};

/// Node construction primitives the serializer emits through.
///
/// Nodes are handles: cloning one must not copy the underlying node, and a
/// child appended before it is filled still sees later changes.
pub trait OutputFactory {
    type Node: Clone;

    /// The detached root every serialized block is appended to.
    fn create_fragment(&mut self) -> Self::Node;
    fn create_element(&mut self, tag: &str) -> Self::Node;
    fn create_text(&mut self, text: &str) -> Self::Node;
    fn set_attribute(&mut self, node: &Self::Node, name: &str, value: &str);
    fn append_child(&mut self, parent: &Self::Node, child: &Self::Node);
    /// Extend an existing text node.
    fn append_text(&mut self, node: &Self::Node, text: &str);
}

#[derive(Debug)]
enum ArenaNode {
    Element {
        element: Element,
        children: Vec<usize>,
    },
    Text(String),
}

/// Builds a [`SourceNode`] tree, so a serialized model can be fed straight
/// back into the builder.
#[derive(Debug, Default)]
pub struct SourceTreeFactory {
    nodes: Vec<ArenaNode>,
}

impl SourceTreeFactory {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, node: ArenaNode) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    /// Materialize the subtree rooted at `node`.
    pub fn into_tree(self, node: usize) -> SourceNode {
        self.materialize(node)
    }

    fn materialize(&self, node: usize) -> SourceNode {
        match self.nodes.get(node) {
            Some(ArenaNode::Element { element, children }) => {
                let mut element = element.clone();
                element.children = children.iter().map(|&child| self.materialize(child)).collect();
                SourceNode::Element(element)
            }
            Some(ArenaNode::Text(text)) => SourceNode::Text(text.clone()),
            None => SourceNode::Text(String::new()),
        }
    }
}

impl OutputFactory for SourceTreeFactory {
    type Node = usize;

    fn create_fragment(&mut self) -> usize {
        self.create_element("body")
    }

    fn create_element(&mut self, tag: &str) -> usize {
        self.push(ArenaNode::Element {
            element: Element::new(tag),
            children: Vec::new(),
        })
    }

    fn create_text(&mut self, text: &str) -> usize {
        self.push(ArenaNode::Text(text.to_string()))
    }

    fn set_attribute(&mut self, node: &usize, name: &str, value: &str) {
        if let Some(ArenaNode::Element { element, .. }) = self.nodes.get_mut(*node) {
            element.set_attribute(name, value);
        }
    }

    fn append_child(&mut self, parent: &usize, child: &usize) {
        if let Some(ArenaNode::Element { children, .. }) = self.nodes.get_mut(*parent) {
            children.push(*child);
        }
    }

    fn append_text(&mut self, node: &usize, text: &str) {
        if let Some(ArenaNode::Text(existing)) = self.nodes.get_mut(*node) {
            existing.push_str(text);
        }
    }
}
