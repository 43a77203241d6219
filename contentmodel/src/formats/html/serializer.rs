//! HTML serialization (model → HTML)
//!
//! Pipeline: ContentModel → RcDom nodes (through [`RcDomFactory`]) → HTML
//! string. Only the produced fragment is written, without a document shell,
//! so the output can be parsed back with [`super::parse_html`] and the
//! returned selection stays valid against it.

use crate::error::FormatError;
use crate::model::ContentModel;
use crate::serializer::{serialize_model_with_options, OutputFactory, SerializeOptions, Serialized};
use html5ever::{
    ns, serialize, serialize::SerializeOpts, serialize::TraversalScope, Attribute, LocalName,
    QualName,
};
use markup5ever_rcdom::{Handle, Node, NodeData, SerializableHandle};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Builds rcdom nodes.
#[derive(Debug, Default)]
pub struct RcDomFactory;

impl OutputFactory for RcDomFactory {
    type Node = Handle;

    fn create_fragment(&mut self) -> Handle {
        create_element("body", vec![])
    }

    fn create_element(&mut self, tag: &str) -> Handle {
        create_element(tag, vec![])
    }

    fn create_text(&mut self, text: &str) -> Handle {
        create_text(text)
    }

    fn set_attribute(&mut self, node: &Handle, name: &str, value: &str) {
        if let NodeData::Element { attrs, .. } = &node.data {
            let mut attrs = attrs.borrow_mut();
            match attrs
                .iter_mut()
                .find(|attr| attr.name.local.as_ref() == name)
            {
                Some(attr) => attr.value = value.to_string().into(),
                None => attrs.push(attribute(name, value)),
            }
        }
    }

    fn append_child(&mut self, parent: &Handle, child: &Handle) {
        parent.children.borrow_mut().push(child.clone());
    }

    fn append_text(&mut self, node: &Handle, text: &str) {
        if let NodeData::Text { contents } = &node.data {
            contents.borrow_mut().push_slice(text);
        }
    }
}

/// Serialize a model to an HTML fragment and the selection in its
/// coordinates.
pub fn serialize_html(
    model: &ContentModel,
    options: &SerializeOptions,
) -> Result<Serialized<String>, FormatError> {
    let mut factory = RcDomFactory;
    let Serialized { root, selection } = serialize_model_with_options(model, &mut factory, options);
    Ok(Serialized {
        root: serialize_children(&root)?,
        selection,
    })
}

/// Serialize a model to an HTML fragment.
pub fn to_html(model: &ContentModel, options: &SerializeOptions) -> Result<String, FormatError> {
    serialize_html(model, options).map(|serialized| serialized.root)
}

fn attribute(name: &str, value: &str) -> Attribute {
    Attribute {
        name: QualName::new(None, ns!(), LocalName::from(name)),
        value: value.to_string().into(),
    }
}

/// Create an HTML element with attributes
fn create_element(tag: &str, attrs: Vec<(&str, &str)>) -> Handle {
    let qual_name = QualName::new(None, ns!(html), LocalName::from(tag));
    let attributes = attrs
        .into_iter()
        .map(|(name, value)| attribute(name, value))
        .collect();

    Rc::new(Node {
        parent: Cell::new(None),
        children: RefCell::new(Vec::new()),
        data: NodeData::Element {
            name: qual_name,
            attrs: RefCell::new(attributes),
            template_contents: Default::default(),
            mathml_annotation_xml_integration_point: false,
        },
    })
}

fn create_text(text: &str) -> Handle {
    Rc::new(Node {
        parent: Cell::new(None),
        children: RefCell::new(Vec::new()),
        data: NodeData::Text {
            contents: RefCell::new(text.to_string().into()),
        },
    })
}

/// Serialize the children of `root`, each including its own tag.
fn serialize_children(root: &Handle) -> Result<String, FormatError> {
    let mut output = Vec::new();
    let opts = SerializeOpts {
        traversal_scope: TraversalScope::IncludeNode,
        ..Default::default()
    };

    for child in root.children.borrow().iter() {
        let serializable = SerializableHandle::from(child.clone());
        serialize(&mut output, &serializable, opts.clone()).map_err(|e| {
            FormatError::SerializationError(format!("HTML serialization failed: {e}"))
        })?;
    }

    String::from_utf8(output)
        .map_err(|e| FormatError::SerializationError(format!("UTF-8 conversion failed: {e}")))
}
