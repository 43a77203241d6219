//! Shared helpers for integration tests

use contentmodel::dom::{Position, Selection, SourceNode};
use contentmodel::formats::html::parse_html;
use contentmodel::model::{Block, ContentModel, Paragraph, Table};
use contentmodel::{build_model, serialize_to_source, SerializeOptions, Serialized};

/// Parse an HTML fragment into a source tree rooted at `body`.
pub fn source(html: &str) -> SourceNode {
    parse_html(html).unwrap()
}

pub fn build(html: &str) -> ContentModel {
    build_model(&source(html), None)
}

pub fn build_selected(html: &str, start: &str, end: &str) -> ContentModel {
    let selection = Selection::new(pos(start), pos(end));
    build_model(&source(html), Some(&selection))
}

pub fn pos(s: &str) -> Position {
    s.parse().unwrap()
}

pub fn to_source(model: &ContentModel) -> Serialized<SourceNode> {
    serialize_to_source(model, &SerializeOptions::default())
}

/// Top-level paragraphs of a model.
pub fn paragraphs(model: &ContentModel) -> Vec<&Paragraph> {
    model.document.paragraphs().collect()
}

/// The first top-level table of a model.
pub fn first_table(model: &ContentModel) -> &Table {
    model
        .document
        .blocks
        .iter()
        .find_map(|block| match block {
            Block::Table(table) => Some(table),
            _ => None,
        })
        .expect("model has a table")
}
