//! Content model construction
//!
//! [`build_model`] walks a [`SourceNode`] tree in document order and builds a
//! [`ContentModel`]. The walk threads an immutable [`FormatContext`] down the
//! tree; each element derives a new context for its children. Selection state
//! lives in the walker's [`SelectionTracker`], which is advanced at every
//! boundary the walk passes.
//!
//! Dispatch follows the element's classification (see
//! [`crate::resolver::tags::classify`]):
//!
//! - block elements open a boundary paragraph before and after their
//!   content, so block content never merges into a neighboring inline run;
//! - inline elements only change the segment format;
//! - text leaves are split at selection boundaries and coalesced with the
//!   previous Text segment when format and selection state are equal;
//! - tables go through span reconstruction, each origin cell becoming a
//!   nested block group;
//! - images and opaque elements become single segments;
//! - a line break ends the current paragraph.
//!
//! Building never fails: anything unrecognized degrades to the closest
//! block/inline treatment.

mod context;
mod table;

pub use context::FormatContext;

use crate::dom::{Element, Selection, SourceNode};
use crate::model::{
    Block, BlockGroup, BlockGroupKind, ContentModel, Image, List, ListKind, Paragraph,
    ParagraphFormat, Segment, SegmentKind,
};
use crate::normalize::normalize;
use crate::resolver::tags::{classify, Classification};
use crate::selection::{SelectionTracker, TextPiece};
use log::{debug, trace};

/// Options for model building.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOptions {
    /// Run the normalizer on the built model.
    pub normalize: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        BuildOptions { normalize: true }
    }
}

/// Build a normalized content model from `root` and an optional selection in
/// `root` coordinates.
pub fn build_model(root: &SourceNode, selection: Option<&Selection>) -> ContentModel {
    build_model_with_options(root, selection, &BuildOptions::default())
}

pub fn build_model_with_options(
    root: &SourceNode,
    selection: Option<&Selection>,
    options: &BuildOptions,
) -> ContentModel {
    let mut model = ContentModel::new();
    let mut walker = Walker::new(selection);

    match root {
        SourceNode::Element(element) => {
            let context = FormatContext::default().for_group(element);
            walker.walk_children(&mut model.document, element, &context);
        }
        SourceNode::Text(text) => {
            walker.walk_text(&mut model.document, text, &FormatContext::default());
        }
    }
    walker.selection.finish();

    if options.normalize {
        normalize(&mut model.document);
    }
    model
}

pub(crate) struct Walker {
    selection: SelectionTracker,
    /// Path of the node currently being walked.
    path: Vec<usize>,
}

impl Walker {
    fn new(selection: Option<&Selection>) -> Self {
        Walker {
            selection: SelectionTracker::new(selection),
            path: Vec::new(),
        }
    }

    fn walk_children(&mut self, group: &mut BlockGroup, element: &Element, context: &FormatContext) {
        for (index, child) in element.children.iter().enumerate() {
            self.cross(group, context, index);
            self.path.push(index);
            self.walk_node(group, child, context);
            self.path.pop();
        }
        self.cross(group, context, element.children.len());
    }

    /// Pass the boundary `(path, offset)`, placing a marker if one is due.
    fn cross(&mut self, group: &mut BlockGroup, context: &FormatContext, offset: usize) {
        if self.selection.cross(&self.path, offset) {
            add_segment(group, context, Segment::marker(context.segment.clone()));
        }
    }

    /// Like [`Walker::cross`] for a boundary below the current node.
    fn cross_below(
        &mut self,
        group: &mut BlockGroup,
        context: &FormatContext,
        relative: &[usize],
        offset: usize,
    ) {
        let depth = self.path.len();
        self.path.extend_from_slice(relative);
        self.cross(group, context, offset);
        self.path.truncate(depth);
    }

    fn walk_node(&mut self, group: &mut BlockGroup, node: &SourceNode, context: &FormatContext) {
        match node {
            SourceNode::Text(text) => self.walk_text(group, text, context),
            SourceNode::Element(element) => self.walk_element(group, element, context),
        }
    }

    fn walk_text(&mut self, group: &mut BlockGroup, text: &str, context: &FormatContext) {
        for piece in self.selection.split_text(&self.path, text) {
            let segment = match piece {
                TextPiece::Run { text, is_selected } => {
                    Segment::text(text, context.segment.clone()).selected(is_selected)
                }
                TextPiece::Marker => Segment::marker(context.segment.clone()),
            };
            add_segment(group, context, segment);
        }
    }

    fn walk_element(&mut self, group: &mut BlockGroup, element: &Element, context: &FormatContext) {
        let class = classify(element);
        trace!("walking <{}> as {:?}", element.tag, class);

        match class {
            Classification::Block => self.walk_block(group, element, context),
            Classification::Inline => {
                self.walk_children(group, element, &context.for_inline(element))
            }
            Classification::LineBreak => {
                let segment = self.leaf(SegmentKind::Br, context);
                add_segment(group, context, segment);
                start_paragraph(group, &context.paragraph);
            }
            Classification::Image => {
                let inner = context.for_inline(element);
                let segment = self.leaf(SegmentKind::Image(image_of(element)), &inner);
                add_segment(group, context, segment);
            }
            Classification::Table => table::walk_table(self, group, element, context),
            Classification::Quote => {
                self.walk_group(group, element, BlockGroupKind::Quote, context)
            }
            Classification::Code => self.walk_group(group, element, BlockGroupKind::Code, context),
            Classification::Header(level) => {
                self.walk_group(group, element, BlockGroupKind::Header { level }, context)
            }
            Classification::List(kind) => self.walk_list(group, element, kind, context),
            Classification::Entity { block: true } => {
                let kind = BlockGroupKind::Entity {
                    shell: element.shell(),
                };
                self.walk_group(group, element, kind, context)
            }
            Classification::Entity { block: false } => {
                let segment = self.leaf(SegmentKind::Entity(element.clone()), context);
                add_segment(group, context, segment);
            }
            Classification::Opaque => {
                let segment = self.leaf(SegmentKind::Unknown(element.clone()), context);
                add_segment(group, context, segment);
            }
            Classification::Ignored => debug!("skipping non-rendered <{}>", element.tag),
        }
    }

    fn leaf(&self, kind: SegmentKind, context: &FormatContext) -> Segment {
        Segment::new(kind, context.segment.clone()).selected(self.selection.is_in_selection())
    }

    fn walk_block(&mut self, group: &mut BlockGroup, element: &Element, context: &FormatContext) {
        let inner = context.for_block(element);
        start_paragraph(group, &inner.paragraph);
        self.walk_children(group, element, &inner);
        start_paragraph(group, &context.paragraph);
    }

    fn walk_group(
        &mut self,
        group: &mut BlockGroup,
        element: &Element,
        kind: BlockGroupKind,
        context: &FormatContext,
    ) {
        let inner = context.for_group(element);
        let mut child = BlockGroup::new(kind);
        self.walk_children(&mut child, element, &inner);
        group.blocks.push(Block::Group(child));
    }

    /// `li` children become items; anything else is collected into an
    /// implicit item. Whitespace between items is dropped.
    fn walk_list(
        &mut self,
        group: &mut BlockGroup,
        element: &Element,
        kind: ListKind,
        context: &FormatContext,
    ) {
        let inner = context.for_group(element);
        let mut list = List {
            kind,
            items: Vec::new(),
        };
        let mut implicit_open = false;

        for (index, child) in element.children.iter().enumerate() {
            match child {
                SourceNode::Element(li) if li.tag == "li" => {
                    let item_context = inner.for_group(li);
                    let mut item = BlockGroup::new(BlockGroupKind::ListItem);
                    self.cross(&mut item, &item_context, index);
                    self.path.push(index);
                    self.walk_children(&mut item, li, &item_context);
                    self.path.pop();
                    list.items.push(item);
                    implicit_open = false;
                }
                SourceNode::Text(text) if text.trim().is_empty() => {
                    if self.selection.cross(&self.path, index) {
                        let marker = Segment::marker(inner.segment.clone());
                        add_segment(last_item(&mut list), &inner, marker);
                    }
                }
                other => {
                    if !implicit_open {
                        list.items.push(BlockGroup::new(BlockGroupKind::ListItem));
                        implicit_open = true;
                    }
                    let item = last_item(&mut list);
                    self.cross(item, &inner, index);
                    self.path.push(index);
                    self.walk_node(item, other, &inner);
                    self.path.pop();
                }
            }
        }
        if self.selection.cross(&self.path, element.children.len()) {
            let marker = Segment::marker(inner.segment.clone());
            add_segment(last_item(&mut list), &inner, marker);
        }

        group.blocks.push(Block::List(list));
    }
}

fn last_item(list: &mut List) -> &mut BlockGroup {
    if list.items.is_empty() {
        list.items.push(BlockGroup::new(BlockGroupKind::ListItem));
    }
    let last = list.items.len() - 1;
    &mut list.items[last]
}

fn image_of(element: &Element) -> Image {
    let dimension = |name: &str| {
        element
            .attribute(name)
            .or_else(|| element.style.get(name))
            .map(str::to_string)
    };
    Image {
        src: element.attribute("src").unwrap_or_default().to_string(),
        alt: element.attribute("alt").map(str::to_string),
        width: dimension("width"),
        height: dimension("height"),
    }
}

/// The paragraph new segments go into, opening one when the group does not
/// end with a paragraph.
fn open_paragraph<'g>(group: &'g mut BlockGroup, format: &ParagraphFormat) -> &'g mut Paragraph {
    if !matches!(group.blocks.last(), Some(Block::Paragraph(_))) {
        group
            .blocks
            .push(Block::Paragraph(Paragraph::new(format.clone())));
    }
    match group.blocks.last_mut() {
        Some(Block::Paragraph(paragraph)) => paragraph,
        _ => unreachable!("group ends with a paragraph"),
    }
}

/// Open a boundary paragraph. A trailing empty paragraph is reused.
fn start_paragraph(group: &mut BlockGroup, format: &ParagraphFormat) {
    if let Some(Block::Paragraph(last)) = group.blocks.last_mut() {
        if last.segments.is_empty() {
            last.format = format.clone();
            last.is_dummy = true;
            return;
        }
    }
    group
        .blocks
        .push(Block::Paragraph(Paragraph::boundary(format.clone())));
}

/// Append a segment to the open paragraph of `group`.
///
/// A selection marker is skipped when the previous segment is already
/// selected, and a selected segment replaces a marker right before it, so a
/// non-collapsed selection keeps no markers once it covers content. Text
/// merges into a preceding Text segment with the same format and selection
/// state.
pub(crate) fn add_segment(group: &mut BlockGroup, context: &FormatContext, segment: Segment) {
    let paragraph = open_paragraph(group, &context.paragraph);

    if segment.is_marker() {
        if paragraph.segments.last().is_some_and(|last| last.is_selected) {
            return;
        }
    } else if segment.is_selected && paragraph.segments.last().is_some_and(Segment::is_marker) {
        paragraph.segments.pop();
    }

    if let (SegmentKind::Text(text), Some(last)) = (&segment.kind, paragraph.segments.last_mut()) {
        if last.format == segment.format && last.is_selected == segment.is_selected {
            if let SegmentKind::Text(existing) = &mut last.kind {
                existing.push_str(text);
                paragraph.is_dummy = false;
                return;
            }
        }
    }

    if !segment.is_marker() {
        paragraph.is_dummy = false;
    }
    paragraph.segments.push(segment);
}
