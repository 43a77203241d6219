//! Content model serialization
//!
//! [`serialize_model`] mirrors the builder: every paragraph becomes a `div`
//! carrying its paragraph format as inline style, every segment becomes a
//! leaf under the wrappers its format calls for, and groups, lists and tables
//! get the elements their kind requires. Nodes are created through an
//! [`OutputFactory`], so the produced tree can be an HTML DOM or a
//! [`SourceNode`](crate::dom::SourceNode) tree.
//!
//! While emitting, a [`SelectionRecorder`] watches the `is_selected` flags
//! of the segment stream and reconstructs the selection in produced-tree
//! coordinates.

mod factory;

pub use factory::{OutputFactory, SourceTreeFactory};

use crate::dom::{Element, Position, Selection, SourceNode};
use crate::model::{
    Block, BlockGroup, BlockGroupKind, ContentModel, Image, List, Paragraph, Segment,
    SegmentFormat, SegmentKind, Table,
};
use crate::resolver::{paragraph_style, segment_decorations, SegmentDecorations};
use crate::selection::SelectionRecorder;
use crate::table::compact_spans;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerializeOptions {
    /// Give a paragraph that produced no nodes a `br`, so it keeps its line.
    pub empty_paragraph_placeholder: bool,
}

impl Default for SerializeOptions {
    fn default() -> Self {
        SerializeOptions {
            empty_paragraph_placeholder: true,
        }
    }
}

/// A produced tree and the selection reconstructed in its coordinates.
#[derive(Debug, Clone)]
pub struct Serialized<N> {
    pub root: N,
    pub selection: Option<Selection>,
}

pub fn serialize_model<F: OutputFactory>(model: &ContentModel, factory: &mut F) -> Serialized<F::Node> {
    serialize_model_with_options(model, factory, &SerializeOptions::default())
}

pub fn serialize_model_with_options<F: OutputFactory>(
    model: &ContentModel,
    factory: &mut F,
    options: &SerializeOptions,
) -> Serialized<F::Node> {
    let fragment = factory.create_fragment();
    let mut emitter = Emitter {
        factory,
        options,
        recorder: SelectionRecorder::new(),
    };
    let mut root = Parent {
        node: fragment.clone(),
        path: Vec::new(),
        count: 0,
    };
    emitter.group(&mut root, &model.document);

    Serialized {
        root: fragment,
        selection: emitter.recorder.finish(),
    }
}

/// Serialize into a [`SourceNode`] tree.
pub fn serialize_to_source(model: &ContentModel, options: &SerializeOptions) -> Serialized<SourceNode> {
    let mut factory = SourceTreeFactory::new();
    let Serialized { root, selection } = serialize_model_with_options(model, &mut factory, options);
    Serialized {
        root: factory.into_tree(root),
        selection,
    }
}

/// An emitted node that children are being appended to.
struct Parent<N> {
    node: N,
    path: Vec<usize>,
    count: usize,
}

impl<N> Parent<N> {
    fn child_path(&self, index: usize) -> Vec<usize> {
        let mut path = self.path.clone();
        path.push(index);
        path
    }

    fn end(&self) -> Position {
        Position::new(self.path.clone(), self.count)
    }
}

/// The last emitted text node, which a following Text segment with the same
/// format and selection state extends.
struct OpenText<N> {
    node: N,
    path: Vec<usize>,
    chars: usize,
    format: SegmentFormat,
    is_selected: bool,
}

impl<N> OpenText<N> {
    fn end(&self) -> Position {
        Position::new(self.path.clone(), self.chars)
    }
}

struct Emitter<'a, F: OutputFactory> {
    factory: &'a mut F,
    options: &'a SerializeOptions,
    recorder: SelectionRecorder,
}

impl<F: OutputFactory> Emitter<'_, F> {
    fn append(&mut self, parent: &mut Parent<F::Node>, child: F::Node) -> Parent<F::Node> {
        self.factory.append_child(&parent.node, &child);
        let path = parent.child_path(parent.count);
        parent.count += 1;
        Parent {
            node: child,
            path,
            count: 0,
        }
    }

    fn element(&mut self, tag: &str, attributes: &[(&str, &str)]) -> F::Node {
        let node = self.factory.create_element(tag);
        for (name, value) in attributes {
            self.factory.set_attribute(&node, name, value);
        }
        node
    }

    fn group(&mut self, parent: &mut Parent<F::Node>, group: &BlockGroup) {
        for block in &group.blocks {
            match block {
                Block::Paragraph(paragraph) => self.paragraph(parent, paragraph),
                Block::Group(child) => self.nested_group(parent, child),
                Block::List(list) => self.list(parent, list),
                Block::Table(table) => self.table(parent, table),
            }
        }
    }

    fn nested_group(&mut self, parent: &mut Parent<F::Node>, group: &BlockGroup) {
        let wrapper = match &group.kind {
            BlockGroupKind::Quote => self.element("blockquote", &[]),
            BlockGroupKind::Code => self.element("pre", &[]),
            BlockGroupKind::Header { level } => {
                self.element(&format!("h{}", (*level).clamp(1, 6)), &[])
            }
            BlockGroupKind::Entity { shell } => self.clone_shell(shell),
            BlockGroupKind::Document | BlockGroupKind::TableCell | BlockGroupKind::ListItem => {
                return self.group(parent, group);
            }
        };
        let mut inner = self.append(parent, wrapper);
        self.group(&mut inner, group);
    }

    fn list(&mut self, parent: &mut Parent<F::Node>, list: &List) {
        let node = self.element(list.kind.tag(), &[]);
        let mut list_node = self.append(parent, node);
        for item in &list.items {
            let li = self.element("li", &[]);
            let mut item_node = self.append(&mut list_node, li);
            self.group(&mut item_node, item);
        }
    }

    fn table(&mut self, parent: &mut Parent<F::Node>, table: &Table) {
        let node = self.element("table", &[]);
        let mut table_node = self.append(parent, node);

        for (r, row) in compact_spans(table).into_iter().enumerate() {
            let tr = self.element("tr", &[]);
            let mut row_node = self.append(&mut table_node, tr);
            for compact in row {
                let Some(cell) = table.cell(r, compact.col).and_then(|slot| slot.as_cell()) else {
                    continue;
                };
                let td = self.element(if cell.is_header { "th" } else { "td" }, &[]);
                if compact.row_span > 1 {
                    self.factory
                        .set_attribute(&td, "rowspan", &compact.row_span.to_string());
                }
                if compact.col_span > 1 {
                    self.factory
                        .set_attribute(&td, "colspan", &compact.col_span.to_string());
                }
                let mut cell_node = self.append(&mut row_node, td);
                self.group(&mut cell_node, &cell.group);
            }
        }
    }

    fn paragraph(&mut self, parent: &mut Parent<F::Node>, paragraph: &Paragraph) {
        // a boundary paragraph holding only a cursor produces no element
        if paragraph.is_dummy && paragraph.segments.iter().all(Segment::is_marker) {
            for marker in &paragraph.segments {
                let at = parent.end();
                self.recorder.observe(marker.is_selected, at.clone(), at);
            }
            return;
        }

        let div = self.factory.create_element("div");
        let style = paragraph_style(&paragraph.format);
        if !style.is_empty() {
            self.factory
                .set_attribute(&div, "style", &style.to_css_text());
        }
        let mut div = self.append(parent, div);

        let mut open: Option<OpenText<F::Node>> = None;
        for segment in &paragraph.segments {
            self.segment(&mut div, &mut open, segment);
        }

        if div.count == 0 && self.options.empty_paragraph_placeholder {
            let br = self.factory.create_element("br");
            self.append(&mut div, br);
        }
    }

    fn segment(
        &mut self,
        div: &mut Parent<F::Node>,
        open: &mut Option<OpenText<F::Node>>,
        segment: &Segment,
    ) {
        match &segment.kind {
            SegmentKind::Text(text) => self.text(div, open, segment, text),
            SegmentKind::SelectionMarker => {
                let at = open.as_ref().map_or_else(|| div.end(), OpenText::end);
                self.recorder.observe(segment.is_selected, at.clone(), at);
            }
            other => {
                *open = None;
                let before = div.end();
                let node = match other {
                    SegmentKind::Image(image) => self.image(image, &segment.format),
                    SegmentKind::Entity(element) | SegmentKind::Unknown(element) => {
                        self.clone_element(element)
                    }
                    _ => self.factory.create_element("br"),
                };
                self.append(div, node);
                self.recorder.observe(segment.is_selected, before, div.end());
            }
        }
    }

    fn text(
        &mut self,
        div: &mut Parent<F::Node>,
        open: &mut Option<OpenText<F::Node>>,
        segment: &Segment,
        text: &str,
    ) {
        let length = text.chars().count();

        if let Some(current) = open
            .as_mut()
            .filter(|current| current.format == segment.format && current.is_selected == segment.is_selected)
        {
            let before = current.end();
            self.factory.append_text(&current.node, text);
            current.chars += length;
            self.recorder.observe(segment.is_selected, before, current.end());
            return;
        }

        let decorations = segment_decorations(&segment.format);
        let span = self.factory.create_element("span");
        if !decorations.style.is_empty() {
            self.factory
                .set_attribute(&span, "style", &decorations.style.to_css_text());
        }
        let mut leaf = self.wrap(div, &decorations, span);
        let node = self.factory.create_text(text);
        let text_node = self.append(&mut leaf, node);

        let current = OpenText {
            node: text_node.node,
            path: text_node.path,
            chars: length,
            format: segment.format.clone(),
            is_selected: segment.is_selected,
        };
        let start = Position::new(current.path.clone(), 0);
        self.recorder.observe(segment.is_selected, start, current.end());
        *open = Some(current);
    }

    /// Append the wrappers of `decorations` to `div`, outermost first, and
    /// `leaf` inside the innermost one.
    fn wrap(
        &mut self,
        div: &mut Parent<F::Node>,
        decorations: &SegmentDecorations,
        leaf: F::Node,
    ) -> Parent<F::Node> {
        let mut current: Option<Parent<F::Node>> = None;
        for wrapper in decorations.wrappers.iter().rev() {
            let node = self.factory.create_element(wrapper.tag);
            for (name, value) in &wrapper.attributes {
                self.factory.set_attribute(&node, name, value);
            }
            current = Some(match current.as_mut() {
                Some(outer) => self.append(outer, node),
                None => self.append(div, node),
            });
        }
        match current.as_mut() {
            Some(innermost) => self.append(innermost, leaf),
            None => self.append(div, leaf),
        }
    }

    fn image(&mut self, image: &Image, format: &SegmentFormat) -> F::Node {
        let decorations = segment_decorations(format);
        let img = self.factory.create_element("img");
        self.factory.set_attribute(&img, "src", &image.src);
        let optional = [
            ("alt", &image.alt),
            ("width", &image.width),
            ("height", &image.height),
        ];
        for (name, value) in optional {
            if let Some(value) = value {
                self.factory.set_attribute(&img, name, value);
            }
        }
        if !decorations.style.is_empty() {
            self.factory
                .set_attribute(&img, "style", &decorations.style.to_css_text());
        }

        // wrappers are built inside out around the image
        decorations.wrappers.iter().fold(img, |inner, wrapper| {
            let node = self.factory.create_element(wrapper.tag);
            for (name, value) in &wrapper.attributes {
                self.factory.set_attribute(&node, name, value);
            }
            self.factory.append_child(&node, &inner);
            node
        })
    }

    fn clone_shell(&mut self, shell: &Element) -> F::Node {
        let node = self.factory.create_element(&shell.tag);
        for (name, value) in &shell.attributes {
            self.factory.set_attribute(&node, name, value);
        }
        if !shell.style.is_empty() {
            self.factory
                .set_attribute(&node, "style", &shell.style.to_css_text());
        }
        node
    }

    fn clone_element(&mut self, element: &Element) -> F::Node {
        let node = self.clone_shell(element);
        for child in &element.children {
            let child_node = match child {
                SourceNode::Element(child) => self.clone_element(child),
                SourceNode::Text(text) => self.factory.create_text(text),
            };
            self.factory.append_child(&node, &child_node);
        }
        node
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ParagraphFormat, SegmentFormat};

    fn bold() -> SegmentFormat {
        SegmentFormat {
            bold: true,
            ..Default::default()
        }
    }

    fn serialize(model: &ContentModel) -> Serialized<SourceNode> {
        serialize_to_source(model, &SerializeOptions::default())
    }

    fn one_paragraph(segments: Vec<Segment>) -> ContentModel {
        ContentModel::with_blocks(vec![Block::Paragraph(Paragraph::with_segments(
            ParagraphFormat::default(),
            segments,
        ))])
    }

    #[test]
    fn test_equal_text_segments_merge() {
        let model = one_paragraph(vec![
            Segment::text("ab", SegmentFormat::default()),
            Segment::text("cd", SegmentFormat::default()),
        ]);
        let out = serialize(&model);
        let div = out.root.children()[0].as_element().unwrap();
        assert_eq!(div.children.len(), 1);
        assert_eq!(out.root.text_content(), "abcd");
    }

    #[test]
    fn test_wrappers_nest_outside_span() {
        let model = one_paragraph(vec![Segment::text("x", bold())]);
        let out = serialize(&model);
        let b = out.root.node_at(&[0, 0]).and_then(SourceNode::as_element).unwrap();
        assert_eq!(b.tag, "b");
        let span = out.root.node_at(&[0, 0, 0]).and_then(SourceNode::as_element).unwrap();
        assert_eq!(span.tag, "span");
        assert_eq!(out.root.node_at(&[0, 0, 0, 0]).and_then(SourceNode::as_text), Some("x"));
    }

    #[test]
    fn test_selection_recorded_in_text_coordinates() {
        let model = one_paragraph(vec![
            Segment::text("ab", SegmentFormat::default()),
            Segment::text("cd", bold()).selected(true),
            Segment::text("ef", SegmentFormat::default()),
        ]);
        let selection = serialize(&model).selection.unwrap();
        assert_eq!(selection.start.to_string(), "0/1/0/0/0:0");
        assert_eq!(selection.end.to_string(), "0/1/0/0/0:2");
    }

    #[test]
    fn test_collapsed_marker_inside_merged_text() {
        let model = one_paragraph(vec![
            Segment::text("ab", SegmentFormat::default()),
            Segment::marker(SegmentFormat::default()),
            Segment::text("cd", SegmentFormat::default()),
        ]);
        let out = serialize(&model);
        let selection = out.selection.unwrap();
        assert!(selection.is_collapsed());
        assert_eq!(selection.start.to_string(), "0/0/0:2");
        assert_eq!(out.root.text_content(), "abcd");
    }

    #[test]
    fn test_empty_paragraph_gets_placeholder() {
        let model = one_paragraph(vec![Segment::marker(SegmentFormat::default())]);
        let out = serialize(&model);
        let br = out.root.node_at(&[0, 0]).and_then(SourceNode::as_element).unwrap();
        assert_eq!(br.tag, "br");
        assert_eq!(out.selection.unwrap().start.to_string(), "0:0");

        let bare = serialize_to_source(
            &model,
            &SerializeOptions {
                empty_paragraph_placeholder: false,
            },
        );
        assert!(bare.root.children()[0].children().is_empty());
    }

    #[test]
    fn test_dummy_paragraphs_skipped() {
        let model = ContentModel::with_blocks(vec![Block::Paragraph(Paragraph::boundary(
            ParagraphFormat::default(),
        ))]);
        assert!(serialize(&model).root.children().is_empty());
    }

    #[test]
    fn test_cursor_in_boundary_paragraph_emits_nothing() {
        let mut boundary = Paragraph::boundary(ParagraphFormat::default());
        boundary.segments.push(Segment::marker(SegmentFormat::default()));
        let model = ContentModel::with_blocks(vec![
            Block::Paragraph(Paragraph::with_segments(
                ParagraphFormat::default(),
                vec![Segment::text("a", SegmentFormat::default())],
            )),
            Block::Paragraph(boundary),
        ]);
        let out = serialize(&model);
        assert_eq!(out.root.children().len(), 1);
        let selection = out.selection.unwrap();
        assert!(selection.is_collapsed());
        assert_eq!(selection.start.to_string(), ":1");
    }

    #[test]
    fn test_unknown_element_reemitted() {
        let hr = Element::new("hr").with_attribute("class", "rule");
        let model = one_paragraph(vec![Segment::new(
            SegmentKind::Unknown(hr.clone()),
            SegmentFormat::default(),
        )]);
        let out = serialize(&model);
        assert_eq!(out.root.node_at(&[0, 0]).and_then(SourceNode::as_element), Some(&hr));
    }
}
