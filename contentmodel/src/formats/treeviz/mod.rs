//! Treeviz formatter for content models
//!
//! Treeviz draws a model (or a source tree) as an indented tree with Unicode
//! connectors, one node per line:
//!
//! <prefix><connector> <icon> <label>
//!
//! Example:
//!
//! ⧉ Document (2 blocks)
//! ├─ ¶ 2 segments {align=center}
//! │ ├─ ◦ "Hello " {bold}
//! │ └─ ◦ "world" [selected]
//! └─ ☰ unordered (1 items)
//!   └─ • item
//!     └─ ¶ 1 segments
//!       └─ ◦ "one"
//!
//! Text labels are truncated to 30 characters. Format flags list only the
//! properties that are set; they can be turned off with the `show-formats`
//! parameter.
//!
//! The source view ([`source_to_treeviz`]) prefixes every node with its path,
//! which is the notation positions are written in.

use super::icons::get_icon;
use crate::dom::{Element, SourceNode};
use crate::error::FormatError;
use crate::format::{bool_param, check_params, Format};
use crate::model::{
    Block, BlockGroup, BlockGroupKind, ContentModel, List, ListKind, Paragraph, ParagraphFormat,
    Segment, SegmentFormat, SegmentKind, Table, TableSlot,
};
use std::collections::HashMap;

const MAX_LABEL_CHARS: usize = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreevizOptions {
    /// List the set format properties after each label.
    pub show_formats: bool,
}

impl Default for TreevizOptions {
    fn default() -> Self {
        TreevizOptions { show_formats: true }
    }
}

struct TreeNode {
    icon: &'static str,
    label: String,
    children: Vec<TreeNode>,
}

impl TreeNode {
    fn new(node_type: &str, label: impl Into<String>) -> Self {
        TreeNode {
            icon: get_icon(node_type),
            label: label.into(),
            children: Vec::new(),
        }
    }

    fn with_children(mut self, children: Vec<TreeNode>) -> Self {
        self.children = children;
        self
    }
}

fn format_node(node: &TreeNode, prefix: &str, is_last: bool, output: &mut String) {
    let connector = if is_last { "└─" } else { "├─" };
    output.push_str(&format!("{prefix}{connector} {} {}\n", node.icon, node.label));

    let child_prefix = format!("{prefix}{}", if is_last { "  " } else { "│ " });
    format_children(&node.children, &child_prefix, output);
}

fn format_children(children: &[TreeNode], prefix: &str, output: &mut String) {
    let child_count = children.len();
    for (i, child) in children.iter().enumerate() {
        format_node(child, prefix, i == child_count - 1, output);
    }
}

pub fn to_treeviz_str(model: &ContentModel, options: &TreevizOptions) -> String {
    let blocks = &model.document.blocks;
    let mut output = format!("{} Document ({} blocks)\n", get_icon("Document"), blocks.len());
    let nodes: Vec<TreeNode> = blocks.iter().map(|block| block_node(block, options)).collect();
    format_children(&nodes, "", &mut output);
    output
}

/// Convert a model to a treeviz string with optional parameters
///
/// # Parameters
///
/// - `"show-formats"`: `"false"` hides the format flags.
pub fn to_treeviz_str_with_params(
    model: &ContentModel,
    params: &HashMap<String, String>,
) -> Result<String, FormatError> {
    check_params("treeviz", params, &["show-formats"])?;
    let mut options = TreevizOptions::default();
    if let Some(show) = bool_param(params, "show-formats")? {
        options.show_formats = show;
    }
    Ok(to_treeviz_str(model, &options))
}

/// Draw a source tree, labelling every node with its path.
pub fn source_to_treeviz(root: &SourceNode) -> String {
    let mut output = String::new();
    match root {
        SourceNode::Element(element) => {
            output.push_str(&format!("{} {}\n", get_icon("Element"), element_label(element)));
            let nodes: Vec<TreeNode> = element
                .children
                .iter()
                .enumerate()
                .map(|(i, child)| source_node(child, vec![i]))
                .collect();
            format_children(&nodes, "", &mut output);
        }
        SourceNode::Text(text) => {
            output.push_str(&format!("{} {}\n", get_icon("Text"), quote(text)));
        }
    }
    output
}

fn source_node(node: &SourceNode, path: Vec<usize>) -> TreeNode {
    let at = path
        .iter()
        .map(|index| index.to_string())
        .collect::<Vec<_>>()
        .join("/");
    match node {
        SourceNode::Text(text) => TreeNode::new("Text", format!("[{at}] {}", quote(text))),
        SourceNode::Element(element) => {
            let children = element
                .children
                .iter()
                .enumerate()
                .map(|(i, child)| {
                    let mut child_path = path.clone();
                    child_path.push(i);
                    source_node(child, child_path)
                })
                .collect();
            TreeNode::new("Element", format!("[{at}] {}", element_label(element)))
                .with_children(children)
        }
    }
}

fn element_label(element: &Element) -> String {
    let mut label = format!("<{}", element.tag);
    for (name, value) in &element.attributes {
        label.push_str(&format!(" {name}=\"{value}\""));
    }
    if !element.style.is_empty() {
        label.push_str(&format!(" style=\"{}\"", element.style.to_css_text()));
    }
    label.push('>');
    label
}

fn block_node(block: &Block, options: &TreevizOptions) -> TreeNode {
    match block {
        Block::Paragraph(paragraph) => paragraph_node(paragraph, options),
        Block::Group(group) => group_node(group, options),
        Block::List(list) => list_node(list, options),
        Block::Table(table) => table_node(table, options),
    }
}

fn blocks_of(group: &BlockGroup, options: &TreevizOptions) -> Vec<TreeNode> {
    group
        .blocks
        .iter()
        .map(|block| block_node(block, options))
        .collect()
}

fn group_node(group: &BlockGroup, options: &TreevizOptions) -> TreeNode {
    let node = match &group.kind {
        BlockGroupKind::Quote => TreeNode::new("Quote", "quote"),
        BlockGroupKind::Code => TreeNode::new("Code", "code"),
        BlockGroupKind::Header { level } => TreeNode::new("Header", format!("h{level}")),
        BlockGroupKind::Entity { shell } => TreeNode::new("Entity", element_label(shell)),
        BlockGroupKind::ListItem => TreeNode::new("ListItem", "item"),
        BlockGroupKind::TableCell => TreeNode::new("TableCell", "cell"),
        BlockGroupKind::Document => TreeNode::new("Document", "document"),
    };
    node.with_children(blocks_of(group, options))
}

fn list_node(list: &List, options: &TreevizOptions) -> TreeNode {
    let kind = match list.kind {
        ListKind::Ordered => "ordered",
        ListKind::Unordered => "unordered",
    };
    let items = list
        .items
        .iter()
        .map(|item| TreeNode::new("ListItem", "item").with_children(blocks_of(item, options)))
        .collect();
    TreeNode::new("List", format!("{kind} ({} items)", list.items.len())).with_children(items)
}

fn table_node(table: &Table, options: &TreevizOptions) -> TreeNode {
    let rows = table
        .cells
        .iter()
        .enumerate()
        .map(|(r, row)| {
            let slots = row.iter().map(|slot| slot_node(slot, options)).collect();
            TreeNode::new("Row", format!("row {r}")).with_children(slots)
        })
        .collect();
    TreeNode::new(
        "Table",
        format!("{}x{} table", table.row_count(), table.column_count()),
    )
    .with_children(rows)
}

fn slot_node(slot: &TableSlot, options: &TreevizOptions) -> TreeNode {
    match slot {
        TableSlot::Cell(cell) => {
            let label = if cell.is_header { "header cell" } else { "cell" };
            TreeNode::new("TableCell", label).with_children(blocks_of(&cell.group, options))
        }
        TableSlot::Span(marker) => {
            let label = match (marker.span_left, marker.span_above) {
                (true, true) => "span left, above",
                (true, false) => "span left",
                (false, true) => "span above",
                (false, false) => "span",
            };
            TreeNode::new("Span", label)
        }
    }
}

fn paragraph_node(paragraph: &Paragraph, options: &TreevizOptions) -> TreeNode {
    let mut label = format!("{} segments", paragraph.segments.len());
    if options.show_formats {
        push_flags(&mut label, paragraph_flags(&paragraph.format));
    }
    if paragraph.is_dummy {
        label.push_str(" (boundary)");
    }
    let segments = paragraph
        .segments
        .iter()
        .map(|segment| segment_node(segment, options))
        .collect();
    TreeNode::new("Paragraph", label).with_children(segments)
}

fn segment_node(segment: &Segment, options: &TreevizOptions) -> TreeNode {
    let (node_type, mut label) = match &segment.kind {
        SegmentKind::Text(text) => ("Text", quote(text)),
        SegmentKind::Image(image) => ("Image", format!("image {}", image.src)),
        SegmentKind::Br => ("Br", "line break".to_string()),
        SegmentKind::SelectionMarker => ("SelectionMarker", "selection marker".to_string()),
        SegmentKind::Entity(element) => ("Entity", element_label(element)),
        SegmentKind::Unknown(element) => ("Unknown", element_label(element)),
    };
    if options.show_formats {
        push_flags(&mut label, segment_flags(&segment.format));
    }
    if segment.is_selected && !segment.is_marker() {
        label.push_str(" [selected]");
    }
    TreeNode::new(node_type, label)
}

fn push_flags(label: &mut String, flags: Vec<String>) {
    if !flags.is_empty() {
        label.push_str(&format!(" {{{}}}", flags.join(", ")));
    }
}

fn paragraph_flags(format: &ParagraphFormat) -> Vec<String> {
    let mut flags = Vec::new();
    if let Some(direction) = format.direction {
        flags.push(format!("dir={}", direction.as_str()));
    }
    if let Some(alignment) = format.alignment {
        flags.push(format!("align={}", alignment.as_str()));
    }
    let values = [
        ("background", &format.background_color),
        ("margin-top", &format.margin_top),
        ("margin-right", &format.margin_right),
        ("margin-bottom", &format.margin_bottom),
        ("margin-left", &format.margin_left),
        ("indent", &format.indentation),
        ("line-height", &format.line_height),
        ("white-space", &format.white_space),
    ];
    for (name, value) in values {
        if let Some(value) = value {
            flags.push(format!("{name}={value}"));
        }
    }
    flags
}

fn segment_flags(format: &SegmentFormat) -> Vec<String> {
    let mut flags = Vec::new();
    let switches = [
        ("bold", format.bold),
        ("italic", format.italic),
        ("underline", format.underline),
        ("strike", format.strikethrough),
        ("sup", format.superscript),
        ("sub", format.subscript),
    ];
    for (name, on) in switches {
        if on {
            flags.push(name.to_string());
        }
    }
    let values = [
        ("font", &format.font_family),
        ("size", &format.font_size),
        ("color", &format.text_color),
        ("background", &format.background_color),
    ];
    for (name, value) in values {
        if let Some(value) = value {
            flags.push(format!("{name}={value}"));
        }
    }
    if let Some(link) = &format.link {
        flags.push(format!("link={}", link.href));
    }
    flags
}

fn quote(text: &str) -> String {
    let truncated = if text.chars().count() > MAX_LABEL_CHARS {
        let head: String = text.chars().take(MAX_LABEL_CHARS - 1).collect();
        format!("{head}…")
    } else {
        text.to_string()
    };
    format!("{truncated:?}")
}

/// Format implementation for treeviz format
#[derive(Debug, Clone, Default)]
pub struct TreevizFormat {
    options: TreevizOptions,
}

impl TreevizFormat {
    pub fn new(options: TreevizOptions) -> Self {
        TreevizFormat { options }
    }
}

impl Format for TreevizFormat {
    fn name(&self) -> &str {
        "treeviz"
    }

    fn description(&self) -> &str {
        "Visual tree representation with indentation and Unicode icons"
    }

    fn file_extensions(&self) -> &[&str] {
        &["tree", "treeviz"]
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn serialize(&self, model: &ContentModel) -> Result<String, FormatError> {
        Ok(to_treeviz_str(model, &self.options))
    }

    fn serialize_with_options(
        &self,
        model: &ContentModel,
        options: &HashMap<String, String>,
    ) -> Result<String, FormatError> {
        check_params(self.name(), options, &["show-formats"])?;
        let mut resolved = self.options.clone();
        if let Some(show) = bool_param(options, "show-formats")? {
            resolved.show_formats = show;
        }
        Ok(to_treeviz_str(model, &resolved))
    }
}
