//! The Content Model
//!
//! A [`ContentModel`] is a tree of blocks rooted at a Document
//! [`BlockGroup`]. Groups own blocks; paragraphs own inline [`Segment`]s;
//! tables own a dense, rectangular matrix of [`TableSlot`]s where every slot
//! is either an origin cell or a span marker pointing back at one.
//!
//! Block and segment kinds are closed sets, so they are enums and every
//! consumer matches them exhaustively.

pub mod format;
pub mod query;

pub use format::{Alignment, Direction, Link, ParagraphFormat, SegmentFormat};
pub use query::{selected_segments, selected_segments_mut, toggle_format, Toggle};

use crate::dom::Element;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentModel {
    pub document: BlockGroup,
}

impl ContentModel {
    pub fn new() -> Self {
        ContentModel {
            document: BlockGroup::new(BlockGroupKind::Document),
        }
    }

    pub fn with_blocks(blocks: Vec<Block>) -> Self {
        ContentModel {
            document: BlockGroup {
                kind: BlockGroupKind::Document,
                blocks,
            },
        }
    }
}

impl Default for ContentModel {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockGroupKind {
    Document,
    Quote,
    Code,
    Header { level: u8 },
    ListItem,
    TableCell,
    /// Host-owned block wrapper; the shell element is re-emitted as is.
    Entity { shell: Element },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockGroup {
    pub kind: BlockGroupKind,
    #[serde(default)]
    pub blocks: Vec<Block>,
}

impl BlockGroup {
    pub fn new(kind: BlockGroupKind) -> Self {
        BlockGroup {
            kind,
            blocks: Vec::new(),
        }
    }

    /// Paragraphs directly owned by this group, in order.
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.blocks.iter().filter_map(|block| match block {
            Block::Paragraph(paragraph) => Some(paragraph),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Block {
    Group(BlockGroup),
    List(List),
    Table(Table),
    Paragraph(Paragraph),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListKind {
    Ordered,
    Unordered,
}

impl ListKind {
    pub fn tag(&self) -> &'static str {
        match self {
            ListKind::Ordered => "ol",
            ListKind::Unordered => "ul",
        }
    }
}

/// A list; every item is a ListItem group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct List {
    pub kind: ListKind,
    #[serde(default)]
    pub items: Vec<BlockGroup>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub cells: Vec<Vec<TableSlot>>,
}

impl Table {
    pub fn row_count(&self) -> usize {
        self.cells.len()
    }

    pub fn column_count(&self) -> usize {
        self.cells.first().map_or(0, Vec::len)
    }

    pub fn is_rectangular(&self) -> bool {
        let width = self.column_count();
        self.cells.iter().all(|row| row.len() == width)
    }

    pub fn origin_count(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|slot| matches!(slot, TableSlot::Cell(_)))
            .count()
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&TableSlot> {
        self.cells.get(row).and_then(|cells| cells.get(col))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableSlot {
    Cell(TableCell),
    Span(SpanMarker),
}

impl TableSlot {
    pub fn as_cell(&self) -> Option<&TableCell> {
        match self {
            TableSlot::Cell(cell) => Some(cell),
            TableSlot::Span(_) => None,
        }
    }

    pub fn span_marker(&self) -> Option<SpanMarker> {
        match self {
            TableSlot::Span(marker) => Some(*marker),
            TableSlot::Cell(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableCell {
    pub group: BlockGroup,
    #[serde(default)]
    pub is_header: bool,
}

impl TableCell {
    pub fn new(is_header: bool) -> Self {
        TableCell {
            group: BlockGroup::new(BlockGroupKind::TableCell),
            is_header,
        }
    }
}

/// A slot covered by a neighboring origin cell: `span_left` points at the
/// origin to the left in the same row, `span_above` at the origin above.
/// Slots covered diagonally carry both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanMarker {
    pub span_left: bool,
    pub span_above: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    pub format: ParagraphFormat,
    #[serde(default)]
    pub segments: Vec<Segment>,
    #[serde(default)]
    pub is_dummy: bool,
}

impl Paragraph {
    pub fn new(format: ParagraphFormat) -> Self {
        Paragraph {
            format,
            segments: Vec::new(),
            is_dummy: false,
        }
    }

    /// A boundary placeholder inserted around block elements.
    pub fn boundary(format: ParagraphFormat) -> Self {
        Paragraph {
            is_dummy: true,
            ..Paragraph::new(format)
        }
    }

    pub fn with_segments(format: ParagraphFormat, segments: Vec<Segment>) -> Self {
        Paragraph {
            format,
            segments,
            is_dummy: false,
        }
    }

    /// Concatenated text of the Text segments.
    pub fn text(&self) -> String {
        self.segments
            .iter()
            .filter_map(|segment| match &segment.kind {
                SegmentKind::Text(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub src: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentKind {
    Text(String),
    Image(Image),
    Br,
    SelectionMarker,
    /// Inline host-owned element, kept opaque.
    Entity(Element),
    /// An element the model has no representation for, kept opaque.
    Unknown(Element),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub kind: SegmentKind,
    #[serde(default)]
    pub format: SegmentFormat,
    #[serde(default)]
    pub is_selected: bool,
}

impl Segment {
    pub fn new(kind: SegmentKind, format: SegmentFormat) -> Self {
        Segment {
            kind,
            format,
            is_selected: false,
        }
    }

    pub fn text(text: impl Into<String>, format: SegmentFormat) -> Self {
        Segment::new(SegmentKind::Text(text.into()), format)
    }

    pub fn marker(format: SegmentFormat) -> Self {
        Segment {
            is_selected: true,
            ..Segment::new(SegmentKind::SelectionMarker, format)
        }
    }

    pub fn selected(mut self, is_selected: bool) -> Self {
        self.is_selected = is_selected;
        self
    }

    pub fn is_marker(&self) -> bool {
        matches!(self.kind, SegmentKind::SelectionMarker)
    }

    pub fn as_text(&self) -> Option<&str> {
        match &self.kind {
            SegmentKind::Text(text) => Some(text),
            _ => None,
        }
    }
}
