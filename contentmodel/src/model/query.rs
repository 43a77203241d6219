//! Selection queries and format toggles over a built model

use super::{Block, BlockGroup, ContentModel, Segment, SegmentFormat, TableSlot};

/// Every selected segment, depth first.
pub fn selected_segments(model: &ContentModel) -> Vec<&Segment> {
    let mut out = Vec::new();
    collect(&model.document, &mut out);
    out
}

/// Every selected segment, depth first, for in-place format edits.
pub fn selected_segments_mut(model: &mut ContentModel) -> Vec<&mut Segment> {
    let mut out = Vec::new();
    collect_mut(&mut model.document, &mut out);
    out
}

fn collect<'a>(group: &'a BlockGroup, out: &mut Vec<&'a Segment>) {
    for block in &group.blocks {
        match block {
            Block::Group(child) => collect(child, out),
            Block::List(list) => {
                for item in &list.items {
                    collect(item, out);
                }
            }
            Block::Table(table) => {
                for slot in table.cells.iter().flatten() {
                    if let TableSlot::Cell(cell) = slot {
                        collect(&cell.group, out);
                    }
                }
            }
            Block::Paragraph(paragraph) => {
                out.extend(paragraph.segments.iter().filter(|s| s.is_selected));
            }
        }
    }
}

fn collect_mut<'a>(group: &'a mut BlockGroup, out: &mut Vec<&'a mut Segment>) {
    for block in group.blocks.iter_mut() {
        match block {
            Block::Group(child) => collect_mut(child, out),
            Block::List(list) => {
                for item in list.items.iter_mut() {
                    collect_mut(item, out);
                }
            }
            Block::Table(table) => {
                for slot in table.cells.iter_mut().flatten() {
                    if let TableSlot::Cell(cell) = slot {
                        collect_mut(&mut cell.group, out);
                    }
                }
            }
            Block::Paragraph(paragraph) => {
                out.extend(paragraph.segments.iter_mut().filter(|s| s.is_selected));
            }
        }
    }
}

/// Boolean segment attributes a host can toggle over the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Bold,
    Italic,
    Underline,
    Strikethrough,
}

impl Toggle {
    pub const NAMES: &'static [&'static str] = &["bold", "italic", "underline", "strikethrough"];

    pub fn from_name(name: &str) -> Option<Toggle> {
        match name {
            "bold" => Some(Toggle::Bold),
            "italic" => Some(Toggle::Italic),
            "underline" => Some(Toggle::Underline),
            "strikethrough" => Some(Toggle::Strikethrough),
            _ => None,
        }
    }

    fn get(&self, format: &SegmentFormat) -> bool {
        match self {
            Toggle::Bold => format.bold,
            Toggle::Italic => format.italic,
            Toggle::Underline => format.underline,
            Toggle::Strikethrough => format.strikethrough,
        }
    }

    fn set(&self, format: &mut SegmentFormat, on: bool) {
        match self {
            Toggle::Bold => format.bold = on,
            Toggle::Italic => format.italic = on,
            Toggle::Underline => format.underline = on,
            Toggle::Strikethrough => format.strikethrough = on,
        }
    }
}

/// Toggle an attribute over the selection: it is cleared when every selected
/// segment already has it, otherwise set on all of them.
///
/// Returns the new value, or `None` when nothing is selected.
pub fn toggle_format(model: &mut ContentModel, toggle: Toggle) -> Option<bool> {
    let mut segments = selected_segments_mut(model);
    if segments.is_empty() {
        return None;
    }
    let on = !segments.iter().all(|segment| toggle.get(&segment.format));
    for segment in segments.iter_mut() {
        toggle.set(&mut segment.format, on);
    }
    Some(on)
}
