//! Structural cleanup of a built model
//!
//! The walk leaves boundary paragraphs and formatting whitespace behind.
//! [`normalize`] removes them bottom-up, so a group emptied by the pass is
//! pruned by its parent in the same pass.

use crate::model::{
    Block, BlockGroup, BlockGroupKind, ContentModel, Paragraph, SegmentKind, TableSlot,
};

pub fn normalize_model(model: &mut ContentModel) {
    normalize(&mut model.document);
}

pub fn normalize(group: &mut BlockGroup) {
    for block in &mut group.blocks {
        match block {
            Block::Group(child) => normalize(child),
            Block::List(list) => {
                list.items.iter_mut().for_each(normalize);
                list.items.retain(|item| !item.blocks.is_empty());
            }
            Block::Table(table) => table
                .cells
                .iter_mut()
                .flatten()
                .filter_map(|slot| match slot {
                    TableSlot::Cell(cell) => Some(&mut cell.group),
                    TableSlot::Span(_) => None,
                })
                .for_each(normalize),
            Block::Paragraph(paragraph) => clean_paragraph(paragraph),
        }
    }
    group.blocks.retain(is_kept);
}

fn is_kept(block: &Block) -> bool {
    match block {
        Block::Paragraph(paragraph) => !paragraph.segments.is_empty(),
        Block::Group(group) => match group.kind {
            BlockGroupKind::Entity { .. } | BlockGroupKind::TableCell | BlockGroupKind::Document => {
                true
            }
            BlockGroupKind::Quote
            | BlockGroupKind::Code
            | BlockGroupKind::Header { .. }
            | BlockGroupKind::ListItem => !group.blocks.is_empty(),
        },
        Block::List(list) => !list.items.is_empty(),
        Block::Table(table) => table.column_count() > 0,
    }
}

fn clean_paragraph(paragraph: &mut Paragraph) {
    paragraph
        .segments
        .retain(|segment| !matches!(&segment.kind, SegmentKind::Text(text) if text.is_empty()));

    if paragraph.format.preserves_whitespace() {
        return;
    }

    // line breaks between inline tags are source formatting
    paragraph.segments.retain(|segment| {
        segment.is_selected
            || !segment
                .as_text()
                .is_some_and(|text| text.chars().all(|c| c == '\r' || c == '\n'))
    });

    let is_edge_space = |paragraph: &Paragraph, index: usize| {
        paragraph.segments.get(index).is_some_and(|segment| {
            !segment.is_selected
                && segment
                    .as_text()
                    .is_some_and(|text| text.chars().all(char::is_whitespace))
        })
    };
    while is_edge_space(paragraph, 0) {
        paragraph.segments.remove(0);
    }
    while !paragraph.segments.is_empty() && is_edge_space(paragraph, paragraph.segments.len() - 1) {
        paragraph.segments.pop();
    }
}
