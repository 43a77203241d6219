//! Table walking
//!
//! Rows are collected from the table element and its row groups, span
//! placement is computed on the declared `rowspan`/`colspan`, and each origin
//! cell is walked into its own block group.

use super::{FormatContext, Walker};
use crate::dom::{Element, SourceNode};
use crate::model::{Block, BlockGroup, Table, TableCell, TableSlot};
use crate::table::{place_cells, CellSpan, Placement};
use log::debug;

/// A boundary relative to the table element: `(path, offset)`.
type Boundary = (Vec<usize>, usize);

struct RowCell<'a> {
    /// Child index of the cell in its row.
    index: usize,
    element: &'a Element,
    /// Boundaries passed since the previous cell, in document order.
    before: Vec<Boundary>,
}

struct Row<'a> {
    /// Path of the `tr` relative to the table.
    path: Vec<usize>,
    context: FormatContext,
    cells: Vec<RowCell<'a>>,
}

impl<'a> Row<'a> {
    fn new(
        path: Vec<usize>,
        element: &'a Element,
        parent: &FormatContext,
        pending: &mut Vec<Boundary>,
    ) -> Self {
        let mut cells = Vec::new();
        for (index, child) in element.children.iter().enumerate() {
            pending.push((path.clone(), index));
            match child {
                SourceNode::Element(cell) if matches!(cell.tag.as_str(), "td" | "th") => {
                    cells.push(RowCell {
                        index,
                        element: cell,
                        before: std::mem::take(pending),
                    });
                }
                SourceNode::Element(other) => {
                    debug!("ignoring <{}> inside table row", other.tag);
                }
                SourceNode::Text(text) => push_text_boundaries(pending, &path, index, text),
            }
        }
        pending.push((path.clone(), element.children.len()));

        Row {
            context: parent.for_block(element),
            cells,
            path,
        }
    }
}

/// Every offset inside a text child of a table container.
fn push_text_boundaries(pending: &mut Vec<Boundary>, parent: &[usize], index: usize, text: &str) {
    let mut path = parent.to_vec();
    path.push(index);
    for offset in 0..=text.chars().count() {
        pending.push((path.clone(), offset));
    }
}

/// Collect the rows of `table`, assigning every boundary between cells to
/// the cell that follows it. Boundaries after the last cell are returned
/// separately.
fn collect_rows<'a>(table: &'a Element, context: &FormatContext) -> (Vec<Row<'a>>, Vec<Boundary>) {
    let mut rows: Vec<Row<'a>> = Vec::new();
    let mut pending: Vec<Boundary> = Vec::new();

    for (index, child) in table.children.iter().enumerate() {
        pending.push((Vec::new(), index));
        let element = match child {
            SourceNode::Element(element) => element,
            SourceNode::Text(text) => {
                push_text_boundaries(&mut pending, &[], index, text);
                continue;
            }
        };
        match element.tag.as_str() {
            "thead" | "tbody" | "tfoot" => {
                let section_context = context.for_block(element);
                for (row_index, row) in element.children.iter().enumerate() {
                    pending.push((vec![index], row_index));
                    match row {
                        SourceNode::Element(tr) if tr.tag == "tr" => rows.push(Row::new(
                            vec![index, row_index],
                            tr,
                            &section_context,
                            &mut pending,
                        )),
                        SourceNode::Element(other) => {
                            debug!("ignoring <{}> inside <{}>", other.tag, element.tag)
                        }
                        SourceNode::Text(text) => {
                            push_text_boundaries(&mut pending, &[index], row_index, text)
                        }
                    }
                }
                pending.push((vec![index], element.children.len()));
            }
            "tr" => rows.push(Row::new(vec![index], element, context, &mut pending)),
            "caption" => {}
            other => debug!("ignoring <{other}> inside table"),
        }
    }

    pending.push((Vec::new(), table.children.len()));
    (rows, pending)
}

pub(super) fn walk_table(
    walker: &mut Walker,
    group: &mut BlockGroup,
    table: &Element,
    context: &FormatContext,
) {
    let table_context = context.for_block(table);

    // captions have no place in the matrix; they become paragraphs before it
    for (index, child) in table.children.iter().enumerate() {
        if let SourceNode::Element(caption) = child {
            if caption.tag == "caption" {
                walker.path.push(index);
                walker.walk_block(group, caption, &table_context);
                walker.path.pop();
            }
        }
    }

    let (rows, trailing) = collect_rows(table, &table_context);
    let spans: Vec<Vec<CellSpan>> = rows
        .iter()
        .map(|row| {
            row.cells
                .iter()
                .map(|cell| {
                    let element = cell.element;
                    CellSpan::from_attributes(element.attribute("rowspan"), element.attribute("colspan"))
                })
                .collect()
        })
        .collect();
    let placements = place_cells(&spans);

    let mut built: Vec<Vec<Option<TableCell>>> = rows
        .iter()
        .map(|row| walk_row(walker, row))
        .map(|cells| cells.into_iter().map(Some).collect())
        .collect();

    // boundaries after the last cell close the last walked cell
    let last = rows
        .iter()
        .zip(built.iter_mut())
        .filter_map(|(row, cells)| {
            let element = row.cells.last()?.element;
            let cell = cells.last_mut()?.as_mut()?;
            Some((row.context.for_group(element), cell))
        })
        .last();
    match last {
        Some((context, cell)) => {
            for (path, offset) in &trailing {
                walker.cross_below(&mut cell.group, &context, path, *offset);
            }
        }
        None => debug!("table without cells, inner boundaries dropped"),
    }

    let cells = placements
        .into_iter()
        .map(|row| {
            row.into_iter()
                .map(|placement| match placement {
                    Placement::Origin { row, index } => TableSlot::Cell(
                        built
                            .get_mut(row)
                            .and_then(|cells| cells.get_mut(index))
                            .and_then(Option::take)
                            .unwrap_or_else(|| TableCell::new(false)),
                    ),
                    Placement::Span(marker) => TableSlot::Span(marker),
                    Placement::Padding => TableSlot::Cell(TableCell::new(false)),
                })
                .collect()
        })
        .collect();

    group.blocks.push(Block::Table(Table { cells }));
}

fn walk_row(walker: &mut Walker, row: &Row<'_>) -> Vec<TableCell> {
    if row.cells.is_empty() {
        debug!("table row at {:?} has no cells", row.path);
    }

    row.cells
        .iter()
        .map(|row_cell| {
            let element = row_cell.element;
            let context = row.context.for_group(element);
            let mut cell = TableCell::new(element.tag == "th");

            for (path, offset) in &row_cell.before {
                walker.cross_below(&mut cell.group, &context, path, *offset);
            }

            let depth = walker.path.len();
            walker.path.extend_from_slice(&row.path);
            walker.path.push(row_cell.index);
            walker.walk_children(&mut cell.group, element, &context);
            walker.path.truncate(depth);

            cell
        })
        .collect()
}
