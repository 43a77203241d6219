//! Table span reconstruction
//!
//! Source tables describe cells sparsely: each row lists its cells, and a
//! cell may declare `rowspan`/`colspan`. The model stores a dense matrix in
//! which a covered slot holds a span marker instead of content.
//!
//! [`place_cells`] converts the sparse description into a matrix of
//! [`Placement`]s. Each source cell claims the first free slot of its row, and
//! its span rectangle is shrunk where it would overlap a slot claimed earlier,
//! so any input yields a valid rectangular matrix. [`compact_spans`] is the
//! inverse: it recovers one [`CompactCell`] per origin slot from the span
//! markers around it.

use crate::model::{SpanMarker, Table};
use log::debug;

/// Upper bound for a declared span.
pub const MAX_SPAN: usize = 1000;

/// Declared spans of one source cell. A `row_span` of 0 extends the cell to
/// the last row of the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellSpan {
    pub row_span: usize,
    pub col_span: usize,
}

impl CellSpan {
    pub fn new(row_span: usize, col_span: usize) -> Self {
        CellSpan { row_span, col_span }
    }

    /// Parse `rowspan`/`colspan` attribute values; missing or malformed
    /// values count as 1.
    pub fn from_attributes(rowspan: Option<&str>, colspan: Option<&str>) -> Self {
        let parse = |value: Option<&str>| value.and_then(|v| v.trim().parse::<usize>().ok());
        CellSpan {
            row_span: parse(rowspan).unwrap_or(1),
            col_span: parse(colspan).unwrap_or(1).max(1),
        }
    }
}

impl Default for CellSpan {
    fn default() -> Self {
        CellSpan::new(1, 1)
    }
}

/// One slot of the placed matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// The origin slot of source cell `index` in source row `row`.
    Origin { row: usize, index: usize },
    /// A slot covered by the span of a neighboring origin.
    Span(SpanMarker),
    /// A hole left by ragged rows; filled with an empty cell.
    Padding,
}

/// Place source cells into a dense rectangular matrix.
pub fn place_cells(rows: &[Vec<CellSpan>]) -> Vec<Vec<Placement>> {
    let row_count = rows.len();
    let mut grid: Vec<Vec<Option<Placement>>> = vec![Vec::new(); row_count];

    for (r, cells) in rows.iter().enumerate() {
        let mut col = 0;
        for (index, span) in cells.iter().enumerate() {
            while grid[r].get(col).is_some_and(Option::is_some) {
                col += 1;
            }

            let remaining = row_count - r;
            let declared_rows = if span.row_span == 0 {
                remaining
            } else {
                span.row_span
            };
            let wanted_rows = declared_rows.min(remaining).min(MAX_SPAN).max(1);
            let wanted_cols = span.col_span.clamp(1, MAX_SPAN);
            if declared_rows > wanted_rows || span.col_span > wanted_cols {
                debug!("clamped span {}x{} at row {r}, cell {index}", span.row_span, span.col_span);
            }

            // shrink the rectangle to the free area at the origin
            let mut width = 1;
            while width < wanted_cols && is_free(&grid, r, col + width) {
                width += 1;
            }
            let mut height = 1;
            while height < wanted_rows
                && (col..col + width).all(|c| is_free(&grid, r + height, c))
            {
                height += 1;
            }
            if width < wanted_cols || height < wanted_rows {
                debug!("cell {index} of row {r} overlaps an earlier span, shrunk to {height}x{width}");
            }

            for dr in 0..height {
                for dc in 0..width {
                    let placement = if dr == 0 && dc == 0 {
                        Placement::Origin { row: r, index }
                    } else {
                        Placement::Span(SpanMarker {
                            span_left: dc > 0,
                            span_above: dr > 0,
                        })
                    };
                    set(&mut grid, r + dr, col + dc, placement);
                }
            }
            col += width;
        }
    }

    let width = grid.iter().map(Vec::len).max().unwrap_or(0);
    grid.into_iter()
        .enumerate()
        .map(|(r, mut row)| {
            row.resize(width, None);
            row.into_iter()
                .enumerate()
                .map(|(c, slot)| {
                    slot.unwrap_or_else(|| {
                        debug!("padding hole at row {r}, column {c}");
                        Placement::Padding
                    })
                })
                .collect()
        })
        .collect()
}

fn is_free(grid: &[Vec<Option<Placement>>], row: usize, col: usize) -> bool {
    grid.get(row)
        .map_or(false, |cells| cells.get(col).map_or(true, Option::is_none))
}

fn set(grid: &mut [Vec<Option<Placement>>], row: usize, col: usize, placement: Placement) {
    let cells = &mut grid[row];
    if cells.len() <= col {
        cells.resize(col + 1, None);
    }
    cells[col] = Some(placement);
}

/// One origin cell in compact (sparse) form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompactCell {
    pub col: usize,
    pub row_span: usize,
    pub col_span: usize,
}

/// Recover the sparse encoding of a table: one entry per origin slot, row by
/// row. `row_span` grows while the slot below carries `span_above`,
/// `col_span` while the slot to the right carries `span_left`.
pub fn compact_spans(table: &Table) -> Vec<Vec<CompactCell>> {
    let marker = |row: usize, col: usize| table.cell(row, col).and_then(|slot| slot.span_marker());

    table
        .cells
        .iter()
        .enumerate()
        .map(|(r, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, slot)| slot.as_cell().is_some())
                .map(|(c, _)| {
                    let mut row_span = 1;
                    while marker(r + row_span, c).is_some_and(|m| m.span_above) {
                        row_span += 1;
                    }
                    let mut col_span = 1;
                    while marker(r, c + col_span).is_some_and(|m| m.span_left) {
                        col_span += 1;
                    }
                    CompactCell {
                        col: c,
                        row_span,
                        col_span,
                    }
                })
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{TableCell, TableSlot};
    use proptest::prelude::*;

    fn origin(row: usize, index: usize) -> Placement {
        Placement::Origin { row, index }
    }

    fn span(left: bool, above: bool) -> Placement {
        Placement::Span(SpanMarker {
            span_left: left,
            span_above: above,
        })
    }

    fn to_table(placements: &[Vec<Placement>]) -> Table {
        Table {
            cells: placements
                .iter()
                .map(|row| {
                    row.iter()
                        .map(|placement| match placement {
                            Placement::Span(marker) => TableSlot::Span(*marker),
                            _ => TableSlot::Cell(TableCell::new(false)),
                        })
                        .collect()
                })
                .collect(),
        }
    }

    fn to_spans(compact: &[Vec<CompactCell>]) -> Vec<Vec<CellSpan>> {
        compact
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| CellSpan::new(cell.row_span, cell.col_span))
                    .collect()
            })
            .collect()
    }

    /// Slot kinds only; padding becomes a real cell once materialized.
    fn shape(placements: &[Vec<Placement>]) -> Vec<Vec<Option<SpanMarker>>> {
        placements
            .iter()
            .map(|row| {
                row.iter()
                    .map(|placement| match placement {
                        Placement::Span(marker) => Some(*marker),
                        _ => None,
                    })
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_row_span_beside_two_cells() {
        let rows = vec![
            vec![CellSpan::new(2, 1), CellSpan::new(1, 1)],
            vec![CellSpan::new(1, 1)],
        ];
        let placed = place_cells(&rows);
        assert_eq!(
            placed,
            vec![
                vec![origin(0, 0), origin(0, 1)],
                vec![span(false, true), origin(1, 0)],
            ]
        );

        let compact = compact_spans(&to_table(&placed));
        assert_eq!(
            compact,
            vec![
                vec![
                    CompactCell {
                        col: 0,
                        row_span: 2,
                        col_span: 1
                    },
                    CompactCell {
                        col: 1,
                        row_span: 1,
                        col_span: 1
                    },
                ],
                vec![CompactCell {
                    col: 1,
                    row_span: 1,
                    col_span: 1
                }],
            ]
        );
    }

    #[test]
    fn test_block_span_marks_diagonal() {
        let rows = vec![vec![CellSpan::new(2, 2)], vec![]];
        let placed = place_cells(&rows);
        assert_eq!(
            placed,
            vec![
                vec![origin(0, 0), span(true, false)],
                vec![span(false, true), span(true, true)],
            ]
        );
    }

    #[test]
    fn test_overlap_first_free_slot_wins() {
        // the second row's colspan would run into the first row's rowspan
        let rows = vec![
            vec![CellSpan::new(1, 1), CellSpan::new(2, 1)],
            vec![CellSpan::new(1, 3)],
        ];
        let placed = place_cells(&rows);
        assert_eq!(
            placed,
            vec![
                vec![origin(0, 0), origin(0, 1)],
                vec![origin(1, 0), span(false, true)],
            ]
        );
    }

    #[test]
    fn test_ragged_rows_are_padded() {
        let rows = vec![vec![CellSpan::default(); 3], vec![CellSpan::default()]];
        let placed = place_cells(&rows);
        assert_eq!(placed[1], vec![origin(1, 0), Placement::Padding, Placement::Padding]);
    }

    #[test]
    fn test_zero_rowspan_runs_to_last_row() {
        let rows = vec![vec![CellSpan::new(0, 1)], vec![], vec![]];
        let placed = place_cells(&rows);
        assert_eq!(placed[2], vec![span(false, true)]);
    }

    #[test]
    fn test_span_clamped_to_table() {
        let rows = vec![vec![CellSpan::new(5, 1)], vec![CellSpan::default()]];
        let placed = place_cells(&rows);
        assert_eq!(placed.len(), 2);
        assert_eq!(placed[1], vec![span(false, true), origin(1, 0)]);
    }

    #[test]
    fn test_span_attributes() {
        assert_eq!(CellSpan::from_attributes(Some("2"), None), CellSpan::new(2, 1));
        assert_eq!(CellSpan::from_attributes(Some("x"), Some("0")), CellSpan::new(1, 1));
        assert_eq!(CellSpan::from_attributes(Some("0"), Some(" 3 ")), CellSpan::new(0, 3));
    }

    #[test]
    fn test_empty_table() {
        assert!(place_cells(&[]).is_empty());
        assert_eq!(place_cells(&[vec![], vec![]]), vec![Vec::<Placement>::new(), Vec::new()]);
    }

    fn arb_rows() -> impl Strategy<Value = Vec<Vec<CellSpan>>> {
        let cell = (0usize..4, 1usize..4).prop_map(|(r, c)| CellSpan::new(r, c));
        prop::collection::vec(prop::collection::vec(cell, 0..5), 0..6)
    }

    proptest! {
        #[test]
        fn prop_matrix_is_rectangular(rows in arb_rows()) {
            let placed = place_cells(&rows);
            prop_assert_eq!(placed.len(), rows.len());
            let width = placed.first().map_or(0, Vec::len);
            prop_assert!(placed.iter().all(|row| row.len() == width));
        }

        #[test]
        fn prop_every_source_cell_has_one_origin(rows in arb_rows()) {
            let placed = place_cells(&rows);
            let origins = placed
                .iter()
                .flatten()
                .filter(|p| matches!(p, Placement::Origin { .. }))
                .count();
            let cells: usize = rows.iter().map(Vec::len).sum();
            prop_assert_eq!(origins, cells);
        }

        #[test]
        fn prop_forward_reverse_forward_is_identity(rows in arb_rows()) {
            let first = place_cells(&rows);
            let compact = compact_spans(&to_table(&first));
            let second = place_cells(&to_spans(&compact));
            prop_assert_eq!(shape(&first), shape(&second));
        }
    }
}
