//! Table reconstruction through HTML

use crate::common::{build, build_selected, first_table, paragraphs, to_source};
use contentmodel::build_model;
use contentmodel::model::{selected_segments, TableSlot};
use proptest::prelude::*;

fn cell_text(slot: Option<&TableSlot>) -> Option<String> {
    slot.and_then(TableSlot::as_cell)
        .map(|cell| cell.group.paragraphs().map(|p| p.text()).collect())
}

#[test]
fn test_column_span() {
    let model = build(r#"<table><tr><td colspan="2">a</td></tr><tr><td>b</td><td>c</td></tr></table>"#);
    let table = first_table(&model);
    assert!(table.is_rectangular());
    assert_eq!(table.origin_count(), 3);
    let marker = table.cell(0, 1).and_then(TableSlot::span_marker).unwrap();
    assert!(marker.span_left);
    assert!(!marker.span_above);
    assert_eq!(cell_text(table.cell(1, 1)).as_deref(), Some("c"));
}

#[test]
fn test_ragged_rows_are_padded() {
    let model = build("<table><tr><td>a</td><td>b</td></tr><tr><td>c</td></tr></table>");
    let table = first_table(&model);
    assert_eq!(table.column_count(), 2);
    assert!(table.is_rectangular());
    let padding = table.cell(1, 1).and_then(TableSlot::as_cell).unwrap();
    assert!(padding.group.blocks.is_empty());
}

#[test]
fn test_sections_headers_and_caption() {
    let model = build(concat!(
        "<table><caption>Cap</caption>",
        "<thead><tr><th>H</th></tr></thead>",
        "<tbody><tr><td>x</td></tr></tbody>",
        "<tfoot><tr><td>f</td></tr></tfoot></table>",
    ));
    assert_eq!(paragraphs(&model)[0].text(), "Cap");

    let table = first_table(&model);
    assert_eq!(table.row_count(), 3);
    assert_eq!(table.column_count(), 1);
    let header = table.cell(0, 0).and_then(TableSlot::as_cell).unwrap();
    assert!(header.is_header);
    assert!(header.group.paragraphs().next().unwrap().segments[0].format.bold);
    assert_eq!(cell_text(table.cell(2, 0)).as_deref(), Some("f"));
}

#[test]
fn test_overlapping_spans_stay_rectangular() {
    let model = build(concat!(
        r#"<table><tr><td rowspan="3">a</td><td colspan="5">b</td></tr>"#,
        r#"<tr><td colspan="2" rowspan="0">c</td></tr>"#,
        "<tr><td>d</td><td>e</td></tr></table>",
    ));
    let table = first_table(&model);
    assert!(table.is_rectangular());
    assert_eq!(table.column_count(), 6);
}

#[test]
fn test_spans_round_trip() {
    let html = concat!(
        r#"<table><tr><td rowspan="2" colspan="2">a</td><td>b</td></tr>"#,
        "<tr><td>c</td></tr>",
        "<tr><td>d</td><td>e</td><td>f</td></tr></table>",
    );
    let model = build(html);
    let rebuilt = build_model(&to_source(&model).root, None);
    assert_eq!(rebuilt, model);
    assert_eq!(first_table(&rebuilt).origin_count(), 6);
}

#[test]
fn test_selection_across_cells() {
    let model = build_selected(
        "<table><tr><td>a</td><td>b</td></tr><tr><td>c</td><td>d</td></tr></table>",
        "0/0/0/0/0:0",
        "0/0/1/0/0:1",
    );
    let selected: Vec<_> = selected_segments(&model)
        .iter()
        .filter_map(|s| s.as_text())
        .collect();
    assert_eq!(selected, vec!["a", "b", "c"]);
}

fn plain_table(rows: usize, cols: usize) -> String {
    let mut html = String::from("<table>");
    for r in 0..rows {
        html.push_str("<tr>");
        for c in 0..cols {
            html.push_str(&format!("<td>{r}.{c}</td>"));
        }
        html.push_str("</tr>");
    }
    html.push_str("</table>");
    html
}

proptest! {
    #[test]
    fn prop_origin_count_matches_source_cells(rows in 1usize..6, cols in 1usize..6) {
        let model = build(&plain_table(rows, cols));
        let table = first_table(&model);
        prop_assert_eq!(table.origin_count(), rows * cols);
        prop_assert_eq!(cell_text(table.cell(rows - 1, cols - 1)), Some(format!("{}.{}", rows - 1, cols - 1)));
    }
}

const FORMATTED_TABLE: &str = "<table>\n<tr>\n<td>a</td>\n<td>b</td>\n</tr>\n</table>";

#[test]
fn test_selection_from_row_whitespace() {
    // body > table > [text, tbody > [tr > [text, td, text, td, text], text]]
    let model = build_selected(FORMATTED_TABLE, "0/1/0:0", "0/1/0/3/0:1");
    let selected: Vec<_> = selected_segments(&model)
        .iter()
        .filter_map(|s| s.as_text())
        .collect();
    assert_eq!(selected, vec!["a", "b"]);
}

#[test]
fn test_selection_ending_in_section_whitespace() {
    let model = build_selected(FORMATTED_TABLE, "0/1/0/1/0:0", "0/1/1:0");
    let selected: Vec<_> = selected_segments(&model)
        .iter()
        .filter_map(|s| s.as_text())
        .collect();
    assert_eq!(selected, vec!["a", "b"]);
}

#[test]
fn test_cursor_between_cells_lands_in_next_cell() {
    let model = build_selected(FORMATTED_TABLE, "0/1/0/2:1", "0/1/0/2:1");
    let table = first_table(&model);
    let second = table.cell(0, 1).and_then(TableSlot::as_cell).unwrap();
    let first_segment = &second.group.paragraphs().next().unwrap().segments[0];
    assert!(first_segment.is_marker());
    assert!(to_source(&model).selection.is_some());
}
