//! End to end scenarios: HTML → model → HTML

use crate::common::{build, first_table, paragraphs, source, to_source};
use contentmodel::formats::html::to_html;
use contentmodel::model::{Alignment, Direction, TableSlot};
use contentmodel::{build_model, SerializeOptions, SourceNode};

#[test]
fn test_rtl_centered_paragraph_with_bold_run() {
    let html = r#"<div dir="rtl" style="text-align: center"><b>Hello</b> world</div>"#;
    let model = build(html);

    let paragraphs = paragraphs(&model);
    assert_eq!(paragraphs.len(), 1);
    let paragraph = paragraphs[0];
    assert_eq!(paragraph.format.direction, Some(Direction::Rtl));
    assert_eq!(paragraph.format.alignment, Some(Alignment::Center));

    let segments: Vec<_> = paragraph
        .segments
        .iter()
        .map(|s| (s.as_text().unwrap(), s.format.bold))
        .collect();
    assert_eq!(segments, vec![("Hello", true), (" world", false)]);

    let output = to_html(&model, &SerializeOptions::default()).unwrap();
    assert_eq!(
        output,
        r#"<div style="direction: rtl; text-align: center"><b><span>Hello</span></b><span> world</span></div>"#
    );
    assert_eq!(build(&output), model);
}

#[test]
fn test_row_spanning_cell() {
    let html = r#"<table><tr><td rowspan="2">a</td><td>b</td></tr><tr><td>c</td></tr></table>"#;
    let model = build(html);
    let table = first_table(&model);

    assert_eq!(table.row_count(), 2);
    assert_eq!(table.column_count(), 2);
    assert_eq!(table.origin_count(), 3);
    let marker = table.cell(1, 0).and_then(TableSlot::span_marker).unwrap();
    assert!(marker.span_above);
    assert!(!marker.span_left);
    let text = |r, c| {
        table
            .cell(r, c)
            .and_then(TableSlot::as_cell)
            .map(|cell| cell.group.paragraphs().map(|p| p.text()).collect::<String>())
    };
    assert_eq!(text(0, 0).as_deref(), Some("a"));
    assert_eq!(text(0, 1).as_deref(), Some("b"));
    assert_eq!(text(1, 1).as_deref(), Some("c"));

    let out = to_source(&model).root;
    let table_node = out.children()[0].as_element().unwrap();
    assert_eq!(table_node.tag, "table");
    let rows: Vec<&[SourceNode]> = table_node.children.iter().map(|tr| tr.children()).collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].len(), 2);
    assert_eq!(rows[1].len(), 1);
    let spanning = rows[0][0].as_element().unwrap();
    assert_eq!(spanning.attribute("rowspan"), Some("2"));
    assert_eq!(spanning.attribute("colspan"), None);
}

#[test]
fn test_mixed_document_round_trip() {
    let html = concat!(
        r#"<p style="text-align: right">a <i>b</i> <a href="x">c</a></p>"#,
        "<ul><li>one</li><li>two <u>2</u></li></ul>",
        "<blockquote>quoted</blockquote>",
        r#"<p><img src="pic.png" alt="pic"> caption</p>"#,
    );
    let model = build(html);
    let out = to_source(&model);
    assert_eq!(build_model(&out.root, None), model);

    let text = to_html(&model, &SerializeOptions::default()).unwrap();
    assert_eq!(build(&text), model);
}

#[test]
fn test_source_tree_is_not_modified() {
    let root = source("<p> a <b>b</b> </p><table><tr><td>x</td></tr></table>");
    let before = root.clone();
    let _ = build_model(&root, None);
    assert_eq!(root, before);
}
