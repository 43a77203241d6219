//! Shared icon mapping for tree visualization
//!
//! Both the model treeviz and the source treeviz look icons up here so the
//! two views read the same.

/// Get the Unicode icon for a model or source node type
///
/// Returns a single Unicode character that visually represents the node type.
pub fn get_icon(node_type: &str) -> &'static str {
    match node_type {
        "Document" => "⧉",
        "Paragraph" => "¶",
        "Text" => "◦",
        "Image" => "▣",
        "Br" => "↵",
        "SelectionMarker" => "‸",
        "Entity" => "◈",
        "Unknown" => "?",
        "Quote" => "\"",
        "Code" => "𝒱",
        "Header" => "§",
        "List" => "☰",
        "ListItem" => "•",
        "Table" => "▦",
        "Row" => "─",
        "TableCell" => "□",
        "Span" => "⋯",
        "Element" => "‹›",
        _ => "○",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_icon_mappings() {
        assert_eq!(get_icon("Document"), "⧉");
        assert_eq!(get_icon("Paragraph"), "¶");
        assert_eq!(get_icon("Text"), "◦");
        assert_eq!(get_icon("Br"), "↵");
        assert_eq!(get_icon("SelectionMarker"), "‸");
        assert_eq!(get_icon("List"), "☰");
        assert_eq!(get_icon("ListItem"), "•");
        assert_eq!(get_icon("Table"), "▦");
        assert_eq!(get_icon("TableCell"), "□");
        assert_eq!(get_icon("Span"), "⋯");
    }

    #[test]
    fn test_unknown_node_type() {
        assert_eq!(get_icon("UnknownType"), "○");
    }
}
