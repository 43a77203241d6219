//! Paragraph and segment format records
//!
//! Formats are plain values. Every scope that changes a format works on its
//! own clone, so no two model entities share a mutable format record.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Ltr,
    Rtl,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Ltr => "ltr",
            Direction::Rtl => "rtl",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Left,
    Center,
    Right,
    Justify,
}

impl Alignment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
            Alignment::Justify => "justify",
        }
    }
}

/// Block-level format of a paragraph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParagraphFormat {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alignment: Option<Alignment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin_top: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin_right: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin_bottom: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin_left: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indentation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_height: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub white_space: Option<String>,
}

impl ParagraphFormat {
    /// The format a nested block starts from. Margins belong to the box that
    /// declared them and are not inherited.
    pub fn for_nested_block(&self) -> Self {
        ParagraphFormat {
            margin_top: None,
            margin_right: None,
            margin_bottom: None,
            margin_left: None,
            ..self.clone()
        }
    }

    /// Whether whitespace-only text is visible in this paragraph.
    pub fn preserves_whitespace(&self) -> bool {
        matches!(
            self.white_space.as_deref(),
            Some("pre") | Some("pre-wrap") | Some("break-spaces")
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub href: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

/// Inline format of a segment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentFormat {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub bold: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub italic: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub underline: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub strikethrough: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub superscript: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub subscript: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<Link>,
}

impl SegmentFormat {
    pub fn set_superscript(&mut self, on: bool) {
        self.superscript = on;
        if on {
            self.subscript = false;
        }
    }

    pub fn set_subscript(&mut self, on: bool) {
        self.subscript = on;
        if on {
            self.superscript = false;
        }
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripts_are_exclusive() {
        let mut format = SegmentFormat::default();
        format.set_superscript(true);
        format.set_subscript(true);
        assert!(format.subscript);
        assert!(!format.superscript);
    }

    #[test]
    fn test_nested_block_drops_margins_only() {
        let format = ParagraphFormat {
            margin_left: Some("40px".to_string()),
            alignment: Some(Alignment::Center),
            background_color: Some("yellow".to_string()),
            ..Default::default()
        };
        let nested = format.for_nested_block();
        assert_eq!(nested.margin_left, None);
        assert_eq!(nested.alignment, Some(Alignment::Center));
        assert_eq!(nested.background_color.as_deref(), Some("yellow"));
    }

    #[test]
    fn test_default_segment_format_serializes_empty() {
        let json = serde_json::to_string(&SegmentFormat::default()).unwrap();
        assert_eq!(json, "{}");
    }
}
