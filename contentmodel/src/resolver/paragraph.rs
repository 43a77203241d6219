//! Paragraph format handlers

use super::StyleLookup;
use crate::dom::Style;
use crate::model::{Alignment, Direction, ParagraphFormat};

pub struct ParagraphHandler {
    pub name: &'static str,
    pub parse: fn(&mut ParagraphFormat, &StyleLookup<'_>),
    pub write_back: fn(&ParagraphFormat, &mut Style),
}

/// Paragraph handlers in resolution order. Direction precedes alignment so
/// that `start`/`end` resolve against the paragraph's own direction.
pub static PARAGRAPH_HANDLERS: &[ParagraphHandler] = &[
    ParagraphHandler {
        name: "backgroundColor",
        parse: |format, lookup| {
            if let Some(value) = lookup.get("background-color") {
                format.background_color = Some(value.to_string());
            }
        },
        write_back: |format, style| {
            if let Some(value) = &format.background_color {
                style.set("background-color", value.as_str());
            }
        },
    },
    ParagraphHandler {
        name: "direction",
        parse: |format, lookup| {
            let value = lookup.get("direction").or_else(|| lookup.attribute("dir"));
            match value.map(str::to_ascii_lowercase).as_deref() {
                Some("rtl") => format.direction = Some(Direction::Rtl),
                Some("ltr") => format.direction = Some(Direction::Ltr),
                _ => {}
            }
        },
        write_back: |format, style| {
            if let Some(direction) = format.direction {
                style.set("direction", direction.as_str());
            }
        },
    },
    ParagraphHandler {
        name: "alignment",
        parse: |format, lookup| {
            let rtl = format.direction == Some(Direction::Rtl);
            let alignment = match lookup.get("text-align") {
                Some("left") => Some(Alignment::Left),
                Some("right") => Some(Alignment::Right),
                Some("center") => Some(Alignment::Center),
                Some("justify") => Some(Alignment::Justify),
                Some("start") if rtl => Some(Alignment::Right),
                Some("start") => Some(Alignment::Left),
                Some("end") if rtl => Some(Alignment::Left),
                Some("end") => Some(Alignment::Right),
                // unknown values keep the inherited alignment
                _ => None,
            };
            if alignment.is_some() {
                format.alignment = alignment;
            }
        },
        write_back: |format, style| {
            if let Some(alignment) = format.alignment {
                style.set("text-align", alignment.as_str());
            }
        },
    },
    ParagraphHandler {
        name: "margin",
        parse: |format, lookup| {
            let sides = [
                ("margin-top", &mut format.margin_top),
                ("margin-right", &mut format.margin_right),
                ("margin-bottom", &mut format.margin_bottom),
                ("margin-left", &mut format.margin_left),
            ];
            for (name, slot) in sides {
                if let Some(value) = lookup.get(name) {
                    *slot = Some(value.to_string());
                }
            }
        },
        write_back: |format, style| {
            let sides = [
                ("margin-top", &format.margin_top),
                ("margin-right", &format.margin_right),
                ("margin-bottom", &format.margin_bottom),
                ("margin-left", &format.margin_left),
            ];
            for (name, value) in sides {
                if let Some(value) = value {
                    style.set(name, value.as_str());
                }
            }
        },
    },
    ParagraphHandler {
        name: "indentation",
        parse: |format, lookup| {
            if let Some(value) = lookup.get("text-indent") {
                format.indentation = Some(value.to_string());
            }
        },
        write_back: |format, style| {
            if let Some(value) = &format.indentation {
                style.set("text-indent", value.as_str());
            }
        },
    },
    ParagraphHandler {
        name: "lineHeight",
        parse: |format, lookup| {
            if let Some(value) = lookup.get("line-height") {
                format.line_height = Some(value.to_string());
            }
        },
        write_back: |format, style| {
            if let Some(value) = &format.line_height {
                style.set("line-height", value.as_str());
            }
        },
    },
    ParagraphHandler {
        name: "whiteSpace",
        parse: |format, lookup| {
            if let Some(value) = lookup.get("white-space") {
                format.white_space = Some(value.to_string());
            }
        },
        write_back: |format, style| {
            if let Some(value) = &format.white_space {
                style.set("white-space", value.as_str());
            }
        },
    },
];

/// Inline style expressing a paragraph format.
pub fn paragraph_style(format: &ParagraphFormat) -> Style {
    let mut style = Style::new();
    for handler in PARAGRAPH_HANDLERS {
        (handler.write_back)(format, &mut style);
    }
    style
}
