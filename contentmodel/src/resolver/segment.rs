//! Segment format handlers

use super::StyleLookup;
use crate::dom::Style;
use crate::model::{Link, SegmentFormat};

/// Write-back stage of a segment handler. Stages run in declaration order:
/// style properties land on the leaf, then each later stage wraps the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Style,
    Link,
    Script,
    Emphasis,
}

/// An element wrapped around a serialized segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wrapper {
    pub tag: &'static str,
    pub attributes: Vec<(&'static str, String)>,
}

impl Wrapper {
    fn new(tag: &'static str) -> Self {
        Wrapper {
            tag,
            attributes: Vec::new(),
        }
    }
}

/// How a segment format is expressed in an output tree: inline style on the
/// leaf plus wrappers, innermost first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SegmentDecorations {
    pub style: Style,
    pub wrappers: Vec<Wrapper>,
}

pub struct SegmentHandler {
    pub name: &'static str,
    pub stage: Stage,
    pub parse: fn(&mut SegmentFormat, &StyleLookup<'_>),
    pub write_back: fn(&SegmentFormat, &mut SegmentDecorations),
}

/// Segment handlers in resolution order.
pub static SEGMENT_HANDLERS: &[SegmentHandler] = &[
    SegmentHandler {
        name: "fontFamily",
        stage: Stage::Style,
        parse: |format, lookup| {
            if let Some(value) = lookup.get("font-family") {
                format.font_family = Some(value.to_string());
            }
        },
        write_back: |format, out| {
            if let Some(value) = &format.font_family {
                out.style.set("font-family", value.as_str());
            }
        },
    },
    SegmentHandler {
        name: "fontSize",
        stage: Stage::Style,
        parse: |format, lookup| {
            if let Some(value) = lookup.get("font-size") {
                format.font_size = Some(value.to_string());
            }
        },
        write_back: |format, out| {
            if let Some(value) = &format.font_size {
                out.style.set("font-size", value.as_str());
            }
        },
    },
    SegmentHandler {
        name: "textColor",
        stage: Stage::Style,
        parse: |format, lookup| {
            if let Some(value) = lookup.get("color") {
                format.text_color = Some(value.to_string());
            }
        },
        write_back: |format, out| {
            if let Some(value) = &format.text_color {
                out.style.set("color", value.as_str());
            }
        },
    },
    SegmentHandler {
        name: "backgroundColor",
        stage: Stage::Style,
        parse: |format, lookup| {
            if let Some(value) = lookup.get("background-color") {
                format.background_color = Some(value.to_string());
            }
        },
        write_back: |format, out| {
            if let Some(value) = &format.background_color {
                out.style.set("background-color", value.as_str());
            }
        },
    },
    SegmentHandler {
        name: "bold",
        stage: Stage::Emphasis,
        parse: |format, lookup| {
            if let Some(bold) = lookup.get("font-weight").and_then(parse_font_weight) {
                format.bold = bold;
            }
        },
        write_back: |format, out| {
            if format.bold {
                out.wrappers.push(Wrapper::new("b"));
            }
        },
    },
    SegmentHandler {
        name: "italic",
        stage: Stage::Emphasis,
        parse: |format, lookup| match lookup.get("font-style") {
            Some("italic") | Some("oblique") => format.italic = true,
            Some("normal") | Some("initial") => format.italic = false,
            _ => {}
        },
        write_back: |format, out| {
            if format.italic {
                out.wrappers.push(Wrapper::new("i"));
            }
        },
    },
    SegmentHandler {
        name: "underline",
        stage: Stage::Emphasis,
        parse: |format, lookup| {
            if let Some(on) = decoration(lookup, "underline") {
                format.underline = on;
            }
        },
        write_back: |format, out| {
            if format.underline {
                out.wrappers.push(Wrapper::new("u"));
            }
        },
    },
    SegmentHandler {
        name: "strikethrough",
        stage: Stage::Emphasis,
        parse: |format, lookup| {
            if let Some(on) = decoration(lookup, "line-through") {
                format.strikethrough = on;
            }
        },
        write_back: |format, out| {
            if format.strikethrough {
                out.wrappers.push(Wrapper::new("s"));
            }
        },
    },
    SegmentHandler {
        name: "superOrSubScript",
        stage: Stage::Script,
        parse: |format, lookup| match lookup.get("vertical-align") {
            Some("super") => format.set_superscript(true),
            Some("sub") => format.set_subscript(true),
            Some("baseline") => {
                format.superscript = false;
                format.subscript = false;
            }
            _ => {}
        },
        write_back: |format, out| {
            if format.superscript {
                out.wrappers.push(Wrapper::new("sup"));
            } else if format.subscript {
                out.wrappers.push(Wrapper::new("sub"));
            }
        },
    },
    SegmentHandler {
        name: "link",
        stage: Stage::Link,
        parse: |format, lookup| {
            if lookup.tag() != "a" {
                return;
            }
            if let Some(href) = lookup.attribute("href").filter(|href| !href.is_empty()) {
                format.link = Some(Link {
                    href: href.to_string(),
                    target: lookup.attribute("target").map(str::to_string),
                });
            }
        },
        write_back: |format, out| {
            if let Some(link) = &format.link {
                let mut wrapper = Wrapper::new("a");
                wrapper.attributes.push(("href", link.href.clone()));
                if let Some(target) = &link.target {
                    wrapper.attributes.push(("target", target.clone()));
                }
                out.wrappers.push(wrapper);
            }
        },
    },
];

fn parse_font_weight(value: &str) -> Option<bool> {
    match value {
        "bold" | "bolder" => Some(true),
        "normal" | "lighter" | "initial" => Some(false),
        numeric => numeric.parse::<u32>().ok().map(|weight| weight >= 600),
    }
}

/// `Some(true)` when the decoration line is listed, `Some(false)` for an
/// explicit `none`, otherwise no opinion.
fn decoration(lookup: &StyleLookup<'_>, line: &str) -> Option<bool> {
    let value = lookup
        .get("text-decoration-line")
        .or_else(|| lookup.get("text-decoration"))?;
    if value.split_whitespace().any(|part| part == line) {
        Some(true)
    } else if value.split_whitespace().any(|part| part == "none") {
        Some(false)
    } else {
        None
    }
}

/// Express a segment format as leaf style plus wrappers, in stage order.
pub fn segment_decorations(format: &SegmentFormat) -> SegmentDecorations {
    let mut out = SegmentDecorations::default();
    for stage in [Stage::Style, Stage::Link, Stage::Script, Stage::Emphasis] {
        for handler in SEGMENT_HANDLERS.iter().filter(|h| h.stage == stage) {
            (handler.write_back)(format, &mut out);
        }
    }
    out
}
