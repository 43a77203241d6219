//! Static tag registry
//!
//! Maps a lowercase tag name to how the builder treats the element and which
//! style the tag implies when the element does not say otherwise. The table is
//! built once and never mutated.

use crate::dom::{Element, Style};
use crate::model::ListKind;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Builder dispatch category of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementClass {
    /// Generic element; block or inline is decided by its effective display.
    Generic,
    LineBreak,
    Image,
    Table,
    Quote,
    Code,
    Header(u8),
    List(ListKind),
    /// Replaced or interactive content kept as an opaque segment.
    Opaque,
    /// Non-rendered content.
    Ignored,
}

/// Resolved classification of a concrete element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Block,
    Inline,
    LineBreak,
    Image,
    Table,
    Quote,
    Code,
    Header(u8),
    List(ListKind),
    Opaque,
    Ignored,
    Entity { block: bool },
}

#[derive(Debug)]
pub struct TagInfo {
    pub class: ElementClass,
    pub defaults: &'static [(&'static str, &'static str)],
}

const BLOCK: &[(&str, &str)] = &[("display", "block")];
const NONE: &[(&str, &str)] = &[];

static TAGS: Lazy<HashMap<&'static str, TagInfo>> = Lazy::new(|| {
    use ElementClass::*;

    let mut tags = HashMap::new();

    register(
        &mut tags,
        &[
            "html", "body", "div", "article", "aside", "section", "header", "footer", "main",
            "nav", "form", "fieldset", "figure", "figcaption", "dt", "details", "summary",
            "caption",
        ],
        Generic,
        BLOCK,
    );
    register(
        &mut tags,
        &["p"],
        Generic,
        &[("display", "block"), ("margin-top", "1em"), ("margin-bottom", "1em")],
    );
    register(
        &mut tags,
        &["dl"],
        Generic,
        &[("display", "block"), ("margin-top", "1em"), ("margin-bottom", "1em")],
    );
    register(&mut tags, &["dd"], Generic, &[("display", "block"), ("margin-left", "40px")]);
    register(&mut tags, &["center"], Generic, &[("display", "block"), ("text-align", "center")]);
    register(&mut tags, &["address"], Generic, &[("display", "block"), ("font-style", "italic")]);
    register(&mut tags, &["li"], Generic, &[("display", "list-item")]);

    register(&mut tags, &["span", "label", "abbr", "cite", "q", "small", "font"], Generic, NONE);
    register(&mut tags, &["a"], Generic, NONE);
    register(&mut tags, &["b", "strong"], Generic, &[("font-weight", "bold")]);
    register(&mut tags, &["i", "em", "var", "dfn"], Generic, &[("font-style", "italic")]);
    register(&mut tags, &["u", "ins"], Generic, &[("text-decoration", "underline")]);
    register(&mut tags, &["s", "strike", "del"], Generic, &[("text-decoration", "line-through")]);
    register(&mut tags, &["sub"], Generic, &[("vertical-align", "sub"), ("font-size", "smaller")]);
    register(&mut tags, &["sup"], Generic, &[("vertical-align", "super"), ("font-size", "smaller")]);
    register(&mut tags, &["code", "kbd", "samp", "tt"], Generic, &[("font-family", "monospace")]);
    register(&mut tags, &["mark"], Generic, &[("background-color", "yellow")]);

    register(&mut tags, &["br"], LineBreak, NONE);
    register(&mut tags, &["img"], Image, NONE);
    register(&mut tags, &["table"], Table, BLOCK);
    register(
        &mut tags,
        &["blockquote"],
        Quote,
        &[
            ("display", "block"),
            ("margin-top", "1em"),
            ("margin-bottom", "1em"),
            ("margin-left", "40px"),
            ("margin-right", "40px"),
        ],
    );
    register(
        &mut tags,
        &["pre"],
        Code,
        &[("display", "block"), ("white-space", "pre"), ("font-family", "monospace")],
    );
    register(&mut tags, &["h1"], Header(1), &[("display", "block"), ("font-weight", "bold"), ("font-size", "2em")]);
    register(&mut tags, &["h2"], Header(2), &[("display", "block"), ("font-weight", "bold"), ("font-size", "1.5em")]);
    register(&mut tags, &["h3"], Header(3), &[("display", "block"), ("font-weight", "bold"), ("font-size", "1.17em")]);
    register(&mut tags, &["h4"], Header(4), &[("display", "block"), ("font-weight", "bold"), ("font-size", "1em")]);
    register(&mut tags, &["h5"], Header(5), &[("display", "block"), ("font-weight", "bold"), ("font-size", "0.83em")]);
    register(&mut tags, &["h6"], Header(6), &[("display", "block"), ("font-weight", "bold"), ("font-size", "0.67em")]);
    register(&mut tags, &["ul"], List(ListKind::Unordered), BLOCK);
    register(&mut tags, &["ol"], List(ListKind::Ordered), BLOCK);

    // table internals, resolved through the table handler
    register(&mut tags, &["thead", "tbody", "tfoot", "tr", "td"], Generic, BLOCK);
    register(&mut tags, &["th"], Generic, &[("display", "block"), ("font-weight", "bold"), ("text-align", "center")]);

    register(
        &mut tags,
        &[
            "hr", "input", "iframe", "video", "audio", "canvas", "svg", "object", "embed",
            "select", "textarea", "button", "math",
        ],
        Opaque,
        NONE,
    );
    register(
        &mut tags,
        &["script", "style", "template", "noscript", "head", "meta", "link", "title"],
        Ignored,
        NONE,
    );

    tags
});

fn register(
    tags: &mut HashMap<&'static str, TagInfo>,
    names: &[&'static str],
    class: ElementClass,
    defaults: &'static [(&'static str, &'static str)],
) {
    for name in names {
        tags.insert(*name, TagInfo { class, defaults });
    }
}

const LEGACY_FONT_SIZES: [&str; 7] = ["10px", "13px", "16px", "18px", "24px", "32px", "48px"];

pub fn tag_info(tag: &str) -> Option<&'static TagInfo> {
    TAGS.get(tag)
}

/// Style implied by the element's tag and legacy presentational attributes.
pub fn default_style(element: &Element) -> Style {
    let mut style = tag_info(&element.tag)
        .map(|info| Style::from_pairs(info.defaults))
        .unwrap_or_default();

    if element.tag == "font" {
        if let Some(face) = element.attribute("face") {
            style.set("font-family", face);
        }
        if let Some(size) = element.attribute("size").and_then(legacy_font_size) {
            style.set("font-size", size);
        }
        if let Some(color) = element.attribute("color") {
            style.set("color", color);
        }
    }
    style
}

/// `<font size>` accepts 1 to 7, or a signed offset from the default size 3.
fn legacy_font_size(value: &str) -> Option<&'static str> {
    let value = value.trim();
    let size = if value.starts_with('+') || value.starts_with('-') {
        3i32.saturating_add(value.parse::<i32>().ok()?)
    } else {
        value.parse::<i32>().ok()?
    };
    let index = (size.clamp(1, 7) - 1) as usize;
    Some(LEGACY_FONT_SIZES[index])
}

fn is_block_display(display: &str) -> bool {
    matches!(display, "block" | "flex" | "grid" | "list-item" | "table")
}

/// Classify an element for the builder.
///
/// Elements marked with `data-entity` become entities. Generic and
/// unregistered elements fall back to their effective display: the explicit
/// `display` style, else the tag default, else inline.
pub fn classify(element: &Element) -> Classification {
    let class = tag_info(&element.tag).map_or(ElementClass::Generic, |info| info.class);
    let display = element.style.get("display").map(str::to_ascii_lowercase).or_else(|| {
        tag_info(&element.tag).and_then(|info| {
            info.defaults
                .iter()
                .find(|(name, _)| *name == "display")
                .map(|(_, value)| value.to_string())
        })
    });
    let is_block = display.as_deref().is_some_and(is_block_display);

    if element.has_attribute("data-entity") && class != ElementClass::Ignored {
        return Classification::Entity { block: is_block };
    }

    match class {
        ElementClass::Generic if is_block => Classification::Block,
        ElementClass::Generic => Classification::Inline,
        ElementClass::LineBreak => Classification::LineBreak,
        ElementClass::Image => Classification::Image,
        ElementClass::Table => Classification::Table,
        ElementClass::Quote => Classification::Quote,
        ElementClass::Code => Classification::Code,
        ElementClass::Header(level) => Classification::Header(level),
        ElementClass::List(kind) => Classification::List(kind),
        ElementClass::Opaque => Classification::Opaque,
        ElementClass::Ignored => Classification::Ignored,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registered_classes() {
        assert_eq!(classify(&Element::new("div")), Classification::Block);
        assert_eq!(classify(&Element::new("p")), Classification::Block);
        assert_eq!(classify(&Element::new("li")), Classification::Block);
        assert_eq!(classify(&Element::new("b")), Classification::Inline);
        assert_eq!(classify(&Element::new("br")), Classification::LineBreak);
        assert_eq!(classify(&Element::new("h3")), Classification::Header(3));
        assert_eq!(
            classify(&Element::new("ol")),
            Classification::List(ListKind::Ordered)
        );
        assert_eq!(classify(&Element::new("video")), Classification::Opaque);
        assert_eq!(classify(&Element::new("script")), Classification::Ignored);
    }

    #[test]
    fn test_display_fallback() {
        assert_eq!(classify(&Element::new("custom-tag")), Classification::Inline);
        assert_eq!(
            classify(&Element::new("custom-tag").with_style("display: flex")),
            Classification::Block
        );
        assert_eq!(
            classify(&Element::new("span").with_style("display: block")),
            Classification::Block
        );
        assert_eq!(
            classify(&Element::new("div").with_style("display: inline-block")),
            Classification::Inline
        );
    }

    #[test]
    fn test_entity_marker() {
        let inline = Element::new("span").with_attribute("data-entity", "mention");
        assert_eq!(classify(&inline), Classification::Entity { block: false });
        let block = Element::new("div").with_attribute("data-entity", "card");
        assert_eq!(classify(&block), Classification::Entity { block: true });
    }

    #[test]
    fn test_font_legacy_attributes() {
        let font = Element::new("font")
            .with_attribute("face", "Arial")
            .with_attribute("size", "9")
            .with_attribute("color", "#f00");
        let style = default_style(&font);
        assert_eq!(style.get("font-family"), Some("Arial"));
        assert_eq!(style.get("font-size"), Some("48px"));
        assert_eq!(style.get("color"), Some("#f00"));

        let relative = Element::new("font").with_attribute("size", "-1");
        assert_eq!(default_style(&relative).get("font-size"), Some("13px"));
    }

    #[test]
    fn test_font_size_extreme_offsets_clamp() {
        let huge = Element::new("font").with_attribute("size", "+2147483647");
        assert_eq!(default_style(&huge).get("font-size"), Some("48px"));

        let tiny = Element::new("font").with_attribute("size", "-2147483648");
        assert_eq!(default_style(&tiny).get("font-size"), Some("10px"));

        let garbage = Element::new("font").with_attribute("size", "+99999999999");
        assert_eq!(default_style(&garbage).get("font-size"), None);
    }

    #[test]
    fn test_tag_defaults() {
        assert_eq!(default_style(&Element::new("b")).get("font-weight"), Some("bold"));
        assert_eq!(default_style(&Element::new("center")).get("text-align"), Some("center"));
        assert!(default_style(&Element::new("unknown")).is_empty());
    }
}
