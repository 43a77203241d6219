//! Format resolution
//!
//! Effective formats are computed from three inputs: the format inherited
//! from the enclosing scope, the defaults implied by the element's tag, and
//! the element's explicit inline style. The work is done by an ordered list of
//! per-attribute handlers (see [`segment::SEGMENT_HANDLERS`] and
//! [`paragraph::PARAGRAPH_HANDLERS`]). Each handler reads one attribute:
//!
//! 1. an explicit style value wins, including explicit negation
//!    (`font-weight: normal` under a bold ancestor);
//! 2. otherwise the tag default applies;
//! 3. otherwise the inherited value is left untouched.
//!
//! The same handler lists write formats back out when serializing, so both
//! directions agree on which properties exist and in what order.

pub mod paragraph;
pub mod segment;
pub mod tags;

pub use paragraph::paragraph_style;
pub use segment::{segment_decorations, SegmentDecorations, Wrapper};

use crate::dom::{Element, Style};
use crate::model::{ParagraphFormat, SegmentFormat};
use log::{log_enabled, trace, Level};

/// Attribute lookup for one element: explicit style first, tag default second.
pub struct StyleLookup<'a> {
    element: &'a Element,
    defaults: &'a Style,
}

impl<'a> StyleLookup<'a> {
    pub fn new(element: &'a Element, defaults: &'a Style) -> Self {
        StyleLookup { element, defaults }
    }

    /// Value of a style property, or `None` when neither the element nor its
    /// tag specifies one.
    pub fn get(&self, name: &str) -> Option<&'a str> {
        self.element
            .style
            .get(name)
            .or_else(|| self.defaults.get(name))
            .map(str::trim)
    }

    pub fn attribute(&self, name: &str) -> Option<&'a str> {
        self.element.attribute(name)
    }

    pub fn tag(&self) -> &'a str {
        &self.element.tag
    }
}

/// Resolve the segment format of `element` given the inherited format.
pub fn resolve_segment_format(element: &Element, inherited: &SegmentFormat) -> SegmentFormat {
    let defaults = tags::default_style(element);
    resolve_segment_with(&defaults, element, inherited)
}

/// Resolve the paragraph format of `element` given the inherited format.
pub fn resolve_paragraph_format(
    element: &Element,
    inherited: &ParagraphFormat,
) -> ParagraphFormat {
    let defaults = tags::default_style(element);
    resolve_paragraph_with(&defaults, element, inherited)
}

/// Segment resolution with caller-supplied tag defaults.
pub fn resolve_segment_with(
    defaults: &Style,
    element: &Element,
    inherited: &SegmentFormat,
) -> SegmentFormat {
    let lookup = StyleLookup::new(element, defaults);
    let mut format = inherited.clone();
    for handler in segment::SEGMENT_HANDLERS {
        apply(handler.name, element, &mut format, |format| {
            (handler.parse)(format, &lookup)
        });
    }
    format
}

/// Paragraph resolution with caller-supplied tag defaults.
pub fn resolve_paragraph_with(
    defaults: &Style,
    element: &Element,
    inherited: &ParagraphFormat,
) -> ParagraphFormat {
    let lookup = StyleLookup::new(element, defaults);
    let mut format = inherited.clone();
    for handler in paragraph::PARAGRAPH_HANDLERS {
        apply(handler.name, element, &mut format, |format| {
            (handler.parse)(format, &lookup)
        });
    }
    format
}

/// Run one handler, tracing the attributes an element changes.
fn apply<F: Clone + PartialEq>(
    name: &str,
    element: &Element,
    format: &mut F,
    parse: impl FnOnce(&mut F),
) {
    if !log_enabled!(Level::Trace) {
        parse(format);
        return;
    }
    let before = format.clone();
    parse(format);
    if *format != before {
        trace!("<{}> sets {}", element.tag, name);
    }
}
