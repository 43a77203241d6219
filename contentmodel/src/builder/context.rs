//! Format context threaded through the walk

use crate::dom::Element;
use crate::model::{ParagraphFormat, SegmentFormat};
use crate::resolver::{resolve_paragraph_format, resolve_segment_format};

/// Formats in effect at a point of the walk.
///
/// A context is never mutated once built: entering an element derives a new
/// context, which is dropped when the element has been walked.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormatContext {
    pub paragraph: ParagraphFormat,
    pub segment: SegmentFormat,
}

impl FormatContext {
    /// Context inside a block element.
    pub fn for_block(&self, element: &Element) -> Self {
        FormatContext {
            paragraph: resolve_paragraph_format(element, &self.paragraph.for_nested_block()),
            segment: resolve_segment_format(element, &self.segment),
        }
    }

    /// Context inside an element that becomes its own block group. The
    /// group's wrapper element carries its box, so margins are not passed on
    /// to the paragraphs inside.
    pub fn for_group(&self, element: &Element) -> Self {
        let inner = self.for_block(element);
        FormatContext {
            paragraph: inner.paragraph.for_nested_block(),
            segment: inner.segment,
        }
    }

    /// Context inside an inline element: only the segment format changes.
    pub fn for_inline(&self, element: &Element) -> Self {
        FormatContext {
            paragraph: self.paragraph.clone(),
            segment: resolve_segment_format(element, &self.segment),
        }
    }
}
