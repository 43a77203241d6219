//! HTML format implementation
//!
//! Bidirectional conversion between HTML and the content model.
//!
//! # Library Choice
//!
//! We use the `html5ever` + `markup5ever_rcdom` pair for both directions:
//! - `html5ever`: browser-grade HTML5 parser and serializer
//! - `markup5ever_rcdom`: reference-counted DOM tree the parser fills in
//!
//! Parsing goes rcdom → [`SourceNode`](crate::dom::SourceNode) so the builder
//! works on an owned tree. Serialization goes the other way through
//! [`RcDomFactory`].
//!
//! # Element Mapping Table
//!
//! | Model entity     | HTML emitted                         | HTML accepted                                  |
//! |------------------|--------------------------------------|------------------------------------------------|
//! | Paragraph        | `<div style="...">`                  | `p`, `div` and any other block element         |
//! | Quote group      | `<blockquote>`                       | `blockquote`                                   |
//! | Code group       | `<pre>`                              | `pre`                                          |
//! | Header group     | `<h1>`..`<h6>`                       | `h1`..`h6`                                     |
//! | List             | `<ul>`/`<ol>` with `<li>` items      | `ul`, `ol`, `li`                               |
//! | Table            | `<table><tr><td>` with spans         | `table`, sections, `tr`, `td`, `th`            |
//! | Entity           | shell re-emitted as is               | elements carrying a `data-entity` attribute    |
//! | Segments:        |                                      |                                                |
//! |   Text           | `<span style="...">` in wrappers     | text nodes, formatted by their ancestors       |
//! |   Bold/Italic    | `<b>`, `<i>`                         | `b`, `strong`, `i`, `em`, `font-weight`, ...   |
//! |   Underline/Strike | `<u>`, `<s>`                       | `u`, `s`, `strike`, `del`, `text-decoration`   |
//! |   Script         | `<sup>`, `<sub>`                     | `sup`, `sub`, `vertical-align`                 |
//! |   Link           | `<a href target>`                    | `a[href]`                                      |
//! |   Image          | `<img>`                              | `img`                                          |
//! |   Br             | `<br>`                               | `br`                                           |
//!
//! # Lossy Conversions
//!
//! - Semantic tags collapse into their formats: `<strong>` comes back as `<b>`.
//! - Paragraph elements come back as `div`.
//! - Ragged rows come back padded with empty cells.
//! - Comments and processing instructions are dropped.

mod parser;
mod serializer;

pub use parser::parse_html;
pub use serializer::{serialize_html, to_html, RcDomFactory};

use crate::builder::{build_model_with_options, BuildOptions};
use crate::error::FormatError;
use crate::format::{bool_param, check_params, Format};
use crate::model::ContentModel;
use crate::serializer::SerializeOptions;
use std::collections::HashMap;

/// Format implementation for HTML
#[derive(Debug, Clone, Default)]
pub struct HtmlFormat {
    build: BuildOptions,
    serialize: SerializeOptions,
}

impl HtmlFormat {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(build: BuildOptions, serialize: SerializeOptions) -> Self {
        HtmlFormat { build, serialize }
    }
}

impl Format for HtmlFormat {
    fn name(&self) -> &str {
        "html"
    }

    fn description(&self) -> &str {
        "HTML fragments with inline styles"
    }

    fn file_extensions(&self) -> &[&str] {
        &["html", "htm"]
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn parse(&self, source: &str) -> Result<ContentModel, FormatError> {
        let root = parse_html(source)?;
        Ok(build_model_with_options(&root, None, &self.build))
    }

    fn serialize(&self, model: &ContentModel) -> Result<String, FormatError> {
        to_html(model, &self.serialize)
    }

    fn serialize_with_options(
        &self,
        model: &ContentModel,
        options: &HashMap<String, String>,
    ) -> Result<String, FormatError> {
        check_params(self.name(), options, &["placeholder"])?;
        let mut serialize = self.serialize.clone();
        if let Some(placeholder) = bool_param(options, "placeholder")? {
            serialize.empty_paragraph_placeholder = placeholder;
        }
        to_html(model, &serialize)
    }
}
