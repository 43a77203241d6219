//! Format implementations
//!
//! Each format converts between a text representation and the content
//! model. HTML goes through the builder and serializer; JSON is a direct serde
//! dump; treeviz is a read-only view for inspection.

pub mod html;
pub mod icons;
pub mod json;
pub mod treeviz;

pub use html::HtmlFormat;
pub use json::JsonFormat;
pub use treeviz::{TreevizFormat, TreevizOptions};
