//! Format trait definition
//!
//! A format converts between a textual representation and a [`ContentModel`].
//! Formats can support parsing, serialization, or both.

use crate::error::FormatError;
use crate::model::ContentModel;
use std::collections::HashMap;

/// Trait for content formats
///
/// # Examples
///
/// ```ignore
/// struct MyFormat;
///
/// impl Format for MyFormat {
///     fn name(&self) -> &str {
///         "my-format"
///     }
///
///     fn supports_serialization(&self) -> bool {
///         true
///     }
///
///     fn serialize(&self, model: &ContentModel) -> Result<String, FormatError> {
///         Ok(format!("{} blocks", model.document.blocks.len()))
///     }
/// }
/// ```
pub trait Format: Send + Sync {
    /// The name of this format (e.g., "html", "json")
    fn name(&self) -> &str;

    fn description(&self) -> &str {
        ""
    }

    /// File extensions without the leading dot, used to detect the format
    /// from a filename.
    fn file_extensions(&self) -> &[&str] {
        &[]
    }

    /// Whether this format supports parsing (source → model)
    fn supports_parsing(&self) -> bool {
        false
    }

    /// Whether this format supports serialization (model → source)
    fn supports_serialization(&self) -> bool {
        false
    }

    fn parse(&self, _source: &str) -> Result<ContentModel, FormatError> {
        Err(FormatError::NotSupported(format!(
            "Format '{}' does not support parsing",
            self.name()
        )))
    }

    fn serialize(&self, _model: &ContentModel) -> Result<String, FormatError> {
        Err(FormatError::NotSupported(format!(
            "Format '{}' does not support serialization",
            self.name()
        )))
    }

    /// Serialize with format-specific parameters.
    ///
    /// The default implementation only accepts an empty parameter map.
    fn serialize_with_options(
        &self,
        model: &ContentModel,
        options: &HashMap<String, String>,
    ) -> Result<String, FormatError> {
        if options.is_empty() {
            self.serialize(model)
        } else {
            Err(FormatError::NotSupported(format!(
                "Format '{}' does not support extra parameters",
                self.name()
            )))
        }
    }
}

/// Read a boolean parameter. Accepts `true/false`, `1/0`, `yes/no`.
pub fn bool_param(
    options: &HashMap<String, String>,
    key: &str,
) -> Result<Option<bool>, FormatError> {
    let Some(raw) = options.get(key) else {
        return Ok(None);
    };
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "y" => Ok(Some(true)),
        "false" | "0" | "no" | "n" => Ok(Some(false)),
        other => Err(FormatError::SerializationError(format!(
            "Invalid boolean value '{other}' for parameter '{key}'"
        ))),
    }
}

/// Reject parameters a format does not know.
pub fn check_params(
    format: &str,
    options: &HashMap<String, String>,
    known: &[&str],
) -> Result<(), FormatError> {
    let mut unknown: Vec<&str> = options
        .keys()
        .map(String::as_str)
        .filter(|key| !known.contains(key))
        .collect();
    unknown.sort_unstable();
    match unknown.first() {
        Some(key) => Err(FormatError::NotSupported(format!(
            "Format '{format}' has no parameter '{key}'"
        ))),
        None => Ok(()),
    }
}
