//! JSON format
//!
//! The content model serialized with serde. Parsing reads the same shape
//! back, so a model can be stored and reloaded without going through markup.

use crate::error::FormatError;
use crate::format::Format;
use crate::model::ContentModel;

/// Format implementation for the JSON model dump
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormat;

impl Format for JsonFormat {
    fn name(&self) -> &str {
        "json"
    }

    fn description(&self) -> &str {
        "Content model as JSON"
    }

    fn file_extensions(&self) -> &[&str] {
        &["json"]
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn parse(&self, source: &str) -> Result<ContentModel, FormatError> {
        serde_json::from_str(source)
            .map_err(|e| FormatError::ParseError(format!("Invalid content model JSON: {e}")))
    }

    fn serialize(&self, model: &ContentModel) -> Result<String, FormatError> {
        serde_json::to_string_pretty(model)
            .map_err(|e| FormatError::SerializationError(format!("JSON serialization failed: {e}")))
    }
}
