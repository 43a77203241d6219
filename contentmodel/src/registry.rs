//! Format registry for format discovery and selection
//!
//! Formats are registered and retrieved by name.

use crate::error::FormatError;
use crate::format::Format;
use crate::model::ContentModel;
use std::collections::HashMap;

/// Registry of content formats
///
/// # Examples
///
/// ```ignore
/// let registry = FormatRegistry::default();
/// let model = registry.parse("<p>hi</p>", "html")?;
/// let tree = registry.serialize(&model, "treeviz")?;
/// ```
pub struct FormatRegistry {
    formats: HashMap<String, Box<dyn Format>>,
}

impl FormatRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        FormatRegistry {
            formats: HashMap::new(),
        }
    }

    /// Register a format. A format with the same name is replaced.
    pub fn register<F: Format + 'static>(&mut self, format: F) {
        self.formats
            .insert(format.name().to_string(), Box::new(format));
    }

    pub fn get(&self, name: &str) -> Result<&dyn Format, FormatError> {
        self.formats
            .get(name)
            .map(|f| f.as_ref())
            .ok_or_else(|| FormatError::FormatNotFound(name.to_string()))
    }

    pub fn has(&self, name: &str) -> bool {
        self.formats.contains_key(name)
    }

    /// List all available format names (sorted)
    pub fn list_formats(&self) -> Vec<String> {
        let mut names: Vec<_> = self.formats.keys().cloned().collect();
        names.sort();
        names
    }

    /// Detect a format from the extension of `filename`.
    pub fn detect_format_from_filename(&self, filename: &str) -> Option<String> {
        let extension = std::path::Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())?
            .to_ascii_lowercase();

        self.formats
            .values()
            .find(|format| format.file_extensions().contains(&extension.as_str()))
            .map(|format| format.name().to_string())
    }

    /// Parse source text using the specified format
    pub fn parse(&self, source: &str, format: &str) -> Result<ContentModel, FormatError> {
        let fmt = self.get(format)?;
        if !fmt.supports_parsing() {
            return Err(FormatError::NotSupported(format!(
                "Format '{format}' does not support parsing"
            )));
        }
        fmt.parse(source)
    }

    /// Serialize a model using the specified format
    pub fn serialize(&self, model: &ContentModel, format: &str) -> Result<String, FormatError> {
        self.serialize_with_options(model, format, &HashMap::new())
    }

    pub fn serialize_with_options(
        &self,
        model: &ContentModel,
        format: &str,
        options: &HashMap<String, String>,
    ) -> Result<String, FormatError> {
        let fmt = self.get(format)?;
        if !fmt.supports_serialization() {
            return Err(FormatError::NotSupported(format!(
                "Format '{format}' does not support serialization"
            )));
        }
        fmt.serialize_with_options(model, options)
    }

    /// Create a registry with the built-in formats
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        registry.register(crate::formats::html::HtmlFormat::default());
        registry.register(crate::formats::json::JsonFormat);
        registry.register(crate::formats::treeviz::TreevizFormat::default());

        registry
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Block, Paragraph, ParagraphFormat, Segment, SegmentFormat};

    struct TestFormat;
    impl Format for TestFormat {
        fn name(&self) -> &str {
            "test"
        }
        fn description(&self) -> &str {
            "Test format"
        }
        fn file_extensions(&self) -> &[&str] {
            &["tst"]
        }
        fn supports_parsing(&self) -> bool {
            true
        }
        fn supports_serialization(&self) -> bool {
            true
        }
        fn parse(&self, source: &str) -> Result<ContentModel, FormatError> {
            Ok(ContentModel::with_blocks(vec![Block::Paragraph(
                Paragraph::with_segments(
                    ParagraphFormat::default(),
                    vec![Segment::text(source, SegmentFormat::default())],
                ),
            )]))
        }
        fn serialize(&self, _model: &ContentModel) -> Result<String, FormatError> {
            Ok("test output".to_string())
        }
    }

    struct WriteOnly;
    impl Format for WriteOnly {
        fn name(&self) -> &str {
            "write-only"
        }
        fn supports_serialization(&self) -> bool {
            true
        }
        fn serialize(&self, _model: &ContentModel) -> Result<String, FormatError> {
            Ok(String::new())
        }
    }

    #[test]
    fn test_registry_creation() {
        let registry = FormatRegistry::new();
        assert_eq!(registry.formats.len(), 0);
    }

    #[test]
    fn test_registry_register() {
        let mut registry = FormatRegistry::new();
        registry.register(TestFormat);

        assert!(registry.has("test"));
        assert_eq!(registry.list_formats(), vec!["test"]);
    }

    #[test]
    fn test_registry_get() {
        let mut registry = FormatRegistry::new();
        registry.register(TestFormat);

        let format = registry.get("test");
        assert!(format.is_ok());
        assert_eq!(format.unwrap().description(), "Test format");
    }

    #[test]
    fn test_registry_get_nonexistent() {
        let registry = FormatRegistry::new();
        assert!(matches!(
            registry.get("nonexistent"),
            Err(FormatError::FormatNotFound(name)) if name == "nonexistent"
        ));
    }

    #[test]
    fn test_registry_parse() {
        let mut registry = FormatRegistry::new();
        registry.register(TestFormat);

        let model = registry.parse("input", "test").unwrap();
        assert_eq!(model.document.blocks.len(), 1);
    }

    #[test]
    fn test_registry_parse_not_supported() {
        let mut registry = FormatRegistry::new();
        registry.register(WriteOnly);

        let result = registry.parse("input", "write-only");
        assert!(matches!(result, Err(FormatError::NotSupported(_))));
    }

    #[test]
    fn test_registry_serialize() {
        let mut registry = FormatRegistry::new();
        registry.register(TestFormat);

        let result = registry.serialize(&ContentModel::new(), "test");
        assert_eq!(result.unwrap(), "test output");
    }

    #[test]
    fn test_registry_serialize_rejects_unknown_options() {
        let mut registry = FormatRegistry::new();
        registry.register(TestFormat);

        let mut options = HashMap::new();
        options.insert("anything".to_string(), "true".to_string());
        let result = registry.serialize_with_options(&ContentModel::new(), "test", &options);
        assert!(matches!(result, Err(FormatError::NotSupported(_))));
    }

    #[test]
    fn test_registry_detect_format() {
        let mut registry = FormatRegistry::new();
        registry.register(TestFormat);

        assert_eq!(
            registry.detect_format_from_filename("notes.TST"),
            Some("test".to_string())
        );
        assert_eq!(registry.detect_format_from_filename("notes.md"), None);
        assert_eq!(registry.detect_format_from_filename("notes"), None);
    }

    #[test]
    fn test_registry_defaults() {
        let registry = FormatRegistry::default();
        assert_eq!(registry.list_formats(), vec!["html", "json", "treeviz"]);
        assert_eq!(
            registry.detect_format_from_filename("page.htm"),
            Some("html".to_string())
        );
        assert_eq!(
            registry.detect_format_from_filename("model.json"),
            Some("json".to_string())
        );
        assert!(registry.get("treeviz").unwrap().supports_serialization());
        assert!(!registry.get("treeviz").unwrap().supports_parsing());
    }
}
