//! Shared configuration loader for the contentmodel tools.
//!
//! `defaults/contentmodel.default.toml` is embedded into every binary so that
//! docs and runtime behavior stay in sync. Applications layer user-specific
//! files on top of those defaults via [`Loader`] before deserializing into
//! [`ContentModelConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use contentmodel::formats::TreevizOptions;
use contentmodel::{BuildOptions, SerializeOptions};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/contentmodel.default.toml");

/// Top-level configuration consumed by contentmodel applications.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentModelConfig {
    pub build: BuildConfig,
    pub serialize: SerializeConfig,
    pub inspect: InspectConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BuildConfig {
    pub normalize: bool,
}

impl From<&BuildConfig> for BuildOptions {
    fn from(config: &BuildConfig) -> Self {
        BuildOptions {
            normalize: config.normalize,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SerializeConfig {
    pub empty_paragraph_placeholder: bool,
}

impl From<&SerializeConfig> for SerializeOptions {
    fn from(config: &SerializeConfig) -> Self {
        SerializeOptions {
            empty_paragraph_placeholder: config.empty_paragraph_placeholder,
        }
    }
}

/// Controls inspect output.
#[derive(Debug, Clone, Deserialize)]
pub struct InspectConfig {
    pub treeviz: TreevizConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TreevizConfig {
    pub show_formats: bool,
}

impl From<&TreevizConfig> for TreevizOptions {
    fn from(config: &TreevizConfig) -> Self {
        TreevizOptions {
            show_formats: config.show_formats,
        }
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    pub fn build(self) -> Result<ContentModelConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<ContentModelConfig, ConfigError> {
    Loader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_default_config() {
        let config = load_defaults().expect("defaults to deserialize");
        assert!(config.build.normalize);
        assert!(config.serialize.empty_paragraph_placeholder);
        assert!(config.inspect.treeviz.show_formats);
    }

    #[test]
    fn supports_overrides() {
        let config = Loader::new()
            .set_override("serialize.empty_paragraph_placeholder", false)
            .expect("override to apply")
            .build()
            .expect("config to build");
        assert!(!config.serialize.empty_paragraph_placeholder);
        assert!(config.build.normalize);
    }

    #[test]
    fn layers_user_file() {
        let path = std::env::temp_dir().join(format!(
            "contentmodel-config-test-{}.toml",
            std::process::id()
        ));
        let mut file = std::fs::File::create(&path).expect("temp file");
        writeln!(file, "[build]\nnormalize = false").expect("write config");

        let config = Loader::new().with_file(&path).build();
        std::fs::remove_file(&path).ok();

        let config = config.expect("config to build");
        assert!(!config.build.normalize);
        assert!(config.inspect.treeviz.show_formats);
    }

    #[test]
    fn missing_optional_file_is_ignored() {
        let config = Loader::new()
            .with_optional_file("does-not-exist.toml")
            .build()
            .expect("config to build");
        assert!(config.build.normalize);
    }

    #[test]
    fn converts_to_library_options() {
        let config = load_defaults().expect("defaults to deserialize");
        let build: BuildOptions = (&config.build).into();
        let serialize: SerializeOptions = (&config.serialize).into();
        let treeviz: TreevizOptions = (&config.inspect.treeviz).into();
        assert_eq!(build, BuildOptions::default());
        assert_eq!(serialize, SerializeOptions::default());
        assert_eq!(treeviz, TreevizOptions::default());
    }
}
