//! CLI-specific transforms
//!
//! This module defines the views available to `contentmodel inspect`.
//! Each transform is a stage + format combination (e.g., "model-treeviz").
//!
//! ## Stages
//!
//! 1. **Source** - HTML text → source tree
//!    - `source-treeviz`: the parsed tree with the path of every node, which
//!      is what `--start`/`--end` positions refer to
//!
//! 2. **Model** - source tree → content model
//!    - `model-treeviz`: tree visualization with Unicode icons
//!    - `model-json`: JSON representation
//!    - `model-html`: the model serialized back to HTML
//!
//! A selection given on the command line is carried into the model stages as
//! selection markers, and `model-html` reports where it lands in the output.

use contentmodel::formats::html::{parse_html, serialize_html};
use contentmodel::formats::treeviz::{source_to_treeviz, to_treeviz_str};
use contentmodel::formats::TreevizOptions;
use contentmodel::{build_model_with_options, BuildOptions, Selection, SerializeOptions};
use contentmodel_config::ContentModelConfig;

/// All available CLI transforms (stage + format combinations)
pub const AVAILABLE_TRANSFORMS: &[&str] =
    &["model-treeviz", "model-json", "model-html", "source-treeviz"];

/// Execute a named transform on an HTML source
///
/// # Arguments
///
/// * `source` - The HTML text to transform
/// * `transform_name` - The transform to apply (e.g., "model-treeviz")
/// * `selection` - Optional selection in source-tree coordinates
/// * `config` - Build, serialize and inspect settings
///
/// # Returns
///
/// The transformed output as a string, or an error message
///
/// # Examples
///
/// ```ignore
/// let config = contentmodel_config::load_defaults()?;
/// let output = execute_transform("<p><b>hi</b></p>", "model-treeviz", None, &config)?;
/// ```
pub fn execute_transform(
    source: &str,
    transform_name: &str,
    selection: Option<&Selection>,
    config: &ContentModelConfig,
) -> Result<String, String> {
    let root = parse_html(source).map_err(|e| format!("Transform failed: {e}"))?;

    if transform_name == "source-treeviz" {
        return Ok(source_to_treeviz(&root));
    }

    let model = build_model_with_options(&root, selection, &BuildOptions::from(&config.build));
    log::debug!(
        "built model with {} blocks",
        model.document.blocks.len()
    );

    match transform_name {
        "model-treeviz" => Ok(to_treeviz_str(
            &model,
            &TreevizOptions::from(&config.inspect.treeviz),
        )),
        "model-json" => {
            let json = serde_json::to_string_pretty(&model)
                .map_err(|e| format!("JSON serialization failed: {e}"))?;
            Ok(format!("{json}\n"))
        }
        "model-html" => {
            let serialized = serialize_html(&model, &SerializeOptions::from(&config.serialize))
                .map_err(|e| format!("Transform failed: {e}"))?;
            let mut output = format!("{}\n", serialized.root);
            match (selection, serialized.selection) {
                (Some(_), Some(selection)) => {
                    output.push_str(&format!("selection: {selection}\n"));
                }
                (Some(_), None) => output.push_str("selection: none\n"),
                (None, _) => {}
            }
            Ok(output)
        }
        _ => Err(format!("Unknown transform: {transform_name}")),
    }
}
