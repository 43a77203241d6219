// Command-line interface for contentmodel
//
// This binary provides commands for converting, inspecting and rewriting HTML fragments through the content model.
//
// The inspect command is a development aid: it shows the parsed source tree (with the node paths selections are written in) and the model built from it.
//
// Converting:
//
// The conversion needs a to and from pair. The from can be auto-detected from the file extension, while being overwrittable by an explicit --from flag.
// Usage:
//  contentmodel <input> --to <format> [--from <format>] [--output <file>]  - Convert between formats (default)
//  contentmodel convert <input> --to <format> [--from <format>] [--output <file>]  - Same as above (explicit)
//  contentmodel inspect <path> [<transform>] [--start P] [--end P]  - Execute a transform (defaults to "model-treeviz")
//  contentmodel toggle <path> --format bold --start P [--end P]  - Toggle a format over a selection
//  contentmodel --list-transforms                 - List available transforms
//
// Positions are written PATH:OFFSET, PATH being "/"-separated child indices from the fragment root.
//
// Extra Parameters:
//
// Format-specific parameters can be passed using --extra-<parameter-name> <value>.
// The CLI layer strips the "extra-" prefix and passes the parameters to the format/transform.
// Example:
//  contentmodel inspect file.html --extra-show-formats false

use contentmodel_cli::transforms;

use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use contentmodel::formats::html::{parse_html, serialize_html};
use contentmodel::formats::{HtmlFormat, JsonFormat, TreevizFormat};
use contentmodel::model::{toggle_format, Toggle};
use contentmodel::{
    build_model_with_options, BuildOptions, FormatRegistry, Position, Selection, SerializeOptions,
};
use contentmodel_config::{ContentModelConfig, Loader};
use std::collections::HashMap;
use std::fs;

/// Parse extra-* arguments from command line args
/// Returns (cleaned_args_without_extras, extra_params_map)
///
/// Supports both:
/// - `--extra-<key> <value>` (explicit value)
/// - `--extra-<key>` (boolean flag, defaults to "true")
/// - `--extras-<key>` (alias for `--extra-<key>`)
fn parse_extra_args(args: &[String]) -> (Vec<String>, HashMap<String, String>) {
    let mut cleaned_args = Vec::new();
    let mut extra_params = HashMap::new();
    let mut i = 0;

    while i < args.len() {
        let arg = &args[i];

        let key_opt = if let Some(key) = arg.strip_prefix("--extra-") {
            Some(key)
        } else {
            arg.strip_prefix("--extras-")
        };

        if let Some(key) = key_opt {
            // Check if the next arg is a value or another flag/end
            let has_value = if i + 1 < args.len() {
                !args[i + 1].starts_with('-')
            } else {
                false
            };

            if has_value {
                extra_params.insert(key.to_string(), args[i + 1].clone());
                i += 2;
            } else {
                // No value, treat as boolean flag
                extra_params.insert(key.to_string(), "true".to_string());
                i += 1;
            }
            continue;
        }

        cleaned_args.push(arg.clone());
        i += 1;
    }

    (cleaned_args, extra_params)
}

fn position_arg(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .long(name)
        .value_name("PATH:OFFSET")
        .help(help)
        .long_help(
            "A position in the parsed source tree, written PATH:OFFSET.\n\n\
            PATH is the '/'-separated child indices from the fragment root\n\
            (see the source-treeviz transform). OFFSET is a character offset\n\
            inside a text node, or a child index inside an element.\n\n\
            Examples: 0/0:3, 1/2/0:0, :1",
        )
        .value_hint(ValueHint::Other)
}

fn build_cli() -> Command {
    Command::new("contentmodel")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A tool for building, inspecting and rewriting content models")
        .long_about(
            "contentmodel turns styled HTML fragments into a content model and back.\n\n\
            Commands:\n  \
            - convert: Transform between formats (html, json, treeviz)\n  \
            - inspect: View the source tree and the built model\n  \
            - toggle:  Toggle bold/italic/underline/strikethrough over a selection\n\n\
            Extra Parameters:\n  \
            Use --extra-<name> [value] to pass format-specific options.\n  \
            Boolean flags can omit the value (defaults to 'true').\n\n\
            Examples:\n  \
            contentmodel inspect doc.html                       # View model tree visualization\n  \
            contentmodel inspect doc.html source-treeviz        # View source tree with paths\n  \
            contentmodel doc.html --to json                     # Convert to JSON (outputs to stdout)\n  \
            contentmodel toggle doc.html --format bold --start 0/0:0 --end 0/0:5"
        )
        .arg_required_else_help(true)
        .subcommand_required(false)
        .arg(
            Arg::new("list-transforms")
                .long("list-transforms")
                .help("List available transforms")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to a contentmodel.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .subcommand(
            Command::new("inspect")
                .about("Inspect the source tree and content model of an HTML file")
                .long_about(
                    "View an HTML fragment at different processing stages.\n\n\
                    Transforms (stage-format):\n  \
                    - model-treeviz:   content model as tree visualization (default)\n  \
                    - model-json:      content model as JSON\n  \
                    - model-html:      content model serialized back to HTML\n  \
                    - source-treeviz:  parsed source tree with node paths\n\n\
                    Extra Parameters:\n  \
                    --extra-show-formats false   Hide format flags in model-treeviz\n  \
                    --extra-normalize false      Skip normalization\n\n\
                    Examples:\n  \
                    contentmodel inspect doc.html\n  \
                    contentmodel inspect doc.html model-html --start 0/0:1 --end 0/0:3"
                )
                .arg(
                    Arg::new("path")
                        .help("Path to the HTML file")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("transform")
                        .help("Transform to apply (stage-format). Defaults to 'model-treeviz'")
                        .required(false)
                        .value_parser(clap::builder::PossibleValuesParser::new(
                            transforms::AVAILABLE_TRANSFORMS,
                        ))
                        .index(2)
                        .value_hint(ValueHint::Other),
                )
                .arg(position_arg("start", "Selection start (PATH:OFFSET)"))
                .arg(position_arg(
                    "end",
                    "Selection end (PATH:OFFSET, defaults to the start)",
                )),
        )
        .subcommand(
            Command::new("convert")
                .about("Convert between formats (default command)")
                .long_about(
                    "Convert documents between different formats.\n\n\
                    Supported formats:\n  \
                    - html:     HTML fragments with inline styles (.html)\n  \
                    - json:     Content model as JSON (.json)\n  \
                    - treeviz:  Tree visualization (output only)\n\n\
                    The source format is auto-detected from the file extension.\n\
                    Output goes to stdout by default, or use -o to specify a file.\n\n\
                    Examples:\n  \
                    contentmodel convert doc.html --to json -o doc.json\n  \
                    contentmodel doc.json --to html                # 'convert' is optional"
                )
                .arg(
                    Arg::new("input")
                        .help("Input file path")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("from")
                        .long("from")
                        .help("Source format (auto-detected from file extension if not specified)")
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("to")
                        .long("to")
                        .help("Target format (required)")
                        .required(true)
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Output file path (defaults to stdout)")
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .subcommand(
            Command::new("toggle")
                .about("Toggle a segment format over a selection")
                .long_about(
                    "Build the model with a selection, toggle one format over the\n\
                    selected segments and write the HTML back.\n\n\
                    The format is cleared when every selected segment already has it,\n\
                    and set on all of them otherwise. The selection in the output\n\
                    HTML is printed on stderr.\n\n\
                    Examples:\n  \
                    contentmodel toggle doc.html --format bold --start 0/0:0 --end 0/0:5\n  \
                    contentmodel toggle doc.html --format italic --start 0/0:0 --end 1/0:2 -o out.html"
                )
                .arg(
                    Arg::new("input")
                        .help("Input HTML file path")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .help("Format to toggle")
                        .required(true)
                        .value_parser(clap::builder::PossibleValuesParser::new(Toggle::NAMES)),
                )
                .arg(position_arg("start", "Selection start (PATH:OFFSET)").required(true))
                .arg(position_arg(
                    "end",
                    "Selection end (PATH:OFFSET, defaults to the start)",
                ))
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Output file path (defaults to stdout)")
                        .value_hint(ValueHint::FilePath),
                ),
        )
}

fn main() {
    env_logger::init();

    // Try to parse args. If no subcommand is provided, inject "convert"
    let args: Vec<String> = std::env::args().collect();

    // Parse extra-* arguments before clap processing
    let (cleaned_args, mut extra_params) = parse_extra_args(&args);

    let cli = build_cli();
    let matches = match cli.clone().try_get_matches_from(&cleaned_args) {
        Ok(m) => m,
        Err(e) => {
            // A first argument that looks like a file means the subcommand was left out
            if cleaned_args.len() > 1
                && !cleaned_args[1].starts_with('-')
                && cleaned_args[1] != "inspect"
                && cleaned_args[1] != "convert"
                && cleaned_args[1] != "toggle"
                && cleaned_args[1] != "help"
            {
                let mut new_args = vec![cleaned_args[0].clone(), "convert".to_string()];
                new_args.extend_from_slice(&cleaned_args[1..]);

                match cli.try_get_matches_from(&new_args) {
                    Ok(m) => m,
                    Err(e2) => e2.exit(),
                }
            } else {
                e.exit();
            }
        }
    };

    if matches.get_flag("list-transforms") {
        handle_list_transforms_command();
        return;
    }

    let mut config = load_cli_config(matches.get_one::<String>("config").map(|s| s.as_str()));
    apply_config_overrides(&mut config, &mut extra_params);

    match matches.subcommand() {
        Some(("inspect", sub_matches)) => {
            let path = sub_matches
                .get_one::<String>("path")
                .expect("path is required");
            let transform = sub_matches
                .get_one::<String>("transform")
                .map(|s| s.as_str())
                .unwrap_or("model-treeviz");
            if !extra_params.is_empty() {
                reject_extra_params(&extra_params);
            }
            let selection = selection_from_matches(sub_matches);
            handle_inspect_command(path, transform, selection.as_ref(), &config);
        }
        Some(("convert", sub_matches)) => {
            let input = sub_matches
                .get_one::<String>("input")
                .expect("input is required");
            let from_arg = sub_matches.get_one::<String>("from");
            let to = sub_matches.get_one::<String>("to").expect("to is required");

            // Auto-detect --from if not provided
            let from = if let Some(f) = from_arg {
                f.to_string()
            } else {
                let registry = registry_from_config(&config);
                match registry.detect_format_from_filename(input) {
                    Some(detected) => detected,
                    None => {
                        eprintln!("Error: Could not detect format from filename '{input}'");
                        eprintln!("Please specify --from explicitly");
                        std::process::exit(1);
                    }
                }
            };

            let output = sub_matches.get_one::<String>("output").map(|s| s.as_str());
            handle_convert_command(input, &from, to, output, &extra_params, &config);
        }
        Some(("toggle", sub_matches)) => {
            let input = sub_matches
                .get_one::<String>("input")
                .expect("input is required");
            let format = sub_matches
                .get_one::<String>("format")
                .expect("format is required");
            let toggle = Toggle::from_name(format).unwrap_or_else(|| {
                eprintln!("Unknown format '{format}'");
                std::process::exit(1);
            });
            if !extra_params.is_empty() {
                reject_extra_params(&extra_params);
            }
            let selection =
                selection_from_matches(sub_matches).expect("start is required");
            let output = sub_matches.get_one::<String>("output").map(|s| s.as_str());
            handle_toggle_command(input, toggle, &selection, output, &config);
        }
        _ => {
            eprintln!("Unknown subcommand. Use --help for usage information.");
            std::process::exit(1);
        }
    }
}

/// Handle the inspect command
fn handle_inspect_command(
    path: &str,
    transform: &str,
    selection: Option<&Selection>,
    config: &ContentModelConfig,
) {
    let source = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file '{path}': {e}");
        std::process::exit(1);
    });

    let output = transforms::execute_transform(&source, transform, selection, config)
        .unwrap_or_else(|e| {
            eprintln!("Execution error: {e}");
            std::process::exit(1);
        });

    print!("{output}");
}

/// Handle the convert command
fn handle_convert_command(
    input: &str,
    from: &str,
    to: &str,
    output: Option<&str>,
    extra_params: &HashMap<String, String>,
    config: &ContentModelConfig,
) {
    let registry = registry_from_config(config);

    // Validate formats exist
    if let Err(e) = registry.get(from) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
    if let Err(e) = registry.get(to) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    let source = fs::read_to_string(input).unwrap_or_else(|e| {
        eprintln!("Error reading file '{input}': {e}");
        std::process::exit(1);
    });

    let model = registry.parse(&source, from).unwrap_or_else(|e| {
        eprintln!("Parse error: {e}");
        std::process::exit(1);
    });
    log::debug!("parsed '{input}' as {from}");

    let result = registry
        .serialize_with_options(&model, to, extra_params)
        .unwrap_or_else(|e| {
            eprintln!("Serialization error: {e}");
            std::process::exit(1);
        });

    write_output(output, &result);
}

/// Handle the toggle command
fn handle_toggle_command(
    input: &str,
    toggle: Toggle,
    selection: &Selection,
    output: Option<&str>,
    config: &ContentModelConfig,
) {
    let source = fs::read_to_string(input).unwrap_or_else(|e| {
        eprintln!("Error reading file '{input}': {e}");
        std::process::exit(1);
    });

    let root = parse_html(&source).unwrap_or_else(|e| {
        eprintln!("Parse error: {e}");
        std::process::exit(1);
    });

    let mut model =
        build_model_with_options(&root, Some(selection), &BuildOptions::from(&config.build));

    let Some(on) = toggle_format(&mut model, toggle) else {
        eprintln!("Nothing selected at {selection}");
        std::process::exit(1);
    };
    log::debug!("{toggle:?} set to {on}");

    let serialized = serialize_html(&model, &SerializeOptions::from(&config.serialize))
        .unwrap_or_else(|e| {
            eprintln!("Serialization error: {e}");
            std::process::exit(1);
        });

    write_output(output, &format!("{}\n", serialized.root));
    match serialized.selection {
        Some(selection) => eprintln!("Selection: {selection}"),
        None => eprintln!("Selection: none"),
    }
}

fn write_output(output: Option<&str>, data: &str) {
    match output {
        Some(path) => {
            fs::write(path, data).unwrap_or_else(|e| {
                eprintln!("Error writing file '{path}': {e}");
                std::process::exit(1);
            });
        }
        None => print!("{data}"),
    }
}

/// Handle the list-transforms command
fn handle_list_transforms_command() {
    println!("Available transforms:\n");
    println!("Stages:");
    println!("  source      - Parsed HTML tree, with node paths");
    println!("  model       - Content model built from the source tree\n");

    println!("Formats:");
    println!("  treeviz     - Tree visualization");
    println!("  json        - JSON output (model only)");
    println!("  html        - HTML written back from the model (model only)\n");

    println!("Available transform combinations:");
    for transform_name in transforms::AVAILABLE_TRANSFORMS {
        println!("  {transform_name}");
    }

    println!("\nConversion formats:");
    let registry = FormatRegistry::default();
    for format_name in registry.list_formats() {
        println!("  {format_name}");
    }
}

fn load_cli_config(explicit_path: Option<&str>) -> ContentModelConfig {
    let loader = Loader::new().with_optional_file("contentmodel.toml");
    let loader = if let Some(path) = explicit_path {
        loader.with_file(path)
    } else {
        loader
    };

    loader.build().unwrap_or_else(|err| {
        eprintln!("Failed to load configuration: {err}");
        std::process::exit(1);
    })
}

/// Registry whose formats carry the configured build and serialize options.
fn registry_from_config(config: &ContentModelConfig) -> FormatRegistry {
    let mut registry = FormatRegistry::new();
    registry.register(HtmlFormat::with_options(
        BuildOptions::from(&config.build),
        SerializeOptions::from(&config.serialize),
    ));
    registry.register(JsonFormat);
    registry.register(TreevizFormat::new((&config.inspect.treeviz).into()));
    registry
}

fn selection_from_matches(matches: &ArgMatches) -> Option<Selection> {
    let start = parse_position_arg(matches.get_one::<String>("start")?);
    let end = matches
        .get_one::<String>("end")
        .map(String::as_str)
        .map(parse_position_arg)
        .unwrap_or_else(|| start.clone());
    Some(Selection::new(start, end))
}

fn parse_position_arg(raw: &str) -> Position {
    raw.parse().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    })
}

fn reject_extra_params(extra_params: &HashMap<String, String>) {
    let mut keys: Vec<&String> = extra_params.keys().collect();
    keys.sort();
    eprintln!("Unknown parameter --extra-{}", keys[0]);
    std::process::exit(1);
}

fn apply_config_overrides(
    config: &mut ContentModelConfig,
    extra_params: &mut HashMap<String, String>,
) {
    if let Some(raw) = take_override(extra_params, &["normalize"]) {
        config.build.normalize = parse_bool_arg("normalize", &raw);
    }
    if let Some(raw) = take_override(extra_params, &["placeholder", "empty-paragraph-placeholder"]) {
        config.serialize.empty_paragraph_placeholder = parse_bool_arg("placeholder", &raw);
    }
    if let Some(raw) = take_override(extra_params, &["show-formats", "showformats"]) {
        config.inspect.treeviz.show_formats = parse_bool_arg("show-formats", &raw);
    }
}

fn take_override(map: &mut HashMap<String, String>, keys: &[&str]) -> Option<String> {
    for key in keys {
        if let Some(value) = map.remove(*key) {
            return Some(value);
        }
    }
    None
}

fn parse_bool_arg(flag: &str, raw: &str) -> bool {
    match raw.to_lowercase().as_str() {
        "true" | "1" | "yes" | "y" => true,
        "false" | "0" | "no" | "n" => false,
        other => {
            eprintln!("Invalid boolean value '{other}' for --extra-{flag}");
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contentmodel::model::{Block, Paragraph, ParagraphFormat};
    use contentmodel::ContentModel;

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_extra_args_empty() {
        let args = args(&["contentmodel", "inspect", "doc.html"]);
        let (cleaned, extra) = parse_extra_args(&args);

        assert_eq!(cleaned, args);
        assert!(extra.is_empty());
    }

    #[test]
    fn test_parse_extra_args_mixed_with_regular_args() {
        let (cleaned, extra) = parse_extra_args(&args(&[
            "contentmodel",
            "convert",
            "doc.html",
            "--to",
            "html",
            "--extra-placeholder",
            "false",
            "--from",
            "html",
        ]));

        assert_eq!(
            cleaned,
            args(&["contentmodel", "convert", "doc.html", "--to", "html", "--from", "html"])
        );
        assert_eq!(extra.len(), 1);
        assert_eq!(extra.get("placeholder"), Some(&"false".to_string()));
    }

    #[test]
    fn test_parse_extra_args_boolean_flag_at_end() {
        let (cleaned, extra) = parse_extra_args(&args(&[
            "contentmodel",
            "inspect",
            "doc.html",
            "--extra-show-formats",
        ]));

        assert_eq!(cleaned, args(&["contentmodel", "inspect", "doc.html"]));
        assert_eq!(extra.get("show-formats"), Some(&"true".to_string()));
    }

    #[test]
    fn test_parse_extra_args_allows_extras_alias() {
        let (cleaned, extra) = parse_extra_args(&args(&[
            "contentmodel",
            "inspect",
            "doc.html",
            "--extras-normalize",
            "no",
        ]));

        assert_eq!(cleaned, args(&["contentmodel", "inspect", "doc.html"]));
        assert_eq!(extra.get("normalize"), Some(&"no".to_string()));
    }

    #[test]
    fn test_parse_extra_args_mixed_boolean_and_value() {
        let (cleaned, extra) = parse_extra_args(&args(&[
            "contentmodel",
            "inspect",
            "doc.html",
            "--extra-show-formats",
            "--extra-normalize",
            "false",
            "--start",
            "0/0:1",
        ]));

        assert_eq!(
            cleaned,
            args(&["contentmodel", "inspect", "doc.html", "--start", "0/0:1"])
        );
        assert_eq!(extra.len(), 2);
        assert_eq!(extra.get("show-formats"), Some(&"true".to_string()));
        assert_eq!(extra.get("normalize"), Some(&"false".to_string()));
    }

    #[test]
    fn apply_config_overrides_updates_known_flags() {
        let mut config = load_cli_config(None);
        let mut extras = HashMap::new();
        extras.insert("normalize".to_string(), "false".to_string());
        extras.insert("show-formats".to_string(), "no".to_string());
        extras.insert("empty-paragraph-placeholder".to_string(), "0".to_string());

        apply_config_overrides(&mut config, &mut extras);

        assert!(!config.build.normalize);
        assert!(!config.inspect.treeviz.show_formats);
        assert!(!config.serialize.empty_paragraph_placeholder);
        assert!(extras.is_empty());
    }

    #[test]
    fn apply_config_overrides_leaves_unknown_params() {
        let mut config = load_cli_config(None);
        let mut extras = HashMap::new();
        extras.insert("theme".to_string(), "dark".to_string());

        apply_config_overrides(&mut config, &mut extras);

        assert_eq!(extras.get("theme"), Some(&"dark".to_string()));
        assert!(config.build.normalize);
    }

    #[test]
    fn registry_uses_configured_placeholder() {
        let mut config = load_cli_config(None);
        config.serialize.empty_paragraph_placeholder = false;
        let registry = registry_from_config(&config);

        let model = ContentModel::with_blocks(vec![Block::Paragraph(Paragraph::new(
            ParagraphFormat::default(),
        ))]);
        let html = registry.serialize(&model, "html").expect("html to serialize");
        assert_eq!(html, "<div></div>");
    }

    #[test]
    fn cli_accepts_toggle_arguments() {
        let matches = build_cli()
            .try_get_matches_from(args(&[
                "contentmodel",
                "toggle",
                "doc.html",
                "--format",
                "bold",
                "--start",
                "0/0:1",
                "--end",
                "0/0:3",
            ]))
            .expect("arguments to parse");
        let (_, sub_matches) = matches.subcommand().expect("subcommand");
        let selection = selection_from_matches(sub_matches).expect("selection");

        assert_eq!(selection.start, Position::new(vec![0, 0], 1));
        assert_eq!(selection.end, Position::new(vec![0, 0], 3));
    }
}
