use clap::{Arg, ArgAction, Command, ValueHint};
use clap_complete::{generate_to, shells::*};
use std::env;
use std::io::Error;

// Mirror of the transforms and toggles from src/
// We need to duplicate these here since build scripts can't access src/ modules
const AVAILABLE_TRANSFORMS: &[&str] = &["model-treeviz", "model-json", "model-html", "source-treeviz"];
const TOGGLES: &[&str] = &["bold", "italic", "underline", "strikethrough"];

fn main() -> Result<(), Error> {
    let outdir = match env::var_os("OUT_DIR") {
        None => return Ok(()),
        Some(outdir) => outdir,
    };

    let input = || {
        Arg::new("input")
            .help("Input file path")
            .required(true)
            .index(1)
            .value_hint(ValueHint::FilePath)
    };
    let position = |name: &'static str| {
        Arg::new(name)
            .long(name)
            .value_name("PATH:OFFSET")
            .value_hint(ValueHint::Other)
    };
    let output = || {
        Arg::new("output")
            .long("output")
            .short('o')
            .value_hint(ValueHint::FilePath)
    };

    let mut cmd = Command::new("contentmodel")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A tool for building, inspecting and rewriting content models")
        .arg_required_else_help(true)
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
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .subcommand(
            Command::new("convert")
                .arg(input())
                .arg(Arg::new("from").long("from").value_hint(ValueHint::Other))
                .arg(Arg::new("to").long("to").required(true).value_hint(ValueHint::Other))
                .arg(output()),
        )
        .subcommand(
            Command::new("inspect")
                .arg(input())
                .arg(
                    Arg::new("transform")
                        .index(2)
                        .value_parser(clap::builder::PossibleValuesParser::new(AVAILABLE_TRANSFORMS)),
                )
                .arg(position("start"))
                .arg(position("end")),
        )
        .subcommand(
            Command::new("toggle")
                .arg(input())
                .arg(
                    Arg::new("format")
                        .long("format")
                        .required(true)
                        .value_parser(clap::builder::PossibleValuesParser::new(TOGGLES)),
                )
                .arg(position("start").required(true))
                .arg(position("end"))
                .arg(output()),
        );

    // Generate completions for bash
    generate_to(Bash, &mut cmd, "contentmodel", &outdir)?;

    // Generate completions for zsh
    generate_to(Zsh, &mut cmd, "contentmodel", &outdir)?;

    // Generate completions for fish
    generate_to(Fish, &mut cmd, "contentmodel", &outdir)?;

    println!("cargo:warning=Shell completions generated in {outdir:?}");

    Ok(())
}
