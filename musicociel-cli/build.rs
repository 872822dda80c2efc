use clap::{Arg, ArgAction, Command, ValueHint};
use clap_complete::{generate_to, shells::*};
use std::env;
use std::io::Error;

// Mirror of the registry's formats (musicociel-babel's FormatRegistry::with_defaults)
// We need to duplicate this here since build scripts can't access src/ modules
const FORMATS: &[&str] = &["chordpro", "musicociel", "text"];
const INPUT_FORMATS: &[&str] = &["auto", "chordpro", "musicociel", "text"];

fn transform_args() -> Vec<Arg> {
    vec![
        Arg::new("transpose")
            .short('t')
            .long("transpose")
            .value_name("SEMITONES")
            .allow_negative_numbers(true),
        Arg::new("alteration")
            .short('a')
            .long("alteration"),
        Arg::new("reset-alterations")
            .short('r')
            .long("reset-alterations")
            .action(ArgAction::SetTrue),
        Arg::new("accept-unknown-chords")
            .short('u')
            .long("accept-unknown-chords")
            .action(ArgAction::SetTrue),
        Arg::new("normalize-chords")
            .short('n')
            .long("normalize-chords")
            .action(ArgAction::SetTrue),
    ]
}

fn input_format_arg() -> Arg {
    Arg::new("input-format")
        .long("input-format")
        .value_parser(clap::builder::PossibleValuesParser::new(INPUT_FORMATS))
}

fn main() -> Result<(), Error> {
    let outdir = match env::var_os("OUT_DIR") {
        None => return Ok(()),
        Some(outdir) => outdir,
    };

    let mut cmd = Command::new("musicociel")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert, transpose and import song files")
        .arg(
            Arg::new("config")
                .long("config")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .global(true),
        )
        .subcommand(Command::new("version"))
        .subcommand(
            Command::new("song")
                .subcommand(
                    Command::new("convert-file")
                        .arg(
                            Arg::new("input")
                                .short('i')
                                .long("input")
                                .value_hint(ValueHint::FilePath),
                        )
                        .arg(input_format_arg())
                        .arg(
                            Arg::new("output")
                                .short('o')
                                .long("output")
                                .value_hint(ValueHint::FilePath),
                        )
                        .arg(
                            Arg::new("output-format")
                                .long("output-format")
                                .value_parser(clap::builder::PossibleValuesParser::new(FORMATS)),
                        )
                        .args(transform_args()),
                )
                .subcommand(
                    Command::new("import-files")
                        .arg(
                            Arg::new("patterns")
                                .required(true)
                                .num_args(1..)
                                .value_hint(ValueHint::FilePath),
                        )
                        .arg(
                            Arg::new("output-database")
                                .short('o')
                                .long("output-database")
                                .value_hint(ValueHint::FilePath),
                        )
                        .arg(input_format_arg())
                        .arg(
                            Arg::new("delete-others")
                                .long("delete-others")
                                .action(ArgAction::SetTrue),
                        )
                        .args(transform_args()),
                ),
        );

    // Generate completions for bash
    generate_to(Bash, &mut cmd, "musicociel", &outdir)?;

    // Generate completions for zsh
    generate_to(Zsh, &mut cmd, "musicociel", &outdir)?;

    // Generate completions for fish
    generate_to(Fish, &mut cmd, "musicociel", &outdir)?;

    println!("cargo:warning=Shell completions generated in {outdir:?}");

    Ok(())
}
