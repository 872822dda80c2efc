// Command-line interface for musicociel
//
// This binary converts song files between formats and pushes song libraries
// into a document store.
//
// The conversion and transformation logic lives in musicociel-babel, the store and the
// import/prune engine in musicociel-sync. This crate only parses flags, reads and writes
// files, and turns errors into exit codes.
//
// Usage:
//  musicociel version
//  musicociel song convert-file [-i <input>] [-o <output>] [--input-format <f>] [--output-format <f>]
//  musicociel song import-files <pattern>... [-o <database>] [--delete-others]
//
// Transformation flags (both song commands):
//  -t/--transpose <n>, -a/--alteration <#|b>, -r/--reset-alterations,
//  -u/--accept-unknown-chords, -n/--normalize-chords
//
// Settings come from the built-in defaults, then ./musicociel.toml, then --config <path>.
// Flags win over all of them. Transformation flags are validated before any file is read.

use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use musicociel_babel::transforms::TransformOptions;
use musicociel_babel::{load_song, ConvertError, FormatRegistry, TransformConfig};
use musicociel_config::{Loader, MusicocielConfig};
use musicociel_sync::{Namespace, SqliteStore, SyncOptions, SyncReport, Synchronizer};
use std::fs;
use std::io::{self, Write};
use tracing_subscriber::EnvFilter;

fn transform_args() -> Vec<Arg> {
    vec![
        Arg::new("transpose")
            .short('t')
            .long("transpose")
            .value_name("SEMITONES")
            .help("Transpose every chord by this many semitones")
            .allow_negative_numbers(true),
        Arg::new("alteration")
            .short('a')
            .long("alteration")
            .value_name("ALTERATION")
            .help("Accidental used for transposed notes: '#' or 'b'"),
        Arg::new("reset-alterations")
            .short('r')
            .long("reset-alterations")
            .help("Ignore the accidentals written in the source when respelling")
            .action(ArgAction::SetTrue),
        Arg::new("accept-unknown-chords")
            .short('u')
            .long("accept-unknown-chords")
            .help("Keep chords the theory engine does not recognise instead of failing")
            .action(ArgAction::SetTrue),
        Arg::new("normalize-chords")
            .short('n')
            .long("normalize-chords")
            .help("Rewrite chord qualities to their canonical names (C- becomes Cm)")
            .action(ArgAction::SetTrue),
    ]
}

fn input_format_arg(registry: &FormatRegistry) -> Arg {
    let mut names = vec!["auto".to_string()];
    names.extend(registry.list_formats());
    Arg::new("input-format")
        .long("input-format")
        .value_name("FORMAT")
        .help("Input format; detected from the extension or the content when omitted")
        .value_parser(clap::builder::PossibleValuesParser::new(names))
}

/// One line per registered format, in detection order.
fn format_listing(registry: &FormatRegistry) -> String {
    let mut listing = String::from("Formats (tried in this order when detecting):\n");
    for format in registry.formats() {
        let extensions: Vec<String> = format
            .file_extensions()
            .iter()
            .map(|ext| format!(".{ext}"))
            .collect();
        listing.push_str(&format!(
            "  {:<11} {} ({})\n",
            format.name(),
            format.description(),
            extensions.join(", ")
        ));
    }
    listing
}

fn build_cli(registry: &FormatRegistry) -> Command {
    Command::new("musicociel")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert, transpose and import song files")
        .long_about(
            "musicociel converts songs between formats and keeps a song database in sync \
            with a set of files.\n\n\
            Formats:\n  \
            - musicociel: JSON song model (.musicociel, .json)\n  \
            - chordpro:   ChordPro (.cho, .crd, .chopro, .chordpro, .pro)\n  \
            - text:       chords above lyrics (.txt)\n\n\
            Examples:\n  \
            musicociel song convert-file -i song.txt -o song.cho\n  \
            musicociel song convert-file -i song.cho -t 2 -a '#'\n  \
            musicociel song import-files 'songs/**/*.cho' -o songs.db --delete-others",
        )
        .arg_required_else_help(true)
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to a musicociel.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("More log output on stderr (repeat for more)")
                .action(ArgAction::Count)
                .global(true),
        )
        .subcommand(Command::new("version").about("Print the version"))
        .subcommand(
            Command::new("song")
                .about("Song commands")
                .subcommand_required(true)
                .arg_required_else_help(true)
                .subcommand(
                    Command::new("convert-file")
                        .about("Convert a song file, optionally transforming its chords")
                        .after_help(format_listing(registry))
                        .arg(
                            Arg::new("input")
                                .short('i')
                                .long("input")
                                .value_name("FILE")
                                .help("Input file (stdin when omitted)")
                                .value_hint(ValueHint::FilePath),
                        )
                        .arg(input_format_arg(registry))
                        .arg(
                            Arg::new("output")
                                .short('o')
                                .long("output")
                                .value_name("FILE")
                                .help("Output file (stdout when omitted)")
                                .value_hint(ValueHint::FilePath),
                        )
                        .arg(
                            Arg::new("output-format")
                                .long("output-format")
                                .value_name("FORMAT")
                                .help("Output format; from the output extension, else the configured default")
                                .value_parser(clap::builder::PossibleValuesParser::new(
                                    registry.list_formats(),
                                )),
                        )
                        .args(transform_args()),
                )
                .subcommand(
                    Command::new("import-files")
                        .about("Import song files into a database")
                        .long_about(
                            "Import every file matching the given glob patterns into a song database.\n\n\
                            Each song is stored under an id derived from its content, so importing an \
                            unchanged file again is a no-op. With --delete-others, songs of the database \
                            that none of the files produced are deleted, unless they were modified \
                            since the import started.",
                        )
                        .arg(
                            Arg::new("patterns")
                                .value_name("PATTERN")
                                .help("Glob patterns of the files to import")
                                .required(true)
                                .num_args(1..)
                                .value_hint(ValueHint::FilePath),
                        )
                        .arg(
                            Arg::new("output-database")
                                .short('o')
                                .long("output-database")
                                .value_name("PATH")
                                .help("Database file (defaults to sync.database from the configuration)")
                                .value_hint(ValueHint::FilePath),
                        )
                        .arg(input_format_arg(registry))
                        .arg(
                            Arg::new("delete-others")
                                .long("delete-others")
                                .help("Delete songs that were not part of this import")
                                .action(ArgAction::SetTrue),
                        )
                        .args(transform_args()),
                ),
        )
}

fn main() {
    let mut registry = FormatRegistry::with_defaults();
    let matches = build_cli(&registry).get_matches();

    let config = load_cli_config(matches.get_one::<String>("config").map(|s| s.as_str()));
    init_logging(&config, matches.get_count("verbose"));
    registry.set_default_output(config.convert.default_output_format.clone());

    match matches.subcommand() {
        Some(("version", _)) => {
            println!("musicociel {}", env!("CARGO_PKG_VERSION"));
        }
        Some(("song", song_matches)) => match song_matches.subcommand() {
            Some(("convert-file", sub_matches)) => {
                handle_convert_file_command(&registry, &config, sub_matches)
            }
            Some(("import-files", sub_matches)) => {
                handle_import_files_command(&registry, &config, sub_matches)
            }
            _ => {
                eprintln!("Unknown song subcommand. Use --help for usage information.");
                std::process::exit(1);
            }
        },
        _ => {
            eprintln!("Unknown subcommand. Use --help for usage information.");
            std::process::exit(1);
        }
    }
}

fn handle_convert_file_command(registry: &FormatRegistry, config: &MusicocielConfig, matches: &ArgMatches) {
    let transform = transform_config(config, matches);
    let input = matches.get_one::<String>("input").map(|s| s.as_str());
    let output = matches.get_one::<String>("output").map(|s| s.as_str());
    let input_format = matches.get_one::<String>("input-format").map(|s| s.as_str());
    let output_format = matches.get_one::<String>("output-format").map(|s| s.as_str());

    let source = match input {
        Some(path) => fs::read_to_string(path).unwrap_or_else(|e| {
            eprintln!("Error reading file '{path}': {e}");
            std::process::exit(1);
        }),
        None => io::read_to_string(io::stdin()).unwrap_or_else(|e| {
            eprintln!("Error reading stdin: {e}");
            std::process::exit(1);
        }),
    };

    let encoded = load_song(registry, &source, input, input_format, &transform)
        .and_then(|song| Ok(registry.encode(&song, output, output_format)?))
        .unwrap_or_else(|e: ConvertError| {
            eprintln!("Error: {e}");
            std::process::exit(1);
        });

    match output {
        Some(path) => {
            if let Err(e) = fs::write(path, encoded) {
                eprintln!("Error writing file '{path}': {e}");
                std::process::exit(1);
            }
        }
        None => {
            let mut stdout = io::stdout().lock();
            if let Err(e) = stdout.write_all(encoded.as_bytes()) {
                eprintln!("Error writing to stdout: {e}");
                std::process::exit(1);
            }
        }
    }
}

fn handle_import_files_command(registry: &FormatRegistry, config: &MusicocielConfig, matches: &ArgMatches) {
    let transform = transform_config(config, matches);
    let patterns: Vec<String> = matches
        .get_many::<String>("patterns")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();

    let Some(database) = matches
        .get_one::<String>("output-database")
        .cloned()
        .or_else(|| config.sync.database.clone())
    else {
        eprintln!("Error: no database given. Use --output-database or set sync.database.");
        std::process::exit(1);
    };

    let store = SqliteStore::open(&database).unwrap_or_else(|e| {
        eprintln!("Error opening database '{database}': {e}");
        std::process::exit(1);
    });

    let options = SyncOptions {
        input_format: matches.get_one::<String>("input-format").cloned(),
        transform,
        prune_others: matches.get_flag("delete-others"),
        namespace: Namespace::new(config.sync.namespace.clone()),
    };

    let report = Synchronizer::new(registry, store, options)
        .sync(&patterns)
        .unwrap_or_else(|e| {
            eprintln!("Error: {e}");
            std::process::exit(1);
        });

    print_report(&report);
    if !report.is_success() {
        std::process::exit(1);
    }
}

fn print_report(report: &SyncReport) {
    println!("imported: {}", report.imported);
    println!("already present: {}", report.conflicted);
    println!("deleted: {}", report.pruned);
    if !report.prune_failures.is_empty() {
        println!("not deleted: {}", report.prune_failed());
        for failure in &report.prune_failures {
            println!("  {:?}: {}", failure.id, failure.error);
        }
    }
}

/// Layers the transformation flags over the configured defaults and
/// validates the result. Exits on invalid values, before any file is touched.
fn transform_config(config: &MusicocielConfig, matches: &ArgMatches) -> TransformConfig {
    let options = transform_options(config, matches);
    options.validate().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    })
}

fn transform_options(config: &MusicocielConfig, matches: &ArgMatches) -> TransformOptions {
    let mut options = TransformOptions::from(&config.transform);
    if let Some(transpose) = matches.get_one::<String>("transpose") {
        options.transpose = Some(transpose.clone());
    }
    if let Some(alteration) = matches.get_one::<String>("alteration") {
        options.alteration = Some(alteration.clone());
    }
    options.reset_alterations |= matches.get_flag("reset-alterations");
    options.accept_unknown_chords |= matches.get_flag("accept-unknown-chords");
    options.normalize_chord_names |= matches.get_flag("normalize-chords");
    options
}

fn load_cli_config(explicit_path: Option<&str>) -> MusicocielConfig {
    let loader = Loader::new().with_optional_file("musicociel.toml");
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

/// Logs go to stderr so that converted output on stdout stays clean.
fn init_logging(config: &MusicocielConfig, verbosity: u8) {
    let filter = match verbosity {
        0 => EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&config.log.level))
            .unwrap_or_else(|_| EnvFilter::new("info")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use musicociel_babel::theory::Alteration;

    fn song_matches(args: &[&str]) -> ArgMatches {
        let registry = FormatRegistry::with_defaults();
        let matches = build_cli(&registry).try_get_matches_from(args).unwrap();
        let (_, song) = matches.subcommand().unwrap();
        let (_, sub) = song.subcommand().unwrap();
        sub.clone()
    }

    #[test]
    fn cli_definition_is_consistent() {
        build_cli(&FormatRegistry::with_defaults()).debug_assert();
    }

    #[test]
    fn flags_override_configured_transform() {
        let config = Loader::new()
            .set_override("transform.alteration", "b")
            .unwrap()
            .set_override("transform.normalize_chords", true)
            .unwrap()
            .build()
            .unwrap();
        let matches = song_matches(&[
            "musicociel", "song", "convert-file", "-t", "-3", "-a", "#", "-u",
        ]);

        let options = transform_options(&config, &matches);
        assert_eq!(options.transpose.as_deref(), Some("-3"));
        assert_eq!(options.alteration.as_deref(), Some("#"));
        assert!(options.accept_unknown_chords);
        assert!(options.normalize_chord_names);
        assert!(!options.reset_alterations);

        let config = options.validate().unwrap();
        assert_eq!(config.transpose_semitones, Some(-3));
        assert_eq!(config.default_alteration, Some(Alteration::Sharp));
    }

    #[test]
    fn configured_transform_applies_without_flags() {
        let config = Loader::new()
            .set_override("transform.alteration", "b")
            .unwrap()
            .build()
            .unwrap();
        let matches = song_matches(&["musicociel", "song", "import-files", "*.cho"]);

        let options = transform_options(&config, &matches);
        assert_eq!(options.transpose, None);
        assert_eq!(options.alteration.as_deref(), Some("b"));
    }

    #[test]
    fn import_files_takes_several_patterns() {
        let matches = song_matches(&[
            "musicociel", "song", "import-files", "a/*.cho", "b/*.txt", "--delete-others",
        ]);
        let patterns: Vec<&String> = matches.get_many::<String>("patterns").unwrap().collect();
        assert_eq!(patterns, vec!["a/*.cho", "b/*.txt"]);
        assert!(matches.get_flag("delete-others"));
    }

    #[test]
    fn format_listing_follows_registry_order() {
        let listing = format_listing(&FormatRegistry::with_defaults());
        let musicociel = listing.find("musicociel").unwrap();
        let chordpro = listing.find("chordpro").unwrap();
        let text = listing.find("  text").unwrap();
        assert!(musicociel < chordpro && chordpro < text);
        assert!(listing.contains(".cho"));
    }

    #[test]
    fn unknown_formats_are_usage_errors() {
        let registry = FormatRegistry::with_defaults();
        let result = build_cli(&registry).try_get_matches_from([
            "musicociel", "song", "convert-file", "--input-format", "pdf",
        ]);
        assert!(result.is_err());

        let result = build_cli(&registry).try_get_matches_from([
            "musicociel", "song", "convert-file", "--input-format", "auto",
        ]);
        assert!(result.is_ok());
    }
}
