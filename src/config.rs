//! Configuration management for heic2jpg
//!
//! This module handles CLI argument parsing, logging setup and the fallback
//! rules that pick source and destination directories when they are not
//! given on the command line.

use crate::error::{ConvertError, Result};
use clap::builder::styling;
use clap::{value_parser, Arg, ArgMatches, ColorChoice, Command};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// Source directory used when `--input` is absent and it exists
pub const DEFAULT_SOURCE: &str = "raw";

/// Destination used next to [`DEFAULT_SOURCE`]
pub const DEFAULT_DESTINATION: &str = "converted";

/// Build the CLI command
pub fn build_cli() -> Command {
    let styles = styling::Styles::styled()
        .header(styling::AnsiColor::Green.on_default() | styling::Effects::BOLD)
        .usage(styling::AnsiColor::Green.on_default() | styling::Effects::BOLD)
        .literal(styling::AnsiColor::Blue.on_default() | styling::Effects::BOLD)
        .placeholder(styling::AnsiColor::Cyan.on_default());

    Command::new("heic2jpg")
        .about("heic2jpg - Convert HEIC photos to JPG and copy everything else")
        .version(env!("CARGO_PKG_VERSION"))
        .color(ColorChoice::Auto)
        .styles(styles)
        .arg(
            Arg::new("input")
                .short('i')
                .long("input")
                .help("Input directory containing photos")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .help("Output directory for converted photos")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging output")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("no_progress")
                .long("no-progress")
                .help("Disable progress indicators")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("no_pause")
                .long("no-pause")
                .help("Exit without waiting for Enter")
                .action(clap::ArgAction::SetTrue),
        )
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Source directory, if given
    pub input: Option<PathBuf>,

    /// Destination directory, if given
    pub output: Option<PathBuf>,

    /// Enable verbose logging
    pub verbose: bool,

    /// Disable progress bars
    pub no_progress: bool,

    /// Skip the closing "Press Enter" prompt
    pub no_pause: bool,
}

impl Config {
    /// Parse process arguments
    pub fn from_args() -> Result<Self> {
        Ok(Self::from_matches(&build_cli().get_matches()))
    }

    pub fn from_matches(matches: &ArgMatches) -> Self {
        Config {
            input: matches.get_one::<PathBuf>("input").cloned(),
            output: matches.get_one::<PathBuf>("output").cloned(),
            verbose: matches.get_flag("verbose"),
            no_progress: matches.get_flag("no_progress"),
            no_pause: matches.get_flag("no_pause"),
        }
    }

    /// Resolve source and destination, prompting on stdin if no source can
    /// be inferred.
    pub fn resolve_directories(&self) -> Result<(PathBuf, PathBuf)> {
        let source = match &self.input {
            Some(input) => input.clone(),
            None => {
                let stdin = std::io::stdin();
                let stdout = std::io::stdout();
                resolve_source_with(Path::new(DEFAULT_SOURCE), || {
                    println!("Default '{}' folder not found.", DEFAULT_SOURCE);
                    prompt_for_directory(stdin.lock(), stdout.lock())
                })?
            }
        };

        let destination = self
            .output
            .clone()
            .unwrap_or_else(|| default_destination(&source));

        info!(
            "Resolved directories: {} -> {}",
            source.display(),
            destination.display()
        );
        Ok((source, destination))
    }
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence; otherwise `--verbose` enables info-level
/// output and logging stays off so it does not garble the progress bar.
pub fn init_logging(verbose: bool) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(if verbose { "info" } else { "off" })
    });

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Use `fallback` if it exists, otherwise ask `prompt` for a directory
pub fn resolve_source_with<F>(fallback: &Path, prompt: F) -> Result<PathBuf>
where
    F: FnOnce() -> Result<PathBuf>,
{
    if fallback.exists() {
        Ok(fallback.to_path_buf())
    } else {
        prompt()
    }
}

/// `converted` beside the conventional `raw` folder, `<source>/converted`
/// for anything else.
pub fn default_destination(source: &Path) -> PathBuf {
    if source == Path::new(DEFAULT_SOURCE) {
        PathBuf::from(DEFAULT_DESTINATION)
    } else {
        source.join(DEFAULT_DESTINATION)
    }
}

/// Keep asking until an existing path is entered. End of input aborts.
pub fn prompt_for_directory<R: BufRead, W: Write>(mut input: R, mut output: W) -> Result<PathBuf> {
    loop {
        write!(output, "Please enter the path to your photos: ")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Err(ConvertError::PromptAborted.into());
        }

        let entered = clean_entered_path(&line);
        if entered.is_empty() {
            continue;
        }

        let path = PathBuf::from(entered);
        if path.exists() {
            return Ok(path);
        }
        writeln!(output, "Error: Directory not found. Try again.")?;
    }
}

/// Strip whitespace and the quotes a shell drag-and-drop leaves around paths
fn clean_entered_path(line: &str) -> &str {
    line.trim().trim_matches('"').trim_matches('\'')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_cli_parses_short_flags() {
        let matches = build_cli()
            .try_get_matches_from(["heic2jpg", "-i", "photos", "-o", "out", "--no-pause"])
            .expect("arguments should parse");
        let config = Config::from_matches(&matches);

        assert_eq!(config.input, Some(PathBuf::from("photos")));
        assert_eq!(config.output, Some(PathBuf::from("out")));
        assert!(config.no_pause);
        assert!(!config.verbose);
        assert!(!config.no_progress);
    }

    #[test]
    fn test_cli_defaults_are_unset() {
        let matches = build_cli()
            .try_get_matches_from(["heic2jpg"])
            .expect("no arguments should parse");
        let config = Config::from_matches(&matches);

        assert!(config.input.is_none());
        assert!(config.output.is_none());
    }

    #[test]
    fn test_default_destination() {
        assert_eq!(
            default_destination(Path::new("raw")),
            PathBuf::from("converted")
        );
        assert_eq!(
            default_destination(Path::new("/photos/trip")),
            PathBuf::from("/photos/trip/converted")
        );
    }

    #[test]
    fn test_explicit_directories_win() {
        let config = Config {
            input: Some(PathBuf::from("in")),
            output: Some(PathBuf::from("out")),
            ..Default::default()
        };

        let (source, destination) = config.resolve_directories().unwrap();
        assert_eq!(source, PathBuf::from("in"));
        assert_eq!(destination, PathBuf::from("out"));
    }

    #[test]
    fn test_resolve_source_prefers_existing_fallback() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");

        let source = resolve_source_with(temp_dir.path(), || panic!("should not prompt")).unwrap();
        assert_eq!(source, temp_dir.path());

        let missing = temp_dir.path().join("raw");
        let source = resolve_source_with(&missing, || Ok(PathBuf::from("picked"))).unwrap();
        assert_eq!(source, PathBuf::from("picked"));
    }

    #[test]
    fn test_prompt_retries_until_path_exists() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let answers = format!(
            "\n/definitely/not/here\n\"{}\"\n",
            temp_dir.path().display()
        );
        let mut shown = Vec::new();

        let path = prompt_for_directory(Cursor::new(answers), &mut shown).unwrap();

        assert_eq!(path, temp_dir.path());
        let shown = String::from_utf8(shown).unwrap();
        assert_eq!(shown.matches("Directory not found").count(), 1);
    }

    #[test]
    fn test_prompt_aborts_on_eof() {
        let err = prompt_for_directory(Cursor::new(""), Vec::new()).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<ConvertError>(),
            Some(ConvertError::PromptAborted)
        ));
    }
}
