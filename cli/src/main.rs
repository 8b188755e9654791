//! read-docx - print the paragraph text of a Word document
//!
//! Reads the body paragraphs of a .docx file and writes them to stdout,
//! one paragraph per line.

use clap::error::ErrorKind;
use clap::{Parser, ValueEnum};
use colored::*;
use docx_text::render::{self, JsonFormat, TextOptions};
use std::ffi::OsString;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

const USAGE: &str = "Usage: read-docx <path_to_docx>";

/// Print the paragraph text of a Word document
#[derive(Parser)]
#[command(
    name = "read-docx",
    author = "iyulab",
    version,
    about = "Print the paragraph text of a Word document",
    long_about = "read-docx - Print the paragraph text of a Word (.docx) document.\n\n\
                  Paragraphs are written in document order, one per line. \
                  Blank paragraphs are kept as blank lines."
)]
struct Cli {
    /// Input .docx file
    input: Option<PathBuf>,

    /// Additional positional arguments are ignored
    #[arg(hide = true)]
    extra: Vec<PathBuf>,

    /// Output file path (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Output compact JSON (no indentation)
    #[arg(long)]
    compact: bool,

    /// Apply Unicode NFC normalization to text output
    #[arg(long)]
    normalize: bool,

    /// Drop empty paragraphs from text output
    #[arg(long)]
    skip_empty: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Output format
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Paragraph text, one paragraph per line
    Text,
    /// Paragraphs and metadata as JSON
    Json,
}

fn main() {
    let cli = match parse_args(std::env::args_os().collect()) {
        Ok(cli) => cli,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => e.exit(),
            _ => {
                eprint!("{}", e);
                println!("{}", USAGE);
                std::process::exit(1);
            }
        },
    };
    init_logging(cli.verbose);

    let Some(input) = cli.input.as_deref() else {
        println!("{}", USAGE);
        std::process::exit(1);
    };

    if !cli.extra.is_empty() {
        log::debug!("Ignoring {} extra argument(s)", cli.extra.len());
    }

    let content = match extract(input, &cli) {
        Ok(content) => content,
        Err(e) => {
            println!("Error reading file: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = write_output(cli.output.as_deref(), &content) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }

    if let Some(path) = cli.output.as_deref() {
        println!("{} Wrote {}", "✓".green().bold(), path.display());
    }
}

/// Parse the command line.
///
/// When the arguments don't parse but the first one names an existing
/// file (`-notes.docx`), that file is read with default options.
fn parse_args(args: Vec<OsString>) -> Result<Cli, clap::Error> {
    let err = match Cli::try_parse_from(args.iter().cloned()) {
        Ok(cli) => return Ok(cli),
        Err(e) => e,
    };
    if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
        return Err(err);
    }

    match args.get(1) {
        Some(path) if Path::new(path).is_file() => {
            let bin = args.first().cloned().unwrap_or_else(|| "read-docx".into());
            Cli::try_parse_from([bin, "--".into(), path.clone()]).map_err(|_| err)
        }
        _ => Err(err),
    }
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn extract(input: &Path, cli: &Cli) -> docx_text::Result<String> {
    let doc = docx_text::parse_file(input)?;
    log::info!(
        "Extracted {} paragraphs from {}",
        doc.paragraphs.len(),
        input.display()
    );

    match cli.format {
        OutputFormat::Text => {
            let options = TextOptions::new()
                .with_normalize_unicode(cli.normalize)
                .with_skip_empty(cli.skip_empty);
            render::to_text(&doc, &options)
        }
        OutputFormat::Json => {
            let format = if cli.compact {
                JsonFormat::Compact
            } else {
                JsonFormat::Pretty
            };
            render::to_json(&doc, format)
        }
    }
}

fn write_output(path: Option<&Path>, content: &str) -> io::Result<()> {
    match path {
        Some(p) => fs::write(p, content),
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            writeln!(handle, "{}", content)?;
            handle.flush()
        }
    }
}
