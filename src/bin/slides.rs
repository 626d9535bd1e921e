//! CLI binary for slides-migrate.
//!
//! A thin shim over the library crate that maps CLI flags to the
//! `ConvertConfig` / `SplitConfig` / `JoinConfig` builders and prints
//! results.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use slides_migrate::{
    convert_file, join_file, split_file, ConvertConfig, ConvertOutcome, FixedIdBase, JoinConfig,
    JoinSource, SplitConfig,
};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

/// Exit code for every failure, matching the historical scripts.
const EXIT_ERROR: u8 = 2;

const AFTER_HELP: &str = r#"EXAMPLES:
  # Flatten slides.json into slides_converted.json (backup created)
  slides convert

  # Flatten a specific file in place
  slides convert deck/slides.json --inplace

  # Reproducible ids (tests, diffs)
  slides convert --id-base 20250101-000000-

  # One file per chapter, plus a chapters.json manifest
  slides split slides.json --manifest

  # Merge chapters.json + slides-<id>.json back into one array
  slides join --dir site -o slides_joined.json

FILES:
  slides.json              input deck (array or chapter object)
  slides.json.bak.<stamp>  backup written before any overwrite
  slides-<chapter>.json    per-chapter files written by `split`
  chapters.json            chapter manifest: [{"id": "01", "title": "..."}]

EXIT STATUS:
  0  success, or the deck was already a flat array
  2  any error (missing file, invalid JSON, unexpected format, write failure)
"#;

/// Flatten chapter-keyed slide decks and split them back into chapters.
#[derive(Parser, Debug)]
#[command(
    name = "slides",
    version,
    about = "Flatten chapter-keyed slide decks and split them back into chapters",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true, env = "SLIDES_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, global = true, env = "SLIDES_QUIET")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Flatten a chapter object into one ordered array of slides.
    Convert(ConvertArgs),
    /// Write one file per chapter from a flat array.
    Split(SplitArgs),
    /// Merge per-chapter files listed in the manifest into one array.
    Join(JoinArgs),
}

#[derive(clap::Args, Debug)]
struct ConvertArgs {
    /// Input deck.
    #[arg(default_value = "slides.json", env = "SLIDES_INPUT")]
    input: PathBuf,

    /// Overwrite the input instead of writing --output.
    #[arg(long, alias = "in-place", env = "SLIDES_INPLACE")]
    inplace: bool,

    /// Output file name, written next to the input.
    #[arg(short, long, default_value = "slides_converted.json", env = "SLIDES_OUTPUT")]
    output: String,

    /// Do not back up the input before writing.
    #[arg(long, env = "SLIDES_NO_BACKUP")]
    no_backup: bool,

    /// Fixed prefix for generated ids instead of the current time.
    #[arg(long, env = "SLIDES_ID_BASE")]
    id_base: Option<String>,

    /// Print the run statistics as JSON on stdout.
    #[arg(long, env = "SLIDES_JSON")]
    json: bool,
}

#[derive(clap::Args, Debug)]
struct SplitArgs {
    /// Flat input deck.
    #[arg(default_value = "slides.json", env = "SLIDES_INPUT")]
    input: PathBuf,

    /// Directory for the chapter files (default: the input's directory).
    #[arg(long, env = "SLIDES_OUT_DIR")]
    out_dir: Option<PathBuf>,

    /// Chapter files are named <PREFIX><chapter>.json.
    #[arg(long, default_value = "slides-", env = "SLIDES_PREFIX")]
    prefix: String,

    /// Chapter for slides that have none.
    #[arg(long, default_value = "01", env = "SLIDES_DEFAULT_CHAPTER")]
    default_chapter: String,

    /// Also write a chapter manifest.
    #[arg(long, env = "SLIDES_MANIFEST")]
    manifest: bool,

    /// Manifest file name.
    #[arg(long, default_value = "chapters.json", env = "SLIDES_MANIFEST_NAME")]
    manifest_name: String,

    /// Do not back up files before overwriting them.
    #[arg(long, env = "SLIDES_NO_BACKUP")]
    no_backup: bool,

    /// Print the run statistics as JSON on stdout.
    #[arg(long, env = "SLIDES_JSON")]
    json: bool,
}

#[derive(clap::Args, Debug)]
struct JoinArgs {
    /// Directory holding the manifest and chapter files.
    #[arg(long, default_value = ".", env = "SLIDES_DIR")]
    dir: PathBuf,

    /// Manifest file name.
    #[arg(long, default_value = "chapters.json", env = "SLIDES_MANIFEST_NAME")]
    manifest_name: String,

    /// Chapter files are named <PREFIX><id>.json.
    #[arg(long, default_value = "slides-", env = "SLIDES_PREFIX")]
    prefix: String,

    /// Single-file deck used when the manifest is unusable.
    #[arg(long, default_value = "slides.json", env = "SLIDES_FALLBACK")]
    fallback: String,

    /// Output path for the merged array.
    #[arg(short, long, default_value = "slides_joined.json", env = "SLIDES_OUTPUT")]
    output: PathBuf,

    /// Print the run statistics as JSON on stdout.
    #[arg(long, env = "SLIDES_JSON")]
    json: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", red("[ERROR]"), e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        Command::Convert(args) => run_convert(args, cli.quiet),
        Command::Split(args) => run_split(args, cli.quiet),
        Command::Join(args) => run_join(args, cli.quiet),
    }
}

fn run_convert(args: &ConvertArgs, quiet: bool) -> Result<()> {
    let mut builder = ConvertConfig::builder()
        .in_place(args.inplace)
        .output_name(args.output.as_str())
        .backup(!args.no_backup);
    if let Some(ref base) = args.id_base {
        builder = builder.id_base(Arc::new(FixedIdBase::new(base.as_str())));
    }
    let config = builder.build().context("Invalid configuration")?;

    let outcome = convert_file(&args.input, &config)
        .with_context(|| format!("Conversion of {} failed", args.input.display()))?;

    if args.json {
        print_json(&outcome)?;
    }
    if quiet {
        return Ok(());
    }

    match outcome {
        ConvertOutcome::AlreadyFlat { path, slides } => {
            eprintln!(
                "{} {} is already an array ({} slides). Nothing to convert.",
                green("[OK]"),
                bold(&path.display().to_string()),
                slides
            );
        }
        ConvertOutcome::Converted(stats) => {
            if let Some(ref backup) = stats.backup_path {
                eprintln!("{} Backup: {}", cyan("[INFO]"), backup.display());
            }
            for issue in &stats.issues {
                eprintln!("{} {}", cyan("[WARN]"), issue);
            }
            eprintln!(
                "{} {} chapters → {} slides  →  {}",
                green("[OK]"),
                stats.chapters,
                bold(&stats.slides.to_string()),
                bold(&stats.output_path.display().to_string()),
            );
            if stats.skipped > 0 {
                eprintln!("   {} entries skipped", red(&stats.skipped.to_string()));
            }
            eprintln!("   {}", dim(&format!("id base {}  {}ms", stats.id_base, stats.total_duration_ms)));
        }
    }
    Ok(())
}

fn run_split(args: &SplitArgs, quiet: bool) -> Result<()> {
    let mut builder = SplitConfig::builder()
        .file_prefix(args.prefix.as_str())
        .default_chapter(args.default_chapter.as_str())
        .write_manifest(args.manifest)
        .manifest_name(args.manifest_name.as_str())
        .backup(!args.no_backup);
    if let Some(ref dir) = args.out_dir {
        builder = builder.output_dir(dir);
    }
    let config = builder.build().context("Invalid configuration")?;

    let stats = split_file(&args.input, &config)
        .with_context(|| format!("Split of {} failed", args.input.display()))?;

    if args.json {
        print_json(&stats)?;
    }
    if quiet {
        return Ok(());
    }

    for file in &stats.files {
        eprintln!(
            "  {} {}  {}",
            green("✓"),
            file.path.display(),
            dim(&format!("({} entries)", file.slides))
        );
    }
    if let Some(ref manifest) = stats.manifest_path {
        eprintln!("  {} {}", green("✓"), manifest.display());
    }
    if stats.skipped > 0 {
        eprintln!("{} {} entries were not slides and were skipped", cyan("[WARN]"), stats.skipped);
    }
    eprintln!(
        "{} Split complete: {} slides in {} chapter files.",
        green("[OK]"),
        bold(&stats.total_slides().to_string()),
        stats.files.len()
    );
    Ok(())
}

fn run_join(args: &JoinArgs, quiet: bool) -> Result<()> {
    let config = JoinConfig::builder()
        .dir(&args.dir)
        .manifest_name(args.manifest_name.as_str())
        .file_prefix(args.prefix.as_str())
        .fallback_name(args.fallback.as_str())
        .build()
        .context("Invalid configuration")?;

    let stats = join_file(&config, &args.output)
        .with_context(|| format!("Join into {} failed", args.output.display()))?;

    if args.json {
        print_json(&stats)?;
    }
    if quiet {
        return Ok(());
    }

    for chapter in &stats.missing {
        eprintln!("{} chapter {} not loaded", cyan("[WARN]"), chapter);
    }
    let source = match stats.source {
        JoinSource::Manifest => format!("{} chapter files", stats.loaded.len()),
        JoinSource::Fallback => "fallback deck".to_string(),
        JoinSource::Empty => "nothing (no manifest, no fallback)".to_string(),
    };
    eprintln!(
        "{} {} slides from {}  →  {}",
        green("[OK]"),
        bold(&stats.slides.to_string()),
        source,
        bold(&stats.output_path.display().to_string())
    );
    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialise output")?;
    println!("{json}");
    Ok(())
}
