//! Command-line interface for confined zip extraction.
//!
//! This CLI extracts zip archives entry by entry, refusing any entry that
//! would land outside the output directory, and lists archive contents.

use clap::{Parser, Subcommand, ValueEnum};
use extractor::{ExtractError, ExtractOptions, ExtractStats, FailurePolicy, OverwriteMode};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, warn};

/// Exit code when an archive contained a refused entry.
const EXIT_SECURITY: i32 = 2;

#[derive(Parser, Debug)]
#[command(name = "zipguard")]
#[command(version, about = "Extract zip archives without escaping the output directory", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Extract one or more archives
    Extract {
        /// Archive files to extract
        #[arg(required = true)]
        archives: Vec<PathBuf>,

        /// Output directory
        #[arg(short, long)]
        out: PathBuf,

        /// Keep going after a refused or failed entry
        #[arg(long)]
        keep_going: bool,

        /// What to do with files that already exist
        #[arg(long, value_enum, default_value_t = Overwrite::Replace)]
        overwrite: Overwrite,

        /// Size limit in bytes
        #[arg(long)]
        size_limit: Option<u64>,
    },

    /// List archive entries
    List {
        /// Archive file to list
        archive: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Overwrite {
    Replace,
    Skip,
}

impl From<Overwrite> for OverwriteMode {
    fn from(mode: Overwrite) -> Self {
        match mode {
            Overwrite::Replace => OverwriteMode::Replace,
            Overwrite::Skip => OverwriteMode::Skip,
        }
    }
}

/// How a command ended, when it did not fail outright.
#[derive(Debug, PartialEq, Eq)]
enum Outcome {
    Clean,
    EntriesRefused,
    EntriesFailed,
}

/// Classifies a finished best-effort run. A refused entry outranks a failed one.
fn outcome_for(stats: &ExtractStats) -> Outcome {
    if !stats.rejected.is_empty() {
        Outcome::EntriesRefused
    } else if !stats.failed.is_empty() {
        Outcome::EntriesFailed
    } else {
        Outcome::Clean
    }
}

fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Extract {
            archives,
            out,
            keep_going,
            overwrite,
            size_limit,
        } => {
            let options = build_options(keep_going, overwrite, size_limit);
            handle_extract(&archives, &out, &options)
        }
        Commands::List { archive, json } => handle_list(&archive, json),
    };

    match result {
        Ok(Outcome::Clean) => {}
        Ok(Outcome::EntriesRefused) => process::exit(EXIT_SECURITY),
        Ok(Outcome::EntriesFailed) => process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(exit_code(&e));
        }
    }
}

fn build_options(keep_going: bool, overwrite: Overwrite, size_limit: Option<u64>) -> ExtractOptions {
    let defaults = ExtractOptions::default();
    ExtractOptions {
        failure_policy: if keep_going {
            FailurePolicy::BestEffort
        } else {
            FailurePolicy::AbortOnFirst
        },
        overwrite: overwrite.into(),
        size_limit_bytes: size_limit.or(defaults.size_limit_bytes),
    }
}

fn exit_code(e: &ExtractError) -> i32 {
    if e.is_security() {
        EXIT_SECURITY
    } else {
        1
    }
}

fn handle_extract(
    archives: &[PathBuf],
    out: &Path,
    options: &ExtractOptions,
) -> Result<Outcome, ExtractError> {
    let cancel_flag = Arc::new(AtomicBool::new(false));
    let handler_flag = Arc::clone(&cancel_flag);
    if let Err(e) = ctrlc::set_handler(move || handler_flag.store(true, Ordering::Relaxed)) {
        warn!(error = %e, "could not install Ctrl-C handler");
    }

    let mut outcome = Outcome::Clean;

    for archive in archives {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner} {prefix} {wide_msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_prefix(archive.display().to_string());
        spinner.enable_steady_tick(Duration::from_millis(100));

        let progress_spinner = spinner.clone();
        let progress_cb = move |file: &str, bytes: u64, _total: Option<u64>| {
            progress_spinner.set_message(format!("{file} ({bytes} bytes)"));
            true
        };

        let result = extractor::extract(archive, out, options, &progress_cb, cancel_flag.clone());
        spinner.finish_and_clear();

        let stats = result.inspect_err(|e| {
            error!(archive = %archive.display(), error = %e, "extraction failed");
        })?;

        report(archive, &stats);
        outcome = match (outcome, outcome_for(&stats)) {
            (Outcome::EntriesRefused, _) | (_, Outcome::EntriesRefused) => Outcome::EntriesRefused,
            (Outcome::EntriesFailed, _) | (_, Outcome::EntriesFailed) => Outcome::EntriesFailed,
            _ => Outcome::Clean,
        };
    }

    Ok(outcome)
}

fn report(archive: &Path, stats: &ExtractStats) {
    println!(
        "{}: {} files, {} bytes in {}s",
        archive.display(),
        stats.files_extracted,
        stats.bytes_written,
        stats.duration.as_secs()
    );

    if stats.skipped > 0 {
        println!("  skipped {} existing files", stats.skipped);
    }
    for name in &stats.rejected {
        println!("  refused {}", name);
    }
    for (name, cause) in &stats.failed {
        println!("  failed {}: {}", name, cause);
    }
}

fn handle_list(archive: &Path, json: bool) -> Result<Outcome, ExtractError> {
    let entries = extractor::list(archive)?;

    if json {
        let rendered = serde_json::to_string_pretty(&entries)
            .map_err(|e| ExtractError::Io(std::io::Error::other(e)))?;
        println!("{}", rendered);
    } else {
        for entry in &entries {
            let kind = if entry.is_directory { "dir " } else { "file" };
            let lock = if entry.encrypted { " (encrypted)" } else { "" };
            println!("{} {:>12} {}{}", kind, entry.size, entry.path, lock);
        }
        println!("{} entries", entries.len());
    }

    Ok(Outcome::Clean)
}
