//! pdfsplit - Split a PDF into page-range documents.
//!
//! Scans the input for content streams and writes one PDF per requested
//! page range.

mod cli;

use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::cli::Cli;
use pdfsplit::config::{Config, OverwriteMode};
use pdfsplit::error::SplitError;
use pdfsplit::output::{
    OutputFormatter, ProgressBar, ProgressStyle, display_plan, display_report,
};
use pdfsplit::split::{CancellationToken, plan_pdf, split_pdf};
use pdfsplit::validation::Validator;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli).await {
        eprintln!("{}", error_report(&err));
        process::exit(err.exit_code());
    }
}

/// The failure text shown to the user: a short summary, then the details
/// when they add anything.
fn error_report(err: &SplitError) -> String {
    let summary = err.user_message();
    let details = err.to_string();

    if details == summary {
        format!("Error: {summary}")
    } else {
        format!("Error: {summary}\n  {details}")
    }
}

/// Install the stderr diagnostics subscriber. `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "error" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(false),
        )
        .init();
}

/// Main application logic.
async fn run(cli: Cli) -> Result<(), SplitError> {
    cli.validate()?;
    let mut config = cli.to_config()?;

    let formatter = OutputFormatter::from_config(&config);

    if formatter.should_print() {
        formatter.section(&format!("{} v{}", pdfsplit::NAME, pdfsplit::VERSION));
        formatter.blank_line();
    }

    formatter.info(&format!("Scanning {}...", config.input.display()));
    let validator = Validator::new();
    let input_size = validator.validate_input(&config.input).await?;
    formatter.detail("Input size", &pdfsplit::utils::format_file_size(input_size));

    let plan = plan_pdf(&config).await?;
    formatter.detail("Segments", &plan.segment_count.to_string());

    if config.dry_run {
        if config.json {
            print_json(&plan)?;
        } else {
            display_plan(&formatter, &plan);
            formatter.blank_line();
            formatter.success("Dry run completed successfully");
            formatter.info(&format!(
                "  Outputs would go to: {}",
                config.effective_output_dir().display()
            ));
        }
        return Ok(());
    }

    for rejected in &plan.rejected {
        formatter.rejected_token(rejected);
    }

    let existing = validator.validate_output(&config, &plan.names()).await?;
    handle_output_overwrite(&mut config, &existing, &formatter)?;

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    let progress = if formatter.should_print() {
        let mut bar = ProgressBar::new(plan.outputs.len(), ProgressStyle::Bar);
        bar.set_message("Splitting");
        bar
    } else {
        ProgressBar::disabled()
    };

    let report = split_pdf(&config, cancel, progress).await?;

    if config.json {
        print_json(&report)?;
    } else {
        formatter.blank_line();
        for output in &report.outputs {
            formatter.delivered(output);
        }
        display_report(&formatter, &report);
    }

    match report.failures.first() {
        Some(failure) => Err(SplitError::delivery_failed(
            failure.name.clone(),
            failure.reason.clone(),
        )),
        None => Ok(()),
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), SplitError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| SplitError::other(format!("Failed to serialize report: {e}")))?;
    println!("{json}");
    Ok(())
}

/// Decide what happens to planned outputs that already exist.
///
/// On a confirmed prompt the config switches to [`OverwriteMode::Force`] so
/// delivery replaces the files.
fn handle_output_overwrite(
    config: &mut Config,
    existing: &[PathBuf],
    formatter: &OutputFormatter,
) -> Result<(), SplitError> {
    let Some(first) = existing.first() else {
        return Ok(());
    };

    match config.overwrite_mode {
        OverwriteMode::Force => Ok(()),
        OverwriteMode::NoClobber => Err(SplitError::output_exists(first.clone())),
        OverwriteMode::Prompt => {
            // Nobody to ask
            if formatter.is_quiet() {
                return Err(SplitError::output_exists(first.clone()));
            }

            for path in existing {
                formatter.warning(&format!("Output file already exists: {}", path.display()));
            }

            print!("Overwrite {} file(s)? [y/N]: ", existing.len());
            io::stdout().flush().ok();

            let mut response = String::new();
            io::stdin()
                .read_line(&mut response)
                .map_err(|err| SplitError::other(format!("Failed to read input: {err}")))?;

            let response = response.trim().to_lowercase();
            if response == "y" || response == "yes" {
                config.overwrite_mode = OverwriteMode::Force;
                Ok(())
            } else {
                Err(SplitError::Cancelled)
            }
        }
    }
}
