//! CLI argument parsing for pdfsplit.
//!
//! This module defines the command-line interface structure using `clap`.
//! It is also compiled into `build.rs` to render the man page, so it only
//! depends on `clap` and the library.

use clap::Parser;
use std::path::PathBuf;

use pdfsplit::config::{Config, OverwriteMode};
use pdfsplit::error::{Result, SplitError};
use pdfsplit::split::AssemblyMode;

/// Split a PDF into page-range documents.
///
/// pdfsplit scans the raw bytes of a PDF for content streams, numbers them
/// as pages, and writes one new PDF per requested page range.
#[derive(Parser, Debug)]
#[command(name = "pdfsplit")]
#[command(version)]
#[command(about = "Split a PDF into page-range documents", long_about = None)]
#[command(author)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Input PDF file to split
    #[arg(required = true, value_name = "FILE")]
    pub input: PathBuf,

    /// Page ranges to extract, one output file per range
    ///
    /// Comma-separated list of pages or inclusive ranges, 1-indexed.
    /// Invalid entries are skipped with a warning.
    ///
    /// Examples:
    ///   --ranges "1-3"        # One file with pages 1 to 3
    ///   --ranges "1,3"        # Two files: page 1, and page 3
    ///   --ranges "1-3,5,7-9"  # Three files
    #[arg(short, long, value_name = "RANGES")]
    pub ranges: String,

    /// Directory for the output files
    ///
    /// Defaults to the directory of the input file.
    #[arg(short, long, value_name = "DIR", env = "PDFSPLIT_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Write raw outputs (header + stream bytes + trailer)
    ///
    /// Reproduces the minimal byte concatenation. Such files have no
    /// cross-reference table and most PDF readers will not open them.
    #[arg(long)]
    pub raw: bool,

    /// Dry run - show which files would be created without writing them
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Verbose output - show detailed diagnostics
    #[arg(short, long)]
    pub verbose: bool,

    /// Force overwrite of existing output files without confirmation
    #[arg(short, long)]
    pub force: bool,

    /// Never overwrite existing output files
    #[arg(long, conflicts_with = "force")]
    pub no_clobber: bool,

    /// Suppress all non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Keep going when an output cannot be written
    ///
    /// By default pdfsplit stops at the first failed output. Files that
    /// were already written are kept either way.
    #[arg(long)]
    pub continue_on_error: bool,

    /// Re-open every output with a PDF parser before writing it
    #[arg(long, conflicts_with = "raw")]
    pub verify: bool,

    /// Print a JSON report instead of human-readable output
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Convert CLI arguments into a validated Config.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration validation fails.
    pub fn to_config(&self) -> Result<Config> {
        let overwrite_mode = if self.force {
            OverwriteMode::Force
        } else if self.no_clobber {
            OverwriteMode::NoClobber
        } else {
            OverwriteMode::Prompt
        };

        let mode = if self.raw {
            AssemblyMode::Raw
        } else {
            AssemblyMode::Structured
        };

        let config = Config {
            input: self.input.clone(),
            ranges: self.ranges.clone(),
            output_dir: self.output_dir.clone(),
            dry_run: self.dry_run,
            verbose: self.verbose,
            quiet: self.quiet,
            overwrite_mode,
            mode,
            continue_on_error: self.continue_on_error,
            verify: self.verify,
            json: self.json,
        };

        config.validate().map_err(|e| {
            SplitError::invalid_config(format!("Configuration validation failed: {e}"))
        })?;

        Ok(config)
    }

    /// Validate CLI arguments before any file is touched.
    ///
    /// # Errors
    ///
    /// Returns an error if the range argument is blank.
    pub fn validate(&self) -> Result<()> {
        if self.ranges.trim().is_empty() {
            return Err(SplitError::invalid_config(
                "No page ranges specified. Use --ranges, e.g. --ranges 1-3,5",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("pdfsplit").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_minimal_arguments() {
        let cli = parse(&["in.pdf", "--ranges", "1-3"]);
        let config = cli.to_config().unwrap();

        assert_eq!(config.input, PathBuf::from("in.pdf"));
        assert_eq!(config.ranges, "1-3");
        assert_eq!(config.mode, AssemblyMode::Structured);
        assert_eq!(config.overwrite_mode, OverwriteMode::Prompt);
    }

    #[rstest]
    #[case(&["-f"], OverwriteMode::Force)]
    #[case(&["--no-clobber"], OverwriteMode::NoClobber)]
    #[case(&[], OverwriteMode::Prompt)]
    fn test_overwrite_mode(#[case] extra: &[&str], #[case] expected: OverwriteMode) {
        let mut args = vec!["in.pdf", "-r", "1"];
        args.extend_from_slice(extra);
        assert_eq!(parse(&args).to_config().unwrap().overwrite_mode, expected);
    }

    #[test]
    fn test_raw_mode() {
        let config = parse(&["in.pdf", "-r", "2", "--raw"]).to_config().unwrap();
        assert_eq!(config.mode, AssemblyMode::Raw);
    }

    #[test]
    fn test_flags() {
        let config = parse(&[
            "in.pdf",
            "-r",
            "1,2",
            "-o",
            "out",
            "-n",
            "--continue-on-error",
            "--verify",
            "--json",
        ])
        .to_config()
        .unwrap();

        assert_eq!(config.output_dir, Some(PathBuf::from("out")));
        assert!(config.dry_run);
        assert!(config.continue_on_error);
        assert!(config.verify);
        assert!(config.json);
    }

    #[test]
    fn test_conflicting_flags() {
        let argv = |extra: &[&str]| {
            let mut args = vec!["pdfsplit", "in.pdf", "-r", "1"];
            args.extend_from_slice(extra);
            Cli::try_parse_from(args)
        };

        assert!(argv(&["-f", "--no-clobber"]).is_err());
        assert!(argv(&["-q", "-v"]).is_err());
        assert!(argv(&["--raw", "--verify"]).is_err());
    }

    #[test]
    fn test_ranges_required() {
        assert!(Cli::try_parse_from(["pdfsplit", "in.pdf"]).is_err());
    }

    #[test]
    fn test_blank_ranges_rejected() {
        let cli = parse(&["in.pdf", "-r", "  "]);
        assert!(matches!(
            cli.validate(),
            Err(SplitError::InvalidConfig { .. })
        ));
        assert!(cli.to_config().is_err());
    }
}
