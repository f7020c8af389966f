//! Configuration module for pdfsplit.
//!
//! This module holds the validated settings that drive one split operation.
//! The CLI builds a [`Config`] from its arguments; library users can construct
//! one directly. It handles:
//! - Validation of option combinations
//! - Output directory resolution
//! - Overwrite policy

use anyhow::{Result, bail};

use crate::SplitError;
use crate::split::AssemblyMode;
use std::{
    path::{Path, PathBuf},
    str::FromStr,
};

/// Output file overwrite behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverwriteMode {
    /// Prompt the user before overwriting (default).
    #[default]
    Prompt,
    /// Always overwrite without prompting.
    Force,
    /// Never overwrite, error if file exists.
    NoClobber,
}

impl FromStr for OverwriteMode {
    type Err = SplitError;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_lowercase().as_str() {
            "prompt" => Ok(Self::Prompt),
            "force" => Ok(Self::Force),
            "no-clobber" | "noclobber" => Ok(Self::NoClobber),
            _ => Err(SplitError::invalid_config(format!(
                "Invalid overwrite mode: {s}. Must be one of: prompt, force, no-clobber"
            ))),
        }
    }
}

/// Complete configuration for a split operation.
#[derive(Debug, Clone)]
pub struct Config {
    /// Input PDF file path.
    pub input: PathBuf,

    /// Page range list, e.g. `1-3,5,7-9`.
    pub ranges: String,

    /// Directory for the output files (None = next to the input).
    pub output_dir: Option<PathBuf>,

    /// Dry run mode - plan the split without writing anything.
    pub dry_run: bool,

    /// Verbose output mode.
    pub verbose: bool,

    /// Quiet mode - suppress non-error output.
    pub quiet: bool,

    /// File overwrite behavior.
    pub overwrite_mode: OverwriteMode,

    /// How output documents are laid out.
    pub mode: AssemblyMode,

    /// Keep going when one output cannot be delivered.
    pub continue_on_error: bool,

    /// Re-parse structured outputs with lopdf before delivering them.
    pub verify: bool,

    /// Print a machine-readable report instead of human output.
    pub json: bool,
}

impl Config {
    /// Configuration with defaults for everything but the input and ranges.
    pub fn new(input: impl Into<PathBuf>, ranges: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            ranges: ranges.into(),
            output_dir: None,
            dry_run: false,
            verbose: false,
            quiet: false,
            overwrite_mode: OverwriteMode::default(),
            mode: AssemblyMode::default(),
            continue_on_error: false,
            verify: false,
            json: false,
        }
    }

    /// Validate the configuration.
    ///
    /// Checks for logical inconsistencies and invalid combinations.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The range list is blank
    /// - Verbose and quiet modes are both enabled
    /// - Verification is requested for raw output
    /// - The output directory exists but is not a directory
    pub fn validate(&self) -> Result<()> {
        if self.ranges.trim().is_empty() {
            bail!("No page ranges specified");
        }

        if self.verbose && self.quiet {
            bail!("Cannot use both --verbose and --quiet");
        }

        if self.verify && self.mode == AssemblyMode::Raw {
            bail!("--verify needs structured output; raw output is not a parseable PDF");
        }

        if let Some(dir) = &self.output_dir
            && dir.exists()
            && !dir.is_dir()
        {
            bail!("Output path is not a directory: {}", dir.display());
        }

        Ok(())
    }

    /// Directory the outputs are written to.
    ///
    /// Falls back to the input's parent directory, then the current directory.
    pub fn effective_output_dir(&self) -> PathBuf {
        self.output_dir
            .clone()
            .or_else(|| {
                self.input
                    .parent()
                    .filter(|p| !p.as_os_str().is_empty())
                    .map(Path::to_path_buf)
            })
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Check if output should be displayed.
    ///
    /// Returns false if in quiet or JSON mode and not doing a dry run.
    pub fn should_print(&self) -> bool {
        (!self.quiet && !self.json) || self.dry_run
    }
}
