//! Error types for pdfsplit.
//!
//! This module defines all error types that can occur while splitting a PDF.
//! Errors carry enough context to be actionable on the command line, and each
//! one maps to a short [`user_message`](SplitError::user_message) for callers
//! that only surface a single human-readable string.
//!
//! # Error Categories
//!
//! - **I/O Errors**: File not found, permission denied, etc.
//! - **Structure Errors**: `stream`/`endstream` markers that do not pair up
//! - **Range Errors**: No usable page range in the user's input
//! - **Delivery Errors**: An assembled document could not be persisted

use std::io;
use std::path::PathBuf;

/// Result type alias for pdfsplit operations.
pub type Result<T> = std::result::Result<T, SplitError>;

/// Main error type for pdfsplit operations.
#[derive(Debug, thiserror::Error)]
pub enum SplitError {
    /// Input file was not found.
    #[error("File not found: {}", path.display())]
    FileNotFound {
        /// Path to the file that was not found.
        path: PathBuf,
    },

    /// Input file is not accessible (permission denied, etc.).
    #[error("Cannot access file: {}\n  Reason: {source}", path.display())]
    FileNotAccessible {
        /// Path to the inaccessible file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Path exists but is not a regular file.
    #[error("Not a file: {}", path.display())]
    NotAFile {
        /// Path that is not a file.
        path: PathBuf,
    },

    /// Input does not start with a `%PDF-` signature.
    #[error(
        "Not a PDF file: {}\n  Hint: the file does not start with a %PDF- header",
        path.display()
    )]
    NotAPdf {
        /// Path to the rejected file.
        path: PathBuf,
    },

    /// The counts of `stream` and `endstream` markers disagree, or a pair is inverted.
    #[error(
        "Invalid PDF structure: found {stream_count} 'stream' and \
         {endstream_count} 'endstream' marker(s)\n  Details: {details}"
    )]
    StructuralMismatch {
        /// Number of opening `stream` keywords.
        stream_count: usize,
        /// Number of closing `endstream` keywords.
        endstream_count: usize,
        /// What exactly failed to line up.
        details: String,
    },

    /// Every token of the range input failed validation.
    #[error(
        "No valid page ranges in '{input}'\n  Document has {segment_count} segment(s). \
         Use ranges like '1-3,5'"
    )]
    NoValidRanges {
        /// The raw range input.
        input: String,
        /// Number of segments available in the document.
        segment_count: usize,
    },

    /// The delivery collaborator failed to persist an output document.
    #[error("Failed to deliver '{name}'\n  Reason: {reason}")]
    DeliveryFailed {
        /// Suggested name of the output document.
        name: String,
        /// Reason for the failure.
        reason: String,
    },

    /// Output file already exists and overwrite is not allowed.
    #[error(
        "Output file already exists: {}\n  Use --force to overwrite or choose a \
         different output directory",
        path.display()
    )]
    OutputExists {
        /// Path to the existing output file.
        path: PathBuf,
    },

    /// Failed to write an output file.
    #[error("Failed to write to output file: {}\n  Reason: {source}", path.display())]
    FailedToWrite {
        /// Path being written to.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A structured output could not be parsed back as a PDF.
    #[error("Output verification failed for '{name}': {reason}")]
    VerificationFailed {
        /// Name of the output document.
        name: String,
        /// Parser error reported while re-reading the output.
        reason: String,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of what's wrong with the configuration.
        message: String,
    },

    /// User cancelled the operation.
    #[error("Operation cancelled by user")]
    Cancelled,

    /// Generic I/O error.
    #[error("I/O error: {source}")]
    Io {
        /// Underlying I/O error.
        #[from]
        source: io::Error,
    },

    /// Generic error with a custom message.
    #[error("{message}")]
    Other {
        /// Error message.
        message: String,
    },
}

impl From<lopdf::Error> for SplitError {
    fn from(err: lopdf::Error) -> Self {
        Self::other(err.to_string())
    }
}

impl From<anyhow::Error> for SplitError {
    fn from(err: anyhow::Error) -> Self {
        Self::other(err.to_string())
    }
}

impl SplitError {
    /// Create a FileNotFound error.
    pub fn file_not_found(path: PathBuf) -> Self {
        Self::FileNotFound { path }
    }

    /// Create a NotAFile error.
    pub fn not_a_file(path: PathBuf) -> Self {
        Self::NotAFile { path }
    }

    /// Create a StructuralMismatch error.
    pub fn structural_mismatch(
        stream_count: usize,
        endstream_count: usize,
        details: impl Into<String>,
    ) -> Self {
        Self::StructuralMismatch {
            stream_count,
            endstream_count,
            details: details.into(),
        }
    }

    /// Create a NoValidRanges error.
    pub fn no_valid_ranges(input: impl Into<String>, segment_count: usize) -> Self {
        Self::NoValidRanges {
            input: input.into(),
            segment_count,
        }
    }

    /// Create a DeliveryFailed error.
    pub fn delivery_failed(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::DeliveryFailed {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create an OutputExists error.
    pub fn output_exists(path: PathBuf) -> Self {
        Self::OutputExists { path }
    }

    /// Create an InvalidConfig error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an Other error with a custom message.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Short message suitable for a single-line failure banner.
    ///
    /// Mirrors the failure strings a front-end shows to the user; the full
    /// [`Display`](std::fmt::Display) output carries the diagnostic details.
    pub fn user_message(&self) -> String {
        match self {
            Self::StructuralMismatch { .. } | Self::NotAPdf { .. } => {
                "Invalid PDF structure".to_string()
            }
            Self::NoValidRanges { .. } => "Please enter valid page ranges".to_string(),
            Self::DeliveryFailed { name, .. } => format!("Failed to save {name}"),
            Self::Cancelled => "Split cancelled".to_string(),
            other => other.to_string(),
        }
    }

    /// Check if this error is recoverable (the remaining ranges can still be processed).
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::DeliveryFailed { .. }
                | Self::OutputExists { .. }
                | Self::FailedToWrite { .. }
                | Self::VerificationFailed { .. }
        )
    }

    /// Check if this error should stop all processing immediately.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::StructuralMismatch { .. }
                | Self::NoValidRanges { .. }
                | Self::NotAPdf { .. }
                | Self::Cancelled
        )
    }

    /// Get the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::FileNotFound { .. } => 2,
            Self::FileNotAccessible { .. } => 2,
            Self::NotAFile { .. } => 2,
            Self::NotAPdf { .. } => 3,
            Self::StructuralMismatch { .. } => 3,
            Self::NoValidRanges { .. } => 1,
            Self::DeliveryFailed { .. } => 5,
            Self::OutputExists { .. } => 4,
            Self::FailedToWrite { .. } => 5,
            Self::VerificationFailed { .. } => 6,
            Self::InvalidConfig { .. } => 1,
            Self::Cancelled => 130, // Standard exit code for SIGINT
            Self::Io { .. } => 5,
            Self::Other { .. } => 1,
        }
    }
}
