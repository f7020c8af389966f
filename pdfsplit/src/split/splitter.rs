//! The split pipeline.
//!
//! ```text
//! RawDocument ─ scan ─> SegmentTable ─ parse ranges ─> [PageRange]
//!                                                        │
//!                     for each range, in order:          ▼
//!            cancelled? ─> assemble ─> verify? ─> deliver ─> report progress
//! ```
//!
//! Structural problems and unusable range input abort before anything is
//! assembled. Ranges are then processed strictly one after another. A
//! delivery failure stops the loop unless `continue_on_error` is set; outputs
//! delivered before the failure stay where they are.

use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{Result, SplitError};
use crate::io::{Delivery, DocumentReader, FileDelivery};
use crate::split::assembler::{Assembler, AssemblyMode};
use crate::split::document::{DeliveredOutput, OutputDocument, RawDocument};
use crate::split::naming::output_name;
use crate::split::ranges::{RangeSelection, RejectedToken, parse_ranges};
use crate::split::segments::SegmentTable;
use crate::utils::percent_complete;
use crate::validation::{PageCountMismatch, cross_check_pages, verify_output};

/// Progress after a range has been processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    /// Ranges processed so far.
    pub completed: usize,
    /// Ranges in total.
    pub total: usize,
}

impl Progress {
    /// `completed / total * 100`.
    pub fn percent(&self) -> f64 {
        percent_complete(self.completed, self.total)
    }
}

/// Receives progress updates from the splitter.
pub trait ProgressReporter {
    /// Called once after every processed range.
    fn report(&mut self, progress: Progress);
}

impl<F: FnMut(Progress)> ProgressReporter for F {
    fn report(&mut self, progress: Progress) {
        self(progress)
    }
}

/// A reporter that ignores all updates.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn report(&mut self, _progress: Progress) {}
}

/// Shared flag for stopping a split between ranges.
///
/// Clones share the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    /// Create a token that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// One output a split would create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedOutput {
    /// The range, as `N` or `N-M`.
    pub range: String,
    /// Output file name.
    pub name: String,
    /// Number of segments the output would contain.
    pub segment_count: usize,
}

/// What a split would do, computed without assembling anything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitPlan {
    /// Segments found in the input.
    pub segment_count: usize,
    /// Outputs in processing order.
    pub outputs: Vec<PlannedOutput>,
    /// Range tokens that were dropped.
    pub rejected: Vec<RejectedToken>,
}

impl SplitPlan {
    /// Output file names in processing order.
    pub fn names(&self) -> Vec<String> {
        self.outputs.iter().map(|o| o.name.clone()).collect()
    }
}

/// An output that could not be delivered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FailedOutput {
    /// Zero-based position of the range in processing order.
    pub index: usize,
    /// The range, as `N` or `N-M`.
    pub range: String,
    /// Output file name.
    pub name: String,
    /// Why delivery failed.
    pub reason: String,
}

/// Outcome of a completed split.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitReport {
    /// Input file, when split from disk.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<PathBuf>,
    /// Segments found in the input.
    pub segment_count: usize,
    /// Layout of the outputs.
    pub mode: AssemblyMode,
    /// Delivered outputs in processing order.
    pub outputs: Vec<DeliveredOutput>,
    /// Outputs skipped because delivery failed (only with `continue_on_error`).
    pub failures: Vec<FailedOutput>,
    /// Range tokens that were dropped.
    pub rejected: Vec<RejectedToken>,
    /// Set when the segment count disagrees with the parsed page tree.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_mismatch: Option<PageCountMismatch>,
}

impl SplitReport {
    /// Whether every planned output was delivered.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Settings for a [`Splitter`].
#[derive(Debug, Clone, Default)]
pub struct SplitOptions {
    /// How outputs are laid out.
    pub mode: AssemblyMode,
    /// Record delivery failures and keep going.
    pub continue_on_error: bool,
    /// Re-parse structured outputs before delivering them.
    pub verify: bool,
    /// Compare the segment count with the page tree via lopdf.
    pub cross_check: bool,
}

impl SplitOptions {
    /// Options taken from a configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            mode: config.mode,
            continue_on_error: config.continue_on_error,
            verify: config.verify,
            cross_check: true,
        }
    }
}

/// Drives one split from raw bytes to delivered outputs.
#[derive(Debug, Clone, Default)]
pub struct Splitter {
    options: SplitOptions,
    cancel: CancellationToken,
}

impl Splitter {
    /// Create a splitter.
    pub fn new(options: SplitOptions) -> Self {
        Self {
            options,
            cancel: CancellationToken::new(),
        }
    }

    /// Stop between ranges once `token` is cancelled.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// The options this splitter runs with.
    pub fn options(&self) -> &SplitOptions {
        &self.options
    }

    fn prepare(&self, doc: &RawDocument, ranges: &str) -> Result<(SegmentTable, RangeSelection)> {
        let table = SegmentTable::from_document(doc)?;
        let selection = parse_ranges(ranges, table.len())?;

        for rejected in selection.rejected() {
            warn!(token = %rejected.token, reason = %rejected.reason, "ignoring range token");
        }

        Ok((table, selection))
    }

    /// Work out the outputs without assembling or delivering them.
    ///
    /// # Errors
    ///
    /// Returns [`SplitError::StructuralMismatch`] or [`SplitError::NoValidRanges`].
    pub fn plan(&self, doc: &RawDocument, ranges: &str) -> Result<SplitPlan> {
        let (table, selection) = self.prepare(doc, ranges)?;
        let total = selection.len();

        let outputs = selection
            .ranges()
            .iter()
            .enumerate()
            .map(|(index, range)| PlannedOutput {
                range: range.to_string(),
                name: output_name(doc.stem(), index, total),
                segment_count: range.len(),
            })
            .collect();

        Ok(SplitPlan {
            segment_count: table.len(),
            outputs,
            rejected: selection.rejected().to_vec(),
        })
    }

    /// Split `doc` by `ranges`, handing every output to `delivery`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The stream markers do not pair up (nothing is delivered)
    /// - No range token is usable (nothing is delivered)
    /// - Delivery or verification fails and `continue_on_error` is off
    /// - The cancellation token fires
    pub fn split(
        &self,
        doc: &RawDocument,
        ranges: &str,
        delivery: &mut dyn Delivery,
        progress: &mut dyn ProgressReporter,
    ) -> Result<SplitReport> {
        let (table, selection) = self.prepare(doc, ranges)?;

        let page_mismatch = if self.options.cross_check {
            cross_check_pages(doc, &table)
        } else {
            None
        };
        if let Some(mismatch) = &page_mismatch {
            warn!(
                segments = mismatch.segment_count,
                pages = mismatch.page_count,
                "segment count differs from page count"
            );
        }

        let assembler = Assembler::for_document(doc, self.options.mode);
        let total = selection.len();
        let rejected = selection.rejected().to_vec();

        debug!(segments = table.len(), ranges = total, mode = %self.options.mode, "starting split");

        let mut outputs = Vec::with_capacity(total);
        let mut failures = Vec::new();

        for (index, range) in selection.into_ranges().into_iter().enumerate() {
            if self.cancel.is_cancelled() {
                info!(completed = index, total, "split cancelled");
                return Err(SplitError::Cancelled);
            }

            let output = OutputDocument {
                index,
                range,
                name: output_name(doc.stem(), index, total),
                bytes: assembler.assemble(doc, &table, range)?,
            };

            match self.deliver(&output, delivery) {
                Ok(delivered) => {
                    info!(
                        range = %range,
                        name = %delivered.name,
                        bytes = delivered.size,
                        "delivered output"
                    );
                    outputs.push(delivered);
                }
                Err(err) if self.options.continue_on_error && err.is_recoverable() => {
                    warn!(range = %range, name = %output.name, error = %err, "skipping output");
                    failures.push(FailedOutput {
                        index,
                        range: range.to_string(),
                        name: output.name.clone(),
                        reason: err.to_string(),
                    });
                }
                Err(err) => return Err(err),
            }

            progress.report(Progress {
                completed: index + 1,
                total,
            });
        }

        Ok(SplitReport {
            input: doc.source().map(PathBuf::from),
            segment_count: table.len(),
            mode: self.options.mode,
            outputs,
            failures,
            rejected,
            page_mismatch,
        })
    }

    fn deliver(
        &self,
        output: &OutputDocument,
        delivery: &mut dyn Delivery,
    ) -> Result<DeliveredOutput> {
        if self.options.verify && self.options.mode == AssemblyMode::Structured {
            verify_output(output)?;
        }

        delivery.deliver(output).map_err(|err| match err {
            SplitError::DeliveryFailed { .. } | SplitError::OutputExists { .. } => err,
            err if err.is_fatal() => err,
            other => SplitError::delivery_failed(&output.name, other.to_string()),
        })
    }
}

/// Load `config.input` and work out the split plan.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the input cannot be read,
/// or planning fails.
pub async fn plan_pdf(config: &Config) -> Result<SplitPlan> {
    config
        .validate()
        .map_err(|e| SplitError::invalid_config(e.to_string()))?;

    let loaded = DocumentReader::new().load(&config.input).await?;
    let ranges = config.ranges.clone();
    let splitter = Splitter::new(SplitOptions::from_config(config));

    tokio::task::spawn_blocking(move || splitter.plan(&loaded.document, &ranges))
        .await
        .map_err(|e| SplitError::other(format!("Split task failed: {e}")))?
}

/// Load `config.input`, split it and write the outputs to disk.
///
/// The synchronous pipeline runs on the blocking thread pool.
///
/// # Errors
///
/// Returns an error under the same conditions as [`Splitter::split`], or if
/// the configuration is invalid or the input cannot be read.
pub async fn split_pdf<P>(
    config: &Config,
    cancel: CancellationToken,
    mut progress: P,
) -> Result<SplitReport>
where
    P: ProgressReporter + Send + 'static,
{
    config
        .validate()
        .map_err(|e| SplitError::invalid_config(e.to_string()))?;

    let loaded = DocumentReader::new().load(&config.input).await?;
    debug!(path = %loaded.path.display(), size = %loaded.format_file_size(), "loaded input");

    let ranges = config.ranges.clone();
    let splitter = Splitter::new(SplitOptions::from_config(config)).with_cancellation(cancel);
    let mut delivery =
        FileDelivery::new(config.effective_output_dir()).with_overwrite_mode(config.overwrite_mode);

    tokio::task::spawn_blocking(move || {
        splitter.split(&loaded.document, &ranges, &mut delivery, &mut progress)
    })
    .await
    .map_err(|e| SplitError::other(format!("Split task failed: {e}")))?
}
