//! Terminal progress bar.
//!
//! # Examples
//!
//! ```
//! use pdfsplit::output::progress::{ProgressBar, ProgressStyle};
//!
//! let mut progress = ProgressBar::new(3, ProgressStyle::Bar);
//! progress.set_message("Splitting");
//!
//! for i in 1..=3 {
//!     progress.update(i);
//! }
//!
//! progress.finish();
//! ```

use std::io::{self, IsTerminal, Write};
use std::time::{Duration, Instant};

use crate::split::{Progress, ProgressReporter};
use crate::utils::percent_complete;

/// Style of progress indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressStyle {
    /// Classic progress bar: [=====>    ] 50%
    Bar,
    /// Simple counter: 2/4
    Counter,
}

/// Progress bar drawn on stdout.
///
/// Draws nothing when stdout is not a terminal.
#[derive(Debug)]
pub struct ProgressBar {
    total: usize,
    current: usize,
    style: ProgressStyle,
    message: Option<String>,
    start_time: Instant,
    enabled: bool,
}

impl ProgressBar {
    /// Create a new progress bar.
    pub fn new(total: usize, style: ProgressStyle) -> Self {
        Self {
            total,
            current: 0,
            style,
            message: None,
            start_time: Instant::now(),
            enabled: io::stdout().is_terminal(),
        }
    }

    /// Create a disabled progress bar (no output).
    pub fn disabled() -> Self {
        let mut pb = Self::new(0, ProgressStyle::Counter);
        pb.enabled = false;
        pb
    }

    /// Set the message shown in front of the bar.
    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
    }

    /// Update the bar to a specific value.
    pub fn update(&mut self, current: usize) {
        self.current = current;
        self.render();
    }

    /// Mark the bar as finished.
    pub fn finish(&mut self) {
        if self.enabled {
            self.current = self.total;
            self.render();
            println!();
        }
    }

    /// Clear the bar from the terminal.
    pub fn clear(&self) {
        if self.enabled {
            print!("\r\x1b[K");
            io::stdout().flush().ok();
        }
    }

    fn render(&self) {
        if !self.enabled {
            return;
        }

        let output = match self.style {
            ProgressStyle::Bar => self.render_bar(),
            ProgressStyle::Counter => self.render_counter(),
        };

        print!("\r{output}");
        io::stdout().flush().ok();
    }

    fn render_bar(&self) -> String {
        let width = 30;
        let filled = (width * self.current) / self.total.max(1);
        let empty = width.saturating_sub(filled);

        let bar = format!(
            "[{}{}]",
            "=".repeat(filled.saturating_sub(1)) + if filled > 0 { ">" } else { "" },
            " ".repeat(empty)
        );

        let mut parts = vec![
            bar,
            format!("{:.0}%", self.percent()),
            format_duration(self.elapsed()),
        ];
        if let Some(msg) = &self.message {
            parts.insert(0, msg.clone());
        }

        parts.join(" ")
    }

    fn render_counter(&self) -> String {
        let mut parts = vec![
            format!("{}/{}", self.current, self.total),
            format_duration(self.elapsed()),
        ];
        if let Some(msg) = &self.message {
            parts.insert(0, msg.clone());
        }

        parts.join(" ")
    }

    /// Current progress as a percentage.
    pub fn percent(&self) -> f64 {
        percent_complete(self.current, self.total)
    }

    /// Time since the bar was created.
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

impl ProgressReporter for ProgressBar {
    fn report(&mut self, progress: Progress) {
        self.total = progress.total;
        self.update(progress.completed);
    }
}

/// Format a duration as a human-readable string.
fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();

    if secs < 60 {
        format!("{secs}s")
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    }
}
