//! Message formatting and display.
//!
//! # Examples
//!
//! ```
//! use pdfsplit::output::formatter::OutputFormatter;
//!
//! let formatter = OutputFormatter::new(false, false);
//! formatter.info("Scanning input...");
//! formatter.success("Split completed");
//! ```

use std::io::{self, IsTerminal};

use crate::config::Config;
use crate::split::{DeliveredOutput, RejectedToken};
use crate::utils::format_file_size;

/// Level of output message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    /// Informational message.
    Info,
    /// Success message.
    Success,
    /// Warning message.
    Warning,
    /// Error message.
    Error,
    /// Debug/verbose message.
    Debug,
}

impl MessageLevel {
    fn prefix(self) -> &'static str {
        match self {
            Self::Info => "",
            Self::Success => "✓ ",
            Self::Warning => "⚠ ",
            Self::Error => "✗ ",
            Self::Debug => "→ ",
        }
    }

    fn color(self) -> Option<&'static str> {
        match self {
            Self::Info => None,
            Self::Success => Some("\x1b[32m"),
            Self::Warning => Some("\x1b[33m"),
            Self::Error => Some("\x1b[31m"),
            Self::Debug => Some("\x1b[36m"),
        }
    }
}

/// Console output with quiet and verbose modes.
///
/// Warnings and errors go to stderr and are never suppressed; everything
/// else goes to stdout.
#[derive(Debug, Clone)]
pub struct OutputFormatter {
    quiet: bool,
    verbose: bool,
    colored: bool,
}

impl OutputFormatter {
    /// Create a new output formatter.
    pub fn new(quiet: bool, verbose: bool) -> Self {
        Self {
            quiet,
            verbose,
            colored: Self::should_use_color(),
        }
    }

    /// Create a formatter from configuration.
    ///
    /// JSON mode is treated as quiet so stdout carries only the report.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.quiet || config.json, config.verbose)
    }

    /// Create a quiet formatter (only warnings and errors).
    pub fn quiet() -> Self {
        Self::new(true, false)
    }

    /// Create a verbose formatter.
    pub fn verbose() -> Self {
        Self::new(false, true)
    }

    /// Returns true if stdout is a TTY and TERM is set.
    fn should_use_color() -> bool {
        io::stdout().is_terminal() && std::env::var("TERM").is_ok()
    }

    /// Print an informational message. Suppressed in quiet mode.
    pub fn info(&self, message: &str) {
        if !self.quiet {
            self.print_message(MessageLevel::Info, message);
        }
    }

    /// Print a success message. Suppressed in quiet mode.
    pub fn success(&self, message: &str) {
        if !self.quiet {
            self.print_message(MessageLevel::Success, message);
        }
    }

    /// Print a warning message.
    pub fn warning(&self, message: &str) {
        self.print_message(MessageLevel::Warning, message);
    }

    /// Print an error message.
    pub fn error(&self, message: &str) {
        self.print_message(MessageLevel::Error, message);
    }

    /// Print a debug message. Only displayed in verbose mode.
    pub fn debug(&self, message: &str) {
        if self.verbose {
            self.print_message(MessageLevel::Debug, message);
        }
    }

    fn print_message(&self, level: MessageLevel, message: &str) {
        let line = match level.color() {
            Some(color) if self.colored => format!("{color}{}{message}\x1b[0m", level.prefix()),
            _ => format!("{}{message}", level.prefix()),
        };

        match level {
            MessageLevel::Warning | MessageLevel::Error => eprintln!("{line}"),
            _ => println!("{line}"),
        }
    }

    /// Print a section header. Suppressed in quiet mode.
    pub fn section(&self, title: &str) {
        if !self.quiet {
            println!("\n{title}");
        }
    }

    /// Print a labelled value. Only shown in verbose mode.
    pub fn detail(&self, label: &str, value: &str) {
        if self.verbose {
            println!("  {label}: {value}");
        }
    }

    /// Print a numbered list item. Suppressed in quiet mode.
    pub fn list_item(&self, index: usize, message: &str) {
        if !self.quiet {
            println!("  {index}. {message}");
        }
    }

    /// Print a blank line. Suppressed in quiet mode.
    pub fn blank_line(&self) {
        if !self.quiet {
            println!();
        }
    }

    /// Warn about a range token that was dropped.
    pub fn rejected_token(&self, rejected: &RejectedToken) {
        self.warning(&format!(
            "Ignoring range '{}': {}",
            rejected.token, rejected.reason
        ));
    }

    /// Report one delivered output.
    pub fn delivered(&self, output: &DeliveredOutput) {
        let location = output
            .path
            .as_ref()
            .map_or_else(|| output.name.clone(), |p| p.display().to_string());

        self.success(&format!(
            "Pages {} → {} ({})",
            output.range,
            location,
            format_file_size(output.size as u64)
        ));
    }

    /// Check if non-error output is shown.
    pub fn should_print(&self) -> bool {
        !self.quiet
    }

    /// Check if verbose output should be shown.
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Check if quiet mode is enabled.
    pub fn is_quiet(&self) -> bool {
        self.quiet
    }
}

impl Default for OutputFormatter {
    fn default() -> Self {
        Self::new(false, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::split::RejectReason;

    #[test]
    fn test_new_formatter() {
        let formatter = OutputFormatter::new(false, false);
        assert!(!formatter.is_quiet());
        assert!(!formatter.is_verbose());
        assert!(formatter.should_print());
    }

    #[test]
    fn test_quiet_formatter() {
        let formatter = OutputFormatter::quiet();
        assert!(formatter.is_quiet());
        assert!(!formatter.should_print());
        // Warnings always shown, even in quiet mode
        formatter.warning("Important warning");
    }

    #[test]
    fn test_verbose_formatter() {
        let formatter = OutputFormatter::verbose();
        assert!(formatter.is_verbose());
        formatter.debug("Debug information");
        formatter.detail("Segments", "3");
    }

    #[test]
    fn test_json_config_is_quiet() {
        let mut config = Config::new("in.pdf", "1");
        config.json = true;
        assert!(OutputFormatter::from_config(&config).is_quiet());
    }

    #[test]
    fn test_message_prefixes() {
        assert_eq!(MessageLevel::Info.prefix(), "");
        assert_eq!(MessageLevel::Error.prefix(), "✗ ");
        assert_eq!(MessageLevel::Info.color(), None);
        assert!(MessageLevel::Warning.color().is_some());
    }

    #[test]
    fn test_domain_messages() {
        let formatter = OutputFormatter::new(false, false);
        formatter.rejected_token(&RejectedToken {
            token: "9".to_string(),
            reason: RejectReason::OutOfBounds,
        });
        formatter.delivered(&DeliveredOutput {
            index: 0,
            range: "1-2".to_string(),
            name: "a_part1.pdf".to_string(),
            path: None,
            size: 2048,
        });
    }
}
