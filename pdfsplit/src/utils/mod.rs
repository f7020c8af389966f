//! Small formatting helpers shared by the library and the CLI.

/// Format file size as human-readable string.
///
/// # Examples
///
/// ```
/// use pdfsplit::utils::format_file_size;
///
/// assert_eq!(format_file_size(1536), "1.50 KB");
/// ```
pub fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{size} bytes")
    }
}

/// Percentage of `completed` out of `total`, in `0.0..=100.0`.
///
/// Zero when `total` is zero.
pub fn percent_complete(completed: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        completed as f64 / total as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(500), "500 bytes");
        assert_eq!(format_file_size(1024), "1.00 KB");
        assert_eq!(format_file_size(1024 * 1024), "1.00 MB");
        assert_eq!(format_file_size(1024 * 1024 * 1024), "1.00 GB");
    }

    #[test]
    fn test_percent_complete() {
        assert_eq!(percent_complete(0, 4), 0.0);
        assert_eq!(percent_complete(1, 4), 25.0);
        assert_eq!(percent_complete(4, 4), 100.0);
        assert_eq!(percent_complete(0, 0), 0.0);
    }
}
