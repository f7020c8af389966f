//! Output file naming.

/// Fallback stem when the source has no usable file name.
pub const DEFAULT_STEM: &str = "split";

/// Name for the output at zero-based `index` out of `total` outputs.
///
/// - one output from `report.pdf`: `report_split.pdf`
/// - several outputs from `report.pdf`: `report_part1.pdf`, `report_part2.pdf`, …
/// - no source stem: `split.pdf`, or `split_1.pdf`, `split_2.pdf`, …
///
/// Names are unique within one run since the part number always differs.
pub fn output_name(stem: Option<&str>, index: usize, total: usize) -> String {
    let n = index + 1;

    match (stem, total) {
        (Some(stem), 1) => format!("{stem}_split.pdf"),
        (Some(stem), _) => format!("{stem}_part{n}.pdf"),
        (None, 1) => format!("{DEFAULT_STEM}.pdf"),
        (None, _) => format!("{DEFAULT_STEM}_{n}.pdf"),
    }
}
