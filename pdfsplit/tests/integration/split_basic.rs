//! End-to-end splits written to disk.

use pdfsplit::split::{AssemblyMode, CancellationToken, NoProgress, Progress, split_pdf};
use pdfsplit::split::{RAW_HEADER, RAW_TRAILER};

use crate::common::{config_for, page_count, sample_pdf, workspace_with};

fn contains(haystack: &[u8], needle: &str) -> bool {
    haystack
        .windows(needle.len())
        .any(|w| w == needle.as_bytes())
}

#[tokio::test]
async fn test_split_multiple_ranges() {
    let (dir, input) = workspace_with("report.pdf", &sample_pdf(5));
    let config = config_for(&input, "1-2,3,5");

    let report = split_pdf(&config, CancellationToken::new(), NoProgress)
        .await
        .unwrap();

    assert!(report.is_complete());
    assert_eq!(report.segment_count, 5);
    assert_eq!(report.outputs.len(), 3);
    assert_eq!(report.page_mismatch, None);

    let part1 = dir.path().join("report_part1.pdf");
    let part2 = dir.path().join("report_part2.pdf");
    let part3 = dir.path().join("report_part3.pdf");
    assert_eq!(page_count(&part1), 2);
    assert_eq!(page_count(&part2), 1);
    assert_eq!(page_count(&part3), 1);

    let last = std::fs::read(&part3).unwrap();
    assert!(contains(&last, "(Page 5)"));
    assert!(!contains(&last, "(Page 4)"));
}

#[tokio::test]
async fn test_single_range_uses_split_suffix() {
    let (dir, input) = workspace_with("report.pdf", &sample_pdf(3));
    let config = config_for(&input, "2-3");

    let report = split_pdf(&config, CancellationToken::new(), NoProgress)
        .await
        .unwrap();

    assert_eq!(report.outputs.len(), 1);
    assert_eq!(report.outputs[0].name, "report_split.pdf");
    assert_eq!(
        report.outputs[0].path.as_deref(),
        Some(dir.path().join("report_split.pdf").as_path())
    );
    assert_eq!(page_count(&dir.path().join("report_split.pdf")), 2);
}

#[tokio::test]
async fn test_output_dir_override() {
    let (_dir, input) = workspace_with("in.pdf", &sample_pdf(2));
    let out = tempfile::tempdir().unwrap();

    let mut config = config_for(&input, "2");
    config.output_dir = Some(out.path().to_path_buf());

    split_pdf(&config, CancellationToken::new(), NoProgress)
        .await
        .unwrap();

    assert!(out.path().join("in_split.pdf").exists());
    assert!(!input.with_file_name("in_split.pdf").exists());
}

#[tokio::test]
async fn test_raw_mode_layout() {
    let (dir, input) = workspace_with("raw.pdf", &sample_pdf(2));
    let mut config = config_for(&input, "1");
    config.mode = AssemblyMode::Raw;

    split_pdf(&config, CancellationToken::new(), NoProgress)
        .await
        .unwrap();

    let bytes = std::fs::read(dir.path().join("raw_split.pdf")).unwrap();
    assert!(bytes.starts_with(RAW_HEADER));
    assert!(bytes.ends_with(RAW_TRAILER));
    assert!(contains(&bytes, "(Page 1)"));
    assert!(!contains(&bytes, "(Page 2)"));
}

#[tokio::test]
async fn test_verify_passes_for_structured_outputs() {
    let (_dir, input) = workspace_with("v.pdf", &sample_pdf(4));
    let mut config = config_for(&input, "1-4");
    config.verify = true;

    let report = split_pdf(&config, CancellationToken::new(), NoProgress)
        .await
        .unwrap();
    assert!(report.is_complete());
}

#[tokio::test]
async fn test_progress_reaches_completion() {
    let (_dir, input) = workspace_with("p.pdf", &sample_pdf(4));
    let config = config_for(&input, "1,2,3,4");

    let (tx, rx) = std::sync::mpsc::channel();
    let reporter = move |progress: Progress| {
        tx.send(progress.percent()).ok();
    };

    split_pdf(&config, CancellationToken::new(), reporter)
        .await
        .unwrap();

    let seen: Vec<f64> = rx.try_iter().collect();
    assert_eq!(seen, vec![25.0, 50.0, 75.0, 100.0]);
}

#[tokio::test]
async fn test_invalid_tokens_are_skipped() {
    let (dir, input) = workspace_with("mixed.pdf", &sample_pdf(3));
    let config = config_for(&input, "abc,2,7,3-1");

    let report = split_pdf(&config, CancellationToken::new(), NoProgress)
        .await
        .unwrap();

    assert_eq!(report.outputs.len(), 1);
    assert_eq!(report.rejected.len(), 3);
    assert!(dir.path().join("mixed_split.pdf").exists());
}

#[tokio::test]
async fn test_cancelled_before_start() {
    let (dir, input) = workspace_with("c.pdf", &sample_pdf(2));
    let config = config_for(&input, "1,2");

    let token = CancellationToken::new();
    token.cancel();

    let result = split_pdf(&config, token, NoProgress).await;
    assert!(matches!(result, Err(pdfsplit::SplitError::Cancelled)));
    assert!(!dir.path().join("c_part1.pdf").exists());
}
