//! Error handling and edge cases.

use pdfsplit::config::OverwriteMode;
use pdfsplit::error::SplitError;
use pdfsplit::split::{CancellationToken, NoProgress, split_pdf};

use crate::common::{config_for, sample_pdf, workspace_with};

#[tokio::test]
async fn test_error_nonexistent_input() {
    let config = config_for(std::path::Path::new("/nonexistent/file.pdf"), "1");

    let result = split_pdf(&config, CancellationToken::new(), NoProgress).await;
    assert!(matches!(result, Err(SplitError::FileNotFound { .. })));
}

#[tokio::test]
async fn test_error_not_a_pdf() {
    let (_dir, input) = workspace_with("notes.pdf", b"just some text\n");
    let config = config_for(&input, "1");

    let result = split_pdf(&config, CancellationToken::new(), NoProgress).await;
    assert!(matches!(result, Err(SplitError::NotAPdf { .. })));
}

#[tokio::test]
async fn test_error_unbalanced_streams() {
    let bytes = b"%PDF-1.4\n1 0 obj\n<< /Length 1 >>\nstream\nA\nendobj\n%%EOF\n";
    let (dir, input) = workspace_with("broken.pdf", bytes);
    let config = config_for(&input, "1");

    let result = split_pdf(&config, CancellationToken::new(), NoProgress).await;
    assert!(matches!(result, Err(SplitError::StructuralMismatch { .. })));
    assert!(!dir.path().join("broken_split.pdf").exists());
}

#[tokio::test]
async fn test_error_no_valid_ranges() {
    let (_dir, input) = workspace_with("doc.pdf", &sample_pdf(2));
    let config = config_for(&input, "5,0,a-b");

    let result = split_pdf(&config, CancellationToken::new(), NoProgress).await;
    let err = result.unwrap_err();
    assert!(matches!(err, SplitError::NoValidRanges { .. }));
    assert!(err.is_fatal());
}

#[tokio::test]
async fn test_error_blank_ranges_config() {
    let (_dir, input) = workspace_with("doc.pdf", &sample_pdf(1));
    let config = config_for(&input, "   ");

    assert!(config.validate().is_err());
    let result = split_pdf(&config, CancellationToken::new(), NoProgress).await;
    assert!(matches!(result, Err(SplitError::InvalidConfig { .. })));
}

#[tokio::test]
async fn test_no_clobber_stops_at_existing_output() {
    let (dir, input) = workspace_with("doc.pdf", &sample_pdf(2));
    std::fs::write(dir.path().join("doc_part2.pdf"), b"keep me").unwrap();

    let mut config = config_for(&input, "1,2");
    config.overwrite_mode = OverwriteMode::NoClobber;

    let result = split_pdf(&config, CancellationToken::new(), NoProgress).await;
    assert!(matches!(result, Err(SplitError::OutputExists { .. })));

    // Earlier outputs stay, the existing file is untouched
    assert!(dir.path().join("doc_part1.pdf").exists());
    assert_eq!(
        std::fs::read(dir.path().join("doc_part2.pdf")).unwrap(),
        b"keep me"
    );
}

#[tokio::test]
async fn test_continue_on_error_records_failure() {
    let (dir, input) = workspace_with("doc.pdf", &sample_pdf(3));
    std::fs::write(dir.path().join("doc_part2.pdf"), b"keep me").unwrap();

    let mut config = config_for(&input, "1,2,3");
    config.overwrite_mode = OverwriteMode::NoClobber;
    config.continue_on_error = true;

    let report = split_pdf(&config, CancellationToken::new(), NoProgress)
        .await
        .unwrap();

    assert!(!report.is_complete());
    assert_eq!(report.outputs.len(), 2);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].name, "doc_part2.pdf");
    assert!(dir.path().join("doc_part3.pdf").exists());
}

#[tokio::test]
async fn test_raw_mode_rejects_verify() {
    let (_dir, input) = workspace_with("doc.pdf", &sample_pdf(1));
    let mut config = config_for(&input, "1");
    config.mode = pdfsplit::split::AssemblyMode::Raw;
    config.verify = true;

    let result = split_pdf(&config, CancellationToken::new(), NoProgress).await;
    assert!(matches!(result, Err(SplitError::InvalidConfig { .. })));
}
