//! Planning without writing.

use pdfsplit::split::plan_pdf;
use pdfsplit::validation::Validator;

use crate::common::{config_for, sample_pdf, workspace_with};

#[tokio::test]
async fn test_plan_lists_outputs() {
    let (dir, input) = workspace_with("book.pdf", &sample_pdf(6));
    let mut config = config_for(&input, "1-3,4-6");
    config.dry_run = true;

    let plan = plan_pdf(&config).await.unwrap();

    assert_eq!(plan.segment_count, 6);
    assert_eq!(plan.names(), vec!["book_part1.pdf", "book_part2.pdf"]);
    assert_eq!(plan.outputs[0].range, "1-3");
    assert_eq!(plan.outputs[1].segment_count, 3);

    // Only the input is present
    let entries = std::fs::read_dir(dir.path()).unwrap().count();
    assert_eq!(entries, 1);
}

#[tokio::test]
async fn test_plan_reports_rejected_tokens() {
    let (_dir, input) = workspace_with("book.pdf", &sample_pdf(2));
    let plan = plan_pdf(&config_for(&input, "1,0,x")).await.unwrap();

    assert_eq!(plan.outputs.len(), 1);
    let tokens: Vec<&str> = plan.rejected.iter().map(|r| r.token.as_str()).collect();
    assert_eq!(tokens, vec!["0", "x"]);
}

#[tokio::test]
async fn test_existing_outputs_detected() {
    let (dir, input) = workspace_with("book.pdf", &sample_pdf(2));
    std::fs::write(dir.path().join("book_part2.pdf"), b"old").unwrap();

    let config = config_for(&input, "1,2");
    let plan = plan_pdf(&config).await.unwrap();
    let existing = Validator::new()
        .validate_output(&config, &plan.names())
        .await
        .unwrap();

    assert_eq!(existing, vec![dir.path().join("book_part2.pdf")]);
}

#[tokio::test]
async fn test_plan_serializes_to_json() {
    let (_dir, input) = workspace_with("book.pdf", &sample_pdf(3));
    let plan = plan_pdf(&config_for(&input, "2")).await.unwrap();

    let json = serde_json::to_value(&plan).unwrap();
    assert_eq!(json["outputs"][0]["name"], "book_split.pdf");
}
