use backend::{BackendError, InMemoryBackend};
use exam_core::model::{UploadFile, UploadKind};
use exam_core::time::fixed_clock;
use serde_json::json;
use services::{AnalysisOrigin, AppServices, UploadSelection};

fn selection() -> UploadSelection {
    let mut selection = UploadSelection::new();
    let outcome = selection
        .add(
            UploadKind::Papers,
            vec![
                UploadFile::guessing_mime("2023.pdf", vec![1]),
                UploadFile::guessing_mime("notes.txt", vec![2]),
            ],
        )
        .unwrap();
    assert_eq!(outcome.accepted, 1);
    selection
}

#[tokio::test]
async fn selection_submits_and_normalizes() {
    let repo = InMemoryBackend::new();
    repo.set_analysis_response(json!({
        "documentId": "doc-42",
        "subject": "Digital Logic",
        "topics": [{ "name": "Gates", "subTopics": ["NAND"], "expectedQuestions": ["Draw a NAND-only OR"] }],
        "keyInsights": ["Gates dominate"]
    }));
    let services = AppServices::in_memory(&repo, fixed_clock());

    let analysis = services
        .analysis_service()
        .analyze(selection().into_request("Semester 3"))
        .await
        .unwrap();

    assert_eq!(analysis.origin, AnalysisOrigin::Remote);
    assert_eq!(analysis.result.id.as_ref().map(|id| id.as_str()), Some("doc-42"));
    assert_eq!(analysis.result.topics[0].side_topics(), ["NAND".to_string()]);
    assert_eq!(analysis.result.key_insights, vec!["Gates dominate".to_string()]);
}

#[tokio::test]
async fn failure_is_visible_as_demo_data() {
    let repo = InMemoryBackend::new();
    repo.fail_with(BackendError::Status(502));
    let services = AppServices::in_memory(&repo, fixed_clock());

    let analysis = services
        .analysis_service()
        .analyze(selection().into_request("Semester 3"))
        .await
        .unwrap();

    assert!(analysis.is_demo());
    assert!(matches!(analysis.origin, AnalysisOrigin::Demo { ref reason } if reason.contains("502")));
    assert_eq!(analysis.result.exam_name, "Semester 3");
}
