//! Integration tests for the full triage pipeline.
//!
//! Exercises the cross-component guarantees: fallback equivalence when the
//! external service is unreachable, audit-log counting and ordering, and
//! entry integrity under concurrent calls.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

use mail_triage::audit::{AuditLog, LogEntry};
use mail_triage::error::{Error, ExtractError, LlmError};
use mail_triage::extract::TextExtractor;
use mail_triage::llm::{CompletionRequest, CompletionResponse, LlmProvider};
use mail_triage::pipeline::processor::TriagePipeline;
use mail_triage::pipeline::rules::RuleClassifier;
use mail_triage::pipeline::types::{Category, ConfidenceBasis, InputDocument, SourceKind};

/// Stub provider simulating an unreachable external service.
struct UnreachableLlm;

#[async_trait]
impl LlmProvider for UnreachableLlm {
    fn model_name(&self) -> &str {
        "unreachable"
    }

    async fn complete(&self, _request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        Err(LlmError::RequestFailed {
            provider: "unreachable".into(),
            reason: "connection refused".into(),
        })
    }
}

fn pipeline_at(dir: &Path, llm: Option<Arc<dyn LlmProvider>>) -> TriagePipeline {
    let audit = AuditLog::open(dir.join("triage.log")).unwrap();
    TriagePipeline::new(
        TextExtractor::plain_only(),
        RuleClassifier::default_rules(),
        llm,
        audit,
    )
}

fn read_entries(dir: &Path) -> Vec<LogEntry> {
    let raw = std::fs::read_to_string(dir.join("triage.log")).unwrap_or_default();
    raw.lines()
        .map(|line| serde_json::from_str(line).expect("every audit line parses"))
        .collect()
}

#[tokio::test]
async fn unreachable_service_matches_rule_only_run() {
    let failing_dir = tempfile::tempdir().unwrap();
    let rule_only_dir = tempfile::tempdir().unwrap();

    let failing = pipeline_at(failing_dir.path(), Some(Arc::new(UnreachableLlm)));
    let rule_only = pipeline_at(rule_only_dir.path(), None);

    for text in [
        "Please respond by Friday with the updated figures.",
        "Thank you so much, have a great weekend!",
        "Quarterly newsletter content with nothing actionable",
    ] {
        let a = failing
            .classify_email(InputDocument::text(text))
            .await
            .unwrap();
        let b = rule_only
            .classify_email(InputDocument::text(text))
            .await
            .unwrap();

        assert_eq!(a.category, b.category, "category diverged for {text:?}");
        assert_eq!(
            a.suggested_reply, b.suggested_reply,
            "reply diverged for {text:?}"
        );
        assert_eq!(a.basis, ConfidenceBasis::Fallback);
    }
}

#[tokio::test]
async fn n_calls_append_n_ordered_entries() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = pipeline_at(dir.path(), None);

    for i in 0..10 {
        pipeline
            .classify_email(InputDocument::text(format!("Please review ticket #{i}")))
            .await
            .unwrap();
    }

    let entries = read_entries(dir.path());
    assert_eq!(entries.len(), 10);
    for pair in entries.windows(2) {
        assert!(
            pair[0].timestamp <= pair[1].timestamp,
            "timestamps out of order"
        );
    }
}

#[tokio::test]
async fn concurrent_calls_produce_intact_entries() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = Arc::new(pipeline_at(dir.path(), None));

    let mut handles = Vec::new();
    for i in 0..32 {
        let pipeline = Arc::clone(&pipeline);
        handles.push(tokio::spawn(async move {
            pipeline
                .classify_email(InputDocument::text(format!(
                    "Urgent: issue {i} needs a fix"
                )))
                .await
                .unwrap()
        }));
    }
    for handle in handles {
        let result = handle.await.unwrap();
        assert_eq!(result.category, Category::Productive);
        assert!(!result.suggested_reply.is_empty());
    }

    // Every line parses back (no truncated or merged entries) and every
    // entry is distinct.
    let entries = read_entries(dir.path());
    assert_eq!(entries.len(), 32);
    let mut ids: Vec<_> = entries.iter().map(|entry| entry.id).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 32, "duplicated or merged audit entries");
}

#[tokio::test]
async fn pdf_without_capability_fails_without_logging() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = pipeline_at(dir.path(), None);

    let result = pipeline
        .classify_email(InputDocument::from_bytes(
            b"%PDF-1.4 pretend".to_vec(),
            SourceKind::Pdf,
        ))
        .await;

    match result {
        Err(Error::Extract(ExtractError::CapabilityUnavailable { .. })) => {}
        other => panic!("expected capability error, got {other:?}"),
    }
    assert!(read_entries(dir.path()).is_empty());
}

#[cfg(feature = "pdf")]
#[tokio::test]
async fn corrupt_pdf_bytes_fail_without_logging() {
    let dir = tempfile::tempdir().unwrap();
    let audit = AuditLog::open(dir.path().join("triage.log")).unwrap();
    let pipeline = TriagePipeline::new(
        TextExtractor::default(),
        RuleClassifier::default_rules(),
        None,
        audit,
    );

    let result = pipeline
        .classify_email(InputDocument::from_bytes(
            b"%PDF-1.4 not actually a pdf body".to_vec(),
            SourceKind::Pdf,
        ))
        .await;

    match result {
        Err(Error::Extract(ExtractError::ExtractionFailed { .. })) => {}
        other => panic!("expected extraction failure, got {other:?}"),
    }
    assert!(read_entries(dir.path()).is_empty());
}

#[tokio::test]
async fn plain_text_always_yields_category_and_reply() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = pipeline_at(dir.path(), None);

    for text in [
        "",
        "hi",
        "Could you confirm the meeting time?",
        "Merry Christmas!",
        "\u{1F389} celebration only",
    ] {
        let result = pipeline
            .classify_email(InputDocument::text(text))
            .await
            .unwrap();
        assert!(matches!(
            result.category,
            Category::Productive | Category::Unproductive
        ));
        assert!(!result.suggested_reply.is_empty(), "empty reply for {text:?}");
    }
}
