// Detection Pipeline
// The sole entry point the presentation layer depends on: detect, merge,
// redact, and summarize one input text end-to-end. Rule-based detection and
// the auxiliary NER pass run concurrently; the auxiliary side may lag behind
// its model load and simply contributes nothing until it is ready.

use tracing::info;
use uuid::Uuid;

use crate::models::{PipelineResponse, RedactionMode, Span};
use crate::services::detection::{
    calculate_metrics, detect_entities_ner, merge_spans, RuleDetector,
};
use crate::services::redactor::redact;

/// Reduce a position-sorted span list to a non-overlapping subset, first
/// writer wins. The merger's canonical output may still carry overlaps and
/// duplicates from independent rules; the redactor requires a non-overlapping
/// set, so the pipeline plans the actual rewrites here.
fn plan_redaction(spans: &[Span]) -> Vec<Span> {
    let mut planned: Vec<Span> = Vec::new();
    for span in spans {
        if planned
            .iter()
            .any(|kept| span.start < kept.end && span.end > kept.start)
        {
            continue;
        }
        planned.push(span.clone());
    }
    planned
}

fn respond(text: &str, spans: Vec<Span>, mode: RedactionMode) -> PipelineResponse {
    let planned = plan_redaction(&spans);
    let redacted_text = redact(text, &planned, mode);
    let metrics = calculate_metrics(&spans, &[]);

    PipelineResponse {
        spans,
        redacted_text,
        metrics,
        request_id: Uuid::new_v4().to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }
}

/// Run the full pipeline over `text`.
///
/// With `use_auxiliary`, the rule-based detector and the NER analyzer run
/// concurrently and their outputs are merged with rule-based spans as the
/// primary source. An unavailable auxiliary model degrades this to exactly
/// the rule-based result.
pub async fn process(text: &str, mode: RedactionMode, use_auxiliary: bool) -> PipelineResponse {
    info!(
        "[PIPELINE] processing {} chars ({} bytes), mode={:?}, auxiliary={}",
        text.chars().count(),
        text.len(),
        mode,
        use_auxiliary
    );

    let detector = RuleDetector::shared();
    let (rule_spans, ner_spans) = if use_auxiliary {
        tokio::join!(async { detector.detect(text) }, detect_entities_ner(text))
    } else {
        (detector.detect(text), Vec::new())
    };

    let merged = merge_spans(text, rule_spans, ner_spans);
    info!("[PIPELINE] {} span(s) after merge", merged.len());

    respond(text, merged, mode)
}

/// Rule-based-only variant for callers without an async context.
pub fn process_sync(text: &str, mode: RedactionMode) -> PipelineResponse {
    let rule_spans = RuleDetector::shared().detect(text);
    let merged = merge_spans(text, rule_spans, Vec::new());
    respond(text, merged, mode)
}
