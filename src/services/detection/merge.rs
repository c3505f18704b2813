// Span Merger
// Combines primary (rule-based) and secondary (auxiliary) detector output into
// one canonical position-sorted list. Primary spans always win on overlap:
// deterministic, auditable matches take strict precedence over probabilistic
// ones. Exact duplicates within one source list are preserved on purpose.

use tracing::warn;

use crate::models::Span;

/// Any shared index counts as overlap, including containment and equality.
fn overlaps(a: &Span, b: &Span) -> bool {
    a.start < b.end && a.end > b.start
}

/// Contract check applied at the merger boundary so corrupted offsets never
/// reach the redactor: offsets must be ordered, inside the source text, and on
/// `char` boundaries.
fn is_valid_span(source: &str, span: &Span) -> bool {
    span.start < span.end
        && span.end <= source.len()
        && source.is_char_boundary(span.start)
        && source.is_char_boundary(span.end)
}

fn drop_invalid(source: &str, spans: Vec<Span>, origin: &str) -> Vec<Span> {
    let before = spans.len();
    let kept: Vec<Span> = spans
        .into_iter()
        .filter(|s| is_valid_span(source, s))
        .collect();
    if kept.len() != before {
        warn!(
            "[MERGE] dropped {} contract-violating {} span(s)",
            before - kept.len(),
            origin
        );
    }
    kept
}

/// Merge two detector outputs into the canonical span list.
///
/// Every valid primary span is kept unconditionally. A secondary span is kept
/// only if it overlaps no primary span. The result is sorted ascending by
/// `start`; the sort is stable, so spans sharing a start keep their emission
/// order (primary before secondary).
pub fn merge_spans(source: &str, primary: Vec<Span>, secondary: Vec<Span>) -> Vec<Span> {
    let primary = drop_invalid(source, primary, "primary");
    let secondary = drop_invalid(source, secondary, "secondary");

    let mut merged = primary.clone();
    for candidate in secondary {
        if primary.iter().any(|p| overlaps(&candidate, p)) {
            continue;
        }
        merged.push(candidate);
    }

    merged.sort_by_key(|s| s.start);
    merged
}
