// Redactor
// Position-safe text rewriting. Pure splicing: no categorization, no span
// production. Spans are applied in descending start order so earlier
// replacements never invalidate the offsets of spans still to be processed.

use crate::models::{RedactionMode, Span};

/// Rewrite `text` under `mode`: Remove deletes each span's range, Mask
/// replaces it with a `[CATEGORY]` tag.
///
/// Empty `spans` returns the input unchanged. Callers must pass
/// non-overlapping spans (the merger's canonical output, reduced to a
/// non-overlapping subset, qualifies); overlapping input produces best-effort
/// results. Spans that no longer slice cleanly into the progressively
/// rewritten string are skipped rather than panicking.
pub fn redact(text: &str, spans: &[Span], mode: RedactionMode) -> String {
    if spans.is_empty() {
        return text.to_string();
    }

    let mut ordered: Vec<&Span> = spans.iter().collect();
    ordered.sort_by(|a, b| b.start.cmp(&a.start));

    let mut result = text.to_string();
    for span in ordered {
        if result.get(span.start..span.end).is_none() {
            continue;
        }
        let replacement = match mode {
            RedactionMode::Remove => String::new(),
            RedactionMode::Mask => format!("[{}]", span.category),
        };
        result.replace_range(span.start..span.end, &replacement);
    }

    result
}
