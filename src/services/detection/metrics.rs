// Detection Metrics
// Summary statistics over a span list, optionally against a ground-truth list.
// Coverage is a plain detected/expected ratio capped at 100 — a deliberate
// simplification carried over from the reference behavior, not precision or
// recall.

use std::collections::HashSet;

use crate::models::{MetricsSummary, Span};

/// Compute summary metrics for `detected`, optionally against `expected`.
///
/// `coverage` is 0 when `expected` is empty.
pub fn calculate_metrics(detected: &[Span], expected: &[Span]) -> MetricsSummary {
    let unique_types = detected
        .iter()
        .map(|s| s.category)
        .collect::<HashSet<_>>()
        .len();

    let coverage = if expected.is_empty() {
        0.0
    } else {
        (detected.len() as f64 / expected.len() as f64 * 100.0).min(100.0)
    };

    MetricsSummary {
        total_detected: detected.len(),
        unique_types,
        coverage,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EntityCategory;

    fn span(category: EntityCategory, start: usize, end: usize) -> Span {
        Span {
            category,
            text: "x".repeat(end - start),
            start,
            end,
        }
    }

    #[test]
    fn empty_inputs_give_all_zeros() {
        let m = calculate_metrics(&[], &[]);
        assert_eq!(m.total_detected, 0);
        assert_eq!(m.unique_types, 0);
        assert_eq!(m.coverage, 0.0);
    }

    #[test]
    fn single_span_without_expected_has_zero_coverage() {
        let m = calculate_metrics(&[span(EntityCategory::EmailAddress, 0, 5)], &[]);
        assert_eq!(m.total_detected, 1);
        assert_eq!(m.unique_types, 1);
        assert_eq!(m.coverage, 0.0);
    }

    #[test]
    fn unique_types_counts_distinct_categories() {
        let detected = [
            span(EntityCategory::EmailAddress, 0, 5),
            span(EntityCategory::EmailAddress, 10, 15),
            span(EntityCategory::Url, 20, 25),
        ];
        let m = calculate_metrics(&detected, &[]);
        assert_eq!(m.total_detected, 3);
        assert_eq!(m.unique_types, 2);
    }

    #[test]
    fn coverage_is_capped_at_100() {
        let detected = [
            span(EntityCategory::Person, 0, 3),
            span(EntityCategory::Person, 5, 8),
            span(EntityCategory::Person, 10, 13),
        ];
        let expected = [span(EntityCategory::Person, 0, 3)];
        let m = calculate_metrics(&detected, &expected);
        assert_eq!(m.coverage, 100.0);
    }

    #[test]
    fn coverage_is_a_plain_ratio() {
        let detected = [span(EntityCategory::Person, 0, 3)];
        let expected = [
            span(EntityCategory::Person, 0, 3),
            span(EntityCategory::Location, 5, 8),
        ];
        let m = calculate_metrics(&detected, &expected);
        assert_eq!(m.coverage, 50.0);
    }
}
