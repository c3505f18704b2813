// Rule-Based Detector
// Applies the static pattern catalogue to a text and emits one span per match.
// Pure and deterministic: no I/O, no shared mutable state, byte offsets only.

use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;
use tracing::debug;

use super::patterns::{EntityPattern, PATTERNS};
use crate::models::Span;

#[derive(Debug, Error)]
pub enum DetectorError {
    #[error("failed to compile regex pattern: {0}")]
    RegexCompile(#[from] regex::Error),
}

/// Compiled form of the pattern catalogue.
///
/// Construction compiles every rule once; `detect` then scans the whole text
/// with each rule under standard global-match semantics (after a match,
/// scanning resumes at the match's end). The `regex` crate's engine does not
/// backtrack, so scanning stays linear in text length per rule.
pub struct RuleDetector {
    rules: Vec<(Regex, &'static EntityPattern)>,
}

static SHARED: OnceLock<RuleDetector> = OnceLock::new();

impl RuleDetector {
    /// Compile the full catalogue into a ready-to-use detector.
    pub fn new() -> Result<Self, DetectorError> {
        let rules = PATTERNS
            .iter()
            .map(|pat| Ok((Regex::new(pat.pattern)?, pat)))
            .collect::<Result<Vec<_>, regex::Error>>()?;

        Ok(Self { rules })
    }

    /// Process-wide detector instance, compiled on first use.
    ///
    /// The catalogue is static and covered by a compile test, so a failure
    /// here is a programming error rather than a runtime condition.
    pub fn shared() -> &'static RuleDetector {
        SHARED.get_or_init(|| {
            RuleDetector::new().expect("built-in pattern catalogue must compile")
        })
    }

    /// Scan `text` and return all rule matches as spans.
    ///
    /// Output order follows catalogue order, but callers must not rely on it;
    /// the merger owns the canonical ordering. Independent rules may produce
    /// overlapping or duplicate spans by design.
    pub fn detect(&self, text: &str) -> Vec<Span> {
        if text.is_empty() {
            return Vec::new();
        }

        let mut spans = Vec::new();
        for (re, pat) in &self.rules {
            for m in re.find_iter(text) {
                spans.push(Span {
                    category: pat.category,
                    text: m.as_str().to_string(),
                    start: m.start(),
                    end: m.end(),
                });
            }
        }

        debug!(
            "[RULE_DETECTOR] {} spans from {} rules over {} bytes",
            spans.len(),
            self.rules.len(),
            text.len()
        );
        spans
    }

    /// Number of compiled rules.
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EntityCategory;

    fn detector() -> RuleDetector {
        RuleDetector::new().expect("detector should compile")
    }

    #[test]
    fn detects_email_exactly() {
        let d = detector();
        let text = "Contact john@example.com for details";
        let spans = d.detect(text);
        let email = spans
            .iter()
            .find(|s| s.category == EntityCategory::EmailAddress)
            .expect("email span");
        assert_eq!(email.text, "john@example.com");
        assert_eq!(&text[email.start..email.end], "john@example.com");
    }

    #[test]
    fn detects_ipv4_full_width() {
        let d = detector();
        let spans = d.detect("192.168.1.1");
        let ips: Vec<_> = spans
            .iter()
            .filter(|s| s.category == EntityCategory::IpAddress)
            .collect();
        assert_eq!(ips.len(), 1);
        assert_eq!(ips[0].start, 0);
        assert_eq!(ips[0].end, 11);
    }

    #[test]
    fn detects_paren_phone() {
        let d = detector();
        let spans = d.detect("call (555) 123-4567 now");
        assert!(spans
            .iter()
            .any(|s| s.category == EntityCategory::PhoneNumber && s.text.contains("123-4567")));
    }

    #[test]
    fn detects_grouped_credit_card() {
        let d = detector();
        let spans = d.detect("card: 4111-1111-1111-1111");
        assert!(spans
            .iter()
            .any(|s| s.category == EntityCategory::CreditCard && s.text.len() >= 16));
    }

    #[test]
    fn detects_iso_timestamp_and_month_date() {
        let d = detector();
        let spans = d.detect("due 2024-03-15T09:30:00Z or March 15, 2024");
        let dates: Vec<_> = spans
            .iter()
            .filter(|s| s.category == EntityCategory::DateTime)
            .collect();
        assert!(dates.iter().any(|s| s.text.starts_with("2024-03-15")));
        assert!(dates.iter().any(|s| s.text == "March 15, 2024"));
    }

    #[test]
    fn detects_url_and_gazetteer_location() {
        let d = detector();
        let spans = d.detect("see https://example.com/path while in New York");
        assert!(spans
            .iter()
            .any(|s| s.category == EntityCategory::Url && s.text.starts_with("https://")));
        assert!(spans
            .iter()
            .any(|s| s.category == EntityCategory::Location && s.text == "New York"));
    }

    #[test]
    fn detects_titled_person() {
        let d = detector();
        let spans = d.detect("Dr. Jane Smith will attend");
        assert!(spans
            .iter()
            .any(|s| s.category == EntityCategory::Person && s.text.starts_with("Dr.")));
    }

    #[test]
    fn empty_input_yields_no_spans() {
        assert!(detector().detect("").is_empty());
    }

    #[test]
    fn span_text_matches_source_slice() {
        let d = detector();
        let text = "Alice Johnson emailed bob@corp.io from 10.0.0.2 on 12/31/2024";
        for span in d.detect(text) {
            assert_eq!(&text[span.start..span.end], span.text, "span {:?}", span);
        }
    }

    #[test]
    fn detection_is_deterministic() {
        let d = detector();
        let text = "Contact john@example.com or call (555) 123-4567.";
        assert_eq!(d.detect(text), d.detect(text));
    }

    #[test]
    fn long_digit_runs_do_not_blow_up() {
        // The engine is non-backtracking; a pathological digit/separator soup
        // must still scan in linear time and simply over-match.
        let d = detector();
        let text = "1-2.3 4".repeat(2_000);
        let spans = d.detect(&text);
        assert!(!spans.is_empty());
    }
}
