// PiiShield Data Models
// Shared types exchanged between the detection pipeline and its callers

use serde::{Deserialize, Serialize};
use std::fmt;

// ============ Entity Categories ============

/// The closed set of sensitive-data kinds the pipeline detects.
///
/// Serialized (and rendered by `Display`) as SCREAMING_SNAKE_CASE so that
/// mask tags and exported JSON both read `EMAIL_ADDRESS`, `IP_ADDRESS`, etc.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityCategory {
    Person,
    Location,
    EmailAddress,
    IpAddress,
    PhoneNumber,
    CreditCard,
    DateTime,
    Url,
}

impl EntityCategory {
    pub const ALL: [EntityCategory; 8] = [
        Self::Person,
        Self::Location,
        Self::EmailAddress,
        Self::IpAddress,
        Self::PhoneNumber,
        Self::CreditCard,
        Self::DateTime,
        Self::Url,
    ];
}

impl fmt::Display for EntityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Person => write!(f, "PERSON"),
            Self::Location => write!(f, "LOCATION"),
            Self::EmailAddress => write!(f, "EMAIL_ADDRESS"),
            Self::IpAddress => write!(f, "IP_ADDRESS"),
            Self::PhoneNumber => write!(f, "PHONE_NUMBER"),
            Self::CreditCard => write!(f, "CREDIT_CARD"),
            Self::DateTime => write!(f, "DATE_TIME"),
            Self::Url => write!(f, "URL"),
        }
    }
}

// ============ Spans ============

/// A typed, positioned substring of interest inside the analyzed text.
///
/// Spans are immutable value objects: produced by a detector, combined by the
/// merger, consumed by the redactor and metrics calculator, then discarded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Span {
    pub category: EntityCategory,
    pub text: String,
    /// UTF-8 byte offset (0-based) into the analyzed text.
    pub start: usize,
    /// UTF-8 byte offset (0-based, end-exclusive) into the analyzed text.
    pub end: usize,
}

impl Span {
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

// ============ Redaction Mode ============

/// How detected spans are rewritten: deleted outright, or replaced with a
/// `[CATEGORY]` placeholder tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RedactionMode {
    #[default]
    Remove,
    Mask,
}

// ============ Metrics ============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSummary {
    pub total_detected: usize,
    pub unique_types: usize,
    /// Crude detected/expected ratio capped at 100; 0 when no expected set is
    /// given. Not a precision or recall measure.
    pub coverage: f64,
}

// ============ Pipeline Response ============

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineResponse {
    pub spans: Vec<Span>,
    pub redacted_text: String,
    pub metrics: MetricsSummary,
    pub request_id: String,
    pub version: String,
}
