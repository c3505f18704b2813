// Export Report
// Self-describing record a host UI saves after a redaction run: original and
// transformed text, the full span list, metrics, mode, and a generation
// timestamp.

use anyhow::Context;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::models::{MetricsSummary, PipelineResponse, RedactionMode, Span};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportReport {
    pub original_text: String,
    pub redacted_text: String,
    pub spans: Vec<Span>,
    pub metrics: MetricsSummary,
    pub mode: RedactionMode,
    /// ISO-8601 generation time.
    pub timestamp: String,
}

impl ExportReport {
    /// Assemble a report from a pipeline response, stamped with the current
    /// UTC time.
    pub fn from_response(original_text: &str, response: &PipelineResponse, mode: RedactionMode) -> Self {
        Self {
            original_text: original_text.to_string(),
            redacted_text: response.redacted_text.clone(),
            spans: response.spans.clone(),
            metrics: response.metrics.clone(),
            mode,
            timestamp: Utc::now().to_rfc3339(),
        }
    }

    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write the report to disk as pretty-printed JSON.
    pub fn write_to(&self, path: &Path) -> anyhow::Result<()> {
        let json = self
            .to_pretty_json()
            .context("failed to serialize export report")?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }
}
