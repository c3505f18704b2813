// NER Analyzer
// Auxiliary detector backed by a remote token-classification model.
// Complements the rule-based detector with context-aware PERSON/LOCATION
// spans; every failure degrades to an empty span list so detection falls back
// to rule-based-only.

use reqwest::Client;
use serde::Deserialize;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{info, warn};

use crate::models::{EntityCategory, Span};
use crate::services::config_store::ConfigStore;

const DEFAULT_NER_URL: &str = "https://api-inference.huggingface.co/models/dslim/bert-base-NER";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Error, Debug)]
pub enum NerError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },
    #[error("NER endpoint not configured")]
    MissingEndpoint,
}

/// One token-level tag as returned by the model, BIO-style
/// (`B-PER`, `I-PER`, `B-LOC`, ...). Subword continuations carry a `##`
/// prefix on `word`.
#[derive(Debug, Clone, Deserialize)]
pub struct NerToken {
    #[serde(alias = "entity_group")]
    pub entity: String,
    pub word: String,
    pub start: usize,
    pub end: usize,
    #[serde(default)]
    pub score: f64,
}

// ============ Model cache ============
// Process-wide, lazily initialized, single load attempt in flight. Callers
// arriving while the load is in progress get an empty result instead of
// blocking or duplicating the attempt. A failed attempt is retried on the
// next call; a successful one is never repeated.

enum ModelState {
    Uninitialized,
    Loading,
    Ready(Arc<NerClient>),
    Failed,
}

static MODEL_STATE: Mutex<ModelState> = Mutex::new(ModelState::Uninitialized);

enum ClientSlot {
    Ready(Arc<NerClient>),
    Busy,
    Unavailable,
}

fn acquire_client() -> ClientSlot {
    {
        let mut state = match MODEL_STATE.lock() {
            Ok(state) => state,
            Err(_) => return ClientSlot::Unavailable,
        };
        match &*state {
            ModelState::Ready(client) => return ClientSlot::Ready(Arc::clone(client)),
            ModelState::Loading => return ClientSlot::Busy,
            ModelState::Uninitialized | ModelState::Failed => *state = ModelState::Loading,
        }
    }

    // We flipped the state to Loading above, so this caller owns the attempt.
    match NerClient::from_settings() {
        Ok(client) => {
            let client = Arc::new(client);
            if let Ok(mut state) = MODEL_STATE.lock() {
                *state = ModelState::Ready(Arc::clone(&client));
            }
            info!("[NER_ANALYZER] model client ready");
            ClientSlot::Ready(client)
        }
        Err(e) => {
            warn!("[NER_ANALYZER] model load failed: {}", e);
            if let Ok(mut state) = MODEL_STATE.lock() {
                *state = ModelState::Failed;
            }
            ClientSlot::Unavailable
        }
    }
}

// ============ Client ============

struct NerSettings {
    endpoint: String,
    api_key: Option<String>,
    timeout_secs: u64,
}

impl NerSettings {
    /// Environment variables win over the config file, which wins over the
    /// built-in defaults.
    fn resolve() -> Self {
        let stored = ConfigStore::default_config_dir()
            .map(ConfigStore::new)
            .and_then(|store| match store.load() {
                Ok(config) => Some(config.ner),
                Err(e) => {
                    warn!("[NER_ANALYZER] ignoring unreadable config: {}", e);
                    None
                }
            })
            .unwrap_or_default();

        let endpoint = std::env::var("PIISHIELD_NER_URL")
            .ok()
            .or(stored.endpoint)
            .unwrap_or_else(|| DEFAULT_NER_URL.to_string());
        let api_key = std::env::var("PIISHIELD_NER_API_KEY")
            .ok()
            .or(stored.api_key);
        let timeout_secs = std::env::var("PIISHIELD_NER_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .or(stored.timeout_secs)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Self {
            endpoint,
            api_key,
            timeout_secs,
        }
    }
}

pub struct NerClient {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl NerClient {
    fn from_settings() -> Result<Self, NerError> {
        let settings = NerSettings::resolve();
        if settings.endpoint.trim().is_empty() {
            return Err(NerError::MissingEndpoint);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: settings.endpoint,
            api_key: settings.api_key,
        })
    }

    async fn token_classify(&self, text: &str) -> Result<Vec<NerToken>, NerError> {
        let started = Instant::now();

        let mut request = self
            .client
            .post(&self.endpoint)
            .json(&serde_json::json!({ "inputs": text }));
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(NerError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let tokens: Vec<NerToken> = response.json().await?;
        info!(
            "[NER_ANALYZER] token classification ok tokens={} latency_ms={}",
            tokens.len(),
            started.elapsed().as_millis()
        );
        Ok(tokens)
    }
}

// ============ BIO accumulation ============

/// Map a BIO label onto the closed category subset this detector supports.
/// Everything outside PER/LOC is ignored.
fn map_ner_label(label: &str) -> Option<EntityCategory> {
    let bare = label
        .strip_prefix("B-")
        .or_else(|| label.strip_prefix("I-"))
        .unwrap_or(label);
    match bare {
        "PER" => Some(EntityCategory::Person),
        "LOC" => Some(EntityCategory::Location),
        _ => None,
    }
}

/// Fold the model's token stream into entity spans.
///
/// Two states: no current entity, or accumulating one. A `B-` tag or a
/// category change starts a new span; an `I-` continuation of the same
/// category extends `end` and appends the token text with its `##`
/// continuation marker stripped. Unsupported labels are skipped.
fn accumulate_bio_tokens(tokens: &[NerToken]) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut current: Option<Span> = None;

    for token in tokens {
        let Some(category) = map_ner_label(&token.entity) else {
            continue;
        };
        let begins = token.entity.starts_with("B-");
        let word = token.word.trim_start_matches("##");

        match current.as_mut() {
            Some(span) if !begins && span.category == category => {
                span.text.push_str(word);
                span.end = token.end;
            }
            _ => {
                if let Some(done) = current.take() {
                    spans.push(done);
                }
                current = Some(Span {
                    category,
                    text: word.to_string(),
                    start: token.start,
                    end: token.end,
                });
            }
        }
    }

    if let Some(done) = current {
        spans.push(done);
    }
    spans
}

// ============ Entry point ============

/// Run the auxiliary detector over `text`.
///
/// Never fails outward: a missing model, an in-flight load, or any inference
/// error all produce an empty span list and leave rule-based detection as the
/// sole source.
pub async fn detect_entities_ner(text: &str) -> Vec<Span> {
    if text.is_empty() {
        return Vec::new();
    }

    let client = match acquire_client() {
        ClientSlot::Ready(client) => client,
        ClientSlot::Busy => {
            info!("[NER_ANALYZER] model still loading, skipping auxiliary pass");
            return Vec::new();
        }
        ClientSlot::Unavailable => return Vec::new(),
    };

    match client.token_classify(text).await {
        Ok(tokens) => {
            let spans = accumulate_bio_tokens(&tokens);
            info!("[NER_ANALYZER] {} auxiliary span(s)", spans.len());
            spans
        }
        Err(e) => {
            warn!("[NER_ANALYZER] inference failed: {}", e);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(entity: &str, word: &str, start: usize, end: usize) -> NerToken {
        NerToken {
            entity: entity.to_string(),
            word: word.to_string(),
            start,
            end,
            score: 0.99,
        }
    }

    #[test]
    fn maps_only_supported_labels() {
        assert_eq!(map_ner_label("B-PER"), Some(EntityCategory::Person));
        assert_eq!(map_ner_label("I-PER"), Some(EntityCategory::Person));
        assert_eq!(map_ner_label("B-LOC"), Some(EntityCategory::Location));
        assert_eq!(map_ner_label("LOC"), Some(EntityCategory::Location));
        assert_eq!(map_ner_label("B-ORG"), None);
        assert_eq!(map_ner_label("O"), None);
    }

    #[test]
    fn accumulates_subword_continuations() {
        let tokens = [
            token("B-PER", "John", 0, 4),
            token("I-PER", "##son", 4, 7),
        ];
        let spans = accumulate_bio_tokens(&tokens);
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].category, EntityCategory::Person);
        assert_eq!(spans[0].text, "Johnson");
        assert_eq!(spans[0].start, 0);
        assert_eq!(spans[0].end, 7);
    }

    #[test]
    fn begin_tag_starts_a_new_entity() {
        let tokens = [
            token("B-PER", "Anna", 0, 4),
            token("B-PER", "Marie", 5, 10),
        ];
        let spans = accumulate_bio_tokens(&tokens);
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].text, "Anna");
        assert_eq!(spans[1].text, "Marie");
    }

    #[test]
    fn category_change_flushes_current_entity() {
        let tokens = [
            token("B-PER", "Anna", 0, 4),
            token("I-LOC", "Berlin", 10, 16),
        ];
        let spans = accumulate_bio_tokens(&tokens);
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].category, EntityCategory::Person);
        assert_eq!(spans[1].category, EntityCategory::Location);
    }

    #[test]
    fn unsupported_labels_are_skipped() {
        let tokens = [
            token("B-ORG", "Acme", 0, 4),
            token("B-LOC", "Paris", 10, 15),
        ];
        let spans = accumulate_bio_tokens(&tokens);
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, "Paris");
    }

    #[test]
    fn empty_token_stream_yields_no_spans() {
        assert!(accumulate_bio_tokens(&[]).is_empty());
    }

    #[tokio::test]
    async fn in_flight_load_short_circuits_to_empty() {
        // No other test touches the process-wide state.
        {
            let mut state = MODEL_STATE.lock().unwrap();
            *state = ModelState::Loading;
        }
        let spans = detect_entities_ner("Anna lives in Berlin").await;
        assert!(spans.is_empty());
        {
            let mut state = MODEL_STATE.lock().unwrap();
            *state = ModelState::Uninitialized;
        }
    }

    #[tokio::test]
    async fn empty_input_never_touches_the_model() {
        assert!(detect_entities_ner("").await.is_empty());
    }
}
