// PiiShield Core Services

pub mod config_store;
pub mod detection;
pub mod export;
pub mod pipeline;
pub mod redactor;

pub use config_store::*;
pub use export::*;
pub use redactor::*;

// Re-export detection module functions
pub use detection::{
    calculate_metrics,
    detect_entities_ner,
    merge_spans,
    RuleDetector,
};
pub use pipeline::{process, process_sync};
