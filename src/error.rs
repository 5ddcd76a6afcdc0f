//! Error types for mail-triage.

use crate::pipeline::types::SourceKind;

/// Top-level error type for the triage pipeline.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Extraction error: {0}")]
    Extract(#[from] ExtractError),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Audit error: {0}")]
    Audit(#[from] AuditError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Text-extraction errors.
///
/// These are the only failures `classify_email` surfaces to the caller:
/// without extracted text there is nothing meaningful to classify.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("Unsupported input format: .{extension}")]
    UnsupportedFormat { extension: String },

    #[error("Failed to extract text from {kind} input: {reason}")]
    ExtractionFailed { kind: SourceKind, reason: String },

    #[error("No parser available for {kind} input")]
    CapabilityUnavailable { kind: SourceKind },

    #[error("Input too large: {size} bytes (limit {limit})")]
    InputTooLarge { size: usize, limit: usize },
}

/// External-model errors. Absorbed by the fallback policy, never surfaced
/// through `classify_email`.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("Provider {provider} request failed: {reason}")]
    RequestFailed { provider: String, reason: String },

    #[error("Invalid response from {provider}: {reason}")]
    InvalidResponse { provider: String, reason: String },

    #[error("No API credential configured for provider {provider}")]
    MissingCredential { provider: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Audit-log errors. Reported as warnings; never abort a classification.
#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    #[error("Failed to append audit entry to {path}: {source}")]
    Persistence {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize audit entry: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result type alias for the pipeline.
pub type Result<T> = std::result::Result<T, Error>;
