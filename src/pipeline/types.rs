//! Shared types for the classification pipeline.

use serde::{Deserialize, Serialize};

use crate::error::ExtractError;

// ── Input document ──────────────────────────────────────────────────

/// Declared format of an incoming payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    PlainText,
    Pdf,
}

impl SourceKind {
    /// Detect the kind from a file extension. Only `txt` and `pdf` are
    /// accepted; anything else is `UnsupportedFormat`.
    pub fn from_extension(extension: &str) -> Result<Self, ExtractError> {
        match extension.to_ascii_lowercase().as_str() {
            "txt" => Ok(Self::PlainText),
            "pdf" => Ok(Self::Pdf),
            other => Err(ExtractError::UnsupportedFormat {
                extension: other.to_string(),
            }),
        }
    }

    /// Short label for logging.
    pub fn label(&self) -> &'static str {
        match self {
            Self::PlainText => "plain_text",
            Self::Pdf => "pdf",
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Raw input for one classification call.
///
/// Exists only until text extraction; the pipeline never holds onto it
/// across calls.
#[derive(Debug, Clone)]
pub struct InputDocument {
    /// Raw payload bytes (UTF-8 text or a document file).
    pub bytes: Vec<u8>,
    /// Declared format of `bytes`.
    pub kind: SourceKind,
}

impl InputDocument {
    /// Plain-text input from a string payload.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            bytes: content.into().into_bytes(),
            kind: SourceKind::PlainText,
        }
    }

    /// Document input from raw bytes with a declared kind.
    pub fn from_bytes(bytes: Vec<u8>, kind: SourceKind) -> Self {
        Self { bytes, kind }
    }
}

// ── Extracted text ──────────────────────────────────────────────────

/// Plain text derived from an `InputDocument`. Empty text is valid and
/// flows through the rest of the pipeline without failing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedText {
    pub text: String,
    pub char_count: usize,
}

impl ExtractedText {
    pub fn new(text: String) -> Self {
        let char_count = text.chars().count();
        Self { text, char_count }
    }

    pub fn is_empty(&self) -> bool {
        self.char_count == 0
    }
}

// ── Classification outcome ──────────────────────────────────────────

/// The two categories an email can land in. No other values exist anywhere
/// in the crate; the wire labels are the canonical external contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Requires a follow-up action or response.
    Productive,
    /// No action needed (courtesy, automated, informational).
    Unproductive,
}

impl Category {
    /// Canonical wire label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Productive => "productive",
            Self::Unproductive => "unproductive",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Productive => f.write_str("Productive"),
            Self::Unproductive => f.write_str("Unproductive"),
        }
    }
}

/// Which strategy produced the category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceBasis {
    /// The curated keyword rules decided.
    RuleBased,
    /// The external model decided.
    ExternalModel,
    /// The external path failed (or no rule matched); default policy decided.
    Fallback,
}

impl ConfidenceBasis {
    /// Short label for logging.
    pub fn label(&self) -> &'static str {
        match self {
            Self::RuleBased => "rule_based",
            Self::ExternalModel => "external_model",
            Self::Fallback => "fallback",
        }
    }
}

/// Result of one classification call. Immutable once produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub category: Category,
    pub basis: ConfidenceBasis,
    pub suggested_reply: String,
}
