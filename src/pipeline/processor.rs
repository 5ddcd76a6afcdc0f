//! Triage pipeline — classifies an email and drafts a suggested reply.
//!
//! Flow:
//! 1. Size guard + text extraction (the only stage whose failure surfaces)
//! 2. Normalization (pure)
//! 3. Category decision: external model when configured, keyword rules
//!    otherwise or on any external failure
//! 4. Suggested reply: model draft, or the static template
//! 5. One audit append per successful call (warn-only on failure)
//!
//! The caller always receives a `(category, reply)` pair when the input was
//! structurally readable; external-service failures never cross this
//! boundary.

use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::audit::AuditLog;
use crate::config::TriageConfig;
use crate::error::{Error, LlmError};
use crate::extract::TextExtractor;
use crate::llm::{ChatMessage, CompletionRequest, LlmConfig, LlmProvider, create_provider};
use crate::normalize::{matching_form, normalize};
use crate::pipeline::rules::RuleClassifier;
use crate::pipeline::types::{Category, ClassificationResult, ConfidenceBasis, InputDocument};
use crate::reply::template_reply;

/// Max tokens for the triage call (kept tight — runs on every email).
const TRIAGE_MAX_TOKENS: u32 = 300;

/// Temperature for the triage call (deterministic).
const TRIAGE_TEMPERATURE: f32 = 0.0;

/// Longest email slice sent to the external model.
const PROMPT_CONTENT_CHARS: usize = 4000;

/// The classification pipeline. One instance safely serves concurrent
/// calls; the only shared mutable state is the audit log's append lock.
pub struct TriagePipeline {
    extractor: TextExtractor,
    rules: RuleClassifier,
    llm: Option<Arc<dyn LlmProvider>>,
    audit: AuditLog,
}

impl TriagePipeline {
    /// Build a pipeline from explicit parts (used by tests and embedders).
    pub fn new(
        extractor: TextExtractor,
        rules: RuleClassifier,
        llm: Option<Arc<dyn LlmProvider>>,
        audit: AuditLog,
    ) -> Self {
        Self {
            extractor,
            rules,
            llm,
            audit,
        }
    }

    /// Build a pipeline from configuration.
    ///
    /// The external provider is constructed only when a credential is
    /// present; everything else works without it.
    pub fn from_config(config: &TriageConfig) -> Result<Self, Error> {
        let extractor = TextExtractor::default().with_max_input_bytes(config.max_input_bytes);

        let llm = match &config.api_key {
            Some(key) => Some(create_provider(&LlmConfig {
                api_key: key.clone(),
                model: config.model.clone(),
                timeout: config.timeout,
            })?),
            None => None,
        };

        let audit = AuditLog::open(&config.audit_path)?;

        Ok(Self::new(
            extractor,
            RuleClassifier::default_rules(),
            llm,
            audit,
        ))
    }

    /// Classify one email and produce a suggested reply.
    ///
    /// Exactly one audit entry is appended per successful call; extraction
    /// failures return an error and append nothing.
    pub async fn classify_email(&self, input: InputDocument) -> Result<ClassificationResult, Error> {
        let id = Uuid::new_v4();

        let extracted = self.extractor.extract(&input)?;
        let text = normalize(&extracted.text);

        info!(
            id = %id,
            kind = input.kind.label(),
            chars = text.chars().count(),
            "Classifying email"
        );

        let (category, basis, model_reply) = self.decide(&text).await;

        let suggested_reply = match model_reply {
            Some(reply) if !reply.trim().is_empty() => reply,
            _ => template_reply(category, &text),
        };

        // The single side effect; never aborts the response.
        if let Err(e) = self.audit.record(id, category, basis, &text) {
            warn!(id = %id, error = %e, "Failed to append audit entry");
        }

        debug!(
            id = %id,
            category = category.label(),
            basis = basis.label(),
            "Email classified"
        );

        Ok(ClassificationResult {
            category,
            basis,
            suggested_reply,
        })
    }

    /// Decide the category, honoring the fallback contract. Returns the
    /// model-drafted reply too when the external path succeeded.
    async fn decide(&self, text: &str) -> (Category, ConfidenceBasis, Option<String>) {
        if text.is_empty() {
            // No signal to act on.
            return (Category::Unproductive, ConfidenceBasis::RuleBased, None);
        }

        if let Some(llm) = &self.llm {
            match self.model_triage(llm.as_ref(), text).await {
                Ok(triage) => {
                    return (triage.category, ConfidenceBasis::ExternalModel, triage.reply);
                }
                Err(e) => {
                    warn!(error = %e, "External triage failed — falling back to rules");
                    let verdict = self.rules.classify(&matching_form(text));
                    return (verdict.category, ConfidenceBasis::Fallback, None);
                }
            }
        }

        let verdict = self.rules.classify(&matching_form(text));
        (verdict.category, verdict.basis, None)
    }

    /// One external call: classify and draft a reply in a single round trip.
    async fn model_triage(
        &self,
        llm: &dyn LlmProvider,
        text: &str,
    ) -> Result<ModelTriage, LlmError> {
        let request = CompletionRequest::new(vec![
            ChatMessage::system(build_triage_system_prompt()),
            ChatMessage::user(build_triage_user_prompt(text)),
        ])
        .with_temperature(TRIAGE_TEMPERATURE)
        .with_max_tokens(TRIAGE_MAX_TOKENS);

        let response = llm.complete(request).await?;
        parse_triage_response(&response.content).map_err(|reason| LlmError::InvalidResponse {
            provider: llm.model_name().to_string(),
            reason,
        })
    }
}

/// Outcome of the external triage call.
#[derive(Debug)]
struct ModelTriage {
    category: Category,
    reply: Option<String>,
}

// ── Prompt construction ─────────────────────────────────────────────

/// Build the triage system prompt.
fn build_triage_system_prompt() -> String {
    "You are an email triage engine for a service inbox. Classify the email \
     as \"productive\" (it needs an action or a response) or \"unproductive\" \
     (no action needed: courtesy, greetings, automated notices). Then draft \
     a short, polite reply in the same language as the email.\n\n\
     Respond with ONLY a JSON object:\n\
     {\"category\": \"productive\", \"reply\": \"...\"}\n\n\
     Rules:\n\
     - \"category\" must be exactly \"productive\" or \"unproductive\"\n\
     - Keep the reply under 80 words\n\
     - For unproductive email the reply is a brief acknowledgment"
        .to_string()
}

/// Build the user prompt from the normalized email text.
fn build_triage_user_prompt(text: &str) -> String {
    let content: String = text.chars().take(PROMPT_CONTENT_CHARS).collect();
    format!("Email:\n{content}")
}

// ── Response parsing ────────────────────────────────────────────────

/// Wire shape of the model's triage answer.
#[derive(Debug, serde::Deserialize)]
struct TriageResponse {
    category: String,
    #[serde(default)]
    reply: String,
}

/// Parse the model response into a `ModelTriage`.
///
/// Markdown fences and surrounding prose are tolerated; an unknown category
/// label is an error so the caller falls back to rules.
fn parse_triage_response(raw: &str) -> Result<ModelTriage, String> {
    let json_str = extract_json_object(raw);
    let response: TriageResponse =
        serde_json::from_str(&json_str).map_err(|e| format!("JSON parse error: {e}"))?;

    let category = match response.category.trim().to_ascii_lowercase().as_str() {
        "productive" => Category::Productive,
        "unproductive" => Category::Unproductive,
        other => return Err(format!("unknown category label: '{other}'")),
    };

    let reply = if response.reply.trim().is_empty() {
        None
    } else {
        Some(response.reply)
    };

    Ok(ModelTriage { category, reply })
}

/// Extract a JSON object from model output (handles markdown wrapping).
fn extract_json_object(text: &str) -> String {
    let trimmed = text.trim();

    // Already a JSON object
    if trimmed.starts_with('{') {
        return trimmed.to_string();
    }

    // Fenced code block, with or without a language tag
    if let Some(start) = trimmed.find("```") {
        let after = &trimmed[start + 3..];
        let after = after.strip_prefix("json").unwrap_or(after);
        if let Some(end) = after.find("```") {
            let inner = after[..end].trim();
            if inner.starts_with('{') {
                return inner.to_string();
            }
        }
    }

    // Object embedded in prose
    if let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}'))
        && end > start
    {
        return trimmed[start..=end].to_string();
    }

    trimmed.to_string()
}
