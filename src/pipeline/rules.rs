//! Keyword rules for deciding a category without the external model.
//!
//! Curated phrase sets per category, matched against the lowercase form of
//! the normalized text. Productive rules are evaluated before unproductive
//! ones, so an email matching both sets lands in Productive: flagging
//! actionable mail wins over missing it.

use regex::Regex;
use tracing::debug;

use crate::pipeline::types::{Category, ConfidenceBasis};

/// A single phrase rule with a compiled regex.
#[derive(Debug, Clone)]
pub struct PhraseRule {
    /// Human-readable pattern description.
    pub pattern: String,
    /// Compiled regex for matching.
    pub regex: Regex,
    /// Why this rule triggers.
    pub reason: String,
}

/// Verdict of the rule classifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleVerdict {
    pub category: Category,
    pub basis: ConfidenceBasis,
    /// Reason of the matching rule, if any matched.
    pub matched: Option<String>,
}

/// Rule-based classifier over curated phrase sets.
pub struct RuleClassifier {
    productive_rules: Vec<PhraseRule>,
    unproductive_rules: Vec<PhraseRule>,
}

impl RuleClassifier {
    /// Create a classifier with the default phrase sets.
    pub fn default_rules() -> Self {
        let productive_rules = vec![
            PhraseRule {
                pattern: "urgency/deadline".into(),
                regex: Regex::new(
                    r"(?i)\b(urgent(ly)?|asap|as soon as possible|deadline|by end of (day|week)|overdue|pending)\b",
                )
                .unwrap(),
                reason: "urgency or deadline language".into(),
            },
            PhraseRule {
                pattern: "direct request".into(),
                regex: Regex::new(
                    r"(?i)\b(please (respond|reply|review|confirm|advise|send|update|check)|(can|could|would) you|kindly)\b",
                )
                .unwrap(),
                reason: "direct request for action".into(),
            },
            PhraseRule {
                pattern: "support/incident".into(),
                regex: Regex::new(
                    r"(?i)\b(error|issue|problem|bug|fail(ed|ure)?|broken|not working|incident|outage|ticket)\b",
                )
                .unwrap(),
                reason: "support or incident report".into(),
            },
            PhraseRule {
                pattern: "status/scheduling".into(),
                regex: Regex::new(
                    r"(?i)\b(status|follow[- ]?up|meeting|(re)?schedule|invoice|attach(ed|ment)?|report|request)\b",
                )
                .unwrap(),
                reason: "status, scheduling or attachment handling".into(),
            },
            PhraseRule {
                pattern: "question mark".into(),
                regex: Regex::new(r"\?").unwrap(),
                reason: "contains a question".into(),
            },
        ];

        let unproductive_rules = vec![
            PhraseRule {
                pattern: "thanks only".into(),
                regex: Regex::new(r"(?i)\b(thank you|thanks|thx|much appreciated|appreciate it)\b")
                    .unwrap(),
                reason: "courtesy thanks".into(),
            },
            PhraseRule {
                pattern: "greetings/wishes".into(),
                regex: Regex::new(
                    r"(?i)\b(happy holidays|merry christmas|happy new year|congratulations|congrats|best wishes|season'?s greetings|happy birthday)\b",
                )
                .unwrap(),
                reason: "greeting or well-wishes".into(),
            },
            PhraseRule {
                pattern: "automated/bulk notice".into(),
                regex: Regex::new(
                    r"(?i)\b(do not reply|no[- ]?reply|automated (message|notification)|out of office|auto[- ]?reply|newsletter|unsubscribe)\b",
                )
                .unwrap(),
                reason: "automated or bulk notification".into(),
            },
        ];

        Self {
            productive_rules,
            unproductive_rules,
        }
    }

    /// Create an empty classifier (for testing).
    pub fn empty() -> Self {
        Self {
            productive_rules: Vec::new(),
            unproductive_rules: Vec::new(),
        }
    }

    /// Add a custom productive rule.
    pub fn add_productive(&mut self, pattern: &str, reason: &str) -> Result<(), regex::Error> {
        self.productive_rules.push(PhraseRule {
            pattern: pattern.into(),
            regex: Regex::new(pattern)?,
            reason: reason.into(),
        });
        Ok(())
    }

    /// Add a custom unproductive rule.
    pub fn add_unproductive(&mut self, pattern: &str, reason: &str) -> Result<(), regex::Error> {
        self.unproductive_rules.push(PhraseRule {
            pattern: pattern.into(),
            regex: Regex::new(pattern)?,
            reason: reason.into(),
        });
        Ok(())
    }

    /// Classify the lowercase matching form of a normalized email.
    ///
    /// Empty text is Unproductive on a rule basis (no signal to act on).
    /// No match at all is Unproductive on a fallback basis.
    pub fn classify(&self, matching_text: &str) -> RuleVerdict {
        if matching_text.trim().is_empty() {
            return RuleVerdict {
                category: Category::Unproductive,
                basis: ConfidenceBasis::RuleBased,
                matched: None,
            };
        }

        // Productive rules first: the structural tie-break.
        for rule in &self.productive_rules {
            if rule.regex.is_match(matching_text) {
                debug!(rule = %rule.pattern, reason = %rule.reason, "Matched productive rule");
                return RuleVerdict {
                    category: Category::Productive,
                    basis: ConfidenceBasis::RuleBased,
                    matched: Some(rule.reason.clone()),
                };
            }
        }

        for rule in &self.unproductive_rules {
            if rule.regex.is_match(matching_text) {
                debug!(rule = %rule.pattern, reason = %rule.reason, "Matched unproductive rule");
                return RuleVerdict {
                    category: Category::Unproductive,
                    basis: ConfidenceBasis::RuleBased,
                    matched: Some(rule.reason.clone()),
                };
            }
        }

        // Nothing matched — conservative default.
        RuleVerdict {
            category: Category::Unproductive,
            basis: ConfidenceBasis::Fallback,
            matched: None,
        }
    }
}
