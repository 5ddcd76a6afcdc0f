//! Email classification pipeline.
//!
//! Raw input flows through:
//! 1. `TextExtractor` — bytes to plain text
//! 2. `normalize` — whitespace and boilerplate cleanup
//! 3. `RuleClassifier` or the external model — category decision
//! 4. Model draft or `template_reply` — suggested reply
//! 5. `AuditLog` — one append per classification
//!
//! Classification and reply generation are pure; the audit append is the
//! only side effect, and failures there never abort the response.

pub mod processor;
pub mod rules;
pub mod types;
