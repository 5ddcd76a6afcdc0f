//! Mail Triage — email classification and suggested-reply core.
//!
//! Classifies an email as productive (needs action) or unproductive, drafts
//! a suggested reply, and appends one audit record per decision. Any front
//! end (CLI, HTTP handler, batch job) drives it through
//! [`pipeline::processor::TriagePipeline`].

pub mod audit;
pub mod config;
pub mod error;
pub mod extract;
pub mod llm;
pub mod normalize;
pub mod pipeline;
pub mod reply;
