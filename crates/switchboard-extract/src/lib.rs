//! Action extraction for Switchboard.
//!
//! Recovers structured capability invocations from free-form model output.
//! Four strategies run in strict precedence -- well-formed tags, fuzzy
//! tags, markdown markers, natural-language heuristics -- and the first
//! strategy that yields anything wins.

pub mod extractor;
pub mod fuzzy;
pub mod invocation;
pub mod markdown;
pub mod natural;
pub mod tag;

pub use extractor::{ExtractionStrategy, Extractor};
pub use invocation::{coerce_value, CandidateInvocation};
