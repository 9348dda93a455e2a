//! External label source: HTTP client for the public drug-label API plus the
//! deterministic selection and ambiguity rules applied to its candidates.

pub mod client;
pub mod select;

pub use client::{LabelSource, LabelSourceClient, SourceError, sanitize_query, search_expression};
pub use select::{MAX_AMBIGUITY_OPTIONS, detect_ambiguity, select_canonical};
