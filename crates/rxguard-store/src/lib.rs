//! Tiered resolution cache: in-process memory map, durable secondary index,
//! durable primary record store, and overflow blob storage, with a
//! write-through miss path against the external label source.

pub mod cache;
pub mod durable;
pub mod error;

pub use cache::ResolutionCache;
pub use durable::{DurableStore, INLINE_EVIDENCE_LIMIT};
pub use error::StoreError;
