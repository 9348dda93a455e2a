//! Immutable, hash-pinned snapshots of label records.
//!
//! Canonicalization must be byte-stable: for the same raw record, every run
//! produces the same `evidence_text` and therefore the same `evidence_hash`
//! and the same substring offsets for quoting.
//!
//! # Canonical form
//!
//! 1. Each present section is reduced to one string: list entries joined
//!    with newlines, carriage returns stripped, whitespace runs collapsed to
//!    single spaces, trimmed.
//! 2. Non-empty sections are concatenated in [`LabelSection::ALL`] order,
//!    each prefixed by its uppercase header line, blocks separated by a
//!    blank line.
//! 3. The hash is the hex-encoded SHA-256 of the concatenation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::record::{LabelRecord, SectionText};
use crate::section::LabelSection;

/// Record lacks both version-identifying fields, so it cannot be pinned.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("label record has neither set_id nor effective_time; refusing to pin evidence")]
pub struct MissingIdentity;

/// An immutable evidentiary snapshot of one label record version.
///
/// Invariant: `evidence_hash == sha256_hex(&evidence_text)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelSnapshot {
    pub set_id: String,
    pub effective_time: String,
    pub evidence_hash: String,
    pub evidence_text: String,
    pub sections: BTreeMap<LabelSection, String>,
    pub brand_names: Vec<String>,
    pub generic_names: Vec<String>,
    pub active_ingredients_list: Vec<String>,
}

impl LabelSnapshot {
    /// Build a snapshot from a raw record.
    ///
    /// Fails only when the record carries neither `set_id` nor
    /// `effective_time`; a record with one of the two can still be pinned.
    pub fn from_record(record: &LabelRecord) -> Result<Self, MissingIdentity> {
        let set_id = record.set_id.as_deref().unwrap_or("").trim().to_string();
        let effective_time = record
            .effective_time
            .as_deref()
            .unwrap_or("")
            .trim()
            .to_string();
        if set_id.is_empty() && effective_time.is_empty() {
            return Err(MissingIdentity);
        }

        let mut sections = BTreeMap::new();
        let mut blocks = Vec::new();
        for section in LabelSection::ALL {
            if let Some(raw) = record.section(section) {
                let text = normalize_section_text(raw);
                if !text.is_empty() {
                    blocks.push(format!("{}\n{}", section.header(), text));
                    sections.insert(section, text);
                }
            }
        }
        let evidence_text = blocks.join("\n\n");
        let evidence_hash = sha256_hex(&evidence_text);

        Ok(Self {
            set_id,
            effective_time,
            evidence_hash,
            evidence_text,
            sections,
            brand_names: record.openfda.brand_name.clone(),
            generic_names: record.openfda.generic_name.clone(),
            active_ingredients_list: record.openfda.substance_name.clone(),
        })
    }

    /// Primary-record key: `{setId}_{effectiveTime}`.
    pub fn doc_id(&self) -> String {
        format!("{}_{}", self.set_id, self.effective_time)
    }

    /// Re-hash the evidence text and compare against the pinned hash.
    pub fn verify(&self) -> bool {
        sha256_hex(&self.evidence_text) == self.evidence_hash
    }

    /// Best display name: first brand name, then generic, then set id.
    pub fn display_name(&self) -> &str {
        self.brand_names
            .first()
            .or(self.generic_names.first())
            .map(String::as_str)
            .unwrap_or(&self.set_id)
    }
}

/// Reduce raw section text to canonical form.
pub fn normalize_section_text(raw: &SectionText) -> String {
    let joined = raw.joined();
    let stripped = joined.replace('\r', "");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Hex-encoded SHA-256 digest.
pub fn sha256_hex(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hex::encode(hasher.finalize())
}
