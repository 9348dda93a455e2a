pub mod outcome;
pub mod profile;
pub mod proof;
pub mod query_key;
pub mod record;
pub mod risk;
pub mod section;
pub mod snapshot;

pub use outcome::{FormulationOption, ResolutionOutcome};
pub use profile::{PregnancyStatus, RxGuardProfile};
pub use proof::{EvidenceQuote, ProofCard};
pub use query_key::normalize_query;
pub use record::{LabelRecord, OpenFdaNames, SectionText};
pub use risk::{Decision, Risk};
pub use section::LabelSection;
pub use snapshot::{LabelSnapshot, MissingIdentity, sha256_hex};
