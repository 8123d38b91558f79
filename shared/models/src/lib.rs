//! # ChemSure Core Domain Models
//!
//! Types shared by the reference index, the MSDS scanner and the API gateway.
//!
//! ## Key Models
//!
//! - **ReferenceRecord**: one entry of the GADSL restricted-substance list
//! - **CandidateIdentifier**: a CAS- or name-shaped token extracted from document text
//! - **ReferenceLookup**: read access to records, distinguishing a miss from missing data
//! - **Classification / ReasonCode**: typed view of a record's listing status

pub mod chemical;
pub mod classification;
pub mod lookup;
pub mod reference;

pub use chemical::{cas_check_digit, cas_check_digit_valid, is_cas_shaped, normalize_cas_key, CasValidation};
pub use classification::{regulatory_summary, Classification, ReasonCode};
pub use lookup::{CandidateIdentifier, LookupError, LookupResult, ReferenceLookup};
pub use reference::{
    normalize_name_key, CanonicalKey, ReferenceRecord, ABSENT_MARKER, DEFAULT_REPORTING_THRESHOLD,
};
