//! Candidate identifiers and the reference lookup seam.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use crate::chemical::{is_cas_shaped, normalize_cas_key};
use crate::reference::{normalize_name_key, ReferenceRecord};

/// Lookup failure that is not a miss: no reference index has been published.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("reference data not loaded")]
    DataNotLoaded,
}

/// `Ok(Some)` on a hit, `Ok(None)` on a miss.
pub type LookupResult = Result<Option<Arc<ReferenceRecord>>, LookupError>;

/// Identifier pulled out of document text, already normalized for lookup.
///
/// Ordering is CAS tokens first, then names, each lexically. Matching
/// iterates candidates in this order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum CandidateIdentifier {
    Cas(String),
    Name(String),
}

impl CandidateIdentifier {
    /// Builds a candidate from a raw token, tagging it by shape.
    pub fn from_token(token: &str) -> Self {
        let cas = normalize_cas_key(token);
        if is_cas_shaped(&cas) {
            Self::Cas(cas)
        } else {
            Self::Name(normalize_name_key(token))
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Cas(value) | Self::Name(value) => value,
        }
    }

    pub fn is_cas(&self) -> bool {
        matches!(self, Self::Cas(_))
    }
}

impl fmt::Display for CandidateIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read access to reference records by CAS number or substance name.
pub trait ReferenceLookup {
    fn lookup_by_cas(&self, cas_number: &str) -> LookupResult;

    fn lookup_by_name(&self, substance_name: &str) -> LookupResult;

    /// Fails with `DataNotLoaded` when no reference data is available.
    fn ensure_loaded(&self) -> Result<(), LookupError> {
        Ok(())
    }

    fn lookup_candidate(&self, candidate: &CandidateIdentifier) -> LookupResult {
        match candidate {
            CandidateIdentifier::Cas(cas) => self.lookup_by_cas(cas),
            CandidateIdentifier::Name(name) => self.lookup_by_name(name),
        }
    }
}

impl<T: ReferenceLookup + ?Sized> ReferenceLookup for Arc<T> {
    fn lookup_by_cas(&self, cas_number: &str) -> LookupResult {
        (**self).lookup_by_cas(cas_number)
    }

    fn lookup_by_name(&self, substance_name: &str) -> LookupResult {
        (**self).lookup_by_name(substance_name)
    }

    fn ensure_loaded(&self) -> Result<(), LookupError> {
        (**self).ensure_loaded()
    }
}
