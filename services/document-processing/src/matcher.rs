//! Candidate matching and deduplication.

use std::collections::HashSet;
use std::sync::Arc;

use chemsure_models::{CandidateIdentifier, CanonicalKey, LookupError, ReferenceLookup, ReferenceRecord};
use serde::Serialize;
use tracing::{debug, info};

/// A reference record found in a document, with the identifier that found it.
#[derive(Debug, Clone, Serialize)]
pub struct MatchedSubstance {
    pub record: Arc<ReferenceRecord>,
    pub identifier: CandidateIdentifier,
}

/// Resolve candidates against the reference list.
///
/// Misses are dropped. A record reached through several candidates is
/// reported once, for the first candidate in iteration order. Records
/// without a CAS number are keyed by name. `DataNotLoaded` aborts the
/// whole match.
pub fn match_candidates<'a, I, L>(candidates: I, lookup: &L) -> Result<Vec<MatchedSubstance>, LookupError>
where
    I: IntoIterator<Item = &'a CandidateIdentifier>,
    L: ReferenceLookup + ?Sized,
{
    let mut seen: HashSet<CanonicalKey> = HashSet::new();
    let mut matches = Vec::new();

    for candidate in candidates {
        let Some(record) = lookup.lookup_candidate(candidate)? else {
            continue;
        };
        let Some(key) = record.canonical_key() else {
            continue;
        };

        if !seen.insert(key) {
            debug!(identifier = %candidate, "Duplicate match dropped");
            continue;
        }

        info!(
            cas_rn = %record.display_cas(),
            substance = %record.display_name(),
            identifier = %candidate,
            "Match found in document"
        );
        matches.push(MatchedSubstance {
            record,
            identifier: candidate.clone(),
        });
    }

    Ok(matches)
}
