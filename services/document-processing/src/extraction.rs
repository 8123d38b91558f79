//! Identifier extraction.
//!
//! Pulls CAS-shaped and name-shaped tokens out of free text. Each rule runs
//! over the whole input independently, so an identifier embedded in a
//! longer phrase is still found on its own. Phrases never span a line break.

use std::collections::BTreeSet;

use chemsure_models::CandidateIdentifier;
use once_cell::sync::Lazy;
use regex::Regex;

static CAS_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\d{2,7}-\d{2}-\d\b").expect("CAS token pattern is valid"));

/// Runs of capitalized words: "Benzoic Acid", "Titanium Dioxide".
static CAPITALIZED_PHRASE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[A-Z][A-Za-z0-9]+(?:[ \t-][A-Z][A-Za-z0-9]+)*\b").expect("capitalized phrase pattern is valid")
});

/// A capitalized word followed by lowercase words: "Lead chromate", "Sodium hydroxide".
static MIXED_PHRASE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[A-Z][a-z0-9]+(?:[ \t-][A-Z]?[a-z][a-z0-9]*)*\b").expect("mixed phrase pattern is valid")
});

/// Locant-prefixed names and comma-grouped numbers: "1,2-Dichloroethane", "2,4,6-Trinitrotoluene".
static NUMERIC_NOTATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b\d{1,3}(?:,\d{1,3})*(?:\.\d+)?(?:-\d{1,3})?\b(?:-[A-Z][A-Za-z0-9]+(?:[ \t-][A-Z]?[a-z][a-z0-9]*)*)?")
        .expect("numeric notation pattern is valid")
});

static PURELY_NUMERIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+$").expect("numeric pattern is valid"));

static PERCENTAGE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+(?:\.\d+)?%$").expect("percentage pattern is valid"));

/// Structural and boilerplate words that appear capitalized in safety data sheets.
const STOPWORDS: &[&str] = &[
    "section",
    "table",
    "page",
    "figure",
    "date",
    "version",
    "composition",
    "information",
    "ingredients",
    "measure",
    "first",
    "health",
    "safety",
    "data",
    "sheet",
    "product",
    "chemical",
    "hazard",
    "identification",
    "handling",
    "storage",
    "exposure",
    "protection",
    "physical",
    "properties",
    "stability",
    "reactivity",
    "toxicological",
    "ecological",
    "disposal",
    "considerations",
    "transport",
    "regulatory",
    "other",
    "company",
    "address",
    "phone",
    "fax",
    "email",
];

const MIN_NAME_CHARS: usize = 4;

/// Whether a name-shaped token is worth looking up.
pub fn is_name_candidate(token: &str) -> bool {
    let token = token.trim();
    if token.chars().count() < MIN_NAME_CHARS {
        return false;
    }
    if PURELY_NUMERIC.is_match(token) || PERCENTAGE.is_match(token) {
        return false;
    }
    let lowered = token.to_lowercase();
    !STOPWORDS.contains(&lowered.as_str())
}

/// Every distinct candidate identifier in `text`.
///
/// CAS tokens are kept verbatim, names are lowercased. Iteration order is
/// CAS numbers first, then names, each sorted lexically.
pub fn extract_candidates(text: &str) -> BTreeSet<CandidateIdentifier> {
    let mut candidates: BTreeSet<CandidateIdentifier> = CAS_TOKEN
        .find_iter(text)
        .map(|m| CandidateIdentifier::Cas(m.as_str().trim().to_string()))
        .collect();

    for rule in [&*CAPITALIZED_PHRASE, &*MIXED_PHRASE, &*NUMERIC_NOTATION] {
        for found in rule.find_iter(text) {
            let token = found.as_str();
            if is_name_candidate(token) {
                candidates.insert(CandidateIdentifier::from_token(token));
            }
        }
    }

    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn names(candidates: &BTreeSet<CandidateIdentifier>) -> Vec<&str> {
        candidates.iter().filter(|c| !c.is_cas()).map(|c| c.as_str()).collect()
    }

    fn cas(candidates: &BTreeSet<CandidateIdentifier>) -> Vec<&str> {
        candidates.iter().filter(|c| c.is_cas()).map(|c| c.as_str()).collect()
    }

    #[test]
    fn test_cas_tokens() {
        let found = extract_candidates("Carbon black 1333-82-0 and 75-07-0; not 123-4-5 or 12345678-12-1");
        assert_eq!(cas(&found), vec!["1333-82-0", "75-07-0"]);
    }

    #[test]
    fn test_embedded_name_found_alone() {
        let found = extract_candidates("Contains 75-07-0 and Acetaldehyde residue.");
        assert!(cas(&found).contains(&"75-07-0"));
        assert!(names(&found).contains(&"acetaldehyde"));
        assert!(names(&found).contains(&"contains"));
    }

    #[test]
    fn test_multi_word_names() {
        let found = extract_candidates("Benzoic Acid 65-85-0\nLead chromate 7758-97-6");
        let names = names(&found);
        assert!(names.contains(&"benzoic acid"));
        assert!(names.contains(&"lead chromate"));
    }

    #[test]
    fn test_numeric_notation() {
        let found = extract_candidates("1,2-Dichloroethane 107-06-2 5%");
        assert!(names(&found).contains(&"1,2-dichloroethane"));
    }

    #[test]
    fn test_phrases_do_not_cross_lines() {
        let found = extract_candidates("Titanium Dioxide\nToluene");
        let names = names(&found);
        assert!(names.contains(&"titanium dioxide"));
        assert!(names.contains(&"toluene"));
        assert!(!names.iter().any(|n| n.contains('\n')));
    }

    #[test]
    fn test_post_filter() {
        assert!(!is_name_candidate("Fe"));
        assert!(!is_name_candidate("Zin"));
        assert!(is_name_candidate("Zinc"));
        assert!(!is_name_candidate("12345"));
        assert!(!is_name_candidate("50%"));
        assert!(!is_name_candidate("12.5%"));
        assert!(!is_name_candidate("SECTION"));
        assert!(!is_name_candidate(" Company "));
        assert!(is_name_candidate("Sectioned Material"));
    }

    #[test]
    fn test_boilerplate_dropped() {
        let found = extract_candidates("Section\nPage 2\nTable\nVersion\nSafety\nEmail\n50%");
        for word in ["section", "page", "table", "version", "safety", "email", "50%"] {
            assert!(!names(&found).contains(&word), "{word} should be filtered");
        }
    }

    #[test]
    fn test_empty_text() {
        assert!(extract_candidates("").is_empty());
        assert!(extract_candidates("   \n\t").is_empty());
    }

    #[test]
    fn test_cas_sorted_before_names() {
        let found = extract_candidates("Toluene 108-88-3");
        let first = found.iter().next().unwrap();
        assert!(first.is_cas());
    }

    proptest! {
        #[test]
        fn prop_extraction_is_idempotent(text in "[A-Za-z0-9 ,.%\\-\n]{0,200}") {
            prop_assert_eq!(extract_candidates(&text), extract_candidates(&text));
        }

        #[test]
        fn prop_names_are_normalized(text in "[A-Za-z0-9 ,.%\\-\n]{0,200}") {
            for candidate in extract_candidates(&text) {
                let value = candidate.as_str();
                prop_assert_eq!(value, value.trim());
                if !candidate.is_cas() {
                    prop_assert_eq!(value.to_string(), value.to_lowercase());
                    prop_assert!(value.chars().count() > 3);
                    prop_assert!(!STOPWORDS.contains(&value));
                }
            }
        }
    }
}
