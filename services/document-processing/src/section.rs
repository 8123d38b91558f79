//! Composition section narrowing.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::info;

/// From the "SECTION 3 Composition/Information on Ingredients" header up to
/// and including the "SECTION 4 First Aid Measures" header.
static COMPOSITION_SECTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?is)SECTION\s*3[:\s]*Composition\s*/\s*Information.*?on\s+Ingredients.*?SECTION\s*4[:\s]*First[\s-]*Aid\s+Measures",
    )
    .expect("composition section pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedSection<'a> {
    pub text: &'a str,
    pub located: bool,
}

/// Narrow to the composition section, or the whole text when the
/// delimiters are missing.
pub fn locate_section(full_text: &str) -> LocatedSection<'_> {
    match COMPOSITION_SECTION.find(full_text) {
        Some(found) => {
            info!(chars = found.as_str().len(), "Composition section located");
            LocatedSection {
                text: found.as_str(),
                located: true,
            }
        }
        None => {
            info!("Composition section not found, scanning entire document");
            LocatedSection {
                text: full_text,
                located: false,
            }
        }
    }
}
