//! GADSL classification and reason codes.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::reference::ReferenceRecord;

/// Listing classification of a reference substance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Classification {
    /// `D`
    Declarable,
    /// `P`
    Prohibited,
    /// `D/P`
    DeclarableOrProhibited,
    /// `FI`
    ForInformation,
    Other(String),
    Unspecified,
}

/// Why a substance is on the list.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ReasonCode {
    /// `FA`
    ForAssessment,
    /// `FI`
    ForInformation,
    /// `LR`
    LegallyRegulated,
    Other(String),
}

impl Classification {
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(text) = raw.map(str::trim).filter(|t| !t.is_empty()) else {
            return Self::Unspecified;
        };
        let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();

        match compact.to_uppercase().as_str() {
            "D" => Self::Declarable,
            "P" => Self::Prohibited,
            "D/P" => Self::DeclarableOrProhibited,
            "FI" => Self::ForInformation,
            _ => Self::Other(text.to_string()),
        }
    }

    pub fn requires_declaration(&self) -> bool {
        matches!(self, Self::Declarable | Self::DeclarableOrProhibited)
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Declarable => write!(f, "Declarable (D)"),
            Self::Prohibited => write!(f, "Prohibited (P)"),
            Self::DeclarableOrProhibited => write!(f, "Declarable/Prohibited (D/P)"),
            Self::ForInformation => write!(f, "For Information (FI)"),
            Self::Other(text) => write!(f, "{}", text),
            Self::Unspecified => write!(f, "unclassified"),
        }
    }
}

impl ReasonCode {
    /// Parses `/`-separated codes such as `FI/FA/LR` into an ordered set.
    pub fn parse_set(raw: Option<&str>) -> BTreeSet<Self> {
        raw.unwrap_or_default()
            .split('/')
            .map(|code| code.trim().to_uppercase())
            .filter(|code| !code.is_empty())
            .map(|code| match code.as_str() {
                "FA" => Self::ForAssessment,
                "FI" => Self::ForInformation,
                "LR" => Self::LegallyRegulated,
                _ => Self::Other(code),
            })
            .collect()
    }

    fn describe(&self) -> String {
        match self {
            Self::ForAssessment => "under assessment for possible regulation".to_string(),
            Self::ForInformation => "tracked for information".to_string(),
            Self::LegallyRegulated => "legally regulated in at least one market".to_string(),
            Self::Other(code) => format!("listed for reason {}", code),
        }
    }
}

/// Plain-text summary of what a listing means for the substance.
pub fn regulatory_summary(record: &ReferenceRecord) -> String {
    let classification = Classification::parse(record.classification.as_deref());
    let reasons = ReasonCode::parse_set(record.reason_code.as_deref());

    let mut summary = format!(
        "{} (CAS RN: {}) is classified as {}.",
        record.display_name(),
        record.display_cas(),
        classification
    );

    match classification {
        Classification::Prohibited => {
            summary.push_str(" It is banned for automotive use in at least one region or market.");
        }
        Classification::DeclarableOrProhibited => {
            summary.push_str(" It has both allowed and prohibited uses depending on the application.");
        }
        Classification::ForInformation => {
            summary.push_str(" It is tracked for informational purposes only.");
        }
        _ => {}
    }

    if !reasons.is_empty() {
        let described: Vec<String> = reasons.iter().map(ReasonCode::describe).collect();
        summary.push_str(&format!(" The substance is {}.", described.join(", ")));
    }

    if classification.requires_declaration() {
        summary.push_str(&format!(
            " Must be declared if present above {}.",
            record.reporting_threshold
        ));
    }

    summary
}
