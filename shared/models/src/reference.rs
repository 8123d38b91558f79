//! Reference (GADSL) substance records.
//!
//! A `ReferenceRecord` is one row of the restricted-substance list. Every
//! optional field is an explicit `Option`; on the wire an absent value is
//! rendered as the `"N/A"` marker the list consumers already expect.

use serde::{Deserialize, Serialize};

use crate::chemical::normalize_cas_key;

/// Wire marker used for absent reference fields.
pub const ABSENT_MARKER: &str = "N/A";

/// Reporting threshold applied when the list leaves the column empty.
pub const DEFAULT_REPORTING_THRESHOLD: &str = "0.1%";

/// One entry of the restricted-substance reference list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceRecord {
    #[serde(rename = "gadsl_hash", with = "absent", default)]
    pub catalog_id: Option<String>,
    #[serde(rename = "ref_hash", with = "absent", default)]
    pub reference_id: Option<String>,
    /// Display-case substance name.
    #[serde(with = "absent", default)]
    pub substance_name: Option<String>,
    #[serde(rename = "cas_rn", with = "absent", default)]
    pub cas_number: Option<String>,
    #[serde(with = "absent", default)]
    pub classification: Option<String>,
    #[serde(with = "absent", default)]
    pub reason_code: Option<String>,
    #[serde(with = "absent", default)]
    pub source: Option<String>,
    #[serde(with = "absent", default)]
    pub generic_examples: Option<String>,
    #[serde(default = "default_reporting_threshold")]
    pub reporting_threshold: String,
    #[serde(with = "absent", default)]
    pub first_added: Option<String>,
    #[serde(with = "absent", default)]
    pub last_revised: Option<String>,
}

/// Key a matched record is deduplicated on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CanonicalKey {
    Cas(String),
    /// Used only when the record carries no CAS number.
    Name(String),
}

fn default_reporting_threshold() -> String {
    DEFAULT_REPORTING_THRESHOLD.to_string()
}

/// Treats empty and marker-only values as absent.
fn present(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty() && *v != ABSENT_MARKER)
}

impl ReferenceRecord {
    /// Creates a record with only the identifying fields set.
    pub fn new(substance_name: Option<&str>, cas_number: Option<&str>) -> Self {
        Self {
            substance_name: substance_name.map(str::to_string),
            cas_number: cas_number.map(str::to_string),
            ..Self::default()
        }
    }

    pub fn with_classification(mut self, classification: &str, reason_code: &str) -> Self {
        self.classification = Some(classification.to_string());
        self.reason_code = Some(reason_code.to_string());
        self
    }

    pub fn with_catalog_ids(mut self, catalog_id: &str, reference_id: &str) -> Self {
        self.catalog_id = Some(catalog_id.to_string());
        self.reference_id = Some(reference_id.to_string());
        self
    }

    pub fn with_reporting_threshold(mut self, threshold: &str) -> Self {
        self.reporting_threshold = threshold.to_string();
        self
    }

    /// Key for the by-CAS mapping, `None` when the record has no CAS number.
    pub fn cas_key(&self) -> Option<String> {
        present(&self.cas_number).map(normalize_cas_key)
    }

    /// Key for the by-name mapping, `None` when the record has no name.
    pub fn name_key(&self) -> Option<String> {
        present(&self.substance_name).map(normalize_name_key)
    }

    pub fn canonical_key(&self) -> Option<CanonicalKey> {
        self.cas_key()
            .map(CanonicalKey::Cas)
            .or_else(|| self.name_key().map(CanonicalKey::Name))
    }

    /// Display name, falling back to the absent marker.
    pub fn display_name(&self) -> &str {
        present(&self.substance_name).unwrap_or(ABSENT_MARKER)
    }

    pub fn display_cas(&self) -> &str {
        present(&self.cas_number).unwrap_or(ABSENT_MARKER)
    }
}

impl Default for ReferenceRecord {
    fn default() -> Self {
        Self {
            catalog_id: None,
            reference_id: None,
            substance_name: None,
            cas_number: None,
            classification: None,
            reason_code: None,
            source: None,
            generic_examples: None,
            reporting_threshold: default_reporting_threshold(),
            first_added: None,
            last_revised: None,
        }
    }
}

/// Substance names match case-insensitively, ignoring surrounding whitespace.
pub fn normalize_name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

mod absent {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::ABSENT_MARKER;

    pub fn serialize<S: Serializer>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(value.as_deref().unwrap_or(ABSENT_MARKER))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        Ok(raw
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty() && v != ABSENT_MARKER))
    }
}
