//! Reference Index
//!
//! Two read-only maps over the reference list: trimmed CAS number and
//! lowercased, trimmed substance name, each pointing at the originating
//! record. Duplicate keys resolve last-wins.

use std::collections::HashMap;
use std::sync::Arc;

use chemsure_models::{normalize_cas_key, normalize_name_key, LookupResult, ReferenceLookup, ReferenceRecord};
use chemsure_utils::ReferenceDataset;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

/// Immutable lookup structure built once from the reference records.
#[derive(Debug, Clone)]
pub struct ReferenceIndex {
    by_cas: HashMap<String, Arc<ReferenceRecord>>,
    by_name: HashMap<String, Arc<ReferenceRecord>>,
    record_count: usize,
    source: Option<String>,
    fingerprint: Option<String>,
    built_at: DateTime<Utc>,
}

/// Index statistics for health and reload reporting
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexSummary {
    pub records: usize,
    pub cas_entries: usize,
    pub name_entries: usize,
    pub source: Option<String>,
    pub fingerprint: Option<String>,
    pub built_at: DateTime<Utc>,
}

impl ReferenceIndex {
    /// Build both maps from the records in order.
    pub fn build<I>(records: I) -> Self
    where
        I: IntoIterator<Item = ReferenceRecord>,
    {
        let mut by_cas = HashMap::new();
        let mut by_name = HashMap::new();
        let mut record_count = 0;

        for record in records {
            record_count += 1;
            let cas_key = record.cas_key();
            let name_key = record.name_key();
            let record = Arc::new(record);

            if let Some(key) = cas_key {
                by_cas.insert(key, Arc::clone(&record));
            }
            if let Some(key) = name_key {
                by_name.insert(key, record);
            }
        }

        let index = Self {
            by_cas,
            by_name,
            record_count,
            source: None,
            fingerprint: None,
            built_at: Utc::now(),
        };

        info!(
            records = index.record_count,
            by_cas = index.by_cas.len(),
            by_name = index.by_name.len(),
            "Reference index built"
        );

        index
    }

    /// Build from a loaded dataset, keeping its provenance.
    pub fn from_dataset(dataset: ReferenceDataset) -> Self {
        let ReferenceDataset { records, source, fingerprint, .. } = dataset;
        let mut index = Self::build(records);
        index.source = Some(source);
        index.fingerprint = Some(fingerprint);
        index
    }

    pub fn get_by_cas(&self, cas_number: &str) -> Option<Arc<ReferenceRecord>> {
        self.by_cas.get(&normalize_cas_key(cas_number)).cloned()
    }

    pub fn get_by_name(&self, substance_name: &str) -> Option<Arc<ReferenceRecord>> {
        self.by_name.get(&normalize_name_key(substance_name)).cloned()
    }

    pub fn cas_entries(&self) -> usize {
        self.by_cas.len()
    }

    pub fn name_entries(&self) -> usize {
        self.by_name.len()
    }

    pub fn summary(&self) -> IndexSummary {
        IndexSummary {
            records: self.record_count,
            cas_entries: self.by_cas.len(),
            name_entries: self.by_name.len(),
            source: self.source.clone(),
            fingerprint: self.fingerprint.clone(),
            built_at: self.built_at,
        }
    }
}

impl ReferenceLookup for ReferenceIndex {
    fn lookup_by_cas(&self, cas_number: &str) -> LookupResult {
        Ok(self.get_by_cas(cas_number))
    }

    fn lookup_by_name(&self, substance_name: &str) -> LookupResult {
        Ok(self.get_by_name(substance_name))
    }
}
