//! Chemical Service
//!
//! Core business logic for reference list lookups and CAS validation.

use std::path::PathBuf;
use std::sync::Arc;

use chemsure_models::{CasValidation, LookupError, LookupResult, ReferenceLookup, ReferenceRecord};
use chemsure_utils::{ChemsureResult, ReferenceConfig, ReferenceLoader};
use tracing::{error, info, warn};

use crate::index::{IndexSummary, ReferenceIndex};
use crate::store::IndexStore;

/// Chemical reference service
#[derive(Clone)]
pub struct ChemicalService {
    store: Arc<IndexStore>,
    loader: ReferenceLoader,
    source_path: PathBuf,
}

impl ChemicalService {
    /// Create a service with nothing published yet.
    pub fn new(source_path: impl Into<PathBuf>, loader: ReferenceLoader) -> Self {
        Self {
            store: Arc::new(IndexStore::empty()),
            loader,
            source_path: source_path.into(),
        }
    }

    pub fn from_config(config: &ReferenceConfig) -> Self {
        Self::new(
            &config.path,
            ReferenceLoader::new().with_sheet(config.sheet.clone()),
        )
    }

    /// Create a service around an already built index
    pub fn with_index(index: ReferenceIndex) -> Self {
        Self {
            store: Arc::new(IndexStore::with_index(index)),
            loader: ReferenceLoader::new(),
            source_path: PathBuf::new(),
        }
    }

    /// Load the reference list, build the index and publish it.
    ///
    /// On failure the previously published index stays in place. The error
    /// is returned either way; whether it is fatal is the caller's call.
    pub fn load(&self) -> ChemsureResult<IndexSummary> {
        let dataset = match self.loader.load_path(&self.source_path) {
            Ok(dataset) => dataset,
            Err(e) => {
                if self.store.is_loaded() {
                    warn!(error = %e, "Reference reload failed, keeping previous index");
                } else {
                    error!(error = %e, path = %self.source_path.display(), "Reference data failed to load");
                }
                return Err(e);
            }
        };

        let index = ReferenceIndex::from_dataset(dataset);
        let summary = index.summary();
        self.store.publish(index);

        info!(
            by_cas = summary.cas_entries,
            by_name = summary.name_entries,
            fingerprint = summary.fingerprint.as_deref().unwrap_or_default(),
            "Reference index published"
        );

        Ok(summary)
    }

    /// Lookup a record by CAS number
    pub fn lookup_by_cas(&self, cas_number: &str) -> ChemsureResult<Option<Arc<ReferenceRecord>>> {
        let result = self.store.lookup_by_cas(cas_number);
        if result.is_err() {
            error!("GADSL data not loaded for CAS lookup");
        }
        Ok(result?)
    }

    /// Lookup a record by substance name
    pub fn lookup_by_name(&self, substance_name: &str) -> ChemsureResult<Option<Arc<ReferenceRecord>>> {
        let result = self.store.lookup_by_name(substance_name);
        if result.is_err() {
            error!("GADSL data not loaded for substance name lookup");
        }
        Ok(result?)
    }

    /// Validate CAS number format and checksum
    pub fn validate_cas(&self, cas_number: &str) -> CasValidation {
        CasValidation::new(cas_number)
    }

    pub fn is_loaded(&self) -> bool {
        self.store.is_loaded()
    }

    pub fn summary(&self) -> Option<IndexSummary> {
        self.store.snapshot().ok().map(|index| index.summary())
    }

    pub fn store(&self) -> Arc<IndexStore> {
        Arc::clone(&self.store)
    }
}

impl ReferenceLookup for ChemicalService {
    fn lookup_by_cas(&self, cas_number: &str) -> LookupResult {
        self.store.lookup_by_cas(cas_number)
    }

    fn lookup_by_name(&self, substance_name: &str) -> LookupResult {
        self.store.lookup_by_name(substance_name)
    }

    fn ensure_loaded(&self) -> Result<(), LookupError> {
        self.store.ensure_loaded()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chemsure_utils::ChemsureError;

    const HEADER: &str = "GADSL #,REF #,Substance,CAS RN,Classification,Reason Code,Source,Generic examples,Reporting threshold,First added,Last revised";

    fn write_list(dir: &tempfile::TempDir, rows: &[&str]) -> PathBuf {
        let path = dir.path().join("gadsl.csv");
        let mut body = HEADER.to_string();
        for row in rows {
            body.push('\n');
            body.push_str(row);
        }
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_lookups_before_load_report_not_loaded() {
        let service = ChemicalService::new("missing.xlsx", ReferenceLoader::new());

        let err = service.lookup_by_cas("75-07-0").unwrap_err();
        assert!(matches!(err, ChemsureError::DataNotLoaded { .. }));

        let err = service.lookup_by_name("Toluene").unwrap_err();
        assert_eq!(err.http_status_code(), 503);
    }

    #[test]
    fn test_first_load_failure_propagates() {
        let service = ChemicalService::new("/nonexistent/gadsl.xlsx", ReferenceLoader::new());

        assert!(service.load().is_err());
        assert!(!service.is_loaded());
        assert!(service.summary().is_none());
    }

    #[test]
    fn test_load_then_lookup() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_list(&dir, &["1,100,Acetaldehyde,75-07-0,D,FI,EU,,,,"]);
        let service = ChemicalService::new(path, ReferenceLoader::new());

        let summary = service.load().unwrap();
        assert_eq!(summary.cas_entries, 1);
        assert_eq!(summary.source.as_deref(), Some("gadsl.csv"));

        let hit = service.lookup_by_cas(" 75-07-0 ").unwrap().unwrap();
        assert_eq!(hit.display_name(), "Acetaldehyde");
        assert!(service.lookup_by_cas("9999-99-9").unwrap().is_none());
        assert!(service.lookup_by_name("ACETALDEHYDE").unwrap().is_some());
    }

    #[test]
    fn test_failed_reload_keeps_stale_index() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_list(&dir, &["1,100,Toluene,108-88-3,D,LR,EU,,,,"]);
        let service = ChemicalService::new(&path, ReferenceLoader::new());
        let first = service.load().unwrap();

        std::fs::write(&path, "not,a,gadsl,list\n1,2,3,4").unwrap();
        assert!(service.load().is_err());

        assert!(service.lookup_by_name("toluene").unwrap().is_some());
        assert_eq!(service.summary().unwrap().fingerprint, first.fingerprint);
    }

    #[test]
    fn test_validate_cas() {
        let service = ChemicalService::with_index(ReferenceIndex::build(Vec::new()));
        assert!(service.validate_cas("7732-18-5").is_valid());
        assert!(!service.validate_cas("invalid").is_valid());
    }
}
