//! Published reference index.
//!
//! Holds at most one `ReferenceIndex`. Readers take a snapshot without
//! locking; a new index replaces the old one in a single swap, so a reader
//! never sees a half-built index. While nothing has been published every
//! lookup reports `DataNotLoaded`.

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use chemsure_models::{LookupError, LookupResult, ReferenceLookup};

use crate::index::ReferenceIndex;

#[derive(Debug, Default)]
pub struct IndexStore {
    current: ArcSwapOption<ReferenceIndex>,
}

impl IndexStore {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_index(index: ReferenceIndex) -> Self {
        Self {
            current: ArcSwapOption::from_pointee(index),
        }
    }

    /// Replace the published index, returning the one it superseded.
    pub fn publish(&self, index: ReferenceIndex) -> Option<Arc<ReferenceIndex>> {
        self.current.swap(Some(Arc::new(index)))
    }

    pub fn snapshot(&self) -> Result<Arc<ReferenceIndex>, LookupError> {
        self.current.load_full().ok_or(LookupError::DataNotLoaded)
    }

    pub fn is_loaded(&self) -> bool {
        self.current.load().is_some()
    }
}

impl ReferenceLookup for IndexStore {
    fn lookup_by_cas(&self, cas_number: &str) -> LookupResult {
        Ok(self.snapshot()?.get_by_cas(cas_number))
    }

    fn lookup_by_name(&self, substance_name: &str) -> LookupResult {
        Ok(self.snapshot()?.get_by_name(substance_name))
    }

    fn ensure_loaded(&self) -> Result<(), LookupError> {
        self.snapshot().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chemsure_models::ReferenceRecord;

    #[test]
    fn test_empty_store_reports_not_loaded() {
        let store = IndexStore::empty();
        assert!(!store.is_loaded());
        assert_eq!(store.lookup_by_cas("75-07-0"), Err(LookupError::DataNotLoaded));
        assert_eq!(store.lookup_by_name("toluene"), Err(LookupError::DataNotLoaded));
        assert_eq!(store.ensure_loaded(), Err(LookupError::DataNotLoaded));
    }

    #[test]
    fn test_publish_replaces_index() {
        let store = IndexStore::with_index(ReferenceIndex::build(vec![ReferenceRecord::new(
            Some("Toluene"),
            Some("108-88-3"),
        )]));
        assert!(store.lookup_by_name("toluene").unwrap().is_some());

        let previous = store.publish(ReferenceIndex::build(vec![ReferenceRecord::new(
            Some("Benzene"),
            Some("71-43-2"),
        )]));

        assert!(previous.is_some());
        assert_eq!(store.lookup_by_name("toluene"), Ok(None));
        assert!(store.lookup_by_cas("71-43-2").unwrap().is_some());
    }

    #[test]
    fn test_snapshot_outlives_publish() {
        let store = IndexStore::with_index(ReferenceIndex::build(vec![ReferenceRecord::new(
            Some("Toluene"),
            Some("108-88-3"),
        )]));
        let snapshot = store.snapshot().unwrap();

        store.publish(ReferenceIndex::build(Vec::new()));

        assert!(snapshot.get_by_name("toluene").is_some());
        assert_eq!(store.snapshot().unwrap().cas_entries(), 0);
    }
}
