//! Reference List Module
//!
//! Loads the GADSL restricted-substance list into `ReferenceRecord`s.
//! Supports Excel (XLSX/XLS) and CSV exports of the list.

pub mod loader;

pub use loader::{ReferenceDataset, ReferenceFormat, ReferenceLoader};
