//! ChemSure Chemical Database
//!
//! GADSL reference index: built once from the reference list, published
//! atomically, and queried by CAS number or substance name.

pub mod index;
pub mod service;
pub mod store;

pub use index::{IndexSummary, ReferenceIndex};
pub use service::ChemicalService;
pub use store::IndexStore;
