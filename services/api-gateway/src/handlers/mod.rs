pub mod chemicals;
pub mod health;
pub mod lookup;
pub mod msds;

pub use chemicals::{reload_reference, validate_cas};
pub use health::{detailed_health_check, health_check};
pub use lookup::{lookup_by_cas_rn, lookup_by_substance_name};
pub use msds::upload_msds_pdf;
