pub mod error_handling;
pub mod request_id;

pub use error_handling::{route_not_found, ApiError, ApiResult};
pub use request_id::{request_id_middleware, REQUEST_ID_HEADER};
