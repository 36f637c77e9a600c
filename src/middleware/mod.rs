pub mod auth;
pub mod request_id;

pub use auth::{auth_middleware, bearer_token};
pub use request_id::{request_id_middleware, request_span, RequestId, REQUEST_ID_HEADER};
