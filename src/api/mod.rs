//! HTTP API: routing tree and public endpoints.

pub mod extract;
pub mod routes;

pub use extract::JsonBody;
pub use routes::build_router;
