//! Authentication Module
//! Mission: Credential handling, session tokens, and the guard for protected routes

pub mod api;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod service;
pub mod user_store;

pub use jwt::JwtHandler;
pub use middleware::auth_middleware;
pub use models::Claims;
pub use service::CredentialService;
pub use user_store::UserStore;
