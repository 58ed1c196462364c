//! Notes Backend Library
//!
//! Exposes the router, state, and stores for use by the server binary and tests.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod notes;
pub mod state;

pub use api::build_router;
pub use config::Config;
pub use error::AppError;
pub use state::AppState;
