//! Route wiring
//!
//! `/` and `/users/*` are public. Everything under `/notes` sits behind the
//! session guard.

use crate::auth::{api as auth_api, auth_middleware};
use crate::middleware::request_logging;
use crate::notes::api as notes_api;
use crate::state::AppState;
use axum::{
    middleware,
    routing::{delete, get, patch, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

/// Build the full HTTP router
pub fn build_router(state: AppState) -> Router {
    let user_routes = Router::new()
        .route("/users/register", post(auth_api::register))
        .route("/users/login", post(auth_api::login));

    let note_routes = Router::new()
        .route("/notes", get(notes_api::list_notes))
        .route("/notes/create", post(notes_api::create_note))
        .route("/notes/:id", get(notes_api::get_note))
        .route("/notes/update/:id", patch(notes_api::update_note))
        .route("/notes/delete/:id", delete(notes_api::delete_note))
        .route_layer(middleware::from_fn_with_state(
            state.jwt_handler.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/", get(home))
        .merge(user_routes)
        .merge(note_routes)
        .layer(
            ServiceBuilder::new()
                .layer(CorsLayer::permissive())
                .layer(middleware::from_fn(request_logging)),
        )
        .with_state(state)
}

async fn home() -> &'static str {
    "HOME PAGE"
}
