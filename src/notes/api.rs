//! Note API Endpoints
//! Mission: CRUD over the caller's own notes
//!
//! Every handler runs behind [`auth_middleware`](crate::auth::auth_middleware),
//! so the `Claims` extension is always present.

use crate::api::JsonBody;
use crate::auth::models::MessageResponse;
use crate::auth::Claims;
use crate::error::AppError;
use crate::notes::models::{CreateNoteRequest, Note, NoteResponse, UpdateNoteRequest};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use tracing::warn;
use uuid::Uuid;

/// Create note - POST /notes/create
pub async fn create_note(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    JsonBody(payload): JsonBody<CreateNoteRequest>,
) -> Result<Json<NoteResponse>, AppError> {
    let user_id = caller_id(&claims)?;

    let title = payload.title.trim();
    if title.is_empty() {
        return Err(AppError::validation("title is required"));
    }

    // Owner comes from the token, never from the body
    let note = state
        .notes
        .create_note(&user_id, title, &payload.body)?
        .ok_or_else(|| {
            warn!("Token subject {} has no account", user_id);
            AppError::InvalidToken
        })?;

    Ok(Json(NoteResponse {
        msg: "Note created".to_string(),
        note,
    }))
}

/// List notes - GET /notes
pub async fn list_notes(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<Note>>, AppError> {
    let user_id = caller_id(&claims)?;
    Ok(Json(state.notes.list_notes(&user_id)?))
}

/// Get one note - GET /notes/:id
pub async fn get_note(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(note_id): Path<String>,
) -> Result<Json<Note>, AppError> {
    let user_id = caller_id(&claims)?;
    let note_id = parse_note_id(&note_id)?;

    let note = state
        .notes
        .get_note(&user_id, &note_id)?
        .ok_or(AppError::NotFound)?;

    Ok(Json(note))
}

/// Update note - PATCH /notes/update/:id
pub async fn update_note(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(note_id): Path<String>,
    JsonBody(payload): JsonBody<UpdateNoteRequest>,
) -> Result<Json<NoteResponse>, AppError> {
    let user_id = caller_id(&claims)?;
    let note_id = parse_note_id(&note_id)?;

    let title = payload.title.as_deref().map(str::trim);
    if title == Some("") {
        return Err(AppError::validation("title must not be empty"));
    }

    let note = state
        .notes
        .update_note(&user_id, &note_id, title, payload.body.as_deref())?
        .ok_or(AppError::NotFound)?;

    Ok(Json(NoteResponse {
        msg: "Note updated".to_string(),
        note,
    }))
}

/// Delete note - DELETE /notes/delete/:id
pub async fn delete_note(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(note_id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let user_id = caller_id(&claims)?;
    let note_id = parse_note_id(&note_id)?;

    if !state.notes.delete_note(&user_id, &note_id)? {
        return Err(AppError::NotFound);
    }

    Ok(Json(MessageResponse::new("Note deleted")))
}

fn caller_id(claims: &Claims) -> Result<Uuid, AppError> {
    claims.user_id().ok_or(AppError::InvalidToken)
}

// A malformed id cannot name an existing note
fn parse_note_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound)
}
