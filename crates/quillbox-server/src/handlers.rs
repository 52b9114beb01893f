//! HTTP handlers for the Quillbox API.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use quillbox_api::{
    ApiError, CreateNoteRequest, CredentialsRequest, DeleteResponse, RegisteredUser,
    UpdateNoteRequest,
};
use quillbox_auth::TokenGrant;
use quillbox_core::{Note, NoteId};

use crate::state::{AppState, AuthUser};

#[derive(Serialize)]
pub struct HealthResponse<'a> {
    status: &'a str,
}

pub async fn root() -> impl IntoResponse {
    let body = json!({
        "service": "Quillbox API",
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    });
    (StatusCode::OK, Json(body))
}

pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, Json(HealthResponse { status: "ok" }))
}

/// Prometheus exposition endpoint.
pub async fn metrics() -> impl IntoResponse {
    match crate::metrics::render_metrics() {
        Some(body) => (StatusCode::OK, body).into_response(),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            "metrics recorder not initialized",
        )
            .into_response(),
    }
}

// ---- Auth ----

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<CredentialsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    body.validate()?;
    let user = state.auth.register(&body.email, &body.password).await?;
    Ok((
        StatusCode::CREATED,
        Json(RegisteredUser {
            id: user.id.to_string(),
            email: user.email,
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<CredentialsRequest>,
) -> Result<Json<TokenGrant>, ApiError> {
    body.validate()?;
    let grant = state.auth.login(&body.email, &body.password).await?;
    Ok(Json(grant))
}

// ---- Notes ----

#[derive(Debug, Deserialize)]
pub struct ListNotesQuery {
    /// Raw comma-separated tag filter, passed through to the service.
    pub tags: Option<String>,
}

pub async fn create_note(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<CreateNoteRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let draft = body.into_draft()?;
    let note = state.notes.create(user.id, draft).await?;
    Ok((StatusCode::CREATED, Json(note)))
}

pub async fn list_notes(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<ListNotesQuery>,
) -> Result<Json<Vec<Note>>, ApiError> {
    let notes = state.notes.find_all(user.id, query.tags.as_deref()).await?;
    Ok(Json(notes))
}

pub async fn update_note(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<NoteId>,
    Json(body): Json<UpdateNoteRequest>,
) -> Result<Json<Note>, ApiError> {
    let note = state
        .notes
        .update(user.id, id, body.into_changes())
        .await?;
    Ok(Json(note))
}

pub async fn delete_note(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<NoteId>,
) -> Result<Json<DeleteResponse>, ApiError> {
    state.notes.remove(user.id, id).await?;
    Ok(Json(DeleteResponse { success: true }))
}
