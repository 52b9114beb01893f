//! Authentication middleware.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::{
    body::Body,
    http::{Request, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use quillbox_api::ApiError;

use crate::state::{AppState, AuthUser};

/// Validates Bearer tokens and injects [`AuthUser`] into request extensions.
///
/// Applied as a `route_layer` on the protected notes routes; failures are
/// returned as 401 with the standard JSON error body.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let auth_header = match req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
    {
        Some(header) => header,
        None => {
            tracing::debug!(path = %req.uri().path(), "No Authorization header");
            return ApiError::unauthorized("Authentication required").into_response();
        }
    };

    let token = match auth_header.strip_prefix("Bearer ") {
        Some(t) if !t.is_empty() => t,
        _ => {
            return ApiError::unauthorized("Invalid Authorization header format").into_response();
        }
    };

    let claims = match state.auth.verify_token(token) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::debug!(error = %e, "Token validation failed");
            return ApiError::from(e).into_response();
        }
    };

    let user_id = match claims.sub.parse::<Uuid>() {
        Ok(id) => id,
        Err(_) => {
            return ApiError::unauthorized("Invalid token subject").into_response();
        }
    };

    req.extensions_mut().insert(AuthUser {
        id: user_id,
        email: claims.email,
    });
    next.run(req).await
}
