//! Bearer token authentication extractor.
//!
//! When `http.api_token` is set in `config.toml`, requests must carry it in
//! either header:
//! - `Authorization: Bearer <token>`
//! - `X-API-Key: <token>`
//!
//! Without a configured token every request is accepted.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::http::error::AppError;
use crate::http::server::ServerState;

/// Authenticated request marker. Extracting this validates the token.
pub struct Authenticated;

impl FromRequestParts<ServerState> for Authenticated {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        let Some(expected) = state.app.config.http.api_token.as_deref() else {
            return Ok(Authenticated);
        };

        let provided = extract_token(parts)?;
        if tokens_match(&provided, expected) {
            Ok(Authenticated)
        } else {
            Err(AppError::Unauthorized("Invalid API token.".to_string()))
        }
    }
}

/// Extract the token from request headers.
fn extract_token(parts: &Parts) -> Result<String, AppError> {
    if let Some(auth) = parts.headers.get("authorization") {
        let auth_str = auth.to_str().map_err(|_| {
            AppError::Unauthorized("Invalid Authorization header encoding".to_string())
        })?;
        if let Some(token) = auth_str.strip_prefix("Bearer ") {
            return Ok(token.trim().to_string());
        }
    }

    if let Some(token) = parts.headers.get("x-api-key") {
        let token_str = token.to_str().map_err(|_| {
            AppError::Unauthorized("Invalid X-API-Key header encoding".to_string())
        })?;
        return Ok(token_str.trim().to_string());
    }

    Err(AppError::Unauthorized(
        "Missing API token. Provide via 'Authorization: Bearer <token>' or 'X-API-Key: <token>' header.".to_string(),
    ))
}

/// Compare without returning early on the first differing byte.
fn tokens_match(provided: &str, expected: &str) -> bool {
    let (a, b) = (provided.as_bytes(), expected.as_bytes());
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
