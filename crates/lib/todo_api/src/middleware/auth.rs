//! Authentication middleware — Bearer token extraction and JWT verification.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::AppState;
use crate::error::AppError;

/// Authorization scheme expected in front of the token.
pub const BEARER_SCHEME: &str = "Bearer";

/// Verified user id of the caller, stored in request extensions by
/// [`require_auth`].
///
/// Handlers take it as an extractor argument. If the middleware did not run
/// the extractor rejects with [`AppError::IdentityNotFound`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser(pub String);

impl AuthenticatedUser {
    pub fn user_id(&self) -> &str {
        &self.0
    }
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or(AppError::IdentityNotFound)
    }
}

/// Pull the token out of `Authorization: Bearer <token>`.
///
/// The header must split on a single space into exactly two parts, the first
/// being [`BEARER_SCHEME`] (case-sensitive) and the second non-empty.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(AppError::MissingAuthHeader)?;
    let header = value.to_str().map_err(|_| AppError::MalformedAuthHeader)?;
    if header.is_empty() {
        return Err(AppError::MissingAuthHeader);
    }
    let mut parts = header.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(BEARER_SCHEME), Some(token), None) if !token.is_empty() => Ok(token),
        _ => Err(AppError::MalformedAuthHeader),
    }
}

/// Axum middleware: extracts `Authorization: Bearer <token>`, verifies the JWT,
/// and injects [`AuthenticatedUser`] into request extensions.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user_id = {
        let token = bearer_token(request.headers())?;
        state.auth.check(token).map_err(|e| {
            debug!("token rejected: {e}");
            AppError::from(e)
        })?
    };

    request.extensions_mut().insert(AuthenticatedUser(user_id));

    Ok(next.run(request).await)
}
