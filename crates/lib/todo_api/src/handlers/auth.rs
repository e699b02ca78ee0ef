//! Authentication request handlers.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use todo_core::models::user::Credentials;

use crate::AppState;
use crate::error::AppResult;
use crate::middleware::auth::{AuthenticatedUser, BEARER_SCHEME};
use crate::models::{CredentialsRequest, SuccessResponse, TokenResponse, UserResponse, ok};

fn credentials(body: CredentialsRequest) -> Credentials {
    Credentials::new(
        body.login.unwrap_or_default(),
        body.password.unwrap_or_default(),
    )
}

fn token_response(state: &AppState, token: String) -> TokenResponse {
    TokenResponse {
        token,
        token_type: BEARER_SCHEME.to_string(),
        expires_in: state.auth.token_ttl().num_seconds(),
    }
}

/// `POST /api/v1/auth/sign-up` — create an account and return a token.
pub async fn sign_up_handler(
    State(state): State<AppState>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> AppResult<Json<SuccessResponse<TokenResponse>>> {
    let Json(body) = payload?;
    let token = state.auth.register(&credentials(body)).await?;
    Ok(ok(token_response(&state, token)))
}

/// `POST /api/v1/auth/sign-in` — exchange login + password for a token.
pub async fn sign_in_handler(
    State(state): State<AppState>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> AppResult<Json<SuccessResponse<TokenResponse>>> {
    let Json(body) = payload?;
    let token = state.auth.authenticate(&credentials(body)).await?;
    Ok(ok(token_response(&state, token)))
}

/// `GET /api/v1/auth/me` — the authenticated user. Requires authentication.
pub async fn me_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> AppResult<Json<SuccessResponse<UserResponse>>> {
    let user = state.auth.current_user(user.user_id()).await?;
    Ok(ok(UserResponse::from(user)))
}
