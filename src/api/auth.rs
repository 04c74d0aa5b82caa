//! Registration, login, and the session gate.
//!
//! Registration and login orchestrate the credential store, the password
//! hasher, and the token issuer. The gate (`auth_middleware`) verifies the
//! bearer token on every protected request independently; there is no
//! server-side session state.

use axum::{
    async_trait,
    body::Body,
    extract::{FromRequestParts, State},
    http::{request::Parts, HeaderMap, Request, StatusCode},
    middleware::Next,
    response::Response,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::error::ApiError;
use crate::api::validation::{non_blank, non_empty, normalize_email};
use crate::crypto;
use crate::db::{users, AuthResponse, LoginRequest, NewUser, RegisterRequest, UserResponse};
use crate::token::Claims;
use crate::AppState;

const MISSING_FIELDS: &str = "Email and password are required.";
const INVALID_CREDENTIALS: &str = "Invalid email or password.";

/// The authenticated identity echoed by `GET /api/auth/me`.
#[derive(Debug, Serialize, Deserialize)]
pub struct CurrentUserResponse {
    pub id: i64,
    pub email: String,
    pub role: String,
}

/// Register endpoint
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let email = request
        .email
        .as_deref()
        .and_then(non_blank)
        .ok_or_else(|| ApiError::bad_request(MISSING_FIELDS))?;
    let password = request
        .password
        .as_deref()
        .and_then(non_empty)
        .ok_or_else(|| ApiError::bad_request(MISSING_FIELDS))?;

    let email = normalize_email(email);
    let name = request
        .name
        .as_deref()
        .and_then(non_blank)
        .map(str::to_string);

    // Friendly pre-check; the UNIQUE constraint on insert is the backstop
    // for the concurrent-registration race.
    if users::find_by_email(&state.db, &email).await?.is_some() {
        return Err(ApiError::conflict("Email already registered."));
    }

    let password_hash = crypto::hash_password(password).await.map_err(|e| {
        tracing::error!("Password hashing failed: {}", e);
        ApiError::internal("Internal server error.")
    })?;

    let new_user = NewUser {
        name,
        email,
        password_hash,
    };
    let id = users::insert(&state.db, &new_user).await?;

    let token = issue_token(&state, id, &new_user.email, "user")?;

    tracing::info!("Registered user {}", new_user.email);

    let user = UserResponse {
        id,
        name: new_user.name,
        email: new_user.email,
        role: "user".to_string(),
    };
    Ok((StatusCode::CREATED, Json(AuthResponse { token, user })))
}

/// Login endpoint
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let email = request
        .email
        .as_deref()
        .and_then(non_blank)
        .ok_or_else(|| ApiError::bad_request(MISSING_FIELDS))?;
    let password = request
        .password
        .as_deref()
        .and_then(non_empty)
        .ok_or_else(|| ApiError::bad_request(MISSING_FIELDS))?;

    let email = normalize_email(email);

    // An unknown email and a wrong password produce the same response, so
    // login cannot be used to probe which addresses have accounts.
    let user = users::find_by_email(&state.db, &email)
        .await?
        .ok_or_else(|| ApiError::unauthorized(INVALID_CREDENTIALS))?;

    if !crypto::verify_password(password, &user.password_hash).await {
        return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
    }

    let token = issue_token(&state, user.id, &user.email, &user.role)?;

    Ok(Json(AuthResponse {
        token,
        user: UserResponse::from(user),
    }))
}

/// Current-user endpoint; sits behind the session gate.
pub async fn me(claims: Claims) -> Json<CurrentUserResponse> {
    Json(CurrentUserResponse {
        id: claims.sub,
        email: claims.email,
        role: claims.role,
    })
}

fn issue_token(state: &AppState, id: i64, email: &str, role: &str) -> Result<String, ApiError> {
    state.keys.issue(id, email, role).map_err(|e| {
        tracing::error!("Token issuance failed: {}", e);
        ApiError::internal("Internal server error.")
    })
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
}

/// Session gate: require a valid bearer token, attach the decoded claims
/// to the request, and only then run the protected handler.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(request.headers())
        .ok_or_else(|| ApiError::unauthorized("Authorization header missing."))?;

    let claims = state
        .keys
        .verify(token)
        .map_err(|_| ApiError::unauthorized("Invalid or expired token."))?;

    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

/// Extractor for the authenticated identity. Reads the claims the gate
/// attached, or verifies the header itself on routes without the layer.
#[async_trait]
impl FromRequestParts<Arc<AppState>> for Claims {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        if let Some(claims) = parts.extensions.get::<Claims>() {
            return Ok(claims.clone());
        }

        let token = bearer_token(&parts.headers)
            .ok_or_else(|| ApiError::unauthorized("Authorization header missing."))?;
        state
            .keys
            .verify(token)
            .map_err(|_| ApiError::unauthorized("Invalid or expired token."))
    }
}
