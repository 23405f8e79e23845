use axum::{
    Extension, Json,
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use std::sync::Arc;
use tower_sessions::Session;

use super::observability::{RequestSpan, record_caller};
use super::{ApiError, ApiResponse, AppState, MessageResponse};
use crate::domain::{Caller, UserId};
use crate::services::AuthError;
use crate::services::auth_service::{LoginResult, UserInfo};

const SESSION_USER_KEY: &str = "user_id";

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials | AuthError::UserNotFound => {
                Self::unauthorized("Invalid credentials")
            }
            AuthError::Validation(msg) => Self::validation(msg),
            AuthError::Database(msg) => Self::DatabaseError(msg),
            AuthError::Internal(msg) => Self::internal(msg),
        }
    }
}

// ============================================================================
// Middleware
// ============================================================================

/// Resolves the request's [`Caller`] from, in order:
/// 1. Session cookie (from login)
/// 2. `X-Api-Key` header
/// 3. `Authorization: Bearer <api_key>` header
///
/// The caller is attached as a request extension for the handlers and
/// recorded on the [`RequestSpan`]; its role rides back on the response
/// for the request metrics.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    session: Session,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(caller) = resolve_caller(&state, &headers, &session).await? else {
        return Err(ApiError::unauthorized(
            "Authentication credentials were not provided",
        ));
    };

    if let Some(RequestSpan(span)) = request.extensions().get::<RequestSpan>() {
        record_caller(span, &caller);
    }
    let role = caller.role;
    request.extensions_mut().insert(caller);

    let mut response = next.run(request).await;
    response.extensions_mut().insert(role);
    Ok(response)
}

async fn resolve_caller(
    state: &AppState,
    headers: &HeaderMap,
    session: &Session,
) -> Result<Option<Caller>, ApiError> {
    if let Ok(Some(user_id)) = session.get::<i32>(SESSION_USER_KEY).await
        && let Some(caller) = state
            .auth_service()
            .caller_for_user(UserId::new(user_id))
            .await?
    {
        return Ok(Some(caller));
    }

    match extract_api_key(headers) {
        Some(key) => Ok(state.auth_service().caller_for_api_key(&key).await?),
        None => Ok(None),
    }
}

fn extract_api_key(headers: &HeaderMap) -> Option<String> {
    if let Some(api_key) = headers.get("X-Api-Key")
        && let Ok(key_str) = api_key.to_str()
    {
        return Some(key_str.to_string());
    }

    if let Some(auth_header) = headers.get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
    {
        return Some(token.trim().to_string());
    }

    None
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /auth/login
/// Authenticate with email and password, returns the API key on success
pub async fn login(
    State(state): State<Arc<AppState>>,
    session: Session,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResult>>, ApiError> {
    let result = state
        .auth_service()
        .login(&payload.email, &payload.password)
        .await?;

    session
        .insert(SESSION_USER_KEY, result.user.id.value())
        .await
        .map_err(|e| ApiError::internal(format!("Failed to create session: {e}")))?;

    tracing::info!(user_id = %result.user.id, "User logged in");

    Ok(Json(ApiResponse::success(result)))
}

/// POST /auth/logout
pub async fn logout(session: Session) -> impl IntoResponse {
    let _ = session.flush().await;
    (
        StatusCode::OK,
        Json(ApiResponse::success(MessageResponse {
            message: "Logged out".to_string(),
        })),
    )
}

/// GET /auth/me
pub async fn get_current_user(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<Caller>,
) -> Result<Json<ApiResponse<UserInfo>>, ApiError> {
    let user = state.auth_service().get_user_info(caller.id).await?;
    Ok(Json(ApiResponse::success(user)))
}
