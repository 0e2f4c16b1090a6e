//! Account handlers: register, login, me.

use axum::Json;
use axum::extract::State;

use lessonhub_entity::user::User;
use lessonhub_service::account::Registration;

use crate::dto::request::{LoginRequest, RegisterRequest};
use crate::dto::response::{ApiResponse, LoginResponse};
use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::handlers::validate_request;
use crate::state::AppState;

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<Json<ApiResponse<User>>> {
    validate_request(&req)?;

    let user = state
        .account_service
        .register(Registration {
            email: req.email,
            password: req.password,
            full_name: req.full_name,
            phone: req.phone,
            role: req.role,
        })
        .await?;

    Ok(Json(ApiResponse::ok(user)))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    validate_request(&req)?;

    let outcome = state.account_service.login(&req.email, &req.password).await?;

    Ok(Json(LoginResponse {
        access_token: outcome.tokens.access_token,
        refresh_token: outcome.tokens.refresh_token,
        access_expires_at: outcome.tokens.access_expires_at,
        user: outcome.user,
    }))
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<User>>> {
    let user = state.account_service.me(auth.context()).await?;
    Ok(Json(ApiResponse::ok(user)))
}
