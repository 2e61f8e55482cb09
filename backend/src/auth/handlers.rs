//! Handler functions for authentication-related API endpoints.
//!
//! These functions process incoming HTTP requests for signup, login, session
//! checks and logout, validate input, and delegate to `auth::service` for the
//! core logic.

use crate::api::common::{
    ApiError, ApiResponse, error_response, json_rejection_response, service_error_to_http,
    validation_error_response,
};
use crate::auth::models::*;
use crate::auth::service::AuthService;
use crate::database::models::User;
use crate::utils::jwt::Claims;
use axum::{
    extract::{Extension, Json, rejection::JsonRejection},
    http::{StatusCode, header::SET_COOKIE},
    response::{AppendHeaders, IntoResponse, Json as ResponseJson},
};
use std::sync::Arc;
use validator::Validate;

/// Handle user registration request
#[axum::debug_handler]
pub async fn signup(
    Extension(auth_service): Extension<Arc<AuthService>>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<(StatusCode, ResponseJson<ApiResponse<User>>), ApiError> {
    let Json(payload) = payload.map_err(json_rejection_response)?;
    payload.validate().map_err(validation_error_response)?;

    let user = auth_service
        .signup(payload)
        .await
        .map_err(service_error_to_http)?;

    Ok((
        StatusCode::CREATED,
        ResponseJson(ApiResponse::success(user, "User registered successfully")),
    ))
}

/// Handle user login request
///
/// Unknown email and wrong password both answer 401 with the same body.
#[axum::debug_handler]
pub async fn login(
    Extension(auth_service): Extension<Arc<AuthService>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload.map_err(json_rejection_response)?;
    payload.validate().map_err(validation_error_response)?;

    let (user, issued) = auth_service.login(payload).await.map_err(|error| {
        tracing::warn!("Login failed: {}", error);
        service_error_to_http(error)
    })?;

    let cookie = auth_service
        .cookie()
        .issue(&issued.token, issued.expires_at)
        .map_err(|e| {
            tracing::error!("Failed to build session cookie: {}", e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to generate token",
                "token_signing_error",
            )
        })?;

    let response = LoginResponse {
        user,
        expires_at: issued.expires_at,
    };

    Ok((
        AppendHeaders([(SET_COOKIE, cookie)]),
        ResponseJson(ApiResponse::success(response, "Login successful")),
    ))
}

/// Reached only through the session gate, so the session is valid
#[axum::debug_handler]
pub async fn check_session(Extension(_claims): Extension<Claims>) -> ResponseJson<SessionStatus> {
    ResponseJson(SessionStatus::valid())
}

/// Handle logout request (client-side token invalidation)
///
/// Tokens are not tracked server-side; the client is told to drop its cookie
/// and a copied token stays valid until it expires.
#[axum::debug_handler]
pub async fn logout(
    Extension(auth_service): Extension<Arc<AuthService>>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let cookie = auth_service.cookie().clear().map_err(|e| {
        tracing::error!("Failed to build logout cookie: {}", e);
        error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal server error",
            "internal_error",
        )
    })?;

    tracing::info!("User {} logged out", claims.user_id());

    Ok((
        AppendHeaders([(SET_COOKIE, cookie)]),
        ResponseJson(serde_json::json!({
            "message": "Logged out successfully"
        })),
    ))
}

/// Get current user information from token
#[axum::debug_handler]
pub async fn me(
    Extension(auth_service): Extension<Arc<AuthService>>,
    Extension(claims): Extension<Claims>,
) -> Result<ResponseJson<ApiResponse<User>>, ApiError> {
    let user = auth_service
        .user_service()
        .get_user_required(claims.user_id())
        .await
        .map_err(service_error_to_http)?;

    Ok(ResponseJson(ApiResponse::success(
        user,
        "User retrieved successfully",
    )))
}
