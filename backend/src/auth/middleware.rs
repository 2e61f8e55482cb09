//! Session gate protecting authenticated routes.
//!
//! Reads the `token` cookie, validates it and either forwards the request with
//! the decoded [`Claims`] in its extensions or answers on the handler's behalf:
//!
//! | Request                         | Outcome           | Response                       |
//! |---------------------------------|-------------------|--------------------------------|
//! | no `token` cookie               | Unauthenticated   | 401 `{"isSessionValid":false}` |
//! | expired token                   | Unauthenticated   | 401 `{"isSessionValid":false}` |
//! | bad signature / malformed token | Rejected          | 401 error envelope             |
//! | valid token                     | Authenticated     | downstream handler             |
//!
//! The gate never re-issues or extends a token.

use crate::api::common::error_response;
use crate::auth::cookie::extract_session_token;
use crate::auth::models::SessionStatus;
use crate::errors::TokenError;
use crate::utils::jwt::{Claims, JwtUtils};
use axum::{
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnauthenticatedReason {
    MissingToken,
    Expired,
}

/// Terminal state of the gate for one request.
#[derive(Debug, PartialEq, Eq)]
pub enum GateOutcome {
    Authenticated(Claims),
    Unauthenticated(UnauthenticatedReason),
    Rejected(TokenError),
}

impl GateOutcome {
    /// Classifies a request by its session cookie.
    pub fn evaluate(headers: &HeaderMap, jwt_utils: &JwtUtils) -> Self {
        let Some(token) = extract_session_token(headers) else {
            return GateOutcome::Unauthenticated(UnauthenticatedReason::MissingToken);
        };

        match jwt_utils.validate_token(&token) {
            Ok(claims) => GateOutcome::Authenticated(claims),
            Err(TokenError::Expired) => GateOutcome::Unauthenticated(UnauthenticatedReason::Expired),
            Err(error) => GateOutcome::Rejected(error),
        }
    }
}

/// Session cookie authentication middleware
pub async fn session_auth(
    State(jwt_utils): State<Arc<JwtUtils>>,
    mut request: Request,
    next: Next,
) -> Response {
    match GateOutcome::evaluate(request.headers(), &jwt_utils) {
        GateOutcome::Authenticated(claims) => {
            // Add claims to request extensions for use in handlers
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        GateOutcome::Unauthenticated(reason) => {
            tracing::debug!("Unauthenticated request to {}: {:?}", request.uri().path(), reason);
            (StatusCode::UNAUTHORIZED, Json(SessionStatus::invalid())).into_response()
        }
        GateOutcome::Rejected(error) => {
            tracing::warn!("Rejected session token on {}: {}", request.uri().path(), error);
            error_response(StatusCode::UNAUTHORIZED, error.to_string(), error.error_type())
                .into_response()
        }
    }
}
