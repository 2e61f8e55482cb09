//! Defines the HTTP routes for authentication and session handling.
//!
//! These routes are designed to be merged into the main Axum router. The
//! service is attached as an extension; protected routes get the session gate.

use crate::auth::handlers::*;
use crate::auth::middleware::session_auth;
use crate::auth::service::AuthService;
use axum::{
    Extension, Router, middleware,
    routing::{get, post},
};
use std::sync::Arc;

/// Creates the authentication router with all auth-related routes
pub fn auth_router(auth_service: Arc<AuthService>) -> Router {
    let gate = middleware::from_fn_with_state(auth_service.jwt_utils(), session_auth);

    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/checksession", get(check_session).layer(gate.clone()))
        .route("/logout", post(logout).layer(gate.clone()))
        .route("/me", get(me).layer(gate))
        .layer(Extension(auth_service))
}
