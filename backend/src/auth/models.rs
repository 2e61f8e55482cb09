//! Data structures for authentication-related requests and responses.

use crate::database::models::User;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Signup request payload
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Name must be between 1-255 characters"
    ))]
    pub name: String,

    #[validate(
        email(message = "Must be a valid email"),
        length(max = 255, message = "Email too long")
    )]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Login request payload
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Login response body; the token itself travels only in the cookie.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: User,
    pub expires_at: DateTime<Utc>,
}

/// Body of `/checksession` and of the gate's unauthenticated response.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionStatus {
    #[serde(rename = "isSessionValid")]
    pub is_session_valid: bool,
}

impl SessionStatus {
    pub fn valid() -> Self {
        Self {
            is_session_valid: true,
        }
    }

    pub fn invalid() -> Self {
        Self {
            is_session_valid: false,
        }
    }
}
