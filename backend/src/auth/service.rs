//! Core business logic for the authentication system.

use crate::auth::cookie::SessionCookie;
use crate::auth::models::{LoginRequest, SignupRequest};
use crate::config::Config;
use crate::database::models::User;
use crate::errors::ServiceResult;
use crate::repositories::user_repository::UserStore;
use crate::services::user_service::UserService;
use crate::utils::jwt::{IssuedToken, JwtUtils};
use crate::utils::password::PasswordHasher;
use std::sync::Arc;

/// Authentication service for handling signup, login and token issuance
pub struct AuthService {
    user_service: UserService,
    jwt_utils: Arc<JwtUtils>,
    cookie: SessionCookie,
}

impl AuthService {
    /// Create a new AuthService instance
    pub fn new(user_service: UserService, jwt_utils: Arc<JwtUtils>, cookie: SessionCookie) -> Self {
        AuthService {
            user_service,
            jwt_utils,
            cookie,
        }
    }

    /// Wires the service from configuration and an injected user store.
    pub fn from_config(config: &Config, store: Arc<dyn UserStore>) -> Self {
        Self::new(
            UserService::new(store, PasswordHasher::new(config.bcrypt_cost)),
            Arc::new(JwtUtils::from_config(config)),
            SessionCookie::new(config.cookie_secure),
        )
    }

    pub fn jwt_utils(&self) -> Arc<JwtUtils> {
        Arc::clone(&self.jwt_utils)
    }

    pub fn cookie(&self) -> SessionCookie {
        self.cookie
    }

    pub fn user_service(&self) -> &UserService {
        &self.user_service
    }

    /// Register a new user from an already validated request
    pub async fn signup(&self, request: SignupRequest) -> ServiceResult<User> {
        self.user_service
            .register_user(request.name, &request.email, request.password)
            .await
    }

    /// Authenticate user and mint a session token
    pub async fn login(&self, request: LoginRequest) -> ServiceResult<(User, IssuedToken)> {
        let user = self
            .user_service
            .authenticate_user(&request.email, request.password)
            .await?;

        let issued = self.jwt_utils.generate_token(&user.id)?;
        tracing::info!("User {} logged in", user.id);

        Ok((user, issued))
    }
}
