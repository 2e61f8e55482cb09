//! User business logic service.
//!
//! Registers users and checks their credentials. Password hashing is
//! CPU-bound by design and runs on the blocking thread pool.

use crate::database::models::{CreateUser, User, normalize_email};
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::user_repository::UserStore;
use crate::utils::password::PasswordHasher;
use std::sync::Arc;

#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn UserStore>,
    hasher: PasswordHasher,
}

impl UserService {
    /// Creates a new UserService instance.
    ///
    /// # Arguments
    /// * `store` - Credential record store
    /// * `hasher` - Password hasher configured with the bcrypt cost
    pub fn new(store: Arc<dyn UserStore>, hasher: PasswordHasher) -> Self {
        Self { store, hasher }
    }

    /// Creates a new user, storing only the password hash.
    ///
    /// # Errors
    /// Returns `ServiceError` for:
    /// - Blank name (`Validation`)
    /// - Duplicate email (`AlreadyExists`)
    /// - Hashing failure
    /// - Store failure
    pub async fn register_user(
        &self,
        name: String,
        email: &str,
        password: String,
    ) -> ServiceResult<User> {
        if name.trim().is_empty() {
            return Err(ServiceError::validation("Name must not be blank"));
        }

        let email = normalize_email(email);
        let hasher = self.hasher;
        let password_hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| ServiceError::hashing(e.to_string()))??;

        let user = self
            .store
            .create_user(CreateUser::new(name, email, password_hash))
            .await?;

        tracing::info!("Registered user {}", user.id);
        Ok(user)
    }

    /// Looks up `email` and checks `password` against the stored hash.
    ///
    /// An unknown email still costs one bcrypt round, so both failure cases
    /// take about as long.
    ///
    /// # Errors
    /// Returns `ServiceError::InvalidCredentials` for an unknown email and for
    /// a wrong password alike.
    pub async fn authenticate_user(&self, email: &str, password: String) -> ServiceResult<User> {
        let email = normalize_email(email);
        let user = self.store.get_user_by_email(&email).await?;

        let hasher = self.hasher;
        let password_hash = user.as_ref().map(|user| user.password_hash.clone());
        let matches = tokio::task::spawn_blocking(move || match password_hash {
            Some(password_hash) => hasher.verify(&password, &password_hash),
            None => hasher.verify_absent(&password),
        })
        .await
        .map_err(|e| ServiceError::internal_error(e.to_string()))?;

        match user {
            Some(user) if matches => Ok(user),
            _ => Err(ServiceError::InvalidCredentials),
        }
    }

    /// Retrieves a user by ID with existence verification.
    ///
    /// # Errors
    /// Returns `ServiceError::NotFound` if user doesn't exist
    pub async fn get_user_required(&self, id: &str) -> ServiceResult<User> {
        self.store
            .get_user_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", id))
    }
}
