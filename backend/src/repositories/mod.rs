//! Persistence layer for the application's entities.

pub mod user_repository;
