//! Authentication module for registration, login and cookie-based sessions.
//!
//! This module provides the public interface for the authentication flow:
//! credential checks, session token issuance, the session gate middleware and
//! the routes that expose them.

pub mod cookie;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod service;

#[cfg(test)]
mod tests;
