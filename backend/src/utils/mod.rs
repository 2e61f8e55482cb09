//! Collection of general utility functions.
//!
//! Password hashing and session token signing live here so both the services
//! and the middleware can reach them without depending on each other.

pub mod jwt;
pub mod password;
