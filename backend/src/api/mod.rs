//! Shared building blocks for the HTTP API.

pub mod common;
