//! Axum route handlers.

pub mod dashboard;
pub mod health;
pub mod symbols;
