//! # Health Module
//!
//! Liveness endpoint for the hosting platform. It answers independently of
//! the poll loop's state.

pub mod handlers;
pub mod routes;

pub use routes::health_routes;
