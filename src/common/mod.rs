// Common module - configuration and error types shared by every component

pub mod config;
pub mod error;

// Re-export commonly used types for convenience
pub use config::{AppConfig, Auth0Config};
pub use error::MonitorError;
