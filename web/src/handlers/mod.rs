//! HTTP request handlers shared by every dispatch service.

pub mod health;

// Re-export common handler utilities
pub use health::{health_check, health_check_with_store};
