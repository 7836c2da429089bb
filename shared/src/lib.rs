//! Shared library for the member browsing client
//!
//! This library contains the plumbing used by every client service:
//! - Error taxonomy
//! - Environment configuration
//! - HTTP client with failure hooks
//! - Wire types and data models

pub mod config;
pub mod error;
pub mod models;
pub mod service_client;
pub mod types;

// Re-export commonly used types
pub use config::Config;
pub use error::{ApiError, Result};
pub use models::*;
pub use service_client::{
    endpoint_path, ApiClient, FailureBody, FailureHandler, PassThrough, RequestFailure,
};
pub use types::*;
