//! HTTP request handlers
//!
//! - `api` - Health check endpoint
//! - `process` - Memory processing endpoint

pub mod api;
pub mod process;

pub use api::health_check;
pub use process::process_memory;
