pub mod auth;
pub mod config;
pub mod core;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod utils;

// Re-export commonly used items for convenience
pub use config::WorkerConfig;
pub use crate::core::*;
pub use errors::{AppError, AppResult, AuthError, AuthResult};
pub use state::AppState;
