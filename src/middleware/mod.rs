pub mod auth;

// Re-export middleware functions
pub use auth::worker_secret_middleware;
