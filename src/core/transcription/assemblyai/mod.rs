//! AssemblyAI batch transcription (v2 REST API).
//!
//! - [`config`]: endpoints, timeouts, poll cadence
//! - [`messages`]: request/response bodies
//! - [`client`]: the `AssemblyAIClient` provider implementation
//!
//! # Example
//!
//! ```rust,no_run
//! use talesync_worker::core::transcription::{
//!     AssemblyAIClient, AssemblyAIConfig, TranscriptionProvider,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = AssemblyAIClient::new(AssemblyAIConfig::new("your-api-key"))?;
//!     let result = client.transcribe("https://cdn.example.com/memory.webm").await?;
//!     println!("[{}] {}", result.language_code, result.text);
//!     Ok(())
//! }
//! ```

mod client;
pub mod config;
pub mod messages;


pub use client::AssemblyAIClient;
pub use config::AssemblyAIConfig;
pub use messages::{TranscriptStatus, primary_language_subtag};
