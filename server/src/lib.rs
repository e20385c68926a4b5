//! HTTP surface for faqbot.
//!
//! - `POST /upload`: multipart `file` field, `.json` or `.csv`
//! - `POST /chat`: `{"query": "..."}` → `{"answer": "..."}`

pub mod config;
pub mod error;
pub mod routes;
pub mod server;

pub use config::{FaqbotConfig, ServerConfig};
pub use error::ApiError;
pub use server::{AppState, build_router, load_seed_or_warn, serve};
