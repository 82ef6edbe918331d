//! Gemini Commentator
//!
//! Commentary provider for the fantasy leaderboard backed by Google's
//! Gemini generateContent API. One request per comment, no retries.

pub mod client;
pub mod config;
pub mod error;
pub mod models;

pub use client::GeminiCommentator;
pub use config::GeminiConfig;
pub use error::{GeminiError, Result};
pub use models::*;
