//! SupportLine Core
//!
//! Core types and error handling shared across SupportLine components.
//!
//! This crate provides:
//! - The fixed category and sentiment vocabularies
//! - Request and result types for a single classification
//! - The fallback result and reply length ceiling
//! - Error types and result handling

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{
    Category, ClassificationRequest, ClassificationResult, Sentiment, FALLBACK_REPLY,
    MAX_REPLY_CHARS,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::types::{Category, ClassificationRequest, ClassificationResult, Sentiment};
}
