//! Quarry Core Library
//!
//! Shared types for talking to a full-text search server:
//! - Client options
//! - Discovery and search response models
//! - Indexable documents
//! - Content-type guessing
//! - Search parameters

pub mod config;
pub mod document;
pub mod mime;
pub mod models;
pub mod params;

// Re-export commonly used types
pub use config::ClientOptions;
pub use document::{Doc, Indexable};
pub use mime::ContentTypeGuesser;
pub use models::*;
pub use params::SearchParams;
