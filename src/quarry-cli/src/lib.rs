//! quarry - command-line client for a full-text search server
//!
//! # Examples
//!
//! ```bash
//! # Show discovered endpoints
//! quarry --server http://localhost:5000 info
//!
//! # Index a directory tree
//! quarry index ./docs
//!
//! # Search
//! quarry search "rust async" --page-size 5
//!
//! # Delete a document
//! quarry delete docs/old.html
//! ```

pub mod cli;
pub mod commands;
pub mod output;
pub mod telemetry;

pub use cli::{run, Cli, Commands};
pub use quarry_rs;
