//! Quarry Client Library
//!
//! HTTP client for indexing documents into, deleting documents from and
//! searching a remote full-text search server.
//!
//! ```rust,no_run
//! use quarry_rs::{Client, ClientOptions, SearchParams};
//!
//! #[tokio::main]
//! async fn main() -> quarry_rs::Result<()> {
//!     let mut client = Client::connect("http://localhost:5000", ClientOptions::default()).await?;
//!     client.index_buffer(b"hello world", Some("greetings/hello.txt"), None).await?;
//!
//!     match client.search(&SearchParams::query("hello")).await? {
//!         Some(response) => {
//!             for hit in response.results() {
//!                 println!("{} {}", hit.uri(), hit.score());
//!             }
//!         }
//!         None => eprintln!("search failed: {:?}", client.last_response()),
//!     }
//!     Ok(())
//! }
//! ```

mod client;

pub use client::{Client, IndexSource, Submission};
pub use quarry_core::{
    ClientOptions, Doc, Indexable, RawResponse, SearchParams, SearchResponse, SearchResult,
    ServerInfo, Timing,
};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid search response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, ClientError>;
