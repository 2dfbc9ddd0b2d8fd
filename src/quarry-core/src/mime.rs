//! Content-type guessing from URI extensions.

use std::path::Path;

/// Fallback for unknown or missing extensions. Plain text, not HTML.
pub const DEFAULT_CONTENT_TYPE: &str = "text/plain";

/// Guesses a MIME type from a URI's file extension, falling back to a
/// configured default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentTypeGuesser {
    default: String,
}

impl ContentTypeGuesser {
    pub fn new(default: impl Into<String>) -> Self {
        Self {
            default: default.into(),
        }
    }

    pub fn default_type(&self) -> &str {
        &self.default
    }

    pub fn guess(&self, uri: &str) -> String {
        // Query strings and fragments are not part of the extension
        let path = uri.split(['?', '#']).next().unwrap_or(uri);

        match mime_guess::from_path(Path::new(path)).first() {
            Some(mime) => mime.essence_str().to_string(),
            None => self.default.clone(),
        }
    }
}

impl Default for ContentTypeGuesser {
    fn default() -> Self {
        Self::new(DEFAULT_CONTENT_TYPE)
    }
}
