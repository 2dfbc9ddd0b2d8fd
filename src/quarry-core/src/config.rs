use serde::{Deserialize, Serialize};

/// Options accepted when connecting a client to a search server.
///
/// Unknown keys are rejected when deserializing, so a typo in a config file
/// fails loudly instead of being ignored.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ClientOptions {
    /// Search endpoint path. With `index_path` also set, discovery is skipped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rollback_path: Option<String>,

    /// Log request and response bodies
    #[serde(default)]
    pub debug: bool,

    // HTTP basic auth
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    // Transport
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default)]
    pub insecure_skip_verify: bool,

    /// Content type used when the URI extension is unknown or missing
    #[serde(default = "default_content_type")]
    pub default_content_type: String,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_content_type() -> String {
    crate::mime::DEFAULT_CONTENT_TYPE.to_string()
}

impl ClientOptions {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let options = Self::from_json(&contents)?;
        Ok(options)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn from_value(value: serde_json::Value) -> serde_json::Result<Self> {
        serde_json::from_value(value)
    }

    /// Explicit endpoints mean no discovery request is needed.
    pub fn has_explicit_endpoints(&self) -> bool {
        matches!(
            (&self.search_path, &self.index_path),
            (Some(search), Some(index)) if !search.is_empty() && !index.is_empty()
        )
    }

    pub fn with_endpoints(mut self, search_path: impl Into<String>, index_path: impl Into<String>) -> Self {
        self.search_path = Some(search_path.into());
        self.index_path = Some(index_path.into());
        self
    }

    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            search_path: None,
            index_path: None,
            commit_path: None,
            rollback_path: None,
            debug: false,
            username: None,
            password: None,
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            insecure_skip_verify: false,
            default_content_type: default_content_type(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_from_empty_object() {
        let options = ClientOptions::from_json("{}").unwrap();
        assert_eq!(options, ClientOptions::default());
        assert_eq!(options.timeout_secs, 30);
        assert_eq!(options.default_content_type, "text/plain");
        assert!(!options.has_explicit_endpoints());
    }

    #[test]
    fn test_unknown_option_rejected() {
        let err = ClientOptions::from_json(r#"{"search_path": "/search", "colour": "blue"}"#)
            .unwrap_err();
        assert!(err.to_string().contains("colour"));
    }

    #[test]
    fn test_explicit_endpoints_need_both_paths() {
        let mut options = ClientOptions::default();
        options.search_path = Some("/search".to_string());
        assert!(!options.has_explicit_endpoints());

        options.index_path = Some(String::new());
        assert!(!options.has_explicit_endpoints());

        let options = ClientOptions::default().with_endpoints("/search", "/index");
        assert!(options.has_explicit_endpoints());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"search_path": "/s", "index_path": "/i", "debug": true, "timeout_secs": 5}}"#
        )
        .unwrap();

        let options = ClientOptions::load(file.path().to_str().unwrap()).unwrap();
        assert!(options.debug);
        assert_eq!(options.timeout_secs, 5);
        assert_eq!(options.connect_timeout_secs, 10);
        assert!(options.has_explicit_endpoints());
    }
}
