use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// ServerInfo is the discovery document served at the server root
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerInfo {
    pub search: String,
    pub index: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rollback: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facets: Option<Value>,
    // description, version and anything else the server advertises
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ServerInfo {
    pub fn description(&self) -> Option<&str> {
        self.extra.get("description").and_then(Value::as_str)
    }

    pub fn version(&self) -> Option<&str> {
        self.extra.get("version").and_then(Value::as_str)
    }
}

/// RawResponse is a completed HTTP exchange, handed back to callers as-is
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Timing values are reported either as numbers or as preformatted strings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Timing {
    Number(f64),
    Text(String),
}

impl Timing {
    pub fn as_secs_f64(&self) -> Option<f64> {
        match self {
            Timing::Number(n) => Some(*n),
            Timing::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl std::fmt::Display for Timing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Timing::Number(n) => write!(f, "{}", n),
            Timing::Text(s) => f.write_str(s),
        }
    }
}

/// SearchResult is one hit. Only uri, title and score are guaranteed;
/// everything else the server returns is kept in `extra`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResult {
    uri: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    title: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    score: f64,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl SearchResult {
    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn summary(&self) -> Option<&str> {
        self.extra.get("summary").and_then(Value::as_str)
    }

    pub fn mtime(&self) -> Option<&Value> {
        self.extra.get("mtime")
    }

    /// Any field the server returned for this hit, including the guaranteed ones
    pub fn get(&self, name: &str) -> Option<Value> {
        match name {
            "uri" => Some(Value::String(self.uri.clone())),
            "title" => Some(Value::String(self.title.clone())),
            "score" => serde_json::Number::from_f64(self.score).map(Value::Number),
            _ => self.extra.get(name).cloned(),
        }
    }

    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }
}

/// SearchPayload is the decoded body of a successful search
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchPayload {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_time: Option<Timing>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_time: Option<Timing>,
    #[serde(default)]
    pub results: Vec<SearchResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facets: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Value>,
}

/// SearchResponse wraps one successful search exchange. It is immutable once built.
#[derive(Debug, Clone)]
pub struct SearchResponse {
    raw: RawResponse,
    json: Value,
    payload: SearchPayload,
}

impl SearchResponse {
    /// Decode a search response body. Fails if the body is not JSON or does
    /// not have the shape of a search result set.
    pub fn from_raw(raw: RawResponse) -> serde_json::Result<Self> {
        let json: Value = serde_json::from_str(&raw.body)?;
        let payload = SearchPayload::deserialize(&json)?;
        tracing::trace!(total = payload.total, hits = payload.results.len(), "Decoded search response");
        Ok(Self { raw, json, payload })
    }

    pub fn status(&self) -> u16 {
        self.raw.status
    }

    pub fn body(&self) -> &str {
        &self.raw.body
    }

    pub fn raw(&self) -> &RawResponse {
        &self.raw
    }

    pub fn json(&self) -> &Value {
        &self.json
    }

    pub fn total(&self) -> u64 {
        self.payload.total
    }

    pub fn query(&self) -> &str {
        &self.payload.query
    }

    pub fn search_time(&self) -> Option<&Timing> {
        self.payload.search_time.as_ref()
    }

    pub fn build_time(&self) -> Option<&Timing> {
        self.payload.build_time.as_ref()
    }

    pub fn results(&self) -> &[SearchResult] {
        &self.payload.results
    }

    pub fn facets(&self) -> Option<&Value> {
        self.payload.facets.as_ref()
    }

    pub fn fields(&self) -> Option<&Value> {
        self.payload.fields.as_ref()
    }

    pub fn offset(&self) -> Option<u64> {
        self.payload.offset
    }

    pub fn page_size(&self) -> Option<u64> {
        self.payload.page_size
    }

    pub fn suggestions(&self) -> Option<&Value> {
        self.payload.suggestions.as_ref()
    }

    pub fn payload(&self) -> &SearchPayload {
        &self.payload
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

// Some servers stringify scores
fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| serde::de::Error::custom("score out of range")),
        Value::String(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid score: {}", s))),
        Value::Null => Ok(0.0),
        other => Err(serde::de::Error::custom(format!("invalid score: {}", other))),
    }
}
