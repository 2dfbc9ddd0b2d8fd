//! Search query parameters.

/// Key carrying the query text.
pub const QUERY_KEY: &str = "q";
/// Key selecting the response format. Always forced to JSON on the wire.
pub const RESPONSE_TYPE_KEY: &str = "t";
pub const RESPONSE_TYPE_JSON: &str = "JSON";
/// Older servers accepted `format`; it is never sent.
pub const LEGACY_FORMAT_KEY: &str = "format";

/// SearchParams holds caller-supplied key/value pairs in insertion order.
/// Keys may repeat.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchParams {
    pairs: Vec<(String, String)>,
}

impl SearchParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for a parameter set holding only `q`
    pub fn query(q: impl Into<String>) -> Self {
        Self::new().set(QUERY_KEY, q.into())
    }

    /// Replace every existing value for `key`
    pub fn set(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        let key = key.into();
        self.pairs.retain(|(k, _)| *k != key);
        self.pairs.push((key, value.to_string()));
        self
    }

    /// Add a value, keeping existing ones for the same key
    pub fn append(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.pairs.push((key.into(), value.to_string()));
        self
    }

    pub fn offset(self, offset: u64) -> Self {
        self.set("o", offset)
    }

    pub fn page_size(self, page_size: u64) -> Self {
        self.set("p", page_size)
    }

    pub fn sort(self, sort: impl Into<String>) -> Self {
        self.set("s", sort.into())
    }

    pub fn facets(self, enabled: bool) -> Self {
        self.set("f", if enabled { 1 } else { 0 })
    }

    /// Range limit on a field, e.g. `limit("mtime", "1700000000", "1800000000")`
    pub fn limit(self, field: &str, low: &str, high: &str) -> Self {
        self.append("L", format!("{}|{}|{}", field, low, high))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// The `q` value, if present and non-empty
    pub fn q(&self) -> Option<&str> {
        self.get(QUERY_KEY).filter(|q| !q.is_empty())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Pairs as sent to the server: the legacy `format` key and any caller
    /// response-type value are dropped and `t=JSON` is appended.
    pub fn to_wire_pairs(&self) -> Vec<(String, String)> {
        let mut pairs: Vec<(String, String)> = self
            .pairs
            .iter()
            .filter(|(k, _)| k != LEGACY_FORMAT_KEY && k != RESPONSE_TYPE_KEY)
            .cloned()
            .collect();
        pairs.push((
            RESPONSE_TYPE_KEY.to_string(),
            RESPONSE_TYPE_JSON.to_string(),
        ));
        pairs
    }
}

impl<K, V> FromIterator<(K, V)> for SearchParams
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            pairs: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_pairs_force_json() {
        let params: SearchParams = [("q", "foo"), ("format", "xml"), ("t", "XML"), ("o", "10")]
            .into_iter()
            .collect();

        let wire = params.to_wire_pairs();
        assert_eq!(
            wire,
            vec![
                ("q".to_string(), "foo".to_string()),
                ("o".to_string(), "10".to_string()),
                ("t".to_string(), "JSON".to_string()),
            ]
        );
        // Caller's copy is untouched
        assert_eq!(params.get("format"), Some("xml"));
    }

    #[test]
    fn test_query_accepts_owned_and_borrowed() {
        let owned = SearchParams::query(String::from("rust"));
        let borrowed = SearchParams::query("rust");
        assert_eq!(owned, borrowed);
        assert_eq!(owned.iter().collect::<Vec<_>>(), vec![("q", "rust")]);
    }

    #[test]
    fn test_q_presence() {
        assert_eq!(SearchParams::new().q(), None);
        assert_eq!(SearchParams::query("").q(), None);
        assert_eq!(SearchParams::query("rust").q(), Some("rust"));
    }

    #[test]
    fn test_helpers_and_set_replaces() {
        let params = SearchParams::query("a")
            .offset(20)
            .page_size(10)
            .sort("mtime DESC")
            .facets(false)
            .limit("mtime", "1", "2")
            .limit("size", "0", "9")
            .set("q", "b");

        assert_eq!(params.q(), Some("b"));
        assert_eq!(params.get("o"), Some("20"));
        assert_eq!(params.get("p"), Some("10"));
        assert_eq!(params.get("s"), Some("mtime DESC"));
        assert_eq!(params.get("f"), Some("0"));
        assert_eq!(params.iter().filter(|(k, _)| *k == "L").count(), 2);
        assert_eq!(params.iter().last(), Some(("q", "b")));
    }
}
