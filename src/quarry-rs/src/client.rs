use crate::{ClientError, Result};
use quarry_core::{
    ClientOptions, ContentTypeGuesser, Indexable, RawResponse, SearchParams, SearchResponse,
    ServerInfo,
};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client as HttpClient, Method, RequestBuilder, Url};
use std::borrow::Cow;
use std::path::{Component, Path};
use std::time::Duration;

// Bodies longer than this are cut in debug logs
const DEBUG_BODY_LIMIT: usize = 2048;

/// Quarry search server client.
///
/// Each operation sends exactly one HTTP request. `search` records failed
/// responses on the client, which is why it takes `&mut self`; share a client
/// across tasks only behind your own lock.
pub struct Client {
    base_url: String,
    search_endpoint: String,
    index_endpoint: String,
    commit_endpoint: Option<String>,
    rollback_endpoint: Option<String>,
    server_info: Option<ServerInfo>,
    options: ClientOptions,
    guesser: ContentTypeGuesser,
    client: HttpClient,
    last_response: Option<RawResponse>,
}

/// The three shapes a document can be submitted in
pub enum IndexSource<'a> {
    /// Read from disk. The path is the default URI.
    File(&'a Path),
    /// In-memory bytes. A URI must be given explicitly.
    Buffer(&'a [u8]),
    /// Anything exposing content, URI and MIME type
    Document(&'a dyn Indexable),
}

/// Submission is a fully resolved index request body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub body: Vec<u8>,
    pub uri: String,
    pub content_type: String,
}

impl Client {
    /// Connect to a server. Unless both `search_path` and `index_path` are
    /// set, the server root is fetched once to discover the endpoints.
    pub async fn connect(server_url: &str, options: ClientOptions) -> Result<Self> {
        let base_url = validate_server_url(server_url)?;
        let client = build_http_client(&options)?;

        let server_info = if options.has_explicit_endpoints() {
            tracing::debug!(server = %base_url, "Using configured endpoints, skipping discovery");
            None
        } else {
            Some(discover(&client, &base_url, &options).await?)
        };

        let pick = |explicit: &Option<String>, discovered: Option<&String>| {
            explicit
                .as_ref()
                .filter(|p| !p.is_empty())
                .or(discovered.filter(|p| !p.is_empty()))
                .map(|p| resolve_endpoint(&base_url, p))
        };

        let search_endpoint = pick(
            &options.search_path,
            server_info.as_ref().map(|info| &info.search),
        );
        let index_endpoint = pick(
            &options.index_path,
            server_info.as_ref().map(|info| &info.index),
        );
        let commit_endpoint = pick(
            &options.commit_path,
            server_info.as_ref().and_then(|info| info.commit.as_ref()),
        );
        let rollback_endpoint = pick(
            &options.rollback_path,
            server_info.as_ref().and_then(|info| info.rollback.as_ref()),
        );

        let (search_endpoint, index_endpoint) = match (search_endpoint, index_endpoint) {
            (Some(search), Some(index)) => (search, index),
            _ => {
                return Err(ClientError::Configuration(
                    "search and index endpoints must both be known".to_string(),
                ))
            }
        };

        for endpoint in [&search_endpoint, &index_endpoint] {
            Url::parse(endpoint).map_err(|e| {
                ClientError::Configuration(format!("invalid endpoint {}: {}", endpoint, e))
            })?;
        }

        tracing::info!(
            search = %search_endpoint,
            index = %index_endpoint,
            "Connected to search server"
        );

        Ok(Self {
            guesser: ContentTypeGuesser::new(options.default_content_type.clone()),
            base_url,
            search_endpoint,
            index_endpoint,
            commit_endpoint,
            rollback_endpoint,
            server_info,
            options,
            client,
            last_response: None,
        })
    }

    /// Connect with options given as raw JSON. Unknown keys are rejected.
    pub async fn connect_json(server_url: &str, options: serde_json::Value) -> Result<Self> {
        let options = ClientOptions::from_value(options)
            .map_err(|e| ClientError::Configuration(format!("invalid client options: {}", e)))?;
        Self::connect(server_url, options).await
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn search_endpoint(&self) -> &str {
        &self.search_endpoint
    }

    pub fn index_endpoint(&self) -> &str {
        &self.index_endpoint
    }

    pub fn commit_endpoint(&self) -> Option<&str> {
        self.commit_endpoint.as_deref()
    }

    pub fn rollback_endpoint(&self) -> Option<&str> {
        self.rollback_endpoint.as_deref()
    }

    /// Discovery document, if discovery ran
    pub fn server_info(&self) -> Option<&ServerInfo> {
        self.server_info.as_ref()
    }

    pub fn fields(&self) -> Option<&serde_json::Value> {
        self.server_info.as_ref().and_then(|info| info.fields.as_ref())
    }

    pub fn facets(&self) -> Option<&serde_json::Value> {
        self.server_info.as_ref().and_then(|info| info.facets.as_ref())
    }

    /// The most recent failed search response
    pub fn last_response(&self) -> Option<&RawResponse> {
        self.last_response.as_ref()
    }

    /// Resolve a source into body, URI and content type without sending anything.
    /// Explicit `uri`/`content_type` arguments win over what the source carries.
    pub async fn prepare(
        &self,
        source: IndexSource<'_>,
        uri: Option<&str>,
        content_type: Option<&str>,
    ) -> Result<Submission> {
        let uri = uri.filter(|u| !u.is_empty());
        let content_type = content_type.filter(|c| !c.is_empty());

        let (body, uri, content_type) = match source {
            IndexSource::File(path) => {
                if path.as_os_str().is_empty() {
                    return Err(ClientError::Validation("file path is required".to_string()));
                }
                let body = tokio::fs::read(path).await.map_err(|e| ClientError::Io {
                    path: path.display().to_string(),
                    source: e,
                })?;
                let uri = match uri {
                    Some(uri) => uri.to_string(),
                    None => path_uri(path),
                };
                (body, uri, content_type.map(str::to_string))
            }
            IndexSource::Buffer(buf) => {
                let uri = uri.ok_or_else(|| {
                    ClientError::Validation("uri is required when indexing a buffer".to_string())
                })?;
                (buf.to_vec(), uri.to_string(), content_type.map(str::to_string))
            }
            IndexSource::Document(doc) => {
                let uri = uri.unwrap_or(doc.uri()).to_string();
                let content_type = content_type.or(doc.mime_type()).map(str::to_string);
                (doc.content().into_owned(), uri, content_type)
            }
        };

        if uri.is_empty() {
            return Err(ClientError::Validation("document uri is required".to_string()));
        }

        let content_type = content_type.unwrap_or_else(|| self.guesser.guess(&uri));

        Ok(Submission {
            body,
            uri,
            content_type,
        })
    }

    /// Submit a document for indexing. HTTP failures are not errors: the
    /// server's response is returned for the caller to inspect.
    #[tracing::instrument(skip(self, source))]
    pub async fn index(
        &self,
        source: IndexSource<'_>,
        uri: Option<&str>,
        content_type: Option<&str>,
    ) -> Result<RawResponse> {
        let submission = self.prepare(source, uri, content_type).await?;
        let url = self.document_url(&submission.uri)?;

        if self.options.debug {
            tracing::info!(
                url = %url,
                content_type = %submission.content_type,
                bytes = submission.body.len(),
                body = %preview(&submission.body, DEBUG_BODY_LIMIT),
                "POST"
            );
        }

        let response = self
            .request(Method::POST, url.as_str())
            .header(CONTENT_TYPE, submission.content_type)
            .body(submission.body)
            .send()
            .await?;

        self.finish("POST", url.as_str(), response).await
    }

    pub async fn index_file(
        &self,
        path: impl AsRef<Path>,
        uri: Option<&str>,
        content_type: Option<&str>,
    ) -> Result<RawResponse> {
        self.index(IndexSource::File(path.as_ref()), uri, content_type)
            .await
    }

    pub async fn index_buffer(
        &self,
        buf: &[u8],
        uri: Option<&str>,
        content_type: Option<&str>,
    ) -> Result<RawResponse> {
        self.index(IndexSource::Buffer(buf), uri, content_type).await
    }

    pub async fn index_document(
        &self,
        doc: &dyn Indexable,
        uri: Option<&str>,
        content_type: Option<&str>,
    ) -> Result<RawResponse> {
        self.index(IndexSource::Document(doc), uri, content_type)
            .await
    }

    /// Delete a document by URI
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, uri: &str) -> Result<RawResponse> {
        if uri.is_empty() {
            return Err(ClientError::Validation("uri is required".to_string()));
        }

        let url = self.document_url(uri)?;
        let response = self.request(Method::DELETE, url.as_str()).send().await?;
        self.finish("DELETE", url.as_str(), response).await
    }

    /// `index_endpoint/uri`, each URI segment percent-encoded. `.` and `..`
    /// segments are refused so a URI cannot climb out of the index endpoint.
    fn document_url(&self, uri: &str) -> Result<Url> {
        if uri.split('/').any(|segment| segment == "." || segment == "..") {
            return Err(ClientError::Validation(format!(
                "uri may not contain '.' or '..' segments: {}",
                uri
            )));
        }

        let mut url = Url::parse(&self.index_endpoint).map_err(|e| {
            ClientError::Configuration(format!("invalid endpoint {}: {}", self.index_endpoint, e))
        })?;
        url.path_segments_mut()
            .map_err(|_| {
                ClientError::Configuration(format!(
                    "index endpoint cannot take a path: {}",
                    self.index_endpoint
                ))
            })?
            .pop_if_empty()
            .extend(uri.split('/'));
        Ok(url)
    }

    /// Run a search. Returns `Ok(None)` when the server answers with a non-2xx
    /// status; the failed response is then available from `last_response`.
    #[tracing::instrument(skip(self, params))]
    pub async fn search(&mut self, params: &SearchParams) -> Result<Option<SearchResponse>> {
        let Some(q) = params.q() else {
            return Err(ClientError::Validation("q is required".to_string()));
        };
        tracing::debug!(q, "Searching");

        let wire = params.to_wire_pairs();
        let response = self
            .request(Method::GET, &self.search_endpoint)
            .query(&wire)
            .send()
            .await?;
        let raw = self.finish("GET", &self.search_endpoint, response).await?;

        if !raw.is_success() {
            tracing::warn!(status = raw.status, "Search request failed");
            self.last_response = Some(raw);
            return Ok(None);
        }

        let response = SearchResponse::from_raw(raw)?;
        tracing::debug!(total = response.total(), hits = response.results().len(), "Search complete");
        Ok(Some(response))
    }

    /// Ask the server to commit pending index changes
    pub async fn commit(&self) -> Result<RawResponse> {
        self.post_control("commit", self.commit_endpoint.as_deref())
            .await
    }

    /// Ask the server to discard pending index changes
    pub async fn rollback(&self) -> Result<RawResponse> {
        self.post_control("rollback", self.rollback_endpoint.as_deref())
            .await
    }

    async fn post_control(&self, action: &str, endpoint: Option<&str>) -> Result<RawResponse> {
        let url = endpoint.ok_or_else(|| {
            ClientError::Configuration(format!("server does not advertise a {} endpoint", action))
        })?;

        let response = self.request(Method::POST, url).send().await?;
        self.finish("POST", url, response).await
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        authorize(self.client.request(method, url), &self.options)
    }

    async fn finish(&self, method: &str, url: &str, response: reqwest::Response) -> Result<RawResponse> {
        let raw = read_response(response).await?;
        tracing::debug!(method, url, status = raw.status, "Response received");
        if self.options.debug {
            tracing::info!(
                method,
                url,
                status = raw.status,
                body = %truncate(&raw.body, DEBUG_BODY_LIMIT),
                "Response"
            );
        }
        Ok(raw)
    }
}

fn validate_server_url(server_url: &str) -> Result<String> {
    let trimmed = server_url.trim();
    if trimmed.is_empty() {
        return Err(ClientError::Configuration("server URL is required".to_string()));
    }

    let url = Url::parse(trimmed).map_err(|e| {
        ClientError::Configuration(format!("invalid server URL {}: {}", trimmed, e))
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ClientError::Configuration(format!(
            "unsupported scheme in server URL: {}",
            url.scheme()
        )));
    }

    Ok(trimmed.to_string())
}

fn build_http_client(options: &ClientOptions) -> Result<HttpClient> {
    let mut builder = HttpClient::builder();
    if options.timeout_secs > 0 {
        builder = builder.timeout(Duration::from_secs(options.timeout_secs));
    }
    if options.connect_timeout_secs > 0 {
        builder = builder.connect_timeout(Duration::from_secs(options.connect_timeout_secs));
    }
    if options.insecure_skip_verify {
        tracing::warn!("TLS certificate verification is disabled");
        builder = builder.danger_accept_invalid_certs(true);
    }

    builder
        .build()
        .map_err(|e| ClientError::Configuration(format!("failed to build HTTP client: {}", e)))
}

fn authorize(builder: RequestBuilder, options: &ClientOptions) -> RequestBuilder {
    match &options.username {
        Some(username) => builder.basic_auth(username, options.password.as_deref()),
        None => builder,
    }
}

async fn discover(client: &HttpClient, base_url: &str, options: &ClientOptions) -> Result<ServerInfo> {
    tracing::debug!(server = %base_url, "Discovering endpoints");

    let response = authorize(client.get(base_url), options)
        .send()
        .await
        .map_err(|e| {
            ClientError::Configuration(format!("discovery request to {} failed: {}", base_url, e))
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(ClientError::Configuration(format!(
            "discovery request to {} returned {}",
            base_url, status
        )));
    }

    let body = response.text().await.map_err(|e| {
        ClientError::Configuration(format!("failed to read discovery response: {}", e))
    })?;

    let info: ServerInfo = serde_json::from_str(&body).map_err(|e| {
        ClientError::Configuration(format!("invalid discovery response from {}: {}", base_url, e))
    })?;

    if info.search.is_empty() || info.index.is_empty() {
        return Err(ClientError::Configuration(
            "discovery response has an empty search or index endpoint".to_string(),
        ));
    }

    tracing::info!(
        search = %info.search,
        index = %info.index,
        commit = ?info.commit,
        "Discovered server endpoints"
    );

    Ok(info)
}

/// Absolute URLs are used as-is, anything else is a path under the server
fn resolve_endpoint(base_url: &str, endpoint: &str) -> String {
    if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        return endpoint.trim_end_matches('/').to_string();
    }
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        endpoint.trim_start_matches('/').trim_end_matches('/')
    )
}

async fn read_response(response: reqwest::Response) -> Result<RawResponse> {
    let status = response.status().as_u16();
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = response.text().await?;

    Ok(RawResponse {
        status,
        content_type,
        body,
    })
}

/// Default URI for a file: the path with `/` separators and `./` parts dropped
fn path_uri(path: &Path) -> String {
    let parts: Vec<Cow<'_, str>> = path
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .map(|c| match c {
            Component::RootDir => Cow::Borrowed(""),
            other => other.as_os_str().to_string_lossy(),
        })
        .collect();
    parts.join("/")
}

fn preview(body: &[u8], limit: usize) -> Cow<'_, str> {
    String::from_utf8_lossy(&body[..body.len().min(limit)])
}

fn truncate(body: &str, limit: usize) -> &str {
    if body.len() <= limit {
        return body;
    }
    let mut end = limit;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}
