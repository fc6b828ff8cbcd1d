//! HTTP client for the AList API
//!
//! This module provides a client for the subset of the AList v3 API the
//! player relies on: directory listing, file information, login and the
//! download URL scheme.
//!
//! # Example
//!
//! ```no_run
//! use ysxsalist::AlistClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = AlistClient::builder()
//!         .base_url("https://pan.example.org")
//!         .build()?;
//!
//!     let page = client.list_directory("/books/three-body/track", "", 1, 0, false).await?;
//!     for entry in &page.entries {
//!         println!("{}", client.build_download_url("/books/three-body/track", &entry.name, entry.signature()));
//!     }
//!
//!     Ok(())
//! }
//! ```

use crate::error::{AlistError, Result};
use crate::models::{
    ApiResponse, CopyRequest, DirectoryEntry, DirectoryPage, GetRequest, ListData, ListRequest,
    LoginData, LoginRequest, UserProfile,
};
use crate::path;
use crate::service::DirectoryService;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// Default AList base URL (local instance on the default port)
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5244";

/// Default timeout for HTTP requests (30 seconds)
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default User-Agent
pub const DEFAULT_USER_AGENT: &str = "ysxs-player/1.0 (ysxsalist)";

/// Endpoints used by the client
pub mod endpoints {
    pub const FS_LIST: &str = "/api/fs/list";
    pub const FS_GET: &str = "/api/fs/get";
    pub const FS_COPY: &str = "/api/fs/copy";
    pub const AUTH_LOGIN: &str = "/api/auth/login";
    pub const ME: &str = "/api/me";
}

/// AList HTTP client
///
/// The client is stateless apart from the optional authentication token
/// obtained through [`AlistClient::login`]. Once set, the token is sent in
/// the `Authorization` header of every request.
#[derive(Debug, Clone)]
pub struct AlistClient {
    client: Client,
    base_url: String,
    timeout: Duration,
    token: Option<String>,
}

impl AlistClient {
    /// Create a client for `base_url` with default settings
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::builder().base_url(base_url).build()
    }

    /// Create a builder for configuring the client
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// Get the base URL (never ends with a separator)
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the internal HTTP client
    pub fn http_client(&self) -> &Client {
        &self.client
    }

    /// Current authentication token, if any
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Sets the authentication token used for subsequent requests
    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    /// Whether a token is available
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Forgets the authentication token
    pub fn logout(&mut self) {
        debug!("Dropping AList token");
        self.token = None;
    }

    // ========================================================================
    // Download URLs
    // ========================================================================

    /// Build the download URL of a file
    ///
    /// Pure string composition, no network call:
    /// `{base}/d/{path}/{name}[?sign={signature}]`. Border separators of
    /// `path` and a leading separator of `name` are dropped; an empty
    /// signature adds no query string.
    ///
    /// ```
    /// use ysxsalist::AlistClient;
    ///
    /// let client = AlistClient::new("https://pan.example.org/").unwrap();
    /// assert_eq!(
    ///     client.build_download_url("/books/a/track/", "01.mp3", "xyz"),
    ///     "https://pan.example.org/d/books/a/track/01.mp3?sign=xyz"
    /// );
    /// ```
    pub fn build_download_url(&self, path: &str, file_name: &str, signature: &str) -> String {
        build_download_url(&self.base_url, path, file_name, signature)
    }

    /// Build the download URL of a listed entry, using its own signature
    pub fn entry_download_url(&self, path: &str, entry: &DirectoryEntry) -> String {
        self.build_download_url(path, &entry.name, entry.signature())
    }

    // ========================================================================
    // File system
    // ========================================================================

    /// List a directory - `/api/fs/list`
    ///
    /// # Arguments
    ///
    /// * `path` - Remote path; normalised to an absolute path without trailing separator
    /// * `password` - Directory password, empty when none
    /// * `page` - Page number, starting at 1
    /// * `per_page` - Page size, 0 for everything
    /// * `refresh` - Force the server to refresh its listing cache
    pub async fn list_directory(
        &self,
        path: &str,
        password: &str,
        page: u32,
        per_page: u32,
        refresh: bool,
    ) -> Result<DirectoryPage> {
        let path = path::absolute(path);
        let body = ListRequest {
            path: &path,
            password,
            page,
            per_page,
            refresh,
        };

        let data: ListData = self.post(endpoints::FS_LIST, &body).await?;
        let listing = DirectoryPage::from(data);

        debug!(
            path = %path,
            entries = listing.entries.len(),
            total = listing.total,
            "Listed AList directory"
        );

        Ok(listing)
    }

    /// Get information about one object - `/api/fs/get`
    ///
    /// The returned entry carries `raw_url`.
    pub async fn get_file_info(&self, path: &str, password: &str) -> Result<DirectoryEntry> {
        let path = path::complete_start(path.trim(), path::SEPARATOR);
        let body = GetRequest {
            path: &path,
            password,
        };
        self.post(endpoints::FS_GET, &body).await
    }

    /// Copy objects between directories - `/api/fs/copy`
    pub async fn copy(&self, src_dir: &str, dst_dir: &str, names: &[String]) -> Result<()> {
        let src_dir = path::complete_start(src_dir.trim(), path::SEPARATOR);
        let dst_dir = path::complete_start(dst_dir.trim(), path::SEPARATOR);
        let body = CopyRequest {
            src_dir: &src_dir,
            dst_dir: &dst_dir,
            names,
        };

        let request = self.client.post(self.url(endpoints::FS_COPY)).json(&body);
        // data est null pour cet endpoint
        let _: Option<serde_json::Value> = self.execute(endpoints::FS_COPY, request).await?;
        Ok(())
    }

    // ========================================================================
    // Authentication
    // ========================================================================

    /// Log in - `/api/auth/login`
    ///
    /// On success the returned token is stored and sent with every later
    /// request.
    pub async fn login(&mut self, username: &str, password: &str, otp_code: &str) -> Result<String> {
        info!("Logging in to AList as {}", username);

        let body = LoginRequest {
            username,
            password,
            otp_code,
        };
        let data: LoginData = self.post(endpoints::AUTH_LOGIN, &body).await?;

        self.token = Some(data.token.clone());
        Ok(data.token)
    }

    /// Get the current user's profile - `/api/me`
    pub async fn user_profile(&self) -> Result<UserProfile> {
        let request = self.client.get(self.url(endpoints::ME));
        self.execute(endpoints::ME, request)
            .await?
            .ok_or_else(|| AlistError::MissingData(endpoints::ME.to_string()))
    }

    // ========================================================================
    // Transport
    // ========================================================================

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// POST a JSON body and return the envelope's `data`
    async fn post<B, T>(&self, endpoint: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.client.post(self.url(endpoint)).json(body);
        self.execute(endpoint, request)
            .await?
            .ok_or_else(|| AlistError::MissingData(endpoint.to_string()))
    }

    /// Send a request and unwrap the `{code, message, data}` envelope
    async fn execute<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        mut request: RequestBuilder,
    ) -> Result<Option<T>> {
        if let Some(ref token) = self.token {
            request = request.header("Authorization", token);
        }

        debug!("Calling AList {}{}", self.base_url, endpoint);

        let response = request.timeout(self.timeout).send().await?;
        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!("AList HTTP error on {} ({}): {}", endpoint, status, error_text);
            return Err(AlistError::remote(
                endpoint,
                i64::from(status.as_u16()),
                error_text,
            ));
        }

        let text = response.text().await?;
        let envelope: ApiResponse<T> = serde_json::from_str(&text).map_err(|e| {
            warn!("Failed to parse AList response from {}: {}", endpoint, e);
            AlistError::Json(e)
        })?;

        if !envelope.is_success() {
            warn!(
                "AList API error on {} (code {}): {}",
                endpoint, envelope.code, envelope.message
            );
            return Err(AlistError::remote(endpoint, envelope.code, envelope.message));
        }

        Ok(envelope.data)
    }
}

#[async_trait]
impl DirectoryService for AlistClient {
    fn base_url(&self) -> &str {
        AlistClient::base_url(self)
    }

    async fn list_directory(
        &self,
        path: &str,
        password: &str,
        page: u32,
        per_page: u32,
        refresh: bool,
    ) -> Result<DirectoryPage> {
        AlistClient::list_directory(self, path, password, page, per_page, refresh).await
    }

    async fn get_file_info(&self, path: &str, password: &str) -> Result<DirectoryEntry> {
        AlistClient::get_file_info(self, path, password).await
    }
}

/// Compose a download URL from its parts
///
/// Shared by [`AlistClient::build_download_url`] and the
/// [`DirectoryService`] default method.
pub fn build_download_url(base_url: &str, path: &str, file_name: &str, signature: &str) -> String {
    let mut url = format!(
        "{}/d/{}/{}",
        path::remove_end(base_url, path::SEPARATOR),
        path::remove_border(path, path::SEPARATOR),
        path::remove_start(file_name, path::SEPARATOR)
    );
    if !signature.is_empty() {
        url.push_str("?sign=");
        url.push_str(signature);
    }
    url
}

/// Builder for configuring an AlistClient
#[derive(Debug)]
pub struct ClientBuilder {
    client: Option<Client>,
    base_url: String,
    timeout: Duration,
    user_agent: String,
    token: Option<String>,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self {
            client: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            token: None,
        }
    }
}

impl ClientBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a custom HTTP client
    pub fn client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set a custom User-Agent header
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Start with an already known token
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Build the client
    ///
    /// Fails with [`AlistError::InvalidUrl`] when the base URL is not an
    /// absolute URL.
    pub fn build(self) -> Result<AlistClient> {
        let base_url = self.base_url.trim();
        Url::parse(base_url)?;
        let base_url = path::remove_end(base_url, path::SEPARATOR).to_string();

        let client = match self.client {
            Some(client) => client,
            None => Client::builder()
                .user_agent(&self.user_agent)
                .timeout(self.timeout)
                .build()?,
        };

        Ok(AlistClient {
            client,
            base_url,
            timeout: self.timeout,
            token: self.token.filter(|t| !t.is_empty()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn client_for(server: &mockito::Server) -> AlistClient {
        AlistClient::new(server.url()).unwrap()
    }

    // ========================================================================
    // Unit Tests (no network)
    // ========================================================================

    #[test]
    fn test_builder_defaults() {
        let builder = ClientBuilder::default();
        assert_eq!(builder.base_url, DEFAULT_BASE_URL);
        assert_eq!(
            builder.timeout,
            Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS)
        );
    }

    #[test]
    fn test_base_url_trailing_separator_is_dropped() {
        let client = AlistClient::new("https://pan.example.org/").unwrap();
        assert_eq!(client.base_url(), "https://pan.example.org");
    }

    #[test]
    fn test_invalid_base_url() {
        let err = AlistClient::new("not a url").unwrap_err();
        assert!(matches!(err, AlistError::InvalidUrl(_)));
    }

    #[test]
    fn test_download_url_without_signature() {
        let client = AlistClient::new("https://pan.example.org").unwrap();
        assert_eq!(
            client.build_download_url("/books/a/track", "/02.mp3", ""),
            "https://pan.example.org/d/books/a/track/02.mp3"
        );
    }

    #[test]
    fn test_download_url_is_pure() {
        let client = AlistClient::new("https://pan.example.org").unwrap();
        let first = client.build_download_url("/books/a/track/", "02.mp3", "s1");
        let second = client.build_download_url("/books/a/track/", "02.mp3", "s1");
        assert_eq!(first, second);
        assert_eq!(first.matches("?sign=").count(), 1);
        assert!(first.ends_with("?sign=s1"));
    }

    #[test]
    fn test_entry_download_url_uses_sign() {
        let client = AlistClient::new("https://pan.example.org").unwrap();
        let entry = DirectoryEntry::file("01.mp3").with_sign("abc");
        assert_eq!(
            client.entry_download_url("/bonus", &entry),
            "https://pan.example.org/d/bonus/01.mp3?sign=abc"
        );
    }

    #[test]
    fn test_token_lifecycle() {
        let mut client = AlistClient::builder()
            .base_url("https://pan.example.org")
            .token("")
            .build()
            .unwrap();
        assert!(!client.is_authenticated());

        client.set_token("tok");
        assert_eq!(client.token(), Some("tok"));

        client.logout();
        assert!(!client.is_authenticated());
    }

    // ========================================================================
    // HTTP Tests (mock server)
    // ========================================================================

    #[test]
    fn test_empty_directory_has_no_entries() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("POST", endpoints::FS_LIST)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"code":200,"message":"success","data":{"content":null,"total":0}}"#)
            .create();

        let client = client_for(&server);
        let page = tokio_test::block_on(client.list_directory("/empty", "", 1, 0, false));
        let page = tokio_test::assert_ok!(page);
        assert!(page.entries.is_empty());
        assert_eq!(page.total, 0);
    }

    #[tokio::test]
    async fn test_list_directory_normalises_path() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", endpoints::FS_LIST)
            .match_body(Matcher::Json(json!({
                "path": "/books/a/track",
                "password": "pw",
                "page": 1,
                "per_page": 0,
                "refresh": false
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "code": 200,
                    "message": "success",
                    "data": {
                        "content": [
                            {"name": "02.mp3", "is_dir": false, "sign": "s2", "type": 3},
                            {"name": "extra", "is_dir": true, "type": 1}
                        ],
                        "total": 2
                    }
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = client_for(&server);
        let page = client
            .list_directory("books/a/track/", "pw", 1, 0, false)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(page.total, 2);
        assert_eq!(page.entries[0].name, "02.mp3");
        assert_eq!(page.entries[0].signature(), "s2");
        assert!(page.entries[1].is_dir);
    }

    #[tokio::test]
    async fn test_envelope_error_is_remote_api_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", endpoints::FS_LIST)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"code":403,"message":"password is incorrect or you have no permission","data":null}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        let err = client
            .list_directory("/private", "wrong", 1, 0, false)
            .await
            .unwrap_err();

        assert!(err.is_auth_error());
        assert_eq!(
            err.remote_message(),
            Some("password is incorrect or you have no permission")
        );
    }

    #[tokio::test]
    async fn test_http_error_is_remote_api_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", endpoints::FS_GET)
            .with_status(502)
            .with_body("bad gateway")
            .create_async()
            .await;

        let client = client_for(&server);
        let err = client.get_file_info("/cover.jpg", "").await.unwrap_err();

        match err {
            AlistError::RemoteApi { code, message, .. } => {
                assert_eq!(code, 502);
                assert_eq!(message, "bad gateway");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_get_file_info_returns_raw_url() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", endpoints::FS_GET)
            .match_body(Matcher::PartialJson(json!({"path": "/books/a/cover.jpg"})))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "code": 200,
                    "message": "success",
                    "data": {
                        "name": "cover.jpg",
                        "is_dir": false,
                        "raw_url": "https://cdn.example.org/cover.jpg"
                    }
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = client_for(&server);
        let entry = client.get_file_info("books/a/cover.jpg", "").await.unwrap();
        assert_eq!(entry.raw_url_or_default(), "https://cdn.example.org/cover.jpg");
    }

    #[tokio::test]
    async fn test_login_stores_token_for_later_requests() {
        let mut server = mockito::Server::new_async().await;
        let login = server
            .mock("POST", endpoints::AUTH_LOGIN)
            .match_body(Matcher::Json(json!({
                "username": "admin",
                "password": "secret",
                "otp_code": ""
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"code":200,"message":"success","data":{"token":"tok-123"}}"#)
            .create_async()
            .await;
        let me = server
            .mock("GET", endpoints::ME)
            .match_header("authorization", "tok-123")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"code":200,"message":"success","data":{"id":1,"username":"admin","base_path":"/","role":2,"disabled":false,"permission":0}}"#)
            .create_async()
            .await;

        let mut client = client_for(&server);
        let token = client.login("admin", "secret", "").await.unwrap();
        assert_eq!(token, "tok-123");

        let profile = client.user_profile().await.unwrap();
        assert_eq!(profile.username, "admin");
        assert!(!profile.is_guest());

        login.assert_async().await;
        me.assert_async().await;
    }

    #[tokio::test]
    async fn test_copy_accepts_null_data() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", endpoints::FS_COPY)
            .match_body(Matcher::Json(json!({
                "src_dir": "/a",
                "dst_dir": "/b",
                "names": ["01.mp3"]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"code":200,"message":"success","data":null}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        client
            .copy("a", "/b", &["01.mp3".to_string()])
            .await
            .unwrap();
        mock.assert_async().await;
    }
}
