//! HTTP core of the Keycard API client

use crate::auth::TokenSource;
use crate::error::{ApiError, Result};
use reqwest::{Method, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::sync::Arc;
use std::time::{Duration, Instant};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
pub const USER_AGENT: &str = concat!("keycard-provider/", env!("CARGO_PKG_VERSION"));

/// Build the shared `reqwest` client used for API and token calls
pub fn http_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .map_err(ApiError::Build)
}

/// Percent-encode one path segment so an ID can never change the route
pub(crate) fn segment(id: &str) -> Cow<'_, str> {
    urlencoding::encode(id)
}

/// Authenticated Keycard API client
///
/// Cheap to share behind an `Arc`; the only interior state is the token cache
/// of the token source.
pub struct KeycardClient {
    http: reqwest::Client,
    base_url: String,
    tokens: Arc<dyn TokenSource>,
}

impl std::fmt::Debug for KeycardClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeycardClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

/// Builder for [`KeycardClient`]
pub struct KeycardClientBuilder {
    endpoint: String,
    timeout: Duration,
    http: Option<reqwest::Client>,
    tokens: Arc<dyn TokenSource>,
}

impl KeycardClientBuilder {
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Reuse an existing HTTP client (the timeout setting is then ignored)
    pub fn http_client(mut self, http: reqwest::Client) -> Self {
        self.http = Some(http);
        self
    }

    pub fn build(self) -> Result<KeycardClient> {
        let base_url = self.endpoint.trim_end_matches('/').to_string();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ApiError::InvalidEndpoint(self.endpoint));
        }

        let http = match self.http {
            Some(http) => http,
            None => http_client(self.timeout)?,
        };

        Ok(KeycardClient {
            http,
            base_url,
            tokens: self.tokens,
        })
    }
}

impl KeycardClient {
    pub fn builder(tokens: Arc<dyn TokenSource>) -> KeycardClientBuilder {
        KeycardClientBuilder {
            endpoint: "https://api.keycard.ai".to_string(),
            timeout: DEFAULT_TIMEOUT,
            http: None,
            tokens,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let token = self.tokens.token().await?;
        let url = format!("{}{}", self.base_url, path);
        Ok(self.http.request(method, url).bearer_auth(token))
    }

    /// Send a request; any non-2xx status becomes [`ApiError::Status`]
    async fn execute(&self, method: Method, path: &str, builder: RequestBuilder) -> Result<Response> {
        let start = Instant::now();
        let response = builder.send().await?;
        let status = response.status();

        tracing::debug!(
            method = %method,
            path,
            status = status.as_u16(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Keycard API call"
        );

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(ApiError::Status { status, body })
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let bytes = response.bytes().await?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Err(ApiError::MissingBody);
        }
        serde_json::from_slice(&bytes).map_err(ApiError::Decode)
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let builder = self.request(Method::GET, path).await?;
        let response = self.execute(Method::GET, path, builder).await?;
        Self::decode(response).await
    }

    pub(crate) async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self.request(Method::POST, path).await?.json(body);
        let response = self.execute(Method::POST, path, builder).await?;
        Self::decode(response).await
    }

    pub(crate) async fn put<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self.request(Method::PUT, path).await?.json(body);
        let response = self.execute(Method::PUT, path, builder).await?;
        Self::decode(response).await
    }

    pub(crate) async fn patch<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self.request(Method::PATCH, path).await?.json(body);
        let response = self.execute(Method::PATCH, path, builder).await?;
        Self::decode(response).await
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<()> {
        let builder = self.request(Method::DELETE, path).await?;
        self.execute(Method::DELETE, path, builder).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::StaticToken;

    #[test]
    fn test_builder_trims_trailing_slash() {
        let client = KeycardClient::builder(Arc::new(StaticToken::new("t")))
            .endpoint("https://api.example.test/")
            .build()
            .unwrap();
        assert_eq!(client.base_url(), "https://api.example.test");
    }

    #[test]
    fn test_segment_escapes_separators() {
        assert_eq!(segment("z1"), "z1");
        assert_eq!(segment("a/b?c#d"), "a%2Fb%3Fc%23d");
        assert_eq!(segment("../zones"), "..%2Fzones");
    }

    #[test]
    fn test_builder_rejects_invalid_endpoint() {
        let err = KeycardClient::builder(Arc::new(StaticToken::new("t")))
            .endpoint("api.example.test")
            .build()
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidEndpoint(_)));
    }
}
