//! OAuth2 client-credentials authentication

use crate::error::TokenError;
use crate::retry::RetryConfig;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

/// Source of bearer tokens for API calls
#[async_trait]
pub trait TokenSource: Send + Sync {
    /// Returns a valid access token
    async fn token(&self) -> Result<String, TokenError>;
}

/// A pre-issued token
#[derive(Debug, Clone)]
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

#[async_trait]
impl TokenSource for StaticToken {
    async fn token(&self) -> Result<String, TokenError> {
        Ok(self.0.clone())
    }
}

/// Token endpoint response
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    #[allow(dead_code)]
    #[serde(default)]
    token_type: Option<String>,
}

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: Option<DateTime<Utc>>,
}

impl CachedToken {
    fn is_expired(&self, grace_period: Duration) -> bool {
        match self.expires_at {
            Some(expires_at) => Utc::now() + grace_period >= expires_at,
            None => false,
        }
    }
}

/// Client-credentials grant against the Keycard token endpoint
///
/// Tokens are cached until shortly before they expire. Rate limiting, server
/// errors and transport failures are retried according to [`RetryConfig`].
pub struct ClientCredentials {
    http: reqwest::Client,
    token_url: String,
    client_id: String,
    client_secret: String,
    retry: RetryConfig,
    cached: RwLock<Option<CachedToken>>,
    grace_period: Duration,
}

impl std::fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("token_url", &self.token_url)
            .field("client_id", &self.client_id)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl ClientCredentials {
    pub fn new(
        http: reqwest::Client,
        token_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            http,
            token_url: token_url.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            retry: RetryConfig::default(),
            cached: RwLock::new(None),
            grace_period: Duration::seconds(60),
        }
    }

    /// Token endpoint for an API base URL
    pub fn token_url_for(endpoint: &str) -> String {
        format!("{}/oauth/token", endpoint.trim_end_matches('/'))
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    #[instrument(skip(self), fields(client_id = %self.client_id))]
    async fn acquire(&self) -> Result<CachedToken, TokenError> {
        let mut attempt = 1;
        loop {
            match self.request_token().await {
                Ok(token) => return Ok(token),
                Err(e) if e.is_retryable() && attempt < self.retry.max_attempts => {
                    let delay = self.retry.delay_for(attempt);
                    warn!(
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        "Token request failed, retrying: {}",
                        e
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn request_token(&self) -> Result<CachedToken, TokenError> {
        let response = self
            .http
            .post(&self.token_url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(TokenError::Request)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TokenError::Rejected { status, body });
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| TokenError::Decode(e.to_string()))?;

        let expires_at = token
            .expires_in
            .map(|seconds| Utc::now() + Duration::seconds(seconds));
        debug!(?expires_at, "Acquired access token");

        Ok(CachedToken {
            access_token: token.access_token,
            expires_at,
        })
    }
}

#[async_trait]
impl TokenSource for ClientCredentials {
    async fn token(&self) -> Result<String, TokenError> {
        {
            let cache = self.cached.read().await;
            if let Some(token) = cache.as_ref()
                && !token.is_expired(self.grace_period)
            {
                return Ok(token.access_token.clone());
            }
        }

        let token = self.acquire().await?;
        let access_token = token.access_token.clone();
        *self.cached.write().await = Some(token);
        Ok(access_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cached_token_expiry() {
        let token = CachedToken {
            access_token: "test".to_string(),
            expires_at: Some(Utc::now() + Duration::minutes(10)),
        };
        assert!(!token.is_expired(Duration::minutes(5)));
        assert!(token.is_expired(Duration::minutes(15)));
    }

    #[test]
    fn test_token_without_expiry_never_expires() {
        let token = CachedToken {
            access_token: "test".to_string(),
            expires_at: None,
        };
        assert!(!token.is_expired(Duration::days(365)));
    }

    #[test]
    fn test_token_url_for() {
        assert_eq!(
            ClientCredentials::token_url_for("https://api.keycard.ai/"),
            "https://api.keycard.ai/oauth/token"
        );
    }

    #[tokio::test]
    async fn test_static_token() {
        let source = StaticToken::new("abc");
        assert_eq!(source.token().await.unwrap(), "abc");
    }
}
