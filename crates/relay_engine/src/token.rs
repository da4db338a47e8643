use std::fmt;
use std::time::Duration;

use relay_logging::relay_debug;
use thiserror::Error;
use url::Url;

/// Signed session token presented to the relay. `Debug` never prints it.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(raw: impl Into<String>) -> Result<Self, TokenError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TokenError::Empty);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(<redacted>)")
    }
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token is empty")]
    Empty,
    #[error("environment variable {0} is not set")]
    MissingEnv(String),
    #[error("token endpoint returned status {0}")]
    Status(u16),
    #[error("token request failed: {0}")]
    Network(String),
    #[error("token response malformed: {0}")]
    Malformed(String),
}

/// Source of session tokens; asked once per connection attempt.
#[async_trait::async_trait]
pub trait TokenProvider: Send + Sync {
    async fn token(&self) -> Result<SessionToken, TokenError>;
}

/// Always hands out the same token.
#[derive(Debug, Clone)]
pub struct StaticTokenProvider {
    token: SessionToken,
}

impl StaticTokenProvider {
    pub fn new(token: SessionToken) -> Self {
        Self { token }
    }
}

#[async_trait::async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn token(&self) -> Result<SessionToken, TokenError> {
        Ok(self.token.clone())
    }
}

/// Reads the token from an environment variable at every attempt, so a
/// rotated token is picked up on the next connect.
#[derive(Debug, Clone)]
pub struct EnvTokenProvider {
    var: String,
}

impl EnvTokenProvider {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

#[async_trait::async_trait]
impl TokenProvider for EnvTokenProvider {
    async fn token(&self) -> Result<SessionToken, TokenError> {
        let raw = std::env::var(&self.var).map_err(|_| TokenError::MissingEnv(self.var.clone()))?;
        SessionToken::new(raw)
    }
}

/// Fetches a fresh token from an HTTP endpoint.
///
/// The body is either `{"token": "..."}` or the bare token as text.
#[derive(Debug, Clone)]
pub struct HttpTokenProvider {
    endpoint: Url,
    client: reqwest::Client,
}

impl HttpTokenProvider {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, TokenError> {
        let endpoint = Url::parse(endpoint)
            .map_err(|err| TokenError::Malformed(format!("endpoint {endpoint:?}: {err}")))?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| TokenError::Network(err.to_string()))?;
        Ok(Self { endpoint, client })
    }
}

#[async_trait::async_trait]
impl TokenProvider for HttpTokenProvider {
    async fn token(&self) -> Result<SessionToken, TokenError> {
        relay_debug!("requesting session token from {}", self.endpoint);
        let response = self
            .client
            .get(self.endpoint.clone())
            .send()
            .await
            .map_err(|err| TokenError::Network(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TokenError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|err| TokenError::Network(err.to_string()))?;
        parse_token_body(&body)
    }
}

fn parse_token_body(body: &str) -> Result<SessionToken, TokenError> {
    let trimmed = body.trim();
    if !trimmed.starts_with('{') {
        return SessionToken::new(trimmed);
    }
    let value: serde_json::Value =
        serde_json::from_str(trimmed).map_err(|err| TokenError::Malformed(err.to_string()))?;
    match value.get("token").and_then(|token| token.as_str()) {
        Some(token) => SessionToken::new(token),
        None => Err(TokenError::Malformed("missing \"token\" field".into())),
    }
}
