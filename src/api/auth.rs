//! OAuth client-credentials session.

use chrono::{DateTime, Duration, Utc};
use reqwest::{header, Client};
use tokio::sync::RwLock;

use crate::api::types::{TokenRequest, TokenResponse};
use crate::error::{Error, Result};

/// Tokens are refreshed this long before they actually expire.
const EXPIRY_MARGIN_SECONDS: i64 = 60;

/// An access token together with its expiry instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedToken {
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
}

impl CachedToken {
    /// Build a token from an OAuth response received at `now`.
    pub fn from_response(response: TokenResponse, now: DateTime<Utc>) -> Self {
        Self {
            access_token: response.access_token,
            expires_at: now + Duration::seconds(response.expires_in),
        }
    }
}

/// Check whether a token expiring at `expires_at` should be refreshed at `now`.
pub fn is_token_expired(expires_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    let Some(expires_at) = expires_at else {
        return true;
    };

    now + Duration::seconds(EXPIRY_MARGIN_SECONDS) > expires_at
}

/// Owned authentication state for one run.
///
/// Holds the client credentials and the current bearer token, refreshing the
/// token through the client-credentials grant whenever it is missing or about
/// to expire.
pub struct Session {
    client: Client,
    token_url: String,
    client_id: u64,
    client_secret: String,
    token: RwLock<Option<CachedToken>>,
}

impl Session {
    pub fn new(
        client: Client,
        token_url: String,
        client_id: u64,
        client_secret: String,
        cached: Option<CachedToken>,
    ) -> Self {
        Self {
            client,
            token_url,
            client_id,
            client_secret,
            token: RwLock::new(cached),
        }
    }

    /// Request a new token if the current one is missing or expired.
    pub async fn refresh_if_expired(&self) -> Result<()> {
        let now = Utc::now();
        {
            let token = self.token.read().await;
            if !is_token_expired(token.as_ref().map(|t| t.expires_at), now) {
                return Ok(());
            }
        }

        let mut token = self.token.write().await;
        // Another caller may have refreshed while we waited for the lock.
        if !is_token_expired(token.as_ref().map(|t| t.expires_at), now) {
            return Ok(());
        }

        tracing::info!("Requesting a new OAuth token");
        *token = Some(self.request_token().await?);
        Ok(())
    }

    /// Current bearer token, refreshed first if needed.
    pub async fn bearer(&self) -> Result<String> {
        self.refresh_if_expired().await?;
        let token = self.token.read().await;
        token
            .as_ref()
            .map(|t| t.access_token.clone())
            .ok_or_else(|| Error::Authentication("No access token available".into()))
    }

    /// Snapshot of the current token, for caching between runs.
    pub async fn current_token(&self) -> Option<CachedToken> {
        self.token.read().await.clone()
    }

    async fn request_token(&self) -> Result<CachedToken> {
        let body = TokenRequest {
            client_id: self.client_id,
            client_secret: &self.client_secret,
            grant_type: "client_credentials",
            scope: "public",
        };

        let response = self
            .client
            .post(&self.token_url)
            .header(header::ACCEPT, "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            tracing::error!("Token request failed: {}", text);
            return Err(Error::Authentication(format!(
                "HTTP {} from token endpoint",
                status
            )));
        }

        let bytes = response.bytes().await?;
        let token: TokenResponse =
            serde_json::from_slice(&bytes).map_err(|source| Error::Decode {
                context: "OAuth token response".to_string(),
                source,
            })?;

        tracing::debug!("Obtained {} token valid for {}s", token.token_type, token.expires_in);
        Ok(CachedToken::from_response(token, Utc::now()))
    }
}
