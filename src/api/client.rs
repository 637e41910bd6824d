//! osu! API v2 HTTP client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use url::Url;

use crate::api::auth::{CachedToken, Session};
use crate::api::category::Category;
use crate::api::types::{Beatmapset, User};
use crate::config::{Config, Gamemode};
use crate::error::{Error, Result};

/// Items requested per listing page.
pub const PAGE_SIZE: u32 = 100;

/// Source of user profiles and beatmapset listings.
///
/// [`OsuApi`] is the network-backed implementation; the aggregation logic
/// only depends on this trait.
#[async_trait]
pub trait BeatmapsetSource: Send + Sync {
    /// Fetch one page of a user's beatmapsets in `category`.
    async fn list_page(
        &self,
        user_id: u64,
        category: Category,
        gamemode: Gamemode,
        offset: u32,
        limit: u32,
    ) -> Result<Vec<Beatmapset>>;

    /// Fetch a user's profile, including the declared per-category counts.
    async fn get_user(&self, user_id: u64) -> Result<User>;
}

/// Build the shared HTTP client used for the API and the mirror.
pub fn build_http_client(config: &Config) -> Result<Client> {
    Client::builder()
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ))
        .timeout(Duration::from_secs(config.options.request_timeout_seconds))
        .build()
        .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))
}

/// osu! API client with an owned OAuth session.
pub struct OsuApi {
    client: Client,
    base_url: Url,
    session: Session,
}

impl OsuApi {
    pub fn new(client: Client, base_url: &str, session: Session) -> Result<Self> {
        Ok(Self {
            client,
            base_url: Url::parse(base_url)?,
            session,
        })
    }

    /// Create a client from configuration, seeding the session with the
    /// cached token if there is one.
    pub fn from_config(client: Client, config: &Config) -> Result<Self> {
        let cached = match (&config.cache.access_token, config.cache.expires_at) {
            (Some(access_token), Some(expires_at)) => Some(CachedToken {
                access_token: access_token.clone(),
                expires_at,
            }),
            _ => None,
        };

        let session = Session::new(
            client.clone(),
            config.options.token_url.clone(),
            config.credentials.client_id,
            config.credentials.client_secret.clone(),
            cached,
        );

        Self::new(client, &config.options.api_base_url, session)
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Make an authenticated GET request and return the body.
    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Vec<u8>> {
        let url = self.base_url.join(path)?;
        let token = self.session.bearer().await?;

        tracing::debug!("GET {} {:?}", url, query);

        let response = self
            .client
            .get(url)
            .query(query)
            .bearer_auth(token)
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| Error::Transport(format!("GET {}: {}", path, e)))?;

        let status = response.status();
        tracing::debug!("Response status: {}", status);

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(Error::RateLimited(path.to_string()));
        }

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Auth error response: {}", body);
            return Err(Error::Authentication(format!("HTTP {} on {}", status, path)));
        }

        if !status.is_success() {
            return Err(Error::Transport(format!("HTTP {} on {}", status, path)));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| Error::Transport(format!("reading body of {}: {}", path, e)))?;

        Ok(body.to_vec())
    }

    /// Get a user's profile by numeric ID.
    pub async fn get_user(&self, user_id: u64) -> Result<User> {
        let path = format!("users/{}", user_id);
        let body = self.get(&path, &[("key", "id".to_string())]).await?;

        serde_json::from_slice(&body).map_err(|source| Error::Decode {
            context: path,
            source,
        })
    }

    /// Get one page of a user's beatmapsets for a category.
    pub async fn list_page(
        &self,
        user_id: u64,
        category: Category,
        gamemode: Gamemode,
        offset: u32,
        limit: u32,
    ) -> Result<Vec<Beatmapset>> {
        let path = category.listing_path(user_id);

        let mut query = vec![("limit", limit.to_string()), ("offset", offset.to_string())];
        if category.needs_gamemode() {
            query.push(("mode", gamemode.as_str().to_string()));
        }

        let body = self.get(&path, &query).await?;
        category.envelope().decode(&body, &path)
    }
}

#[async_trait]
impl BeatmapsetSource for OsuApi {
    async fn list_page(
        &self,
        user_id: u64,
        category: Category,
        gamemode: Gamemode,
        offset: u32,
        limit: u32,
    ) -> Result<Vec<Beatmapset>> {
        OsuApi::list_page(self, user_id, category, gamemode, offset, limit).await
    }

    async fn get_user(&self, user_id: u64) -> Result<User> {
        OsuApi::get_user(self, user_id).await
    }
}
