//! Spotify Web API catalog.
//!
//! Uses the client-credentials flow; the access token is cached until
//! shortly before it expires. Transient HTTP errors (429, 5xx) and network
//! failures are retried with exponential backoff.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::{ArtistInfo, Catalog};
use crate::config::CatalogConfig;
use crate::error::{BotError, Result};

/// Base delay for exponential backoff (milliseconds).
const BASE_DELAY_MS: u64 = 500;

/// Refresh the token this long before the catalog says it expires.
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(30);

struct CachedToken {
    value: String,
    expires_at: Instant,
}

/// [`Catalog`] backed by `api.spotify.com`.
pub struct SpotifyCatalog {
    client: Client,
    client_id: String,
    client_secret: String,
    api_base: String,
    auth_url: String,
    market: Option<String>,
    max_retries: u32,
    token: Mutex<Option<CachedToken>>,
}

// ── Spotify response types ──────────────────────────────────────────

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}

#[derive(Deserialize)]
struct SearchResponse {
    artists: ArtistPage,
}

#[derive(Deserialize)]
struct ArtistPage {
    #[serde(default)]
    items: Vec<ArtistObject>,
}

#[derive(Deserialize)]
struct RelatedResponse {
    #[serde(default)]
    artists: Vec<ArtistObject>,
}

#[derive(Deserialize)]
struct ArtistObject {
    id: String,
    name: String,
    #[serde(default)]
    popularity: u32,
}

impl From<ArtistObject> for ArtistInfo {
    fn from(a: ArtistObject) -> Self {
        ArtistInfo::new(a.id, a.name, a.popularity.min(100) as u8)
    }
}

#[derive(Deserialize)]
struct ApiError {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ApiErrorDetail {
    Regular { message: String },
    Auth(String),
}

impl ApiErrorDetail {
    fn message(self) -> String {
        match self {
            Self::Regular { message } => message,
            Self::Auth(code) => code,
        }
    }
}

impl SpotifyCatalog {
    pub fn new(client: Client, config: &CatalogConfig) -> Self {
        Self {
            client,
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            auth_url: config.auth_url.clone(),
            market: config.market.clone().filter(|m| !m.is_empty()),
            max_retries: config.max_retries.max(1),
            token: Mutex::new(None),
        }
    }

    async fn access_token(&self) -> Result<String> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref() {
            if Instant::now() < token.expires_at {
                return Ok(token.value.clone());
            }
        }

        if self.client_id.is_empty() || self.client_secret.is_empty() {
            return Err(BotError::CatalogAuth(
                "catalog.clientId and catalog.clientSecret must be set".into(),
            ));
        }

        debug!(url = %self.auth_url, "Requesting catalog access token");
        let response = self
            .client
            .post(&self.auth_url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(BotError::CatalogAuth(format!("token endpoint returned {}: {}", status, body)));
        }

        let token: TokenResponse = serde_json::from_str(&body)?;
        let lifetime = Duration::from_secs(token.expires_in).saturating_sub(TOKEN_EXPIRY_MARGIN);
        *cached = Some(CachedToken {
            value: token.access_token.clone(),
            expires_at: Instant::now() + lifetime,
        });
        Ok(token.access_token)
    }

    async fn forget_token(&self) {
        *self.token.lock().await = None;
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        let url = format!("{}{}", self.api_base, path);
        let mut last_error: Option<BotError> = None;

        for attempt in 0..self.max_retries {
            if attempt > 0 {
                let delay = BASE_DELAY_MS * 2u64.pow(attempt - 1);
                warn!(attempt, delay_ms = delay, url = %url, "Retrying catalog request");
                tokio::time::sleep(Duration::from_millis(delay)).await;
            }

            let token = self.access_token().await?;
            let result = self
                .client
                .get(&url)
                .bearer_auth(&token)
                .query(query)
                .send()
                .await;

            let response = match result {
                Ok(r) => r,
                Err(e) => {
                    let err = BotError::from(e);
                    if !err.is_transient() {
                        return Err(err);
                    }
                    warn!(attempt, error = %err, "Network error calling catalog");
                    last_error = Some(err);
                    continue;
                }
            };

            let status = response.status();
            let body = response.text().await?;

            if status == reqwest::StatusCode::UNAUTHORIZED {
                warn!(attempt, "Catalog rejected the access token, refreshing");
                self.forget_token().await;
                last_error = Some(BotError::CatalogAuth("access token rejected".into()));
                continue;
            }

            if !status.is_success() {
                let message = serde_json::from_str::<ApiError>(&body)
                    .map(|e| e.error.message())
                    .unwrap_or(body);
                let err = BotError::CatalogStatus {
                    status: status.as_u16(),
                    message,
                };
                if err.is_transient() {
                    warn!(attempt, status = %status, "Transient catalog error, will retry");
                    last_error = Some(err);
                    continue;
                }
                return Err(err);
            }

            return Ok(serde_json::from_str(&body)?);
        }

        Err(last_error.unwrap_or_else(|| BotError::CatalogStatus {
            status: 0,
            message: format!("request failed after {} attempts", self.max_retries),
        }))
    }
}

#[async_trait]
impl Catalog for SpotifyCatalog {
    async fn find_artist(&self, name: &str) -> Result<Option<ArtistInfo>> {
        let q = format!("artist:{}", name);
        let mut query = vec![("q", q.as_str()), ("type", "artist"), ("limit", "1")];
        if let Some(market) = self.market.as_deref() {
            query.push(("market", market));
        }

        let page: SearchResponse = self.get_json("/search", &query).await?;
        let artist = page.artists.items.into_iter().next().map(ArtistInfo::from);
        debug!(query = name, found = ?artist.as_ref().map(|a| &a.name), "Catalog artist lookup");
        Ok(artist)
    }

    async fn related_artists(&self, artist_id: &str) -> Result<Vec<ArtistInfo>> {
        let path = format!("/artists/{}/related-artists", artist_id);
        let related: RelatedResponse = self.get_json(&path, &[]).await?;
        debug!(artist_id, count = related.artists.len(), "Fetched related artists");
        Ok(related.artists.into_iter().map(ArtistInfo::from).collect())
    }
}
