//! Music catalog boundary.
//!
//! Defines the [`Catalog`] trait the recommender talks to. The `spotify`
//! module implements it over the Spotify Web API; the `recommend` module
//! turns catalog answers into a reply.

pub mod recommend;
pub mod spotify;

use async_trait::async_trait;

use crate::error::Result;

/// An artist as reported by the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtistInfo {
    /// Opaque catalog identifier.
    pub id: String,
    pub name: String,
    /// 0..=100, higher is more popular.
    pub popularity: u8,
}

impl ArtistInfo {
    pub fn new(id: impl Into<String>, name: impl Into<String>, popularity: u8) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            popularity: popularity.min(100),
        }
    }
}

/// Remote artist lookup and related-artist retrieval.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Best match for `name` by the catalog's own ranking, if any.
    async fn find_artist(&self, name: &str) -> Result<Option<ArtistInfo>>;

    /// Artists related to `artist_id`, in the catalog's relevance order.
    async fn related_artists(&self, artist_id: &str) -> Result<Vec<ArtistInfo>>;
}
