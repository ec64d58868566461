//! Service for serving an owner's channel videos through the video cache.

use crate::db::CacheError;
use crate::domain::OwnerId;
use crate::models::video::VideoRecord;
use crate::services::providers::ProviderError;
use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("Owner {0} has no connected channel")]
    NoChannel(OwnerId),

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// Where a listing came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Fresh cached snapshot.
    Cache,
    /// Just fetched and stored.
    Provider,
    /// Expired snapshot served because the provider failed.
    Stale,
}

#[derive(Debug, Clone)]
pub struct VideoListing {
    /// Newest first.
    pub videos: Vec<VideoRecord>,
    pub origin: Origin,
    pub cached_at: DateTime<Utc>,
}

impl VideoListing {
    /// Videos with captions, i.e. the ones a transcript exists for.
    pub fn with_captions(&self) -> impl Iterator<Item = &VideoRecord> {
        self.videos.iter().filter(|v| v.has_captions)
    }
}

#[async_trait::async_trait]
pub trait ChannelService: Send + Sync {
    /// Returns the owner's videos, fetching only when no fresh snapshot exists.
    ///
    /// # Errors
    ///
    /// - [`ChannelError::NoChannel`] if the owner never connected a channel
    /// - [`ChannelError::Provider`] if the fetch failed and no stale fallback applies
    /// - [`ChannelError::Cache`] on storage failures or unknown owners
    async fn channel_videos(&self, owner_id: OwnerId) -> Result<VideoListing, ChannelError>;

    /// Fetches and stores a new snapshot regardless of the cached one.
    async fn force_refresh(&self, owner_id: OwnerId) -> Result<VideoListing, ChannelError>;
}
