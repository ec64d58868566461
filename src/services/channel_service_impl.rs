use crate::config::CacheConfig;
use crate::db::{CacheError, Store};
use crate::domain::OwnerId;
use crate::models::video::VideoSnapshot;
use crate::services::channel_service::{ChannelError, ChannelService, Origin, VideoListing};
use crate::services::locks::KeyedLocks;
use crate::services::providers::ChannelVideoProvider;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// [`ChannelService`] backed by the `SeaORM` video cache.
pub struct CachedChannelService {
    store: Arc<Store>,
    provider: Arc<dyn ChannelVideoProvider>,
    settings: CacheConfig,
    locks: KeyedLocks<OwnerId>,
}

impl CachedChannelService {
    #[must_use]
    pub fn new(
        store: Arc<Store>,
        provider: Arc<dyn ChannelVideoProvider>,
        settings: CacheConfig,
    ) -> Self {
        Self {
            store,
            provider,
            settings,
            locks: KeyedLocks::new(),
        }
    }

    /// Caller holds the owner's lock.
    async fn channel_of(&self, owner_id: OwnerId) -> Result<String, ChannelError> {
        let owner = self
            .store
            .get_owner(owner_id)
            .await?
            .ok_or(CacheError::OwnerNotFound(owner_id))?;

        owner
            .channel_id
            .filter(|c| !c.is_empty())
            .ok_or(ChannelError::NoChannel(owner_id))
    }

    fn listing(snapshot: VideoSnapshot, origin: Origin) -> VideoListing {
        VideoListing {
            videos: snapshot.videos,
            origin,
            cached_at: snapshot.cached_at,
        }
    }

    /// Fetch, store, and read back. Caller holds the owner's lock.
    async fn fetch_and_store(
        &self,
        owner_id: OwnerId,
        channel_id: &str,
    ) -> Result<VideoListing, ChannelError> {
        let fetched = match self
            .provider
            .list_channel_videos(channel_id, self.settings.max_videos_per_channel)
            .await
        {
            Ok(videos) => videos,
            Err(e) => {
                e.record("videos");
                warn!(owner_id = %owner_id, channel_id, error = %e, "Channel video fetch failed");

                if !self.settings.serve_stale_on_error {
                    return Err(e.into());
                }

                let Some(stale) = self.store.get_any_videos(owner_id).await? else {
                    return Err(e.into());
                };

                info!(
                    owner_id = %owner_id,
                    cached_at = %stale.cached_at,
                    "Serving stale video snapshot"
                );
                return Ok(Self::listing(stale, Origin::Stale));
            }
        };

        self.store.refresh_videos(owner_id, &fetched).await?;
        info!(owner_id = %owner_id, count = fetched.len(), "Video cache refreshed from provider");

        let listing = match self.store.get_any_videos(owner_id).await? {
            Some(snapshot) => Self::listing(snapshot, Origin::Provider),
            None => VideoListing {
                videos: Vec::new(),
                origin: Origin::Provider,
                cached_at: self.store.clock().now(),
            },
        };
        Ok(listing)
    }
}

#[async_trait::async_trait]
impl ChannelService for CachedChannelService {
    async fn channel_videos(&self, owner_id: OwnerId) -> Result<VideoListing, ChannelError> {
        let _guard = self.locks.lock(&owner_id).await;
        let channel_id = self.channel_of(owner_id).await?;

        if let Some(snapshot) = self
            .store
            .get_fresh_videos(owner_id, self.settings.video_max_age())
            .await?
        {
            debug!(owner_id = %owner_id, count = snapshot.len(), "Serving cached videos");
            return Ok(Self::listing(snapshot, Origin::Cache));
        }

        self.fetch_and_store(owner_id, &channel_id).await
    }

    async fn force_refresh(&self, owner_id: OwnerId) -> Result<VideoListing, ChannelError> {
        let _guard = self.locks.lock(&owner_id).await;
        let channel_id = self.channel_of(owner_id).await?;
        self.fetch_and_store(owner_id, &channel_id).await
    }
}
