use crate::db::error::{CacheError, CacheResult};
use crate::db::repositories::{Lookup, stored_timestamp};
use crate::domain::OwnerId;
use crate::domain::freshness::{Clock, format_timestamp, is_fresh};
use crate::entities::{cached_videos, prelude::*};
use crate::models::video::{VideoRecord, VideoSnapshot};
use chrono::TimeDelta;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use std::sync::Arc;
use tracing::debug;

// SQLite caps bound variables per statement; 11 columns per row keeps a batch
// under the historical limit of 999.
const INSERT_BATCH: usize = 80;

/// Per-owner snapshot of a channel's video list.
pub struct VideoCacheRepository {
    conn: DatabaseConnection,
    clock: Arc<dyn Clock>,
}

impl VideoCacheRepository {
    #[must_use]
    pub fn new(conn: DatabaseConnection, clock: Arc<dyn Clock>) -> Self {
        Self { conn, clock }
    }

    fn to_record(m: cached_videos::Model) -> VideoRecord {
        VideoRecord {
            video_id: m.video_id,
            title: m.title,
            thumbnail_url: m.thumbnail_url,
            published_at: m.published_at,
            view_count: m.view_count,
            comment_count: m.comment_count,
            like_count: m.like_count,
            duration: m.duration,
            has_captions: m.has_captions,
        }
    }

    /// Replaces the owner's whole snapshot with `videos`.
    ///
    /// Runs as one transaction: on any error the previous snapshot is left
    /// untouched.
    pub async fn refresh(&self, owner_id: OwnerId, videos: &[VideoRecord]) -> CacheResult<()> {
        let cached_at = format_timestamp(self.clock.now());
        let txn = self.conn.begin().await?;

        if Users::find_by_id(owner_id.value()).one(&txn).await?.is_none() {
            return Err(CacheError::OwnerNotFound(owner_id));
        }

        let removed = CachedVideos::delete_many()
            .filter(cached_videos::Column::OwnerId.eq(owner_id.value()))
            .exec(&txn)
            .await?
            .rows_affected;

        if !videos.is_empty() {
            let rows: Vec<cached_videos::ActiveModel> = videos
                .iter()
                .map(|v| cached_videos::ActiveModel {
                    owner_id: Set(owner_id.value()),
                    video_id: Set(v.video_id.clone()),
                    title: Set(v.title.clone()),
                    thumbnail_url: Set(v.thumbnail_url.clone()),
                    published_at: Set(v.published_at.clone()),
                    view_count: Set(v.view_count),
                    like_count: Set(v.like_count),
                    comment_count: Set(v.comment_count),
                    duration: Set(v.duration.clone()),
                    has_captions: Set(v.has_captions),
                    cached_at: Set(cached_at.clone()),
                    ..Default::default()
                })
                .collect();

            for chunk in rows.chunks(INSERT_BATCH) {
                CachedVideos::insert_many(chunk.to_vec()).exec(&txn).await?;
            }
        }

        txn.commit().await?;

        debug!(
            owner_id = %owner_id,
            removed,
            inserted = videos.len(),
            "Video cache refreshed"
        );
        Ok(())
    }

    async fn load(&self, owner_id: OwnerId) -> CacheResult<Vec<cached_videos::Model>> {
        let rows = CachedVideos::find()
            .filter(cached_videos::Column::OwnerId.eq(owner_id.value()))
            .order_by_desc(cached_videos::Column::PublishedAt)
            .order_by_asc(cached_videos::Column::VideoId)
            .all(&self.conn)
            .await?;
        Ok(rows)
    }

    fn snapshot(rows: Vec<cached_videos::Model>) -> CacheResult<Option<VideoSnapshot>> {
        let mut oldest = None;
        for row in &rows {
            let at = stored_timestamp(&row.cached_at)?;
            if oldest.is_none_or(|o| at < o) {
                oldest = Some(at);
            }
        }

        Ok(oldest.map(|cached_at| VideoSnapshot {
            videos: rows.into_iter().map(Self::to_record).collect(),
            cached_at,
        }))
    }

    /// The owner's snapshot if every row is younger than `max_age`.
    pub async fn get_fresh(
        &self,
        owner_id: OwnerId,
        max_age: TimeDelta,
    ) -> CacheResult<Option<VideoSnapshot>> {
        let Some(snapshot) = Self::snapshot(self.load(owner_id).await?)? else {
            Lookup::Miss.record("videos");
            return Ok(None);
        };

        // The oldest row decides: a partly stale snapshot is stale as a whole.
        if is_fresh(snapshot.cached_at, max_age, self.clock.now()) {
            Lookup::Hit.record("videos");
            Ok(Some(snapshot))
        } else {
            Lookup::Stale.record("videos");
            debug!(owner_id = %owner_id, cached_at = %snapshot.cached_at, "Video cache stale");
            Ok(None)
        }
    }

    /// The owner's snapshot regardless of its age.
    pub async fn get_any(&self, owner_id: OwnerId) -> CacheResult<Option<VideoSnapshot>> {
        Self::snapshot(self.load(owner_id).await?)
    }

    pub async fn count(&self, owner_id: OwnerId) -> CacheResult<u64> {
        let count = CachedVideos::find()
            .filter(cached_videos::Column::OwnerId.eq(owner_id.value()))
            .count(&self.conn)
            .await?;
        Ok(count)
    }
}
