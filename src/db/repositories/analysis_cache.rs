use crate::db::error::{CacheError, CacheResult};
use crate::db::repositories::{Lookup, stored_timestamp};
use crate::domain::OwnerId;
use crate::domain::freshness::{Clock, format_timestamp, is_fresh};
use crate::entities::{analyses, prelude::*};
use crate::models::analysis::{
    AnalysisKey, AnalysisStats, AnalysisSubject, AnalysisSummary, CachedAnalysis, NewAnalysis,
};
use chrono::TimeDelta;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Select, Set,
};
use std::sync::Arc;
use tracing::debug;

/// Append-only store of analysis results.
///
/// Every successful run adds a row; reads pick the newest row for a key.
pub struct AnalysisCacheRepository {
    conn: DatabaseConnection,
    clock: Arc<dyn Clock>,
}

impl AnalysisCacheRepository {
    #[must_use]
    pub fn new(conn: DatabaseConnection, clock: Arc<dyn Clock>) -> Self {
        Self { conn, clock }
    }

    fn keyed(owner_id: OwnerId, key: &AnalysisKey) -> Select<Analyses> {
        let query = Analyses::find()
            .filter(analyses::Column::OwnerId.eq(owner_id.value()))
            .filter(analyses::Column::AnalysisType.eq(key.analysis_type.as_str()));

        match &key.subject {
            AnalysisSubject::Video(video_id) => {
                query.filter(analyses::Column::VideoId.eq(video_id.as_str()))
            }
            AnalysisSubject::Unscoped { discriminator } => query
                .filter(analyses::Column::VideoId.is_null())
                .filter(analyses::Column::Discriminator.eq(discriminator.as_str())),
        }
    }

    fn to_cached(m: analyses::Model) -> CacheResult<CachedAnalysis> {
        Ok(CachedAnalysis {
            id: m.id,
            payload: serde_json::from_str(&m.payload_json)?,
            metadata: serde_json::from_str(&m.metadata_json)?,
            title: m.title,
            cached_at: stored_timestamp(&m.cached_at)?,
        })
    }

    /// Appends a result row stamped with the current time. Older rows for the
    /// same key are kept.
    pub async fn store(&self, owner_id: OwnerId, analysis: &NewAnalysis) -> CacheResult<i64> {
        if Users::find_by_id(owner_id.value())
            .one(&self.conn)
            .await?
            .is_none()
        {
            return Err(CacheError::OwnerNotFound(owner_id));
        }

        let key = &analysis.key;
        let active_model = analyses::ActiveModel {
            owner_id: Set(owner_id.value()),
            analysis_type: Set(key.analysis_type.as_str().to_string()),
            video_id: Set(key.subject.video_id().map(|v| v.as_str().to_string())),
            discriminator: Set(key.subject.discriminator().map(str::to_string)),
            video_url: Set(analysis.video_url.clone()),
            title: Set(analysis.title.clone()),
            payload_json: Set(serde_json::to_string(&analysis.payload)?),
            metadata_json: Set(serde_json::to_string(&analysis.metadata)?),
            cached_at: Set(format_timestamp(self.clock.now())),
            ..Default::default()
        };

        let id = Analyses::insert(active_model)
            .exec(&self.conn)
            .await?
            .last_insert_id;

        debug!(
            owner_id = %owner_id,
            analysis_type = %key.analysis_type,
            analysis_id = id,
            "Analysis cached"
        );
        Ok(id)
    }

    /// Newest row for `key`, whatever its age.
    pub async fn get_latest(
        &self,
        owner_id: OwnerId,
        key: &AnalysisKey,
    ) -> CacheResult<Option<CachedAnalysis>> {
        let row = Self::keyed(owner_id, key)
            .order_by_desc(analyses::Column::CachedAt)
            .order_by_desc(analyses::Column::Id)
            .one(&self.conn)
            .await?;

        row.map(Self::to_cached).transpose()
    }

    /// Newest row for `key` if it is younger than `max_age`.
    pub async fn get_fresh(
        &self,
        owner_id: OwnerId,
        key: &AnalysisKey,
        max_age: TimeDelta,
    ) -> CacheResult<Option<CachedAnalysis>> {
        let Some(latest) = self.get_latest(owner_id, key).await? else {
            Lookup::Miss.record("analyses");
            return Ok(None);
        };

        if is_fresh(latest.cached_at, max_age, self.clock.now()) {
            Lookup::Hit.record("analyses");
            Ok(Some(latest))
        } else {
            Lookup::Stale.record("analyses");
            Ok(None)
        }
    }

    /// Newest-first history for the dashboard.
    pub async fn recent(&self, owner_id: OwnerId, limit: u64) -> CacheResult<Vec<AnalysisSummary>> {
        let rows = Analyses::find()
            .filter(analyses::Column::OwnerId.eq(owner_id.value()))
            .order_by_desc(analyses::Column::CachedAt)
            .order_by_desc(analyses::Column::Id)
            .limit(limit)
            .all(&self.conn)
            .await?;

        Ok(rows
            .into_iter()
            .map(|m| AnalysisSummary {
                id: m.id,
                analysis_type: m.analysis_type,
                title: m.title,
                video_id: m.video_id,
                cached_at: m.cached_at,
            })
            .collect())
    }

    pub async fn stats(&self, owner_id: OwnerId) -> CacheResult<AnalysisStats> {
        let total_analyses = Analyses::find()
            .filter(analyses::Column::OwnerId.eq(owner_id.value()))
            .count(&self.conn)
            .await?;

        let by_type: Vec<(String, i64)> = Analyses::find()
            .select_only()
            .column(analyses::Column::AnalysisType)
            .column_as(analyses::Column::Id.count(), "count")
            .filter(analyses::Column::OwnerId.eq(owner_id.value()))
            .group_by(analyses::Column::AnalysisType)
            .into_tuple()
            .all(&self.conn)
            .await?;

        Ok(AnalysisStats {
            total_analyses,
            analyses_by_type: by_type
                .into_iter()
                .map(|(t, n)| (t, u64::try_from(n).unwrap_or(0)))
                .collect(),
        })
    }
}
