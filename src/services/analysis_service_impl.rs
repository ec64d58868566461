use crate::config::CacheConfig;
use crate::db::Store;
use crate::domain::OwnerId;
use crate::models::analysis::{
    AnalysisKey, AnalysisStats, AnalysisSummary, CachedAnalysis, NewAnalysis,
};
use crate::services::analysis_service::{AnalysisError, AnalysisOutcome, AnalysisService};
use crate::services::locks::KeyedLocks;
use crate::services::providers::{AnalysisProvider, AnalysisRequest};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// [`AnalysisService`] backed by the `SeaORM` analysis cache.
pub struct CachedAnalysisService {
    store: Arc<Store>,
    provider: Arc<dyn AnalysisProvider>,
    settings: CacheConfig,
    locks: KeyedLocks<(OwnerId, AnalysisKey)>,
}

impl CachedAnalysisService {
    #[must_use]
    pub fn new(
        store: Arc<Store>,
        provider: Arc<dyn AnalysisProvider>,
        settings: CacheConfig,
    ) -> Self {
        Self {
            store,
            provider,
            settings,
            locks: KeyedLocks::new(),
        }
    }

    fn outcome(cached: CachedAnalysis, from_cache: bool, stale: bool) -> AnalysisOutcome {
        AnalysisOutcome {
            payload: cached.payload,
            metadata: cached.metadata,
            from_cache,
            stale,
            cached_at: cached.cached_at,
        }
    }
}

#[async_trait::async_trait]
impl AnalysisService for CachedAnalysisService {
    async fn analyze(
        &self,
        owner_id: OwnerId,
        request: AnalysisRequest,
    ) -> Result<AnalysisOutcome, AnalysisError> {
        let key = request.key.clone();
        if key.analysis_type.is_video_scoped() != key.subject.video_id().is_some() {
            return Err(AnalysisError::SubjectMismatch(key.analysis_type));
        }

        let _guard = self.locks.lock(&(owner_id, key.clone())).await;

        if let Some(cached) = self
            .store
            .get_fresh_analysis(owner_id, &key, self.settings.analysis_max_age())
            .await?
        {
            debug!(owner_id = %owner_id, analysis_type = %key.analysis_type, "Serving cached analysis");
            return Ok(Self::outcome(cached, true, false));
        }

        let output = match self.provider.analyze(&request).await {
            Ok(output) => output,
            Err(e) => {
                e.record("analysis");
                warn!(
                    owner_id = %owner_id,
                    analysis_type = %key.analysis_type,
                    error = %e,
                    "Analysis provider failed"
                );

                if !self.settings.serve_stale_on_error {
                    return Err(e.into());
                }

                let Some(stale) = self.store.get_latest_analysis(owner_id, &key).await? else {
                    return Err(e.into());
                };

                info!(owner_id = %owner_id, analysis_type = %key.analysis_type, "Serving stale analysis");
                return Ok(Self::outcome(stale, true, true));
            }
        };

        let mut analysis = NewAnalysis::new(key, output.payload).with_metadata(output.metadata);
        if let Some(title) = request.title {
            analysis = analysis.with_title(title);
        }
        if let Some(url) = request.video_url {
            analysis = analysis.with_video_url(url);
        }

        let id = self.store.store_analysis(owner_id, &analysis).await?;
        info!(
            owner_id = %owner_id,
            analysis_type = %analysis.key.analysis_type,
            analysis_id = id,
            "Analysis computed and cached"
        );

        match self
            .store
            .get_latest_analysis(owner_id, &analysis.key)
            .await?
        {
            Some(stored) => Ok(Self::outcome(stored, false, false)),
            None => Ok(AnalysisOutcome {
                payload: analysis.payload,
                metadata: analysis.metadata,
                from_cache: false,
                stale: false,
                cached_at: self.store.clock().now(),
            }),
        }
    }

    async fn history(
        &self,
        owner_id: OwnerId,
        limit: u64,
    ) -> Result<Vec<AnalysisSummary>, AnalysisError> {
        Ok(self.store.recent_analyses(owner_id, limit).await?)
    }

    async fn stats(&self, owner_id: OwnerId) -> Result<AnalysisStats, AnalysisError> {
        Ok(self.store.analysis_stats(owner_id).await?)
    }
}
