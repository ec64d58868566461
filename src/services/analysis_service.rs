//! Service for running analyses through the analysis cache.

use crate::db::CacheError;
use crate::domain::{AnalysisType, OwnerId};
use crate::models::analysis::{AnalysisStats, AnalysisSummary};
use crate::services::providers::{AnalysisRequest, ProviderError};
use chrono::{DateTime, Utc};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Video-scoped analyses need a video subject and the others must not
    /// have one.
    #[error("Subject does not match analysis type {0}")]
    SubjectMismatch(AnalysisType),

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisOutcome {
    pub payload: Value,
    pub metadata: Value,
    /// True when no provider call was made.
    pub from_cache: bool,
    /// True when the provider failed and an expired result was served.
    pub stale: bool,
    pub cached_at: DateTime<Utc>,
}

#[async_trait::async_trait]
pub trait AnalysisService: Send + Sync {
    /// Returns a fresh cached result for the request's key or runs the
    /// provider and caches its output.
    ///
    /// # Errors
    ///
    /// - [`AnalysisError::SubjectMismatch`] for a subject of the wrong shape
    /// - [`AnalysisError::Provider`] when the run failed and no stale fallback applies
    /// - [`AnalysisError::Cache`] on storage failures or unknown owners
    async fn analyze(
        &self,
        owner_id: OwnerId,
        request: AnalysisRequest,
    ) -> Result<AnalysisOutcome, AnalysisError>;

    async fn history(
        &self,
        owner_id: OwnerId,
        limit: u64,
    ) -> Result<Vec<AnalysisSummary>, AnalysisError>;

    async fn stats(&self, owner_id: OwnerId) -> Result<AnalysisStats, AnalysisError>;
}
