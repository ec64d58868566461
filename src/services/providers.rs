//! Seams to the external data sources behind the caches.
//!
//! Concrete provider clients live outside this crate; services receive them as
//! `Arc<dyn ...>` so tests can substitute fakes.

use crate::models::analysis::AnalysisKey;
use crate::models::video::VideoRecord;
use serde_json::Value;
use thiserror::Error;

/// Why a provider call produced no data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    #[error("Provider quota exceeded: {0}")]
    QuotaExceeded(String),

    #[error("Not found at provider: {0}")]
    NotFound(String),

    #[error("Transient provider failure: {0}")]
    Transient(String),

    #[error("Provider unavailable: {0}")]
    Unavailable(String),
}

impl ProviderError {
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::QuotaExceeded(_) => "quota_exceeded",
            Self::NotFound(_) => "not_found",
            Self::Transient(_) => "transient",
            Self::Unavailable(_) => "unavailable",
        }
    }

    /// Whether retrying later could succeed without user action.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Transient(_) | Self::Unavailable(_))
    }

    pub(crate) fn record(&self, provider: &'static str) {
        metrics::counter!(
            "provider_failures_total",
            "provider" => provider,
            "reason" => self.reason()
        )
        .increment(1);
    }
}

#[async_trait::async_trait]
pub trait ChannelVideoProvider: Send + Sync {
    /// Lists up to `max_results` videos of a channel.
    ///
    /// `channel_id` is the stored form of a [`ChannelRef`](crate::domain::ChannelRef):
    /// either a channel ID or an `@handle`, `c/name` or `user/name` the
    /// provider resolves first.
    async fn list_channel_videos(
        &self,
        channel_id: &str,
        max_results: u32,
    ) -> Result<Vec<VideoRecord>, ProviderError>;
}

/// Input for one analysis run.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub key: AnalysisKey,
    /// Provider-specific parameters (comments, prompt fields, competitor list).
    pub input: Value,
    pub title: Option<String>,
    pub video_url: Option<String>,
}

impl AnalysisRequest {
    #[must_use]
    pub const fn new(key: AnalysisKey, input: Value) -> Self {
        Self {
            key,
            input,
            title: None,
            video_url: None,
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_video_url(mut self, url: impl Into<String>) -> Self {
        self.video_url = Some(url.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisOutput {
    pub payload: Value,
    /// Run details kept next to the result, e.g. how many comments were read.
    pub metadata: Value,
}

#[async_trait::async_trait]
pub trait AnalysisProvider: Send + Sync {
    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisOutput, ProviderError>;
}
