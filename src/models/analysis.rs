use crate::domain::{AnalysisType, VideoId};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// What an analysis was run on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AnalysisSubject {
    Video(VideoId),
    /// Not tied to a video (competitor comparison, calendar, script). The
    /// discriminator tells apart distinct requests of the same type.
    Unscoped { discriminator: String },
}

impl AnalysisSubject {
    #[must_use]
    pub const fn video_id(&self) -> Option<&VideoId> {
        match self {
            Self::Video(id) => Some(id),
            Self::Unscoped { .. } => None,
        }
    }

    #[must_use]
    pub fn discriminator(&self) -> Option<&str> {
        match self {
            Self::Video(_) => None,
            Self::Unscoped { discriminator } => Some(discriminator),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AnalysisKey {
    pub analysis_type: AnalysisType,
    pub subject: AnalysisSubject,
}

impl AnalysisKey {
    #[must_use]
    pub const fn for_video(analysis_type: AnalysisType, video_id: VideoId) -> Self {
        Self {
            analysis_type,
            subject: AnalysisSubject::Video(video_id),
        }
    }

    #[must_use]
    pub fn unscoped(analysis_type: AnalysisType, discriminator: impl Into<String>) -> Self {
        Self {
            analysis_type,
            subject: AnalysisSubject::Unscoped {
                discriminator: discriminator.into(),
            },
        }
    }
}

/// A successful analysis result about to be cached.
#[derive(Debug, Clone)]
pub struct NewAnalysis {
    pub key: AnalysisKey,
    pub payload: Value,
    pub metadata: Value,
    pub title: Option<String>,
    pub video_url: Option<String>,
}

impl NewAnalysis {
    #[must_use]
    pub fn new(key: AnalysisKey, payload: Value) -> Self {
        Self {
            key,
            payload,
            metadata: Value::Object(serde_json::Map::new()),
            title: None,
            video_url: None,
        }
    }

    #[must_use]
    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = metadata;
        self
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
pub struct CachedAnalysis {
    pub id: i64,
    pub payload: Value,
    pub metadata: Value,
    pub title: Option<String>,
    pub cached_at: DateTime<Utc>,
}

/// History row shown on the dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisSummary {
    pub id: i64,
    pub analysis_type: String,
    pub title: Option<String>,
    pub video_id: Option<String>,
    pub cached_at: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnalysisStats {
    pub total_analyses: u64,
    pub analyses_by_type: BTreeMap<String, u64>,
}
