use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static ISO_DURATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^P(?:(\d+)D)?(?:T(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?)?$").expect("valid regex")
});

/// One video of a channel as reported by the video provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoRecord {
    pub video_id: String,
    pub title: String,
    pub thumbnail_url: String,
    /// RFC 3339 publish time as reported by the provider.
    pub published_at: String,
    pub view_count: i64,
    pub comment_count: i64,
    #[serde(default)]
    pub like_count: i64,
    /// ISO 8601 duration (`PT4M13S`).
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub has_captions: bool,
}

impl VideoRecord {
    /// Length in seconds parsed from [`Self::duration`]; 0 when missing or
    /// malformed.
    #[must_use]
    pub fn duration_seconds(&self) -> u64 {
        parse_duration_seconds(&self.duration)
    }
}

fn parse_duration_seconds(duration: &str) -> u64 {
    let Some(caps) = ISO_DURATION.captures(duration.trim()) else {
        return 0;
    };

    let part = |i: usize| {
        caps.get(i)
            .and_then(|m| m.as_str().parse::<u64>().ok())
            .unwrap_or(0)
    };
    [(1, 86_400), (2, 3_600), (3, 60), (4, 1)]
        .into_iter()
        .fold(0u64, |acc, (i, unit)| {
            acc.saturating_add(part(i).saturating_mul(unit))
        })
}

/// The complete cached video list of one owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoSnapshot {
    /// Newest first.
    pub videos: Vec<VideoRecord>,
    /// Oldest `cached_at` among the rows.
    pub cached_at: DateTime<Utc>,
}

impl VideoSnapshot {
    #[must_use]
    pub fn len(&self) -> usize {
        self.videos.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.videos.is_empty()
    }
}
