pub mod analysis_cache;
pub mod user;
pub mod video_cache;

use crate::db::error::{CacheError, CacheResult};
use crate::domain::freshness::parse_timestamp;
use chrono::{DateTime, Utc};

/// Outcome of a freshness-checked read, recorded as a metric label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Lookup {
    Hit,
    Miss,
    Stale,
}

impl Lookup {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Hit => "hit",
            Self::Miss => "miss",
            Self::Stale => "stale",
        }
    }

    pub(crate) fn record(self, cache: &'static str) {
        metrics::counter!("cache_lookups_total", "cache" => cache, "outcome" => self.as_str())
            .increment(1);
    }
}

pub(crate) fn stored_timestamp(raw: &str) -> CacheResult<DateTime<Utc>> {
    parse_timestamp(raw).map_err(|source| CacheError::InvalidTimestamp {
        value: raw.to_string(),
        source,
    })
}
