//! Domain types for the channel analytics cache.
//!
//! Newtype wrappers keep owner ids, video ids and analysis kinds from being
//! mixed up at the repository boundary.

pub mod freshness;

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// Identifier of the user account that owns cached data.
///
/// # Examples
///
/// ```rust
/// use insight::domain::OwnerId;
///
/// let id = OwnerId::new(42);
/// assert_eq!(id.value(), 42);
/// assert_eq!(id.to_string(), "42");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct OwnerId(i32);

impl OwnerId {
    #[must_use]
    pub const fn new(id: i32) -> Self {
        debug_assert!(id >= 0, "OwnerId should be non-negative");
        Self(id)
    }

    #[must_use]
    pub const fn value(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<OwnerId> for i32 {
    fn from(id: OwnerId) -> Self {
        id.0
    }
}

impl From<i32> for OwnerId {
    fn from(id: i32) -> Self {
        Self::new(id)
    }
}

impl Serialize for OwnerId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_i32(self.0)
    }
}

impl<'de> Deserialize<'de> for OwnerId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let id = i32::deserialize(deserializer)?;
        Ok(Self::new(id))
    }
}

static VIDEO_URL_PATTERNS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        Regex::new(r"watch\?v=([a-zA-Z0-9_-]{11})").expect("valid regex"),
        Regex::new(r"youtu\.be/([a-zA-Z0-9_-]{11})").expect("valid regex"),
        Regex::new(r"embed/([a-zA-Z0-9_-]{11})").expect("valid regex"),
    ]
});

/// A provider-assigned video identifier (11 characters on YouTube).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VideoId(String);

impl VideoId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Extracts the video id from `watch?v=`, `youtu.be/` or `embed/` URLs.
    #[must_use]
    pub fn from_url(url: &str) -> Option<Self> {
        VIDEO_URL_PATTERNS
            .iter()
            .find_map(|re| re.captures(url))
            .and_then(|caps| caps.get(1))
            .map(|m| Self(m.as_str().to_string()))
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for VideoId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

static CHANNEL_URL_PATTERNS: LazyLock<[Regex; 4]> = LazyLock::new(|| {
    [
        Regex::new(r"youtube\.com/channel/([a-zA-Z0-9_-]+)").expect("valid regex"),
        Regex::new(r"youtube\.com/@([a-zA-Z0-9_.-]+)").expect("valid regex"),
        Regex::new(r"youtube\.com/c/([a-zA-Z0-9_.-]+)").expect("valid regex"),
        Regex::new(r"youtube\.com/user/([a-zA-Z0-9_.-]+)").expect("valid regex"),
    ]
});

static CHANNEL_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_.-]+$").expect("valid regex"));

/// A channel as the owner refers to it.
///
/// Only [`ChannelRef::Id`] is stable. The other forms are names the video
/// provider resolves to an id. The `Display` form (`UC…`, `@name`,
/// `c/name`, `user/name`) is what gets stored on the owner and handed to
/// the provider, and it parses back with `FromStr`.
///
/// ```rust
/// use insight::domain::ChannelRef;
///
/// let r = ChannelRef::from_url("https://www.youtube.com/@LinusTechTips/videos").unwrap();
/// assert_eq!(r, ChannelRef::Handle("LinusTechTips".to_string()));
/// assert_eq!(r.to_string(), "@LinusTechTips");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ChannelRef {
    Id(String),
    Handle(String),
    Custom(String),
    User(String),
}

impl ChannelRef {
    /// Recognizes `/channel/`, `/@`, `/c/` and `/user/` channel URLs.
    #[must_use]
    pub fn from_url(url: &str) -> Option<Self> {
        let [channel, handle, custom, user] = &*CHANNEL_URL_PATTERNS;
        let capture = |re: &Regex| {
            re.captures(url)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().to_string())
        };

        capture(channel)
            .map(Self::Id)
            .or_else(|| capture(handle).map(Self::Handle))
            .or_else(|| capture(custom).map(Self::Custom))
            .or_else(|| capture(user).map(Self::User))
    }

    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        matches!(self, Self::Id(_))
    }
}

impl fmt::Display for ChannelRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => f.write_str(id),
            Self::Handle(name) => write!(f, "@{name}"),
            Self::Custom(name) => write!(f, "c/{name}"),
            Self::User(name) => write!(f, "user/{name}"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Not a YouTube channel URL or id: '{0}'")]
pub struct InvalidChannelRef(pub String);

impl FromStr for ChannelRef {
    type Err = InvalidChannelRef;

    /// Accepts a channel URL or the stored form (`UC…`, `@name`, `c/name`,
    /// `user/name`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();
        let invalid = || InvalidChannelRef(s.to_string());

        let lower = input.to_ascii_lowercase();
        if lower.contains("youtube.com") || lower.contains("youtu.be") {
            return Self::from_url(input).ok_or_else(invalid);
        }

        let (make, name): (fn(String) -> Self, &str) =
            if let Some(rest) = input.strip_prefix('@') {
                (Self::Handle, rest)
            } else if let Some(rest) = input.strip_prefix("c/") {
                (Self::Custom, rest)
            } else if let Some(rest) = input.strip_prefix("user/") {
                (Self::User, rest)
            } else {
                (Self::Id, input)
            };

        if !CHANNEL_NAME.is_match(name) {
            return Err(invalid());
        }
        Ok(make(name.to_string()))
    }
}

/// Kind of analysis whose results are cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisType {
    Sentiment,
    ThemeCluster,
    Competitor,
    Script,
    Calendar,
}

impl AnalysisType {
    pub const ALL: [Self; 5] = [
        Self::Sentiment,
        Self::ThemeCluster,
        Self::Competitor,
        Self::Script,
        Self::Calendar,
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sentiment => "sentiment",
            Self::ThemeCluster => "theme_cluster",
            Self::Competitor => "competitor",
            Self::Script => "script",
            Self::Calendar => "calendar",
        }
    }

    /// Whether results of this kind are keyed by a single video.
    #[must_use]
    pub const fn is_video_scoped(&self) -> bool {
        matches!(self, Self::Sentiment | Self::ThemeCluster)
    }
}

impl fmt::Display for AnalysisType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown analysis type: {0}")]
pub struct UnknownAnalysisType(pub String);

impl FromStr for AnalysisType {
    type Err = UnknownAnalysisType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownAnalysisType(s.to_string()))
    }
}
