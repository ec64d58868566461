pub mod analysis_service;
pub use analysis_service::{AnalysisError, AnalysisOutcome, AnalysisService};

pub mod analysis_service_impl;
pub use analysis_service_impl::CachedAnalysisService;

pub mod channel_service;
pub use channel_service::{ChannelError, ChannelService, Origin, VideoListing};

pub mod channel_service_impl;
pub use channel_service_impl::CachedChannelService;

pub mod locks;
pub use locks::KeyedLocks;

pub mod providers;
pub use providers::{
    AnalysisOutput, AnalysisProvider, AnalysisRequest, ChannelVideoProvider, ProviderError,
};
