pub use super::analyses::Entity as Analyses;
pub use super::cached_videos::Entity as CachedVideos;
pub use super::users::Entity as Users;
