pub mod prelude;

pub mod analyses;
pub mod cached_videos;
pub mod users;
