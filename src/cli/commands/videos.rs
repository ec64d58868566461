use super::open_store;
use crate::config::Config;
use crate::domain::OwnerId;
use chrono::TimeDelta;

pub async fn cmd_videos(
    config: &Config,
    owner_id: i32,
    max_age_hours: Option<u32>,
    include_stale: bool,
) -> anyhow::Result<()> {
    let store = open_store(config).await?;
    let owner_id = OwnerId::new(owner_id);

    let max_age = max_age_hours.map_or_else(
        || config.cache.video_max_age(),
        |h| TimeDelta::hours(i64::from(h)),
    );

    let fresh = store.get_fresh_videos(owner_id, max_age).await?;
    let (snapshot, stale) = match fresh {
        Some(s) => (Some(s), false),
        None if include_stale => (store.get_any_videos(owner_id).await?, true),
        None => (None, false),
    };

    let Some(snapshot) = snapshot else {
        println!("No fresh cached videos for owner {owner_id}.");
        return Ok(());
    };

    println!(
        "Cached videos for owner {} ({} videos, cached {}{})",
        owner_id,
        snapshot.len(),
        snapshot.cached_at.format("%Y-%m-%d %H:%M UTC"),
        if stale { ", STALE" } else { "" }
    );
    println!("{:-<80}", "");

    for video in &snapshot.videos {
        println!("• {} [{}]", video.title, video.video_id);
        let secs = video.duration_seconds();
        println!(
            "  {} | {}:{:02} | {} views | {} likes | {} comments{}",
            video.published_at,
            secs / 60,
            secs % 60,
            video.view_count,
            video.like_count,
            video.comment_count,
            if video.has_captions { " | captions" } else { "" }
        );
    }

    Ok(())
}
