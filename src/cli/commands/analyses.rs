use super::open_store;
use crate::config::Config;
use crate::domain::OwnerId;

pub async fn cmd_history(config: &Config, owner_id: i32, limit: u64) -> anyhow::Result<()> {
    let store = open_store(config).await?;
    let analyses = store.recent_analyses(OwnerId::new(owner_id), limit).await?;

    if analyses.is_empty() {
        println!("No analysis history.");
        return Ok(());
    }

    println!("Recent Analyses (last {}):", analyses.len());
    println!("{:-<70}", "");

    for a in analyses {
        let title = a.title.as_deref().unwrap_or("Untitled");
        println!("• [{}] {}", a.analysis_type, title);
        match a.video_id {
            Some(video) => println!("  Video: {} | {}", video, a.cached_at),
            None => println!("  {}", a.cached_at),
        }
    }

    Ok(())
}

pub async fn cmd_stats(config: &Config, owner_id: i32) -> anyhow::Result<()> {
    let store = open_store(config).await?;
    let stats = store.analysis_stats(OwnerId::new(owner_id)).await?;

    println!("Total analyses: {}", stats.total_analyses);
    for (analysis_type, count) in &stats.analyses_by_type {
        println!("  {analysis_type:<16} {count}");
    }
    Ok(())
}
