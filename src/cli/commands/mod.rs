mod analyses;
mod owner;
mod videos;

use crate::config::Config;
use crate::db::Store;

pub use analyses::{cmd_history, cmd_stats};
pub use owner::{cmd_owner_add, cmd_owner_connect, cmd_owner_list, cmd_owner_remove};
pub use videos::cmd_videos;

pub async fn open_store(config: &Config) -> anyhow::Result<Store> {
    Store::with_pool_options(
        &config.general.database_path,
        config.general.max_db_connections,
        config.general.min_db_connections,
    )
    .await
}

pub async fn cmd_migrate(config: &Config) -> anyhow::Result<()> {
    let store = open_store(config).await?;
    store.ping().await?;
    println!("✓ Database ready at {}", config.general.database_path);
    Ok(())
}
