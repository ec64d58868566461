use super::open_store;
use crate::config::Config;
use crate::domain::{ChannelRef, OwnerId};
use crate::models::owner::NewOwner;

pub async fn cmd_owner_add(
    config: &Config,
    email: &str,
    channel: Option<ChannelRef>,
    channel_name: Option<String>,
) -> anyhow::Result<()> {
    let store = open_store(config).await?;

    if store.get_owner_by_email(email).await?.is_some() {
        anyhow::bail!("An owner with email '{email}' already exists");
    }

    let owner = store
        .create_owner(&NewOwner {
            email: email.to_string(),
            channel_id: channel.as_ref().map(ToString::to_string),
            channel_name,
        })
        .await?;

    println!("✓ Created owner {} ({})", owner.id, owner.email);
    Ok(())
}

pub async fn cmd_owner_connect(
    config: &Config,
    owner_id: i32,
    channel: &ChannelRef,
    channel_name: Option<&str>,
) -> anyhow::Result<()> {
    let store = open_store(config).await?;
    let channel_id = channel.to_string();
    store
        .connect_channel(OwnerId::new(owner_id), &channel_id, channel_name)
        .await?;

    println!("✓ Owner {owner_id} connected to channel {channel_id}");
    if !channel.is_resolved() {
        println!("  The provider resolves '{channel_id}' to a channel ID on the next fetch.");
    }
    Ok(())
}

pub async fn cmd_owner_list(config: &Config) -> anyhow::Result<()> {
    let store = open_store(config).await?;
    let owners = store.list_owners().await?;

    if owners.is_empty() {
        println!("No owners registered.");
        return Ok(());
    }

    println!("{:<6} {:<32} {:<26} Channel", "ID", "Email", "Channel ID");
    println!("{:-<80}", "");
    for owner in owners {
        println!(
            "{:<6} {:<32} {:<26} {}",
            owner.id,
            owner.email,
            owner.channel_id.as_deref().unwrap_or("-"),
            owner.channel_name.as_deref().unwrap_or("-"),
        );
    }
    Ok(())
}

pub async fn cmd_owner_remove(config: &Config, owner_id: i32) -> anyhow::Result<()> {
    let store = open_store(config).await?;
    if store.remove_owner(OwnerId::new(owner_id)).await? {
        println!("✓ Removed owner {owner_id} and its cached data");
    } else {
        println!("Owner {owner_id} not found");
    }
    Ok(())
}
