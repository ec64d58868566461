pub mod cli;
pub mod config;
pub mod db;
pub mod domain;
pub mod entities;
pub mod models;
pub mod services;

use clap::Parser;
use cli::{Cli, Commands, OwnerCommands};
pub use config::Config;
use config::LogFormat;
use tracing_subscriber::EnvFilter;

fn init_tracing(config: &Config) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.general.log_format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

pub async fn run(config: Config) -> anyhow::Result<()> {
    config.validate()?;
    init_tracing(&config);

    let cli = Cli::parse();

    let Some(command) = cli.command else {
        use clap::CommandFactory;
        Cli::command().print_help()?;
        return Ok(());
    };

    match command {
        Commands::Init => {
            if Config::create_default_if_missing()? {
                println!("✓ Config file created. Edit config.toml and run again.");
            } else {
                println!("config.toml already exists, leaving it untouched.");
            }
            Ok(())
        }

        Commands::Migrate => cli::cmd_migrate(&config).await,

        Commands::Owner { command } => match command {
            OwnerCommands::Add {
                email,
                channel,
                channel_name,
            } => cli::cmd_owner_add(&config, &email, channel, channel_name).await,
            OwnerCommands::Connect {
                owner_id,
                channel,
                channel_name,
            } => {
                cli::cmd_owner_connect(&config, owner_id, &channel, channel_name.as_deref()).await
            }
            OwnerCommands::List => cli::cmd_owner_list(&config).await,
            OwnerCommands::Remove { owner_id } => cli::cmd_owner_remove(&config, owner_id).await,
        },

        Commands::Videos {
            owner_id,
            max_age_hours,
            include_stale,
        } => cli::cmd_videos(&config, owner_id, max_age_hours, include_stale).await,

        Commands::History { owner_id, limit } => cli::cmd_history(&config, owner_id, limit).await,

        Commands::Stats { owner_id } => cli::cmd_stats(&config, owner_id).await,
    }
}
