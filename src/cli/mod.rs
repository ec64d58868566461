//! CLI module - Command-line interface for Insight
//!
//! This module provides a structured CLI using clap for argument parsing.

mod commands;

use crate::domain::ChannelRef;
use clap::{Parser, Subcommand};

/// Insight - channel analytics cache administration
#[derive(Parser)]
#[command(name = "insight")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create default config file
    #[command(alias = "--init")]
    Init,

    /// Create the database and apply migrations
    Migrate,

    /// Manage owners (accounts that own cached data)
    Owner {
        #[command(subcommand)]
        command: OwnerCommands,
    },

    /// Show an owner's cached channel videos
    #[command(alias = "v")]
    Videos {
        /// Owner ID
        #[arg(value_parser = clap::value_parser!(i32).range(0..))]
        owner_id: i32,
        /// Freshness window in hours (defaults to the configured one)
        #[arg(long)]
        max_age_hours: Option<u32>,
        /// Show the snapshot even when it has expired
        #[arg(long)]
        include_stale: bool,
    },

    /// Show an owner's most recent analyses
    #[command(alias = "h")]
    History {
        /// Owner ID
        #[arg(value_parser = clap::value_parser!(i32).range(0..))]
        owner_id: i32,
        /// Number of entries to show
        #[arg(default_value = "5")]
        limit: u64,
    },

    /// Show analysis counts per type for an owner
    Stats {
        /// Owner ID
        #[arg(value_parser = clap::value_parser!(i32).range(0..))]
        owner_id: i32,
    },
}

#[derive(Subcommand)]
pub enum OwnerCommands {
    /// Register a new owner
    Add {
        email: String,
        /// Channel URL or ID to connect
        #[arg(long)]
        channel: Option<ChannelRef>,
        /// Display name of the channel
        #[arg(long)]
        channel_name: Option<String>,
    },
    /// Connect (or switch) an owner's channel
    Connect {
        #[arg(value_parser = clap::value_parser!(i32).range(0..))]
        owner_id: i32,
        /// Channel URL (`/channel/`, `/@`, `/c/`, `/user/`) or ID
        channel: ChannelRef,
        #[arg(long)]
        channel_name: Option<String>,
    },
    /// List all owners
    #[command(alias = "ls")]
    List,
    /// Remove an owner and purge its cached data
    #[command(alias = "rm")]
    Remove {
        #[arg(value_parser = clap::value_parser!(i32).range(0..))]
        owner_id: i32,
    },
}

pub use commands::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_owner_ids_are_rejected() {
        // `--` makes clap read the value as a positional rather than a flag.
        assert!(Cli::try_parse_from(["insight", "videos", "--", "-3"]).is_err());
        assert!(Cli::try_parse_from(["insight", "stats", "--", "-1"]).is_err());
        assert!(Cli::try_parse_from(["insight", "history", "--", "-1", "5"]).is_err());
        assert!(Cli::try_parse_from(["insight", "owner", "remove", "--", "-7"]).is_err());
        assert!(Cli::try_parse_from(["insight", "owner", "connect", "--", "-2", "UCabc"]).is_err());

        assert!(Cli::try_parse_from(["insight", "videos", "0"]).is_ok());
        assert!(Cli::try_parse_from(["insight", "owner", "remove", "7"]).is_ok());
    }

    #[test]
    fn owner_connect_accepts_channel_urls() {
        let cli = Cli::try_parse_from([
            "insight",
            "owner",
            "connect",
            "4",
            "https://www.youtube.com/c/Computerphile",
        ])
        .unwrap();

        let Some(Commands::Owner {
            command: OwnerCommands::Connect {
                owner_id, channel, ..
            },
        }) = cli.command
        else {
            panic!("expected owner connect");
        };
        assert_eq!(owner_id, 4);
        assert_eq!(channel, ChannelRef::Custom("Computerphile".to_string()));
    }

    #[test]
    fn owner_connect_rejects_non_channel_input() {
        assert!(
            Cli::try_parse_from([
                "insight",
                "owner",
                "connect",
                "4",
                "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            ])
            .is_err()
        );
    }
}
