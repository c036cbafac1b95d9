use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "slack2sheets")]
#[command(version)]
#[command(about = "Summarize Slack channels into a Google Sheet")]
pub struct Cli {
    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Summarize the configured channels and update the digest tab
    Digest {
        /// Clear existing digest rows before writing
        #[arg(long)]
        reset: bool,
    },

    /// Copy the latest messages of a channel into the messages tab
    Sync {
        /// Channel name, with or without '#'
        channel: String,
    },

    /// List channels visible to the bot and whether it is a member
    Channels,

    /// Check that the spreadsheet is reachable
    Check,

    /// Serve the Slack Events API webhook
    Serve,
}
