//! CLI command definitions for the `voxroute` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod classify;
pub mod history;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use uuid::Uuid;

/// Route voice-assistant turns to the right dialogue agent.
#[derive(Parser)]
#[command(name = "voxroute", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to config.toml (defaults to $VOXROUTE_CONFIG, then ./config.toml).
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API server.
    Serve {
        /// Address to bind (overrides server.host).
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides server.port).
        #[arg(long)]
        port: Option<u16>,
    },

    /// Show which agent an utterance would be routed to (offline).
    Classify {
        /// The utterance; multiple words are joined with spaces.
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Show stored turns for a session.
    History {
        /// Session id (UUID) as returned in the X-Session-Id header.
        session_id: Uuid,

        /// Show at most this many turns.
        #[arg(short = 'n', long)]
        limit: Option<i64>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_classify_words() {
        let cli = Cli::parse_from(["voxroute", "classify", "tell", "me", "a", "joke"]);
        match cli.command {
            Commands::Classify { text } => assert_eq!(text.join(" "), "tell me a joke"),
            _ => panic!("expected classify"),
        }
    }

    #[test]
    fn parses_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "voxroute", "serve", "--port", "9000", "--config", "/etc/voxroute.toml", "-vv",
        ]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, Some(PathBuf::from("/etc/voxroute.toml")));
        match cli.command {
            Commands::Serve { host, port } => {
                assert_eq!(host, None);
                assert_eq!(port, Some(9000));
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn rejects_bad_session_id() {
        assert!(Cli::try_parse_from(["voxroute", "history", "not-a-uuid"]).is_err());
    }
}
