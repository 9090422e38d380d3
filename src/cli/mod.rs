//! CLI command definitions and parsing
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "reco",
    version,
    about = "Hybrid retrieval-and-ranking engine for product catalogs",
    long_about = "Reco answers free-text catalog queries by extracting a structured preference \
                  profile, retrieving candidates from a vector similarity index, applying \
                  hard/soft constraint filtering, and ranking with multi-signal scoring."
)]
pub struct Cli {
    /// Global config file path (defaults to ~/.config/reco/config.toml)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ask for recommendations with a free-text query
    Query {
        /// Query text, e.g. "wireless headphones under $200"
        query: String,

        /// Maximum number of results to return
        #[arg(short, long)]
        limit: Option<usize>,

        /// Minimum similarity score in [0, 1]
        #[arg(short, long)]
        threshold: Option<f32>,

        /// Catalog JSON file (overrides the configured one)
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the catalog that would be searched
    Catalog {
        /// Catalog JSON file (overrides the configured one)
        #[arg(long)]
        catalog: Option<PathBuf>,
    },

    /// Show the conversation history
    History {
        /// Clear the stored history instead of showing it
        #[arg(long)]
        clear: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the active configuration
    Show,

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the default configuration path
    Path,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_command_parses() {
        let cli = Cli::try_parse_from([
            "reco", "query", "gaming chair", "--limit", "3", "--json",
        ])
        .unwrap();

        match cli.command {
            Commands::Query {
                query, limit, json, ..
            } => {
                assert_eq!(query, "gaming chair");
                assert_eq!(limit, Some(3));
                assert!(json);
            }
            _ => panic!("expected query command"),
        }
    }

    #[test]
    fn test_config_init_parses() {
        let cli = Cli::try_parse_from(["reco", "config", "init", "--force"]).unwrap();
        match cli.command {
            Commands::Config {
                action: ConfigAction::Init { force },
            } => assert!(force),
            _ => panic!("expected config init"),
        }
    }

    #[test]
    fn test_missing_command_rejected() {
        assert!(Cli::try_parse_from(["reco"]).is_err());
    }
}
