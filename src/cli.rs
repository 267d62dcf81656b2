//! CLI definitions for edithost.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// edithost CLI.
#[derive(Parser)]
#[command(name = "edithost")]
#[command(about = "Registry-driven extensibility host for page-editing clients")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path (defaults to config/default.toml when present)
    #[arg(short, long, env = "EDITHOST_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Bootstrap and print the registry tree
    Registries {
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Dispatch server feedback through the built-in handlers
    Dispatch {
        /// Feedback file: one envelope, an array of envelopes or an array of feedback ("-" for stdin)
        input: String,

        /// Initial store state (JSON file)
        #[arg(long)]
        state: Option<PathBuf>,
    },

    /// Resolve ClientEval expressions of an inspector view configuration
    ViewConfig {
        /// View configuration (JSON file)
        view: PathBuf,

        /// Focused node (JSON file)
        #[arg(long)]
        node: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Table,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_registries() {
        let cli = Cli::try_parse_from(["edithost", "registries", "--format", "json"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Registries {
                format: OutputFormat::Json
            }
        ));
    }

    #[test]
    fn test_parse_dispatch_with_global_config() {
        let cli = Cli::try_parse_from([
            "edithost",
            "dispatch",
            "-",
            "--state",
            "state.json",
            "--config",
            "edithost.toml",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("edithost.toml")));
        match cli.command {
            Commands::Dispatch { input, state } => {
                assert_eq!(input, "-");
                assert_eq!(state, Some(PathBuf::from("state.json")));
            }
            _ => panic!("expected dispatch"),
        }
    }

    #[test]
    fn test_view_config_requires_node() {
        assert!(Cli::try_parse_from(["edithost", "view-config", "view.json"]).is_err());
    }
}
