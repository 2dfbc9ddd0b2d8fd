//! Command-line definition and dispatch

use crate::commands;
use crate::output::OutputFormat;
use anyhow::Context;
use clap::{Parser, Subcommand};
use quarry_rs::{Client, ClientOptions};
use std::path::PathBuf;

/// Quarry - full-text search server client
///
/// Index files, delete documents and run searches against a remote search
/// server. Endpoints are discovered from the server root unless both
/// --search-path and --index-path are given.
#[derive(Parser, Debug)]
#[command(name = "quarry")]
#[command(version)]
#[command(about = "Full-text search server client", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Search server base URL
    #[arg(
        long,
        global = true,
        env = "QUARRY_SERVER",
        default_value = "http://localhost:5000"
    )]
    pub server: String,

    /// JSON file with client options
    #[arg(long, global = true, env = "QUARRY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Search endpoint path (skips discovery together with --index-path)
    #[arg(long, global = true)]
    pub search_path: Option<String>,

    /// Index endpoint path
    #[arg(long, global = true)]
    pub index_path: Option<String>,

    /// HTTP basic auth user
    #[arg(long, short = 'u', global = true, env = "QUARRY_USERNAME")]
    pub username: Option<String>,

    /// HTTP basic auth password
    #[arg(long, global = true, env = "QUARRY_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Log requests and responses
    #[arg(long, short = 'd', global = true)]
    pub debug: bool,

    /// Write logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "human")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the endpoints and metadata the server advertises
    Info,

    /// Index files; directories are walked recursively
    Index(commands::index::IndexArgs),

    /// Delete documents by URI
    Delete(commands::delete::DeleteArgs),

    /// Search the index
    Search(commands::search::SearchArgs),

    /// Commit pending index changes
    Commit,

    /// Discard pending index changes
    Rollback,
}

impl Cli {
    /// Options from the config file (if any) with command-line flags on top
    pub fn client_options(&self) -> anyhow::Result<ClientOptions> {
        let mut options = match &self.config {
            Some(path) => {
                let path = path.to_string_lossy();
                ClientOptions::load(&path)
                    .with_context(|| format!("failed to load config file {}", path))?
            }
            None => ClientOptions::default(),
        };

        if let Some(search_path) = &self.search_path {
            options.search_path = Some(search_path.clone());
        }
        if let Some(index_path) = &self.index_path {
            options.index_path = Some(index_path.clone());
        }
        if let Some(username) = &self.username {
            options.username = Some(username.clone());
        }
        if let Some(password) = &self.password {
            options.password = Some(password.clone());
        }
        if self.debug {
            options.debug = true;
        }

        Ok(options)
    }
}

/// Run the CLI with the provided arguments
/// Connect with already-resolved options and dispatch the command
pub async fn run(cli: Cli, options: ClientOptions) -> anyhow::Result<()> {
    let mut client = Client::connect(&cli.server, options)
        .await
        .with_context(|| format!("could not connect to {}", cli.server))?;

    match cli.command {
        Commands::Info => commands::info::execute(&client, cli.format),
        Commands::Index(args) => commands::index::execute(args, &client, cli.format).await,
        Commands::Delete(args) => commands::delete::execute(args, &client, cli.format).await,
        Commands::Search(args) => commands::search::execute(args, &mut client, cli.format).await,
        Commands::Commit => commands::control::commit(&client, cli.format).await,
        Commands::Rollback => commands::control::rollback(&client, cli.format).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_search_command() {
        let cli = Cli::try_parse_from([
            "quarry",
            "--server",
            "http://search.local:9000",
            "search",
            "rust async",
            "--page-size",
            "5",
            "-P",
            "b=OR",
        ])
        .unwrap();

        assert_eq!(cli.server, "http://search.local:9000");
        assert_eq!(cli.format, OutputFormat::Human);
        match cli.command {
            Commands::Search(args) => {
                assert_eq!(args.query, "rust async");
                assert_eq!(args.page_size, Some(5));
                assert_eq!(args.params, vec![("b".to_string(), "OR".to_string())]);
            }
            other => panic!("expected search, got {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["quarry", "delete", "a/b", "--debug", "--format", "json"])
            .unwrap();
        assert!(cli.debug);
        assert_eq!(cli.format, OutputFormat::Json);
    }

    #[test]
    fn test_index_requires_paths() {
        assert!(Cli::try_parse_from(["quarry", "index"]).is_err());
    }

    #[test]
    fn test_flags_override_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"search_path": "/s", "index_path": "/i", "username": "file-user", "timeout_secs": 3}}"#
        )
        .unwrap();

        let cli = Cli::try_parse_from([
            "quarry",
            "--config",
            file.path().to_str().unwrap(),
            "--index-path",
            "/idx",
            "-u",
            "flag-user",
            "--debug",
            "info",
        ])
        .unwrap();

        let options = cli.client_options().unwrap();
        assert_eq!(options.search_path.as_deref(), Some("/s"));
        assert_eq!(options.index_path.as_deref(), Some("/idx"));
        assert_eq!(options.username.as_deref(), Some("flag-user"));
        assert_eq!(options.timeout_secs, 3);
        assert!(options.debug);
    }

    #[test]
    fn test_config_file_debug_enables_debug_logging() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"debug": true}}"#).unwrap();

        let cli = Cli::try_parse_from(["quarry", "--config", file.path().to_str().unwrap(), "info"])
            .unwrap();
        assert!(!cli.debug);

        let options = cli.client_options().unwrap();
        assert!(options.debug);
        assert!(crate::telemetry::default_filter(options.debug).contains("quarry_rs=debug"));
    }

    #[test]
    fn test_bad_config_file_is_reported() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"unknown_option": 1}}"#).unwrap();

        let cli = Cli::try_parse_from(["quarry", "--config", file.path().to_str().unwrap(), "info"])
            .unwrap();
        let err = cli.client_options().unwrap_err();
        assert!(format!("{:#}", err).contains("unknown_option"));
    }
}
