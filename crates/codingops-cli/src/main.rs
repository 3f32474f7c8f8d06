//! codingops CLI - CODING DevOps tools for AI assistants.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use codingops_coding::CodingClient;
use codingops_core::{CodingApi, CodingConfig, Config, ConfigOverrides, ConnectionManager};
use codingops_mcp::{available_tools, McpServer, RequestDispatcher};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "codingops")]
#[command(author, version, about = "codingops - CODING DevOps tools over MCP", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the MCP server on stdin/stdout
    Serve(ServeArgs),

    /// List the tools the server exposes
    Tools,

    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Personal access token (overrides CODING_TOKEN)
    #[arg(long)]
    token: Option<String>,

    /// Open API endpoint
    #[arg(long)]
    api_url: Option<String>,

    /// Base directory for relative working directories
    #[arg(long)]
    working_directory: Option<PathBuf>,

    /// Per-request timeout in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,
}

impl From<ServeArgs> for ConfigOverrides {
    fn from(args: ServeArgs) -> Self {
        Self {
            token: args.token,
            api_url: args.api_url,
            working_directory: args.working_directory,
            timeout_secs: args.timeout_secs,
        }
    }
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Print one value, e.g. `coding.api_url`
    Get { key: String },

    /// Store one value, e.g. `coding.timeout_secs 60`
    Set { key: String, value: String },

    /// Print the configuration file location
    Path,
}

/// Keys printed by `config show`.
const SHOWN_KEYS: [&str; 4] = [
    "coding.api_url",
    "coding.working_directory",
    "coding.timeout_secs",
    "coding.token",
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // stdout carries the JSON-RPC stream, so logs go to stderr
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Some(Commands::Serve(args)) => serve(args).await?,
        Some(Commands::Tools) => {
            for tool in available_tools() {
                println!("{:<22} {}", tool.name, tool.description);
            }
        }
        Some(Commands::Config { command }) => config(command)?,
        None => {
            println!("codingops - CODING DevOps tools over MCP");
            println!("Run with --help for usage information");
        }
    }

    Ok(())
}

async fn serve(args: ServeArgs) -> anyhow::Result<()> {
    let file = Config::load()?;
    let config = CodingConfig::resolve(&args.into(), &file)?;

    let manager = ConnectionManager::new(|config| {
        let client = CodingClient::from_config(config)?;
        Ok(Arc::new(client) as Arc<dyn CodingApi>)
    });
    manager.initialize(config);
    // Build the HTTP client now so a broken setup fails before serving
    manager.instance()?;

    let mut server = McpServer::new(RequestDispatcher::new(Arc::new(manager)));
    server.run().await?;
    Ok(())
}

fn config(command: ConfigCommands) -> anyhow::Result<()> {
    match command {
        ConfigCommands::Show => {
            let config = Config::load()?;
            println!("# {}", Config::config_path()?.display());
            for key in SHOWN_KEYS {
                let value = config.get(key)?;
                let value = match (key, value) {
                    ("coding.token", Some(token)) => mask(&token),
                    (_, Some(value)) => value,
                    (_, None) => "(not set)".to_string(),
                };
                println!("{} = {}", key, value);
            }
        }
        ConfigCommands::Get { key } => match Config::load()?.get(&key)? {
            Some(value) => println!("{}", value),
            None => anyhow::bail!("{} is not set", key),
        },
        ConfigCommands::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            config.save()?;
            tracing::info!(key = %key, "Configuration updated");
        }
        ConfigCommands::Path => println!("{}", Config::config_path()?.display()),
    }
    Ok(())
}

/// Keep only the last four characters of a secret.
fn mask(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 4 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{}", tail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_serve_flags() {
        let cli = Cli::try_parse_from([
            "codingops",
            "serve",
            "--token",
            "abc",
            "--working-directory",
            "/work",
            "--timeout-secs",
            "5",
        ])
        .unwrap();

        let Some(Commands::Serve(args)) = cli.command else {
            panic!("expected serve");
        };
        let overrides = ConfigOverrides::from(args);
        assert_eq!(overrides.token.as_deref(), Some("abc"));
        assert_eq!(overrides.working_directory, Some(PathBuf::from("/work")));
        assert_eq!(overrides.timeout_secs, Some(5));
        assert_eq!(overrides.api_url, None);
    }

    #[test]
    fn test_config_set_parses() {
        let cli =
            Cli::try_parse_from(["codingops", "-v", "config", "set", "coding.api_url", "http://x"])
                .unwrap();
        assert!(cli.verbose);
        assert!(matches!(
            cli.command,
            Some(Commands::Config {
                command: ConfigCommands::Set { .. }
            })
        ));
    }

    #[test]
    fn test_mask() {
        assert_eq!(mask("abcdef123456"), "****3456");
        assert_eq!(mask("abc"), "****");
    }
}
