mod commands;
mod jql;

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::Parser;
use jira_rest_api::JiraClient;
use jira_rest_config::Config;
use jira_rest_output::{OutputFormat, OutputRenderer};
use tracing_subscriber::{fmt, EnvFilter};

use commands::{resolve_connection, Command, JiraContext};

#[derive(Parser, Debug)]
#[command(name = "jira-rest", version, about = "Work with Jira issues over the REST API", long_about = None)]
struct Cli {
    /// Profile to use from config file
    #[arg(short, long)]
    profile: Option<String>,

    /// Path to config file (defaults to ~/.jira-rest/config.yaml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output format for command results
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,

    /// Enable verbose logging
    #[arg(long)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug)?;

    let mut config = Config::load(cli.config.as_ref())?;
    let renderer = OutputRenderer::new(cli.output);

    match cli.command {
        Command::Profile(command) => {
            commands::profile::handle(command, &mut config, cli.config.as_deref(), &renderer)
        }
        Command::Issue(command) => {
            let connection = resolve_connection(&config, cli.profile.as_deref())?;
            let client = JiraClient::new(&connection)?;

            commands::execute(
                command,
                JiraContext {
                    client,
                    renderer: &renderer,
                },
            )
            .await
        }
    }
}

fn init_tracing(debug: bool) -> Result<()> {
    let default = if debug {
        "info,jira_rest=debug,jira_rest_api=debug"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow!("failed to initialize logger: {err}"))
}
