pub mod commands;
pub mod config;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::client::{App, FileStore, Notifier, Route, TerminalNotifier};

#[derive(Parser)]
#[command(name = "rk")]
#[command(about = "rk - terminal client for the recordkeeper API")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[arg(long, global = true, help = "API base URL (defaults to RK_API_URL or http://localhost:3001)")]
    pub server: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(flatten)]
    Auth(commands::auth::AuthCommands),

    #[command(about = "List, show, create, update and delete records")]
    Records {
        #[command(subcommand)]
        cmd: commands::records::RecordCommands,
    },

    #[command(about = "View and edit your profile")]
    Profile {
        #[command(subcommand)]
        cmd: commands::profile::ProfileCommands,
    },

    #[command(about = "Show or change the colour theme")]
    Theme {
        #[arg(value_enum, help = "New theme; omit to show the current one")]
        mode: Option<commands::theme::ThemeMode>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub const NOT_SIGNED_IN: &str = "Not signed in. Run `rk login <email>` first.";

/// Everything a command needs: the client app and how to print
pub struct Context {
    pub app: App,
    pub output: OutputFormat,
    pub server_url: String,
}

impl Context {
    pub fn open(server: Option<String>, output: OutputFormat) -> anyhow::Result<Self> {
        let server_url = config::resolve_server_url(server);
        let storage = Arc::new(FileStore::new(config::session_file()?));

        // Command errors are printed once by the binary
        let notifier = TerminalNotifier::new().skip_errors();
        let notifier: Arc<dyn Notifier> = match output {
            OutputFormat::Json => Arc::new(notifier.quiet()),
            OutputFormat::Text => Arc::new(notifier),
        };

        let app = App::new(&server_url, storage, notifier)
            .map_err(|e| anyhow::anyhow!("{} ({})", e, server_url))?;

        Ok(Self {
            app,
            output,
            server_url,
        })
    }

    /// Restore the stored session and move to `route`, or fail if signed out
    pub async fn enter(&mut self, route: Route) -> anyhow::Result<()> {
        self.app.start().await;
        if self.app.navigate(route) != route {
            anyhow::bail!(NOT_SIGNED_IN);
        }
        Ok(())
    }

    /// Build the error for a failed action, noting when the session ended
    pub fn fail(&mut self, message: impl Into<String>) -> anyhow::Error {
        let message = message.into();
        let current = self.app.route();
        if current.requires_auth() && self.app.navigate(current) == Route::Login {
            anyhow::anyhow!("{}. Your session has ended; run `rk login` to sign in again.", message)
        } else {
            anyhow::anyhow!(message)
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let mut ctx = Context::open(cli.server, output_format)?;

    match cli.command {
        Commands::Auth(cmd) => commands::auth::handle(cmd, &mut ctx).await,
        Commands::Records { cmd } => commands::records::handle(cmd, &mut ctx).await,
        Commands::Profile { cmd } => commands::profile::handle(cmd, &mut ctx).await,
        Commands::Theme { mode } => commands::theme::handle(mode, &mut ctx).await,
    }
}
