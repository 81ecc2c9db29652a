use crate::prelude::*;
use clap::Parser;
use std::path::PathBuf;

mod completion;
mod error;
mod explain;
mod mcp;
mod models;
mod panel;
mod prelude;
mod settings;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Explain code snippets with a language model running on a local Ollama server"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

/// Process-wide settings. Unset values fall back to the config file, then defaults.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct Global {
    /// Path to a TOML config file (defaults to <config dir>/explainer/config.toml)
    #[clap(long, env = "EXPLAINER_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Ollama base URL [default: http://localhost:11434]
    #[clap(long, env = "OLLAMA_URL", global = true)]
    ollama_url: Option<String>,

    /// Model used for explanations [default: llama3:8b]
    #[clap(long, env = "EXPLAINER_MODEL", global = true)]
    model: Option<String>,

    /// Sampling temperature, 0.0 to 2.0 [default: 0.8]
    #[clap(long, env = "EXPLAINER_TEMPERATURE", global = true)]
    temperature: Option<f64>,

    /// Seconds to wait for the model before giving up [default: 120]
    #[clap(long, env = "EXPLAINER_TIMEOUT", global = true)]
    timeout: Option<u64>,

    /// Whether to display additional information.
    #[clap(long, env = "EXPLAINER_VERBOSE", global = true, default_value = "false")]
    verbose: bool,
}

#[derive(Debug, clap::Parser)]
pub enum SubCommands {
    /// Explain a code snippet
    Explain(crate::explain::App),

    /// Editor panel bridge over stdio
    Panel(crate::panel::App),

    /// List models installed on the Ollama endpoint
    Models(crate::models::App),

    /// Model Context Protocol server
    MCP(crate::mcp::App),
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    color_eyre::install()?;

    let app = App::parse();

    match app.command {
        SubCommands::Explain(sub_app) => crate::explain::run(sub_app, app.global).await,
        SubCommands::Panel(sub_app) => crate::panel::run(sub_app, app.global).await,
        SubCommands::Models(sub_app) => crate::models::run(sub_app, app.global).await,
        SubCommands::MCP(sub_app) => crate::mcp::run(sub_app, app.global).await,
    }
    .map_err(|err: color_eyre::eyre::Report| eyre!(err))
}
