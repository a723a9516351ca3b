use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use uiforge::config::Config;
use uiforge::llm::factory;
use uiforge::pipeline::enhancer;
use uiforge::server;

#[derive(Parser)]
#[command(name = "uiforge", version)]
#[command(about = "Generate and refine single-page UIs from plain-language descriptions", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the web front end and JSON API
    Serve {
        /// Path to config file (defaults to $UIFORGE_CONFIG, ./uiforge.toml or ~/.config/uiforge/config.toml)
        #[arg(long)]
        config: Option<String>,

        /// Address to listen on (e.g., "0.0.0.0:8080")
        #[arg(long)]
        bind: Option<String>,

        /// Directory for the saved copies of generated pages
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Override LLM provider (gemini, anthropic, openai, openai-compatible)
        #[arg(long)]
        provider: Option<String>,

        /// Override LLM model (e.g., "gemini-2.5-flash")
        #[arg(long)]
        model: Option<String>,

        /// Use mock LLM client for testing
        #[arg(long)]
        dry_run: bool,
    },

    /// Print the enhanced prompt for a description and exit
    Enhance {
        /// The UI description to enhance
        description: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            config,
            bind,
            output_dir,
            provider,
            model,
            dry_run,
        } => {
            let mut config = Config::load_with_path(config)?;

            // Apply CLI overrides
            if let Some(bind) = bind {
                info!("CLI override: bind = {}", bind);
                config.server.bind = bind;
            }
            if let Some(dir) = output_dir {
                info!("CLI override: output_dir = {}", dir.display());
                config.server.output_dir = dir;
            }
            if let Some(provider) = provider {
                info!("CLI override: provider = {}", provider);
                config.llm.provider = provider;
            }
            if let Some(model) = model {
                info!("CLI override: model = {}", model);
                config.llm.model = model;
            }
            info!("Dry run: {}", dry_run);

            let factory = factory::create_factory(&config.llm, dry_run)?;
            server::serve(config, factory).await?;
        }
        Commands::Enhance { description } => {
            println!("{}", enhancer::enhance(&description));
        }
    }

    Ok(())
}
