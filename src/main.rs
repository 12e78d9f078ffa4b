mod cli;
mod config;
mod conversation_state;
mod gemini_client;
mod model;
mod persona;
mod relay;
mod session;
mod web;

#[cfg(test)]
mod test_support;

use std::env;
use std::io;
use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use dotenv::dotenv;
use eyre::Result;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::cli::chat::ChatContext;
use crate::config::Settings;
use crate::gemini_client::{ClientError, GeminiClient, ModelClient};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input to send to the chat
    #[arg(short, long)]
    input: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a chat session in the terminal
    Chat {
        /// Input to send to the chat
        #[arg(short, long)]
        input: Option<String>,

        /// Enable verbose logging
        #[arg(short, long)]
        verbose: bool,
    },
    /// Serve the web chat page
    Serve {
        /// Address to listen on
        #[arg(long, env = "CAREER_GUIDE_ADDR", default_value = "127.0.0.1:8501")]
        addr: SocketAddr,

        /// Enable verbose logging
        #[arg(short, long)]
        verbose: bool,
    },
}

fn init_tracing(verbose: bool, default_level: &str) -> Result<()> {
    let level = if verbose { "debug" } else { default_level };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn connect_gemini(settings: &Settings) -> Result<Arc<dyn ModelClient>, ClientError> {
    Ok(Arc::new(GeminiClient::new(settings)?))
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Load environment variables from .env file
    dotenv().ok();

    let cli = Cli::parse();

    match &cli.command {
        Some(Commands::Serve { verbose, .. }) => init_tracing(*verbose, "info")?,
        Some(Commands::Chat { verbose, .. }) => init_tracing(*verbose, "warn")?,
        None => init_tracing(cli.verbose, "warn")?,
    }

    info!("Starting career guidance assistant");

    let model = match model::initialize(|name| env::var(name).ok(), connect_gemini) {
        Ok(model) => model,
        Err(e) => {
            error!("Startup failed: {}", e);
            eprintln!("{}", e);
            return Ok(ExitCode::FAILURE);
        }
    };

    match cli.command {
        Some(Commands::Serve { addr, .. }) => {
            web::serve(model, addr).await?;
            Ok(ExitCode::SUCCESS)
        }
        Some(Commands::Chat { input, .. }) => {
            let interactive = input.is_none();
            let mut chat_context = ChatContext::new(Box::new(io::stdout()), input, interactive, model);
            chat_context.run().await
        }
        None => {
            // Default to chat if no subcommand is provided
            let interactive = cli.input.is_none();
            let mut chat_context =
                ChatContext::new(Box::new(io::stdout()), cli.input, interactive, model);
            chat_context.run().await
        }
    }
}
