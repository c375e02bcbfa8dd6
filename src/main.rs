use anyhow::Result;
use clap::Parser;
use tracing::info;

use shopscout::chat;
use shopscout::classify::QuestionStyle;
use shopscout::config::{ClientConfig, ServerConfig, DEFAULT_PORT};
use shopscout::server;

// Define the command-line interface structure using clap
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Start the advisory web server.
    Serve {
        #[arg(long, default_value_t = DEFAULT_PORT, help = "Port for the advisory server.")]
        port: u16,
    },
    /// Engage in a text-based chat session against a running advisory server.
    Chat {
        #[arg(long, env = "SHOPSCOUT_SERVER", help = "Base URL of the advisory server.")]
        server: Option<String>,
        #[arg(long, help = "Language code for this session (overrides the saved preference).")]
        language: Option<String>,
        #[arg(long, help = "Use fixed multiple-choice menus instead of splitting questions.")]
        menus: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (for environment variables like API keys)
    dotenvy::dotenv().ok();

    // Reads log level from RUST_LOG (e.g. RUST_LOG=info,shopscout=debug)
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    info!("ShopScout starting with command: {:?}", cli.command);

    match cli.command {
        Commands::Serve { port } => {
            let config = ServerConfig::from_env(port);
            if config.gemini_api_key.is_none() {
                // Not fatal at startup; each request will answer with a
                // configuration error until the key is provided.
                tracing::warn!("GEMINI_API_KEY is not set");
            }
            server::start_server(config).await?;
        }
        Commands::Chat {
            server,
            language,
            menus,
        } => {
            let style = if menus {
                QuestionStyle::FixedMenu
            } else {
                QuestionStyle::SplitSentences
            };
            let config = ClientConfig::from_env(server, language);
            chat::run_chat(config, style).await?;
        }
    }

    Ok(())
}
