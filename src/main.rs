use std::sync::Arc;

use clap::Parser;
use color_eyre::{
    Result,
    eyre::{Context, eyre},
};
use geddit::{
    adapters::{Credentials, Md2Gemtext, RedditClientAdapter, ScgiServer, cli},
    config::{GatewayConfigValidator, load_from_env},
    core::Router,
    ports::{MarkdownConverter, RedditApi},
    tracing_setup,
};

#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Parser, Debug)]
enum Commands {
    /// Start the SCGI server
    Serve,
    /// Resolve a single URL and print the Gemini response to stdout
    Resolve {
        /// Request URL or bare path (e.g. "/r/rust")
        url: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();

    match args.command {
        Commands::Serve => tracing_setup::init_tracing()?,
        Commands::Resolve { .. } => tracing_setup::init_console_tracing()?,
    }

    let config = load_from_env().context("Failed to load configuration")?;
    GatewayConfigValidator::validate(&config)
        .map_err(|e| eyre!("Invalid configuration: {e}"))?;
    let config = Arc::new(config);

    let credentials = Credentials::load(&config.credentials_file)
        .context("Failed to load Reddit API credentials")?;
    let client: Arc<dyn RedditApi> =
        Arc::new(RedditClientAdapter::new(credentials).context("Failed to create Reddit client")?);
    let converter: Arc<dyn MarkdownConverter> = Arc::new(Md2Gemtext::new());
    let router = Arc::new(Router::new(config.clone(), client, converter));

    match args.command {
        Commands::Serve => {
            let socket = config.scgi_socket.clone().ok_or_else(|| {
                eyre!("GEDDIT_SCGI_SOCKET must be set to run the SCGI server")
            })?;
            tracing::info!(base_url = %config.base_url, "starting Geddit gateway");
            ScgiServer::new(router, socket).run().await
        }
        Commands::Resolve { url } => {
            let bytes = cli::resolve_target(&router, &url).await;
            use std::io::Write;
            std::io::stdout()
                .write_all(&bytes)
                .context("Failed to write response")?;
            Ok(())
        }
    }
}
