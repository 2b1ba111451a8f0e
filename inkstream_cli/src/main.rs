mod commands;
mod output;

use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use inkstream_lib::{Client, RateLimitCoordinator};

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "inkstream")]
#[command(about = "Read and publish Inkstream blog posts from the terminal")]
struct Cli {
    /// Output format: table or json
    #[arg(long, default_value = "table", global = true)]
    output: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the public feed
    Feed(commands::feed::FeedArgs),
    /// Show a single post by slug
    Blog(commands::blog::BlogArgs),
    /// Search tags for autocomplete
    Tags(commands::tags::TagsArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("inkstream=info".parse().unwrap()),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let format = match cli.output.as_str() {
        "json" => OutputFormat::Json,
        _ => OutputFormat::Table,
    };

    let coordinator = RateLimitCoordinator::new();
    coordinator.register_handler(|state| {
        if state.is_blocking {
            match state.remaining {
                Some(remaining) => eprintln!("Rate limited. Retry in {}s.", remaining),
                None => eprintln!("Rate limited. Please wait before trying again."),
            }
        }
    });

    let base_url = std::env::var("INKSTREAM_API_BASE_URL")
        .unwrap_or_else(|_| "https://api.inkstream.app/api".to_string());
    let client = Client::with_base_url(&base_url)
        .with_rate_limit_sink(Arc::new(coordinator.clone()));
    if let Ok(token) = std::env::var("INKSTREAM_TOKEN") {
        client.set_token(&token);
    }
    let client = Arc::new(client);

    match &cli.command {
        Commands::Feed(args) => commands::feed::run(args, Arc::clone(&client), &format).await?,
        Commands::Blog(args) => commands::blog::run(args, &client, &format).await?,
        Commands::Tags(args) => commands::tags::run(args, &client, &format).await?,
    }

    Ok(())
}
