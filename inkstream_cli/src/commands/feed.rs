//! The `feed` subcommand: pages through the public feed.

use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use inkstream_lib::{validation, Client, FeedController};

use crate::output::{print_blogs, OutputFormat};

/// Arguments for the `feed` subcommand.
#[derive(Args)]
pub struct FeedArgs {
    /// Only posts carrying this tag
    #[arg(long)]
    pub tag: Option<String>,

    /// How many pages to accumulate
    #[arg(long, default_value_t = 1)]
    pub pages: u32,
}

pub async fn run(args: &FeedArgs, client: Arc<Client>, format: &OutputFormat) -> Result<()> {
    let controller = FeedController::new(client);
    if let Some(tag) = &args.tag {
        controller.set_filter(Some(validation::validate_tag(tag)?));
    }

    controller.refresh().await?;
    for _ in 1..args.pages {
        if !controller.has_more() {
            break;
        }
        controller.load_more().await?;
    }

    let items = controller.items();
    if items.is_empty() {
        match &args.tag {
            Some(tag) => println!("No blogs found with tag \"{}\"", tag),
            None => println!("No blogs published yet."),
        }
        return Ok(());
    }
    print_blogs(&items, format)
}
