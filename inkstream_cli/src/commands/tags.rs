//! The `tags` subcommand: tag autocomplete lookup.

use anyhow::Result;
use clap::Args;
use inkstream_lib::{validation, Client};

use crate::output::{print_tags, OutputFormat};

/// Arguments for the `tags` subcommand.
#[derive(Args)]
pub struct TagsArgs {
    /// Search term
    pub query: String,
}

pub async fn run(args: &TagsArgs, client: &Client, format: &OutputFormat) -> Result<()> {
    let query = validation::validate_search(&args.query)?;
    let tags = client.search_tags(&query).await?;
    if tags.is_empty() {
        println!("No matching tags.");
        return Ok(());
    }
    print_tags(&tags, format)
}
