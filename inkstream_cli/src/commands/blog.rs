//! The `blog` subcommand: shows one post by slug.

use anyhow::Result;
use clap::Args;
use inkstream_lib::{validation, Client};

use crate::output::{print_blog_detail, OutputFormat};

/// Arguments for the `blog` subcommand.
#[derive(Args)]
pub struct BlogArgs {
    /// Slug of the post to show
    pub slug: String,
}

pub async fn run(args: &BlogArgs, client: &Client, format: &OutputFormat) -> Result<()> {
    let slug = validation::validate_slug(&args.slug)?;
    let blog = client.get_blog_by_slug(&slug).await?;
    print_blog_detail(&blog, format)
}
