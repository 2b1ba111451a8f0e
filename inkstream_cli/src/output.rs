use anyhow::Result;
use inkstream_lib::types::Blog;
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Clone, Debug)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Tabled, Serialize)]
struct BlogRow {
    #[tabled(rename = "Published")]
    #[serde(rename = "Published")]
    published: String,
    #[tabled(rename = "Title")]
    #[serde(rename = "Title")]
    title: String,
    #[tabled(rename = "Author")]
    #[serde(rename = "Author")]
    author: String,
    #[tabled(rename = "Tags")]
    #[serde(rename = "Tags")]
    tags: String,
    #[tabled(rename = "Views")]
    #[serde(rename = "Views")]
    views: u64,
}

fn build_blog_rows(blogs: &[Blog]) -> Vec<BlogRow> {
    blogs
        .iter()
        .map(|blog| BlogRow {
            published: blog
                .created_at_utc()
                .map(|t| t.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            title: blog.title.clone(),
            author: blog.author.name.clone(),
            tags: blog.tags.join(", "),
            views: blog.views,
        })
        .collect()
}

pub fn print_blogs(blogs: &[Blog], format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => {
            let mut table = Table::new(build_blog_rows(blogs));
            table.with(Style::rounded());
            println!("{}", table);
        }
        OutputFormat::Json => print_json(blogs)?,
    }
    Ok(())
}

pub fn print_blog_detail(blog: &Blog, format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => {
            println!("{}", blog.title);
            println!(
                "by {}{}",
                blog.author.name,
                blog.created_at_utc()
                    .map(|t| format!(" on {}", t.format("%Y-%m-%d")))
                    .unwrap_or_default()
            );
            if !blog.tags.is_empty() {
                println!("tags: {}", blog.tags.join(", "));
            }
            println!();
            println!("{}", blog.content);
        }
        OutputFormat::Json => print_json(blog)?,
    }
    Ok(())
}

pub fn print_tags(tags: &[String], format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => {
            for tag in tags {
                println!("{}", tag);
            }
        }
        OutputFormat::Json => print_json(tags)?,
    }
    Ok(())
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
