//! Command-line surface for `blogd-cli`.

#![deny(clippy::all, clippy::pedantic)]

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "blogd-cli", version, about = "Headless client for the blogd API", long_about = None)]
pub struct Cli {
    /// API base URL, e.g. <http://127.0.0.1:3001>
    #[arg(long, env = "BLOGD_SITE_URL")]
    pub site: Option<String>,

    /// Shared API key (only needed for create/update/delete)
    #[arg(long, env = "BLOGD_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check that the API is up
    Health,
    /// List every blog post
    List,
    /// Fetch a single post by slug
    Get { slug: String },
    /// Create a post
    Create(PostArgs),
    /// Replace a post's fields by id
    Update {
        id: u64,
        #[command(flatten)]
        post: PostArgs,
    },
    /// Delete a post by id
    Delete { id: u64 },
}

#[derive(Args, Debug)]
pub struct PostArgs {
    #[arg(long)]
    pub title: String,

    #[arg(long)]
    pub excerpt: String,

    /// Post body, inline
    #[arg(long, conflicts_with = "content_file")]
    pub content: Option<String>,

    /// Post body, read from a file
    #[arg(long, value_name = "PATH")]
    pub content_file: Option<PathBuf>,

    #[arg(long)]
    pub author: Option<String>,

    /// May be repeated
    #[arg(long = "tag", value_name = "TAG")]
    pub tags: Vec<String>,

    #[arg(long)]
    pub featured: bool,

    #[arg(long)]
    pub image: Option<String>,
}
