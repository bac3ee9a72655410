//! blogd-cli: headless client for the blogd API.
//! Reuses the server's response envelopes so output matches the wire shape.
#![deny(clippy::all, clippy::pedantic)]

mod args;
mod client;
mod handlers;

use clap::Parser;

use args::{Cli, Commands};
use client::{CliError, build_ctx_from_cli};

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    let ctx = build_ctx_from_cli(&cli)?;

    match cli.command {
        Commands::Health => handlers::health(&ctx).await?,
        Commands::List => handlers::list(&ctx).await?,
        Commands::Get { slug } => handlers::get(&ctx, &slug).await?,
        Commands::Create(post) => handlers::create(&ctx, post).await?,
        Commands::Update { id, post } => handlers::update(&ctx, id, post).await?,
        Commands::Delete { id } => handlers::delete(&ctx, id).await?,
    }

    Ok(())
}
