#![deny(clippy::all, clippy::pedantic)]

use blogd::infra::http::models::{
    HealthResponse, PostListResponse, PostMutationResponse, PostResponse,
};
use reqwest::Method;
use serde::Serialize;
use serde_json::json;

use crate::args::PostArgs;
use crate::client::{CliError, Ctx};

pub async fn health(ctx: &Ctx) -> Result<(), CliError> {
    let resp: HealthResponse = ctx.request(Method::GET, "/health").await?;
    print_json(&resp)
}

pub async fn list(ctx: &Ctx) -> Result<(), CliError> {
    let resp: PostListResponse = ctx.request(Method::GET, "/api/blogs").await?;
    print_json(&resp)
}

pub async fn get(ctx: &Ctx, slug: &str) -> Result<(), CliError> {
    let resp: PostResponse = ctx
        .request(Method::GET, &format!("/api/blogs/{slug}"))
        .await?;
    print_json(&resp)
}

pub async fn create(ctx: &Ctx, post: PostArgs) -> Result<(), CliError> {
    let body = submission_body(post)?;
    let resp: PostMutationResponse = ctx
        .request_with_key(Method::POST, "/api/blogs", Some(body))
        .await?;
    print_json(&resp)
}

pub async fn update(ctx: &Ctx, id: u64, post: PostArgs) -> Result<(), CliError> {
    let body = submission_body(post)?;
    let resp: PostMutationResponse = ctx
        .request_with_key(Method::PUT, &format!("/api/blogs/{id}"), Some(body))
        .await?;
    print_json(&resp)
}

pub async fn delete(ctx: &Ctx, id: u64) -> Result<(), CliError> {
    let resp: PostMutationResponse = ctx
        .request_with_key(Method::DELETE, &format!("/api/blogs/{id}"), None)
        .await?;
    print_json(&resp)
}

fn submission_body(post: PostArgs) -> Result<serde_json::Value, CliError> {
    let content = match (post.content, post.content_file) {
        (Some(content), _) => content,
        (None, Some(path)) => {
            std::fs::read_to_string(&path).map_err(|source| CliError::InputFile {
                path: path.display().to_string(),
                source,
            })?
        }
        (None, None) => String::new(),
    };

    let mut body = json!({
        "title": post.title,
        "excerpt": post.excerpt,
        "content": content,
        "tags": post.tags,
        "featured": post.featured,
    });
    if let Some(author) = post.author {
        body["author"] = json!(author);
    }
    if let Some(image) = post.image {
        body["image"] = json!(image);
    }
    Ok(body)
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    let out = serde_json::to_string_pretty(value)
        .map_err(|e| CliError::Server(format!("failed to render output: {e}")))?;
    println!("{out}");
    Ok(())
}
