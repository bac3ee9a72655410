//! Handlers for the blog API surface.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::domain::validate::PostSubmission;

use super::error::ApiError;
use super::middleware::RequireApiKey;
use super::models::{HealthResponse, PostListResponse, PostMutationResponse, PostResponse};
use super::state::ApiState;

pub async fn health() -> impl IntoResponse {
    let timestamp = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_default();
    Json(HealthResponse {
        success: true,
        message: "Blog API is running".to_string(),
        timestamp,
    })
}

pub async fn list_posts(State(state): State<ApiState>) -> impl IntoResponse {
    let posts = state.posts.list().await;
    let count = posts.len();
    Json(PostListResponse {
        success: true,
        data: posts,
        count,
    })
}

pub async fn get_post(
    State(state): State<ApiState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    match state.posts.find_by_slug(&slug).await {
        Some(post) => Ok(Json(PostResponse {
            success: true,
            data: post,
        })),
        None => Err(ApiError::not_found("Blog post not found")),
    }
}

pub async fn create_post(
    State(state): State<ApiState>,
    _auth: RequireApiKey,
    Json(payload): Json<PostSubmission>,
) -> Result<impl IntoResponse, ApiError> {
    let post = state.posts.create(payload).await.map_err(|error| {
        ApiError::from_service(
            "infra::http::create_post",
            "Failed to create blog post",
            error,
        )
    })?;

    Ok((
        StatusCode::CREATED,
        Json(PostMutationResponse {
            success: true,
            message: "Blog post created successfully".to_string(),
            data: post,
        }),
    ))
}

pub async fn update_post(
    State(state): State<ApiState>,
    _auth: RequireApiKey,
    Path(id): Path<String>,
    Json(payload): Json<PostSubmission>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_post_id(&id)?;
    let post = state.posts.update(id, payload).await.map_err(|error| {
        ApiError::from_service(
            "infra::http::update_post",
            "Failed to update blog post",
            error,
        )
    })?;

    Ok(Json(PostMutationResponse {
        success: true,
        message: "Blog post updated successfully".to_string(),
        data: post,
    }))
}

pub async fn delete_post(
    State(state): State<ApiState>,
    _auth: RequireApiKey,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_post_id(&id)?;
    let post = state.posts.delete(id).await.map_err(|error| {
        ApiError::from_service(
            "infra::http::delete_post",
            "Failed to delete blog post",
            error,
        )
    })?;

    Ok(Json(PostMutationResponse {
        success: true,
        message: "Blog post deleted successfully".to_string(),
        data: post,
    }))
}

pub async fn endpoint_not_found() -> ApiError {
    ApiError::endpoint_not_found()
}

// A non-numeric id cannot name any post, so it reads as not-found rather
// than a malformed request.
fn parse_post_id(raw: &str) -> Result<u64, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::not_found("Blog post not found"))
}
