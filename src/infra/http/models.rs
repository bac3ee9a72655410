//! JSON envelopes shared by the server handlers and the CLI client.
//!
//! Every response carries `success`; successful responses add `data`,
//! `message`, or `count`, and failures add `error` plus optional
//! per-rule `details`.

use serde::{Deserialize, Serialize};

use crate::domain::posts::BlogPost;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub success: bool,
    pub message: String,
    pub timestamp: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PostListResponse {
    pub success: bool,
    pub data: Vec<BlogPost>,
    pub count: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PostResponse {
    pub success: bool,
    pub data: BlogPost,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PostMutationResponse {
    pub success: bool,
    pub message: String,
    pub data: BlogPost,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}
