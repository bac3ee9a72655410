use std::sync::Arc;

use crate::application::posts::PostService;

use super::rate_limit::ApiRateLimiter;

#[derive(Clone)]
pub struct ApiState {
    pub posts: Arc<PostService>,
    /// The static shared secret mutating requests must present.
    pub api_key: Arc<str>,
    pub rate_limiter: Arc<ApiRateLimiter>,
}
