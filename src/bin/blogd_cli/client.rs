#![deny(clippy::all, clippy::pedantic)]

use reqwest::{Client, Method, Response, Url};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::args::Cli;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("site URL is required (use --site or BLOGD_SITE_URL)")]
    MissingSite,
    #[error("api key is required for this command (use --api-key or BLOGD_API_KEY)")]
    MissingKey,
    #[error("failed to read input file {path}: {source}")]
    InputFile {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server error: {0}")]
    Server(String),
}

#[derive(Clone, Debug)]
pub struct Ctx {
    pub client: Client,
    pub base: Url,
    pub key: Option<String>,
}

impl Ctx {
    pub fn new(site: &str, key: Option<String>) -> Result<Self, CliError> {
        let base = Url::parse(site)?.join("/")?;
        let client = Client::builder().user_agent(Self::user_agent()).build()?;
        Ok(Self { client, base, key })
    }

    pub fn user_agent() -> &'static str {
        concat!("blogd-cli/", env!("CARGO_PKG_VERSION"))
    }

    pub fn url(&self, path: &str) -> Result<Url, CliError> {
        self.base.join(path).map_err(CliError::Url)
    }

    /// Unauthenticated request (health, list, get).
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
    ) -> Result<T, CliError> {
        let resp = self.client.request(method, self.url(path)?).send().await?;
        Self::handle(resp).await
    }

    /// Authenticated request; mutating endpoints require the shared key.
    pub async fn request_with_key<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<T, CliError> {
        let key = self.key.as_deref().ok_or(CliError::MissingKey)?;

        let mut req = self
            .client
            .request(method, self.url(path)?)
            .header("x-api-key", key);
        if let Some(body) = body {
            req = req.json(&body);
        }

        let resp = req.send().await?;
        Self::handle(resp).await
    }

    async fn handle<T: DeserializeOwned>(resp: Response) -> Result<T, CliError> {
        let status = resp.status();
        let bytes = resp.bytes().await?;
        if !status.is_success() {
            let text = String::from_utf8_lossy(&bytes).into_owned();
            return Err(CliError::Server(format!("status {status} body {text}")));
        }
        serde_json::from_slice(&bytes)
            .map_err(|e| CliError::Server(format!("failed to parse body: {e}")))
    }
}

pub fn build_ctx_from_cli(cli: &Cli) -> Result<Ctx, CliError> {
    let site = cli.site.clone().ok_or(CliError::MissingSite)?;
    Ctx::new(&site, cli.api_key.clone())
}
