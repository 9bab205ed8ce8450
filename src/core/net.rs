// src/core/net.rs
// HTTP plumbing shared by the page fetcher and the Telegram channel.

use async_trait::async_trait;
use url::Url;

use crate::config::consts::{REQUEST_TIMEOUT, USER_AGENT};
use crate::error::NetError;

/// Build the one client every request goes through; it carries the timeout.
pub fn client() -> Result<reqwest::Client, NetError> {
    reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .user_agent(USER_AGENT)
        .build()
        .map_err(|source| NetError::Request { endpoint: s!("client"), source })
}

/// Source of raw page bodies.
#[async_trait]
pub trait PageFetcher {
    async fn fetch(&self, url: &Url) -> Result<String, NetError>;
}

pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<String, NetError> {
        let endpoint = url.to_string();
        let resp = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| NetError::Request { endpoint: endpoint.clone(), source })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(NetError::Status { endpoint, status: status.as_u16(), body });
        }

        resp.text()
            .await
            .map_err(|source| NetError::Decode { endpoint, source })
    }
}
