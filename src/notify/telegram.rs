// src/notify/telegram.rs
//! Telegram Bot API channel.
//!
//! Posting uses `sendDocument` with the write token; Telegram downloads the
//! file from the URL itself. Reading uses `getUpdates` with the read token and
//! looks at the newest update only.

use async_trait::async_trait;
use serde::Deserialize;

use super::{Channel, document_ref};
use crate::config::Target;
use crate::config::consts::TELEGRAM_API;
use crate::error::NetError;

pub struct TelegramChannel {
    client: reqwest::Client,
    api_base: String,
}

impl TelegramChannel {
    pub fn new(client: reqwest::Client) -> Self {
        Self::with_api_base(client, TELEGRAM_API)
    }

    /// Point at a different Bot API server (self-hosted, or a mock in tests).
    pub fn with_api_base(client: reqwest::Client, api_base: &str) -> Self {
        Self { client, api_base: s!(api_base.trim_end_matches('/')) }
    }

    fn method_url(&self, token: &str, method: &str) -> String {
        join!(&self.api_base, "/bot", token, "/", method)
    }

    async fn call(
        &self,
        token: &str,
        method: &'static str,
        query: &[(&str, &str)],
    ) -> Result<reqwest::Response, NetError> {
        let endpoint = join!("telegram ", method);
        let resp = self
            .client
            .get(self.method_url(token, method))
            .query(query)
            .send()
            .await
            .map_err(|e| NetError::Request { endpoint: endpoint.clone(), source: e.without_url() })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(NetError::Status { endpoint, status: status.as_u16(), body });
        }
        Ok(resp)
    }
}

#[async_trait]
impl Channel for TelegramChannel {
    async fn send_document(&self, target: &Target, value: &str) -> Result<(), NetError> {
        let document = document_ref(&target.website, value);
        let creds = &target.channel;
        self.call(
            &creds.bot_token,
            "sendDocument",
            &[("chat_id", creds.chat_id.as_str()), ("document", document.as_str())],
        )
        .await?;
        logd!("`{}`: sendDocument accepted {}", target.name, document);
        Ok(())
    }

    async fn read_last(&self, target: &Target) -> Result<Option<String>, NetError> {
        let creds = &target.channel;
        let resp = self
            .call(&creds.read_bot_token, "getUpdates", &[("chat_id", creds.chat_id.as_str())])
            .await?;
        let updates: Updates = resp.json().await.map_err(|e| NetError::Decode {
            endpoint: s!("telegram getUpdates"),
            source: e.without_url(),
        })?;
        Ok(last_acknowledgment(updates))
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct Updates {
    #[serde(default)]
    result: Vec<Update>,
}

#[derive(Debug, Deserialize)]
struct Update {
    channel_post: Option<Post>,
    message: Option<Post>,
}

#[derive(Debug, Deserialize)]
struct Post {
    text: Option<String>,
    document: Option<DocumentInfo>,
}

#[derive(Debug, Deserialize)]
struct DocumentInfo {
    file_name: Option<String>,
}

/// Newest update's text, else its document's file name.
pub fn last_acknowledgment(updates: Updates) -> Option<String> {
    let last = updates.result.into_iter().last()?;
    let post = last.channel_post.or(last.message)?;
    post.text
        .filter(|t| !t.is_empty())
        .or_else(|| post.document.and_then(|d| d.file_name))
}
