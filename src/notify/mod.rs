// src/notify/mod.rs
//! Messaging channel seam: post a file, read back the last acknowledgment.

pub mod telegram;

use async_trait::async_trait;
use url::Url;

use crate::config::Target;
use crate::error::NetError;

pub use telegram::TelegramChannel;

#[async_trait]
pub trait Channel {
    /// Post `value` (as extracted, possibly relative) to the target's channel.
    async fn send_document(&self, target: &Target, value: &str) -> Result<(), NetError>;

    /// Text or file name of the latest message on the target's channel, if any.
    async fn read_last(&self, target: &Target) -> Result<Option<String>, NetError>;
}

/// Resolve an extracted reference against the page it came from.
/// Anything that does not join cleanly is passed through unchanged.
pub fn document_ref(base: &Url, value: &str) -> String {
    match base.join(value) {
        Ok(url) if !value.is_empty() => url.to_string(),
        _ => s!(value),
    }
}
