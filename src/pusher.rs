//! Delivery of the finished digest to a group-chat webhook.
//!
//! The webhook speaks the WeCom robot protocol: a JSON body with `msgtype`
//! and a matching content object, answered by `{"errcode": 0, ...}` on
//! success. Delivery is attempted once; there is no retry.

use crate::error::PushError;
use crate::utils::truncate_for_log;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::io::Write;
use std::time::Duration;
use tracing::{error, info, instrument};

/// Payload flavour understood by the webhook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageVariant {
    Text,
    Markdown,
}

impl MessageVariant {
    fn msgtype(self) -> &'static str {
        match self {
            MessageVariant::Text => "text",
            MessageVariant::Markdown => "markdown",
        }
    }
}

/// A sink for rendered digests.
pub trait Push {
    async fn send(&self, content: &str, variant: MessageVariant) -> Result<(), PushError>;
}

#[derive(Debug, Deserialize)]
struct WebhookResponse {
    errcode: i64,
    #[serde(default)]
    errmsg: String,
}

/// Posts digests to a chat webhook URL.
#[derive(Debug, Clone)]
pub struct WebhookPusher {
    client: Client,
    webhook_url: String,
}

impl WebhookPusher {
    pub fn new(webhook_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            webhook_url: webhook_url.to_string(),
        })
    }
}

fn payload(content: &str, variant: MessageVariant) -> serde_json::Value {
    let mut body = serde_json::Map::new();
    body.insert("msgtype".to_string(), json!(variant.msgtype()));
    body.insert(variant.msgtype().to_string(), json!({ "content": content }));
    serde_json::Value::Object(body)
}

impl Push for WebhookPusher {
    #[instrument(level = "info", skip(self, content), fields(bytes = content.len()))]
    async fn send(&self, content: &str, variant: MessageVariant) -> Result<(), PushError> {
        let response = self
            .client
            .post(&self.webhook_url)
            .json(&payload(content, variant))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            error!(status = status.as_u16(), "Webhook returned an error status");
            return Err(PushError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        let reply: WebhookResponse = match serde_json::from_str(&body) {
            Ok(reply) => reply,
            Err(e) => {
                error!(error = %e, body = %truncate_for_log(&body, 300), "Unreadable webhook reply");
                return Err(PushError::Rejected {
                    errcode: -1,
                    errmsg: format!("unreadable reply: {e}"),
                });
            }
        };

        if reply.errcode != 0 {
            error!(errcode = reply.errcode, errmsg = %reply.errmsg, "Webhook rejected message");
            return Err(PushError::Rejected {
                errcode: reply.errcode,
                errmsg: reply.errmsg,
            });
        }

        info!("Message sent successfully");
        Ok(())
    }
}

/// Prints digests to stdout instead of delivering them.
#[derive(Debug, Default)]
pub struct DryRunPusher;

impl Push for DryRunPusher {
    async fn send(&self, content: &str, variant: MessageVariant) -> Result<(), PushError> {
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "--- {} message ---", variant.msgtype())?;
        writeln!(stdout, "{content}")?;
        info!(bytes = content.len(), "Dry run: message printed, not sent");
        Ok(())
    }
}
