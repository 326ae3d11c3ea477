use std::time::Duration;

use {
    async_trait::async_trait,
    reqwest::{StatusCode, header},
    secrecy::{ExposeSecret, Secret},
    serde::Deserialize,
    tracing::{debug, warn},
};

use {
    pitwall_channels::{ChannelId, DeleteOutcome, Error, MessageId, MessagePlatform, Result},
    pitwall_config::DiscordConfig,
};

const USER_AGENT: &str = concat!(
    "DiscordBot (https://github.com/pitwall-league/pitwall, ",
    env!("CARGO_PKG_VERSION"),
    ")"
);

/// Posts and deletes channel messages through the Discord REST API.
pub struct DiscordOutbound {
    http: reqwest::Client,
    api_base: String,
    token: Secret<String>,
    char_limit: usize,
}

#[derive(Deserialize)]
struct CreatedMessage {
    id: String,
}

impl DiscordOutbound {
    pub fn new(config: &DiscordConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        if config.timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(config.timeout_secs));
        }
        let http = builder
            .build()
            .map_err(|e| Error::external("build discord http client", e))?;

        Ok(Self {
            http,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            token: config.token.clone(),
            char_limit: config.char_limit.max(1),
        })
    }

    fn authorization(&self) -> String {
        format!("Bot {}", self.token.expose_secret())
    }

    fn messages_url(&self, channel_id: ChannelId) -> String {
        format!("{}/channels/{channel_id}/messages", self.api_base)
    }
}

async fn rejection(action: &str, resp: reqwest::Response) -> Error {
    let status = resp.status();
    let retry_after = resp
        .headers()
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    let body = resp.text().await.unwrap_or_default();
    match retry_after {
        Some(secs) if status == StatusCode::TOO_MANY_REQUESTS => Error::unavailable(format!(
            "discord {action} rate limited (retry after {secs}s): {body}"
        )),
        _ => Error::unavailable(format!("discord {action} failed ({status}): {body}")),
    }
}

#[async_trait]
impl MessagePlatform for DiscordOutbound {
    async fn send_message(&self, channel_id: ChannelId, text: &str) -> Result<MessageId> {
        let resp = self
            .http
            .post(self.messages_url(channel_id))
            .header(header::AUTHORIZATION, self.authorization())
            .json(&serde_json::json!({ "content": text }))
            .send()
            .await
            .map_err(|e| Error::external("discord send", e))?;
        if !resp.status().is_success() {
            return Err(rejection("send", resp).await);
        }

        let created: CreatedMessage = resp
            .json()
            .await
            .map_err(|e| Error::external("decode discord message", e))?;
        let message_id = created.id.parse::<MessageId>()?;
        debug!(channel_id, message_id, chars = text.chars().count(), "posted discord message");
        Ok(message_id)
    }

    async fn delete_message(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
    ) -> Result<DeleteOutcome> {
        let url = format!("{}/{message_id}", self.messages_url(channel_id));
        let resp = self
            .http
            .delete(url)
            .header(header::AUTHORIZATION, self.authorization())
            .send()
            .await
            .map_err(|e| Error::external("discord delete", e))?;

        let status = resp.status();
        if status.is_success() {
            debug!(channel_id, message_id, "deleted discord message");
            return Ok(DeleteOutcome::Deleted);
        }
        if status == StatusCode::NOT_FOUND {
            warn!(channel_id, message_id, "discord message was already deleted");
            return Ok(DeleteOutcome::AlreadyGone);
        }
        Err(rejection("delete", resp).await)
    }

    fn message_limit(&self) -> usize {
        self.char_limit
    }
}
