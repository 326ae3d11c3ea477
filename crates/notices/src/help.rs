//! Post a command overview when a user types something the bot does not know.

use std::{
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};

use {
    async_trait::async_trait,
    pitwall_channels::{ChannelId, UnknownCommandObserver},
    tracing::debug,
};

use crate::{Category, NotificationSender};

/// Sends a help text as a [`Category::Commands`] notice, at most once per
/// cooldown window across all channels.
///
/// Because the help is a `Commands` notice, the next help (or any status
/// notice) in the channel retracts the previous one.
pub struct CommandHelpObserver {
    sender: Arc<NotificationSender>,
    help_text: String,
    cooldown: Duration,
    last_sent: Mutex<Option<Instant>>,
}

impl CommandHelpObserver {
    pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(1);

    pub fn new(sender: Arc<NotificationSender>, help_text: impl Into<String>) -> Self {
        Self {
            sender,
            help_text: help_text.into(),
            cooldown: Self::DEFAULT_COOLDOWN,
            last_sent: Mutex::new(None),
        }
    }

    pub fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = cooldown;
        self
    }

    /// Take the current window if nobody has used it yet.
    fn try_claim(&self) -> bool {
        let mut last = self.last_sent.lock().unwrap_or_else(|e| e.into_inner());
        let now = Instant::now();
        if last.is_some_and(|at| now.duration_since(at) < self.cooldown) {
            return false;
        }
        *last = Some(now);
        true
    }
}

#[async_trait]
impl UnknownCommandObserver for CommandHelpObserver {
    fn name(&self) -> &str {
        "command-help"
    }

    async fn on_unknown_command(&self, channel_id: ChannelId) -> pitwall_channels::Result<()> {
        if !self.try_claim() {
            debug!(channel_id, "command help suppressed by cooldown");
            return Ok(());
        }
        self.sender
            .send_notification(&self.help_text, channel_id, Category::Commands)
            .await
            .map_err(|e| pitwall_channels::Error::external("send command help", e))?;
        Ok(())
    }
}
