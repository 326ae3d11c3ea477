//! Send notices and retract the ones they make obsolete.
//!
//! One call runs in this order:
//!
//! 1. load the registry, delete every notice in the channel that the new
//!    category supersedes (newest first), save the registry;
//! 2. split the content and post the chunks one after another;
//! 3. if the category is trackable, reload the registry, append one entry per
//!    posted chunk and save it again.
//!
//! A call holds its channel's lock from step 1 to step 3, so two notices for
//! the same channel never interleave. Steps 1 and 3 also hold the registry
//! lock, which keeps calls on different channels from overwriting each
//! other's registry updates.

use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use {
    pitwall_channels::{ChannelId, DeleteOutcome, MessageId, MessagePlatform},
    tokio::sync::{Mutex, OwnedMutexGuard},
    tracing::{debug, info, warn},
};

use crate::{
    Category, Error, Result,
    registry::{EphemeralNotice, NoticeRegistry},
    split::split_content,
};

/// What a [`NotificationSender::send_notification`] call did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SendOutcome {
    /// Superseded notices that were removed from the channel, in deletion
    /// order.
    pub deleted: Vec<MessageId>,
    /// Superseded notices that had already disappeared.
    pub already_gone: Vec<MessageId>,
    /// Messages posted for the new content, in channel order.
    pub sent: Vec<MessageId>,
    /// Whether the posted messages were recorded in the registry.
    pub tracked: bool,
}

impl SendOutcome {
    /// True when nothing was deleted or sent (empty content).
    pub fn is_noop(&self) -> bool {
        self.deleted.is_empty() && self.already_gone.is_empty() && self.sent.is_empty()
    }
}

/// The single entry point the command layer uses to post status notices.
pub struct NotificationSender {
    platform: Arc<dyn MessagePlatform>,
    registry: Arc<dyn NoticeRegistry>,
    registry_lock: Mutex<()>,
    channel_locks: std::sync::Mutex<HashMap<ChannelId, Arc<Mutex<()>>>>,
}

impl NotificationSender {
    pub fn new(platform: Arc<dyn MessagePlatform>, registry: Arc<dyn NoticeRegistry>) -> Self {
        Self {
            platform,
            registry,
            registry_lock: Mutex::new(()),
            channel_locks: std::sync::Mutex::new(HashMap::new()),
        }
    }

    async fn lock_channel(&self, channel_id: ChannelId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.channel_locks.lock().unwrap_or_else(|e| e.into_inner());
            Arc::clone(locks.entry(channel_id).or_default())
        };
        lock.lock_owned().await
    }

    /// Post `content` into `channel_id` as a notice of `category`.
    ///
    /// Empty content is a successful no-op. A failed chunk aborts the rest;
    /// chunks posted before the failure stay tracked and the error is
    /// returned.
    pub async fn send_notification(
        &self,
        content: &str,
        channel_id: ChannelId,
        category: Category,
    ) -> Result<SendOutcome> {
        let mut outcome = SendOutcome::default();
        if content.is_empty() {
            debug!(channel_id, %category, "empty notice, nothing to send");
            return Ok(outcome);
        }

        let _channel_guard = self.lock_channel(channel_id).await;

        self.retract_superseded(channel_id, category, &mut outcome)
            .await?;

        let chunks = split_content(content, self.platform.message_limit());
        let total = chunks.len();
        let mut send_error = None;
        for (index, chunk) in chunks.into_iter().enumerate() {
            match self.platform.send_message(channel_id, chunk).await {
                Ok(message_id) => {
                    debug!(
                        channel_id,
                        message_id,
                        chunk = index + 1,
                        total,
                        "notice chunk sent"
                    );
                    outcome.sent.push(message_id);
                },
                Err(e) => {
                    send_error = Some(Error::platform(
                        format!("send chunk {}/{total} to channel {channel_id}", index + 1),
                        e,
                    ));
                    break;
                },
            }
        }

        if category.is_trackable() && !outcome.sent.is_empty() {
            match self.record_sent(channel_id, category, &outcome.sent).await {
                Ok(()) => outcome.tracked = true,
                // The send failure is the one the caller needs to see.
                Err(e) if send_error.is_some() => {
                    warn!(channel_id, %category, error = %e, "failed to record partially sent notice");
                },
                Err(e) => return Err(e),
            }
        }

        if let Some(e) = send_error {
            return Err(e);
        }

        info!(
            channel_id,
            %category,
            sent = outcome.sent.len(),
            deleted = outcome.deleted.len(),
            tracked = outcome.tracked,
            "notice sent"
        );
        Ok(outcome)
    }

    /// Delete superseded notices in `channel_id` and persist the registry
    /// without them.
    async fn retract_superseded(
        &self,
        channel_id: ChannelId,
        category: Category,
        outcome: &mut SendOutcome,
    ) -> Result<()> {
        let _guard = self.registry_lock.lock().await;

        let notices = self.registry.load().await?;
        let superseded: Vec<EphemeralNotice> = notices
            .iter()
            .filter(|notice| notice.is_superseded_by(channel_id, category))
            .copied()
            .collect();

        let mut removed = HashSet::new();
        let mut failure = None;
        for notice in superseded.iter().rev() {
            match self
                .platform
                .delete_message(channel_id, notice.message_id)
                .await
            {
                Ok(DeleteOutcome::Deleted) => {
                    debug!(channel_id, message_id = notice.message_id, old = %notice.category, "superseded notice deleted");
                    outcome.deleted.push(notice.message_id);
                    removed.insert(*notice);
                },
                Ok(DeleteOutcome::AlreadyGone) => {
                    debug!(channel_id, message_id = notice.message_id, "superseded notice already gone");
                    outcome.already_gone.push(notice.message_id);
                    removed.insert(*notice);
                },
                Err(e) => {
                    failure = Some(Error::platform(
                        format!("delete message {} in channel {channel_id}", notice.message_id),
                        e,
                    ));
                    break;
                },
            }
        }
        // Whatever was not removed stays registered for the next call.
        let kept: Vec<EphemeralNotice> = notices
            .into_iter()
            .filter(|notice| !removed.contains(notice))
            .collect();

        self.registry.save(&kept).await?;
        match failure {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Append one registry entry per posted message.
    async fn record_sent(
        &self,
        channel_id: ChannelId,
        category: Category,
        sent: &[MessageId],
    ) -> Result<()> {
        let _guard = self.registry_lock.lock().await;

        let mut notices = self.registry.load().await?;
        notices.extend(
            sent.iter()
                .map(|&message_id| EphemeralNotice::new(message_id, channel_id, category)),
        );
        self.registry.save(&notices).await
    }
}
