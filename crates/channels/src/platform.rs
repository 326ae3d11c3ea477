use async_trait::async_trait;

use crate::Result;

/// Platform channel identifier (Discord snowflake).
pub type ChannelId = u64;

/// Platform message identifier (Discord snowflake).
pub type MessageId = u64;

/// Result of a delete request that reached the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The message existed and was removed.
    Deleted,
    /// The message was already gone, e.g. removed by hand. Callers treat this
    /// as success.
    AlreadyGone,
}

/// Send and retract plain-text messages on a chat platform.
///
/// Implementations must not retry internally and must report a missing
/// message on delete as [`DeleteOutcome::AlreadyGone`] rather than an error.
#[async_trait]
pub trait MessagePlatform: Send + Sync {
    /// Post `text` into `channel_id` and return the id of the created message.
    async fn send_message(&self, channel_id: ChannelId, text: &str) -> Result<MessageId>;

    /// Delete a previously posted message.
    async fn delete_message(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
    ) -> Result<DeleteOutcome>;

    /// Maximum number of characters a single message may carry.
    fn message_limit(&self) -> usize;
}
