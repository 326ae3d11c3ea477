//! Durable record of outstanding bot notices.

use {
    async_trait::async_trait,
    pitwall_channels::{ChannelId, MessageId},
    serde::{Deserialize, Serialize},
};

use crate::{Category, Result};

/// A live bot message that a later notice may retract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EphemeralNotice {
    pub message_id: MessageId,
    pub channel_id: ChannelId,
    pub category: Category,
}

impl EphemeralNotice {
    pub fn new(message_id: MessageId, channel_id: ChannelId, category: Category) -> Self {
        Self {
            message_id,
            channel_id,
            category,
        }
    }

    /// Whether a new notice of `category` in `channel_id` retracts this one.
    pub fn is_superseded_by(&self, channel_id: ChannelId, category: Category) -> bool {
        self.channel_id == channel_id && self.category.is_superseded_by(category)
    }
}

/// Snapshot storage for [`EphemeralNotice`]s.
///
/// There are no partial updates: callers load the full snapshot, mutate it and
/// save it back.
#[async_trait]
pub trait NoticeRegistry: Send + Sync {
    /// Read the full snapshot. Unreadable content yields an empty list.
    async fn load(&self) -> Result<Vec<EphemeralNotice>>;

    /// Overwrite the full snapshot.
    async fn save(&self, notices: &[EphemeralNotice]) -> Result<()>;
}
