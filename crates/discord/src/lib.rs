//! Discord REST adapter for posting and retracting league notices.

pub mod mention;
pub mod outbound;

pub use {
    mention::{mentions, user_tag, user_tag_mobile, user_tags},
    outbound::DiscordOutbound,
};
