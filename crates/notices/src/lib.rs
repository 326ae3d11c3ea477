//! Lifecycle of bot-authored status notices.
//!
//! Newer notices of certain categories retract the older notices they make
//! obsolete. Outstanding notices are kept in a durable registry
//! (`<data_dir>/temporary_discord_messages.json` by default) so retraction
//! survives restarts. Oversized content is split at formatting boundaries and
//! posted in order.

pub mod category;
pub mod error;
pub mod help;
pub mod pending;
pub mod registry;
pub mod registry_file;
pub mod registry_memory;
pub mod sender;
pub mod split;
#[cfg(test)]
mod test_support;

pub use {
    category::Category,
    error::{Error, Result},
    registry::{EphemeralNotice, NoticeRegistry},
    sender::{NotificationSender, SendOutcome},
};
