//! Platform-neutral messaging seams.
//!
//! A chat platform (Discord today) implements [`MessagePlatform`] so the
//! notice lifecycle can post and retract bot messages without knowing the
//! transport. Unknown-command observers live in [`hooks`].

pub mod error;
pub mod hooks;
pub mod platform;

pub use {
    error::{Error, Result},
    hooks::{UnknownCommandHooks, UnknownCommandObserver},
    platform::{ChannelId, DeleteOutcome, MessageId, MessagePlatform},
};
