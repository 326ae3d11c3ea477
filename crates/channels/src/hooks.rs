//! Observers for chat input the command layer could not match.
//!
//! The command layer owns an [`UnknownCommandHooks`] and calls
//! [`UnknownCommandHooks::notify`] whenever a prefixed message does not map
//! to a known command. Observers are registered explicitly; there is no
//! process-wide event.

use std::sync::{Arc, RwLock};

use {
    async_trait::async_trait,
    tracing::{debug, warn},
};

use crate::{ChannelId, Result};

/// Reacts to a prefixed message that matched no command.
#[async_trait]
pub trait UnknownCommandObserver: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    async fn on_unknown_command(&self, channel_id: ChannelId) -> Result<()>;
}

/// Ordered set of [`UnknownCommandObserver`]s.
#[derive(Default)]
pub struct UnknownCommandHooks {
    observers: RwLock<Vec<Arc<dyn UnknownCommandObserver>>>,
}

impl UnknownCommandHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, observer: Arc<dyn UnknownCommandObserver>) {
        debug!(observer = observer.name(), "registering unknown-command observer");
        self.observers
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(observer);
    }

    pub fn len(&self) -> usize {
        self.observers.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run every observer in registration order.
    ///
    /// Observer failures are logged and do not stop later observers.
    /// Returns the number of observers that completed successfully.
    pub async fn notify(&self, channel_id: ChannelId) -> usize {
        let observers = self
            .observers
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone();

        let mut succeeded = 0;
        for observer in observers {
            match observer.on_unknown_command(channel_id).await {
                Ok(()) => succeeded += 1,
                Err(e) => {
                    warn!(
                        observer = observer.name(),
                        channel_id,
                        error = %e,
                        "unknown-command observer failed"
                    );
                },
            }
        }
        succeeded
    }
}
