//! Recording fakes shared by the unit tests.

use std::{
    collections::HashSet,
    sync::{
        Arc, Mutex,
        atomic::{AtomicU64, AtomicUsize, Ordering},
    },
};

use {
    async_trait::async_trait,
    pitwall_channels::{ChannelId, DeleteOutcome, MessageId, MessagePlatform},
};

use crate::{
    Error, Result,
    registry::{EphemeralNotice, NoticeRegistry},
    registry_memory::InMemoryRegistry,
};

/// One observable side effect, in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Delete(MessageId),
    Send(String),
    Save(Vec<MessageId>),
}

pub type Journal = Arc<Mutex<Vec<Event>>>;

pub fn journal() -> Journal {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn events(journal: &Journal) -> Vec<Event> {
    journal.lock().unwrap_or_else(|e| e.into_inner()).clone()
}

pub struct FakePlatform {
    journal: Journal,
    limit: usize,
    next_id: AtomicU64,
    sends: AtomicUsize,
    /// Messages that were removed by someone else.
    pub gone: HashSet<MessageId>,
    /// Messages whose deletion fails with a platform error.
    pub failing_deletes: HashSet<MessageId>,
    /// Zero-based send attempt that fails.
    pub fail_send_at: Option<usize>,
}

impl FakePlatform {
    /// Message ids are handed out from 1000 upwards.
    pub fn new(journal: &Journal, limit: usize) -> Self {
        Self {
            journal: Arc::clone(journal),
            limit,
            next_id: AtomicU64::new(1000),
            sends: AtomicUsize::new(0),
            gone: HashSet::new(),
            failing_deletes: HashSet::new(),
            fail_send_at: None,
        }
    }

    fn record(&self, event: Event) {
        self.journal
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(event);
    }
}

#[async_trait]
impl MessagePlatform for FakePlatform {
    async fn send_message(
        &self,
        _channel_id: ChannelId,
        text: &str,
    ) -> pitwall_channels::Result<MessageId> {
        tokio::task::yield_now().await;
        let attempt = self.sends.fetch_add(1, Ordering::SeqCst);
        if self.fail_send_at == Some(attempt) {
            return Err(pitwall_channels::Error::unavailable("HTTP 502"));
        }
        self.record(Event::Send(text.to_string()));
        Ok(self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    async fn delete_message(
        &self,
        _channel_id: ChannelId,
        message_id: MessageId,
    ) -> pitwall_channels::Result<DeleteOutcome> {
        tokio::task::yield_now().await;
        if self.failing_deletes.contains(&message_id) {
            return Err(pitwall_channels::Error::unavailable("HTTP 500"));
        }
        self.record(Event::Delete(message_id));
        if self.gone.contains(&message_id) {
            Ok(DeleteOutcome::AlreadyGone)
        } else {
            Ok(DeleteOutcome::Deleted)
        }
    }

    fn message_limit(&self) -> usize {
        self.limit
    }
}

/// In-memory registry that writes each successful save into the journal.
pub struct JournaledRegistry {
    pub inner: InMemoryRegistry,
    journal: Journal,
    saves: AtomicUsize,
    /// Zero-based save attempt that fails with an IO error.
    pub fail_save_at: Option<usize>,
}

impl JournaledRegistry {
    pub fn new(journal: &Journal, notices: Vec<EphemeralNotice>) -> Self {
        Self {
            inner: InMemoryRegistry::with_notices(notices),
            journal: Arc::clone(journal),
            saves: AtomicUsize::new(0),
            fail_save_at: None,
        }
    }
}

#[async_trait]
impl NoticeRegistry for JournaledRegistry {
    async fn load(&self) -> Result<Vec<EphemeralNotice>> {
        self.inner.load().await
    }

    async fn save(&self, notices: &[EphemeralNotice]) -> Result<()> {
        let attempt = self.saves.fetch_add(1, Ordering::SeqCst);
        if self.fail_save_at == Some(attempt) {
            return Err(Error::registry_io(
                "registry.json",
                std::io::Error::new(std::io::ErrorKind::StorageFull, "disk full"),
            ));
        }
        self.journal
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(Event::Save(notices.iter().map(|n| n.message_id).collect()));
        self.inner.save(notices).await
    }
}
