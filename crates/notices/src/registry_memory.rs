//! In-memory registry for tests and dry runs.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::{
    Result,
    registry::{EphemeralNotice, NoticeRegistry},
};

/// Registry backed by a `Vec`. No persistence.
#[derive(Default)]
pub struct InMemoryRegistry {
    notices: Mutex<Vec<EphemeralNotice>>,
}

impl InMemoryRegistry {
    pub fn with_notices(notices: Vec<EphemeralNotice>) -> Self {
        Self {
            notices: Mutex::new(notices),
        }
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> Vec<EphemeralNotice> {
        self.notices
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl NoticeRegistry for InMemoryRegistry {
    async fn load(&self) -> Result<Vec<EphemeralNotice>> {
        Ok(self.snapshot())
    }

    async fn save(&self, notices: &[EphemeralNotice]) -> Result<()> {
        *self.notices.lock().unwrap_or_else(|e| e.into_inner()) = notices.to_vec();
        Ok(())
    }
}
