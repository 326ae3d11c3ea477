//! JSON file-backed notice registry with atomic writes.

use std::{
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};

use {
    async_trait::async_trait,
    serde::Serialize,
    tempfile::NamedTempFile,
    tokio::fs,
    tracing::{debug, warn},
};

use crate::{
    Error, Result,
    registry::{EphemeralNotice, NoticeRegistry},
};

/// Default snapshot file name inside the data directory.
pub const DEFAULT_REGISTRY_FILE: &str = "temporary_discord_messages.json";

/// Registry stored as one pretty-printed JSON array.
pub struct FileRegistry {
    path: PathBuf,
}

impl FileRegistry {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Registry at `<data_dir>/temporary_discord_messages.json`.
    pub fn in_data_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join(DEFAULT_REGISTRY_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn write_snapshot(&self, notices: &[EphemeralNotice]) -> Result<()> {
        write_json_atomic(&self.path, &notices).await
    }
}

/// Atomic write: pretty JSON to a uniquely named temp file in the target's
/// directory, then rename over the target. Concurrent writers never share a
/// temp file; the last rename wins.
pub(crate) async fn write_json_atomic(path: &Path, value: &impl Serialize) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&dir)
        .await
        .map_err(|e| Error::registry_io(&dir, e))?;

    let json = serde_json::to_string_pretty(value)?;
    let target = path.to_path_buf();
    tokio::task::spawn_blocking(move || -> Result<()> {
        let mut tmp =
            NamedTempFile::new_in(&dir).map_err(|e| Error::registry_io(&dir, e))?;
        tmp.write_all(json.as_bytes())
            .map_err(|e| Error::registry_io(tmp.path(), e))?;
        tmp.persist(&target)
            .map_err(|e| Error::registry_io(&target, e.error))?;
        Ok(())
    })
    .await
    .map_err(|e| Error::registry_io(path, std::io::Error::other(e)))?
}

#[async_trait]
impl NoticeRegistry for FileRegistry {
    async fn load(&self) -> Result<Vec<EphemeralNotice>> {
        let raw = match fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "creating empty notice registry");
                self.write_snapshot(&[]).await?;
                return Ok(Vec::new());
            },
            Err(e) => return Err(Error::registry_io(&self.path, e)),
        };

        match serde_json::from_slice::<Vec<EphemeralNotice>>(&raw) {
            Ok(notices) => {
                debug!(path = %self.path.display(), count = notices.len(), "loaded notice registry");
                Ok(notices)
            },
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "notice registry is unreadable, treating it as empty"
                );
                Ok(Vec::new())
            },
        }
    }

    async fn save(&self, notices: &[EphemeralNotice]) -> Result<()> {
        self.write_snapshot(notices).await?;
        debug!(path = %self.path.display(), count = notices.len(), "saved notice registry");
        Ok(())
    }
}
