//! Named lists of entry ids waiting for a driver notification.
//!
//! Each list lives in `<data_dir>/pending_driver_notifications/<name>.json`
//! as a pretty JSON array. Like the notice registry, a corrupt list reads as
//! empty.

use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use {
    tokio::fs,
    tracing::{debug, warn},
};

use crate::{Error, Result, registry_file::write_json_atomic};

/// Database id of a championship entry.
pub type EntryId = u32;

/// Default directory name inside the data directory.
pub const DEFAULT_PENDING_DIR: &str = "pending_driver_notifications";

pub struct PendingEntries {
    dir: PathBuf,
}

impl PendingEntries {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn in_data_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join(DEFAULT_PENDING_DIR))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn list_path(&self, name: &str) -> Result<PathBuf> {
        let valid = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(Error::invalid_input(format!(
                "invalid pending list name '{name}': use letters, digits, '-' or '_'"
            )));
        }
        Ok(self.dir.join(format!("{name}.json")))
    }

    /// Read a list, creating an empty one when it does not exist yet.
    pub async fn load(&self, name: &str) -> Result<Vec<EntryId>> {
        let path = self.list_path(name)?;
        let raw = match fs::read(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                write_json_atomic(&path, &Vec::<EntryId>::new()).await?;
                return Ok(Vec::new());
            },
            Err(e) => return Err(Error::registry_io(&path, e)),
        };

        Ok(serde_json::from_slice(&raw).unwrap_or_else(|e| {
            warn!(path = %path.display(), error = %e, "pending list is unreadable, treating it as empty");
            Vec::new()
        }))
    }

    pub async fn save(&self, name: &str, ids: &[EntryId]) -> Result<()> {
        let path = self.list_path(name)?;
        write_json_atomic(&path, &ids).await?;
        debug!(list = name, count = ids.len(), "saved pending list");
        Ok(())
    }

    /// Append ids that are not in the list yet, keeping first-seen order.
    pub async fn add(&self, name: &str, ids: &[EntryId]) -> Result<Vec<EntryId>> {
        let mut current = self.load(name).await?;
        for id in ids {
            if !current.contains(id) {
                current.push(*id);
            }
        }
        self.save(name, &current).await?;
        Ok(current)
    }

    pub async fn remove(&self, name: &str, ids: &[EntryId]) -> Result<Vec<EntryId>> {
        let mut current = self.load(name).await?;
        current.retain(|id| !ids.contains(id));
        self.save(name, &current).await?;
        Ok(current)
    }

    /// Names of all lists on disk, sorted.
    pub async fn names(&self) -> Result<Vec<String>> {
        let mut entries = match fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(Error::registry_io(&self.dir, e)),
        };

        let mut names = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| Error::registry_io(&self.dir, e))?
        {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json")
                && let Some(stem) = path.file_stem().and_then(|s| s.to_str())
            {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }
}
