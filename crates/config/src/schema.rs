//! Config schema types.

use std::path::{Path, PathBuf};

use {
    secrecy::{ExposeSecret, Secret},
    serde::{Deserialize, Serialize},
};

/// Discord's per-message character limit for bots.
pub const DISCORD_MESSAGE_LIMIT: usize = 2000;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PitwallConfig {
    /// Where the notice registry and pending lists live. Defaults to the
    /// platform data directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,

    pub discord: DiscordConfig,

    pub notifications: NotificationsConfig,
}

/// Discord bot account used to post notices.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscordConfig {
    /// Bot token from the Discord developer portal.
    #[serde(serialize_with = "serialize_secret")]
    pub token: Secret<String>,

    /// User id of the bot account (used for mention prefixes).
    pub bot_id: u64,

    /// Guild the league runs in.
    pub server_id: u64,

    /// Maximum characters per posted message.
    pub char_limit: usize,

    /// REST API base URL.
    pub api_base: String,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl std::fmt::Debug for DiscordConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscordConfig")
            .field("token", &"[REDACTED]")
            .field("bot_id", &self.bot_id)
            .field("server_id", &self.server_id)
            .field("char_limit", &self.char_limit)
            .field("api_base", &self.api_base)
            .finish_non_exhaustive()
    }
}

fn serialize_secret<S: serde::Serializer>(
    secret: &Secret<String>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}

impl Default for DiscordConfig {
    fn default() -> Self {
        Self {
            token: Secret::new(String::new()),
            bot_id: 0,
            server_id: 0,
            char_limit: DISCORD_MESSAGE_LIMIT,
            api_base: "https://discord.com/api/v10".into(),
            timeout_secs: 15,
        }
    }
}

/// Where notice bookkeeping is stored and how command help is throttled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationsConfig {
    /// Notice registry file, relative to the data directory unless absolute.
    pub registry_file: PathBuf,

    /// Directory of pending-entry lists, relative to the data directory
    /// unless absolute.
    pub pending_dir: PathBuf,

    /// Minimum gap between two command-help posts.
    pub help_cooldown_ms: u64,
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            registry_file: PathBuf::from("temporary_discord_messages.json"),
            pending_dir: PathBuf::from("pending_driver_notifications"),
            help_cooldown_ms: 1000,
        }
    }
}

impl NotificationsConfig {
    pub fn registry_path(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(&self.registry_file)
    }

    pub fn pending_path(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(&self.pending_dir)
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = PitwallConfig::default();
        assert_eq!(cfg.discord.char_limit, 2000);
        assert_eq!(cfg.discord.api_base, "https://discord.com/api/v10");
        assert_eq!(cfg.notifications.help_cooldown_ms, 1000);
        assert!(cfg.data_dir.is_none());
    }

    #[test]
    fn debug_redacts_token() {
        let cfg: DiscordConfig = toml::from_str("token = \"super-secret\"").unwrap();
        let debug = format!("{cfg:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("[REDACTED]"));
        assert_eq!(cfg.token.expose_secret(), "super-secret");
    }

    #[test]
    fn relative_paths_resolve_under_data_dir() {
        let cfg = NotificationsConfig::default();
        let data = Path::new("/var/lib/pitwall");
        assert_eq!(
            cfg.registry_path(data),
            Path::new("/var/lib/pitwall/temporary_discord_messages.json")
        );

        let absolute = NotificationsConfig {
            pending_dir: PathBuf::from("/srv/pending"),
            ..NotificationsConfig::default()
        };
        assert_eq!(absolute.pending_path(data), Path::new("/srv/pending"));
    }
}
